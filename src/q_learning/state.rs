//! State abstraction: percepts plus waypoint to a compact table key

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    types::{Action, Light, Percepts, split_pairs},
};

/// How much of the traffic picture goes into the state.
///
/// Position, destination and deadline never do; the encoding only decides
/// how the three traffic slots are summarised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateEncoding {
    /// Two flags: car on the left going forward, oncoming car going forward.
    /// 4 waypoints × 2 lights × 4 flag combinations = 32 states.
    #[default]
    Compact,
    /// The raw intent of the left, right and oncoming vehicles.
    /// 4 × 2 × 4³ = 512 states.
    Full,
}

impl StateEncoding {
    /// Build the state key for one tick. Pure and total.
    pub fn encode(self, percepts: &Percepts, next_waypoint: Action) -> State {
        let traffic = match self {
            StateEncoding::Compact => Traffic::Conflicts {
                left_forward: percepts.left == Action::Forward,
                oncoming_forward: percepts.oncoming == Action::Forward,
            },
            StateEncoding::Full => Traffic::Raw {
                left: percepts.left,
                right: percepts.right,
                oncoming: percepts.oncoming,
            },
        };
        State {
            next_waypoint,
            light: percepts.light,
            traffic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StateEncoding::Compact => "compact",
            StateEncoding::Full => "full",
        }
    }
}

impl fmt::Display for StateEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(StateEncoding::Compact),
            "full" | "raw" => Ok(StateEncoding::Full),
            _ => Err(Error::ParseStateEncoding {
                input: s.to_string(),
            }),
        }
    }
}

/// Traffic summary at the intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Traffic {
    Conflicts {
        left_forward: bool,
        oncoming_forward: bool,
    },
    Raw {
        left: Action,
        right: Action,
        oncoming: Action,
    },
}

/// Q-table state key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    pub next_waypoint: Action,
    pub light: Light,
    pub traffic: Traffic,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "waypoint={} light={}", self.next_waypoint, self.light)?;
        match self.traffic {
            Traffic::Conflicts {
                left_forward,
                oncoming_forward,
            } => write!(
                f,
                " left_forward={} oncoming_forward={}",
                u8::from(left_forward),
                u8::from(oncoming_forward)
            ),
            Traffic::Raw {
                left,
                right,
                oncoming,
            } => write!(f, " left={left} right={right} oncoming={oncoming}"),
        }
    }
}

/// Parse `waypoint=forward,light=green,left=none,right=none,oncoming=none`.
///
/// The waypoint key may also be spelled `next_waypoint`, but only one of the
/// two may appear, once. The remaining keys
/// go through [`Percepts::from_pairs`], so unknown keys and bad values fail
/// here rather than producing a key that never matches the table.
pub fn parse_observation(text: &str) -> Result<(Percepts, Action)> {
    let pairs = split_pairs(text)?;
    let mut waypoint = None;
    let mut rest = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        if key == "waypoint" || key == "next_waypoint" {
            if waypoint.is_some() {
                return Err(Error::InvalidPercept {
                    key: key.to_string(),
                    value: value.to_string(),
                    reason: "duplicate key".to_string(),
                });
            }
            waypoint = Some(value.parse::<Action>().map_err(|err| Error::InvalidPercept {
                key: key.to_string(),
                value: value.to_string(),
                reason: err.to_string(),
            })?);
        } else {
            rest.push((key, value));
        }
    }
    let waypoint = waypoint.ok_or_else(|| Error::MissingPercept {
        key: "waypoint".to_string(),
        context: text.to_string(),
    })?;
    Ok((Percepts::from_pairs(rest)?, waypoint))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_compact_collapses_irrelevant_traffic() {
        let a = Percepts {
            light: Light::Red,
            left: Action::Left,
            right: Action::Forward,
            oncoming: Action::Right,
        };
        let b = Percepts::clear(Light::Red);
        let encoding = StateEncoding::Compact;
        assert_eq!(
            encoding.encode(&a, Action::Forward),
            encoding.encode(&b, Action::Forward)
        );
    }

    #[test]
    fn test_compact_flags() {
        let percepts = Percepts {
            light: Light::Green,
            left: Action::Forward,
            right: Action::Idle,
            oncoming: Action::Forward,
        };
        let state = StateEncoding::Compact.encode(&percepts, Action::Left);
        assert_eq!(
            state.traffic,
            Traffic::Conflicts {
                left_forward: true,
                oncoming_forward: true
            }
        );
        assert_eq!(state.next_waypoint, Action::Left);
        assert_eq!(state.light, Light::Green);
    }

    #[test]
    fn test_full_keeps_raw_slots() {
        let a = Percepts {
            light: Light::Red,
            left: Action::Left,
            right: Action::Idle,
            oncoming: Action::Idle,
        };
        let b = Percepts::clear(Light::Red);
        let encoding = StateEncoding::Full;
        assert_ne!(
            encoding.encode(&a, Action::Forward),
            encoding.encode(&b, Action::Forward)
        );
    }

    #[test]
    fn test_identical_percepts_hash_identically() {
        let percepts = Percepts::clear(Light::Green);
        let mut keys = HashSet::new();
        for _ in 0..3 {
            keys.insert(StateEncoding::Compact.encode(&percepts, Action::Forward));
        }
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn test_compact_state_space_size() {
        let mut keys = HashSet::new();
        for waypoint in Action::ALL {
            for light in [Light::Red, Light::Green] {
                for left in Action::ALL {
                    for right in Action::ALL {
                        for oncoming in Action::ALL {
                            let percepts = Percepts {
                                light,
                                left,
                                right,
                                oncoming,
                            };
                            keys.insert(StateEncoding::Compact.encode(&percepts, waypoint));
                        }
                    }
                }
            }
        }
        assert_eq!(keys.len(), 32);
    }

    #[test]
    fn test_parse_observation() {
        let (percepts, waypoint) =
            parse_observation("waypoint=right,light=red,left=forward,right=none,oncoming=none")
                .unwrap();
        assert_eq!(waypoint, Action::Right);
        assert_eq!(percepts.left, Action::Forward);
    }

    #[test]
    fn test_parse_observation_requires_waypoint() {
        let err = parse_observation("light=red,left=none,right=none,oncoming=none").unwrap_err();
        assert!(matches!(err, Error::MissingPercept { .. }));
    }

    #[test]
    fn test_parse_observation_rejects_repeated_waypoint() {
        for text in [
            "waypoint=left,waypoint=right,light=green,left=none,right=none,oncoming=none",
            "waypoint=left,next_waypoint=right,light=green,left=none,right=none,oncoming=none",
        ] {
            assert!(matches!(
                parse_observation(text),
                Err(Error::InvalidPercept { .. })
            ));
        }
    }

    #[test]
    fn test_encoding_parse() {
        assert_eq!("full".parse::<StateEncoding>().unwrap(), StateEncoding::Full);
        assert!("fancy".parse::<StateEncoding>().is_err());
    }
}
