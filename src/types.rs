//! Core value types shared by the agent, the ports and the grid world.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A driving action.
///
/// `Idle` is the "none" action: stay at the intersection. The same closed set
/// describes the intent of other vehicles reported by the sensors, where
/// `Idle` also stands for "no vehicle".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[serde(rename = "none")]
    Idle,
    Forward,
    Left,
    Right,
}

impl Action {
    /// Every action, in the environment's canonical order.
    pub const ALL: [Action; 4] = [Action::Idle, Action::Forward, Action::Left, Action::Right];

    /// The actions that change the car's position.
    pub const MOVES: [Action; 3] = [Action::Forward, Action::Left, Action::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Idle => "none",
            Action::Forward => "forward",
            Action::Left => "left",
            Action::Right => "right",
        }
    }

    pub fn is_move(self) -> bool {
        self != Action::Idle
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "idle" => Ok(Action::Idle),
            "forward" => Ok(Action::Forward),
            "left" => Ok(Action::Left),
            "right" => Ok(Action::Right),
            _ => Err(Error::InvalidAction {
                input: s.to_string(),
            }),
        }
    }
}

/// Traffic light colour as seen by the car facing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Light {
    Red,
    Green,
}

impl Light {
    pub fn as_str(self) -> &'static str {
        match self {
            Light::Red => "red",
            Light::Green => "green",
        }
    }
}

impl fmt::Display for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Light {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Light::Red),
            "green" => Ok(Light::Green),
            _ => Err(Error::InvalidLight {
                input: s.to_string(),
            }),
        }
    }
}

/// Compass heading on the grid (screen coordinates: north is -y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    East,
    North,
    West,
    South,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::East, Heading::North, Heading::West, Heading::South];

    /// Unit step `(dx, dy)` for this heading.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::East => (1, 0),
            Heading::North => (0, -1),
            Heading::West => (-1, 0),
            Heading::South => (0, 1),
        }
    }

    pub fn turn_left(self) -> Self {
        match self {
            Heading::East => Heading::North,
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
        }
    }

    pub fn turn_right(self) -> Self {
        match self {
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
            Heading::North => Heading::East,
        }
    }

    pub fn opposite(self) -> Self {
        self.turn_left().turn_left()
    }

    /// True for north/south headings.
    pub fn is_vertical(self) -> bool {
        matches!(self, Heading::North | Heading::South)
    }
}

/// An intersection on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, ignoring wrap-around.
    pub fn distance(&self, other: &Location) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Where a car is and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pose {
    pub location: Location,
    pub heading: Heading,
}

/// Starting conditions of a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialSetup {
    pub start: Pose,
    pub destination: Location,
    pub deadline: i32,
}

/// Raw sensor reading at the car's current intersection.
///
/// `left`, `right` and `oncoming` carry the intended move of the vehicle in
/// that slot, or `Action::Idle` when the slot is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Percepts {
    pub light: Light,
    pub left: Action,
    pub right: Action,
    pub oncoming: Action,
}

impl Percepts {
    pub const KEYS: [&'static str; 4] = ["light", "left", "right", "oncoming"];

    /// A clear intersection with the given light.
    pub fn clear(light: Light) -> Self {
        Self {
            light,
            left: Action::Idle,
            right: Action::Idle,
            oncoming: Action::Idle,
        }
    }

    /// Build percepts from `key=value` pairs.
    ///
    /// Every key in [`Percepts::KEYS`] must appear exactly once; unknown keys
    /// and unparseable values are rejected.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut light = None;
        let mut slots: [Option<Action>; 3] = [None; 3];
        let mut seen = Vec::new();

        for (key, value) in pairs {
            let key = key.trim();
            if seen.contains(&key) {
                return Err(Error::InvalidPercept {
                    key: key.to_string(),
                    value: value.to_string(),
                    reason: "duplicate key".to_string(),
                });
            }
            seen.push(key);

            let invalid = |err: Error| Error::InvalidPercept {
                key: key.to_string(),
                value: value.to_string(),
                reason: err.to_string(),
            };
            match key {
                "light" => light = Some(value.parse::<Light>().map_err(invalid)?),
                "left" => slots[0] = Some(value.parse::<Action>().map_err(invalid)?),
                "right" => slots[1] = Some(value.parse::<Action>().map_err(invalid)?),
                "oncoming" => slots[2] = Some(value.parse::<Action>().map_err(invalid)?),
                other => {
                    return Err(Error::UnknownPerceptKey {
                        key: other.to_string(),
                        expected: Self::KEYS.join(", "),
                    });
                }
            }
        }

        let context = seen.join(",");
        let missing = |key: &str| Error::MissingPercept {
            key: key.to_string(),
            context: context.clone(),
        };
        Ok(Self {
            light: light.ok_or_else(|| missing("light"))?,
            left: slots[0].ok_or_else(|| missing("left"))?,
            right: slots[1].ok_or_else(|| missing("right"))?,
            oncoming: slots[2].ok_or_else(|| missing("oncoming"))?,
        })
    }
}

impl FromStr for Percepts {
    type Err = Error;

    /// Parse `light=green,left=none,right=none,oncoming=forward`.
    fn from_str(s: &str) -> Result<Self> {
        Percepts::from_pairs(split_pairs(s)?)
    }
}

/// Split a `key=value,key=value` list.
pub(crate) fn split_pairs(s: &str) -> Result<Vec<(&str, &str)>> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            part.split_once('=')
                .map(|(key, value)| (key.trim(), value.trim()))
                .ok_or_else(|| Error::InvalidPercept {
                    key: part.trim().to_string(),
                    value: String::new(),
                    reason: "expected key=value".to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse_and_display() {
        assert_eq!("none".parse::<Action>().unwrap(), Action::Idle);
        assert_eq!(" Forward ".parse::<Action>().unwrap(), Action::Forward);
        assert_eq!(Action::Idle.to_string(), "none");
        assert!(matches!(
            "reverse".parse::<Action>(),
            Err(Error::InvalidAction { .. })
        ));
    }

    #[test]
    fn test_only_idle_is_not_a_move() {
        assert!(!Action::Idle.is_move());
        assert!(Action::MOVES.iter().all(|action| action.is_move()));
    }

    #[test]
    fn test_action_serde_uses_none_for_idle() {
        let json = serde_json::to_string(&Action::Idle).unwrap();
        assert_eq!(json, "\"none\"");
        let back: Action = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(back, Action::Left);
    }

    #[test]
    fn test_heading_turns() {
        for heading in Heading::ALL {
            assert_eq!(heading.turn_left().turn_right(), heading);
            assert_eq!(heading.opposite().opposite(), heading);
        }
        assert_eq!(Heading::East.turn_left(), Heading::North);
        assert_eq!(Heading::East.turn_right(), Heading::South);
    }

    #[test]
    fn test_percepts_parse() {
        let percepts: Percepts = "light=green,left=forward,right=none,oncoming=left"
            .parse()
            .unwrap();
        assert_eq!(percepts.light, Light::Green);
        assert_eq!(percepts.left, Action::Forward);
        assert_eq!(percepts.right, Action::Idle);
        assert_eq!(percepts.oncoming, Action::Left);
    }

    #[test]
    fn test_percepts_reject_unknown_key() {
        let err = "light=red,left=none,right=none,oncoming=none,behind=forward"
            .parse::<Percepts>()
            .unwrap_err();
        assert!(matches!(err, Error::UnknownPerceptKey { .. }));
    }

    #[test]
    fn test_percepts_reject_bad_value() {
        let err = "light=amber,left=none,right=none,oncoming=none"
            .parse::<Percepts>()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPercept { .. }));
    }

    #[test]
    fn test_percepts_reject_missing_key() {
        let err = "light=red,left=none".parse::<Percepts>().unwrap_err();
        assert!(matches!(err, Error::MissingPercept { .. }));
    }
}
