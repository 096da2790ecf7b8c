//! Configuration types for agent creation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, q_learning::StateEncoding};

/// Learning rate of the reference smartcab agent.
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
/// Discount factor of the reference smartcab agent.
pub const DEFAULT_DISCOUNT_FACTOR: f64 = 0.3;
/// Exploration rate of the reference smartcab agent.
pub const DEFAULT_EPSILON: f64 = 0.06;
/// A tick reward above this counts as reaching the destination.
pub const DEFAULT_SUCCESS_THRESHOLD: f64 = 5.0;

/// Configuration for creating a learning agent.
///
/// Builder-style setters keep call sites readable; the struct also
/// deserializes from JSON with every field optional.
///
/// # Examples
///
/// ```
/// use smartcab::{app::AgentConfig, q_learning::StateEncoding};
///
/// let config = AgentConfig::default()
///     .with_seed(42)
///     .with_epsilon(0.1)
///     .with_encoding(StateEncoding::Full);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// Initial exploration rate ε
    pub epsilon: f64,
    /// Multiplicative ε decay applied at the start of every trial after the first
    pub epsilon_decay: f64,
    /// Floor for the decayed ε
    pub min_epsilon: f64,
    /// How percepts are compressed into table states
    pub encoding: StateEncoding,
    /// Reward above which a tick counts as a successful arrival
    pub success_threshold: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            discount_factor: DEFAULT_DISCOUNT_FACTOR,
            epsilon: DEFAULT_EPSILON,
            epsilon_decay: 1.0,
            min_epsilon: 0.0,
            encoding: StateEncoding::default(),
            success_threshold: DEFAULT_SUCCESS_THRESHOLD,
            seed: None,
        }
    }
}

impl AgentConfig {
    /// Load a configuration from a JSON file. Missing fields take their
    /// defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open agent config {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_epsilon_decay(mut self, epsilon_decay: f64) -> Self {
        self.epsilon_decay = epsilon_decay;
        self
    }

    pub fn with_min_epsilon(mut self, min_epsilon: f64) -> Self {
        self.min_epsilon = min_epsilon;
        self
    }

    pub fn with_encoding(mut self, encoding: StateEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_success_threshold(mut self, threshold: f64) -> Self {
        self.success_threshold = threshold;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every rate lies in `[0, 1]`, the discount factor stays
    /// below 1 and the threshold is finite.
    ///
    /// With `discount_factor = 1` a rewarded self-loop has no finite value, so
    /// it is rejected.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.discount_factor) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "discount_factor must be in [0, 1), got {}",
                    self.discount_factor
                ),
            });
        }
        let rates = [
            ("learning_rate", self.learning_rate),
            ("epsilon", self.epsilon),
            ("epsilon_decay", self.epsilon_decay),
            ("min_epsilon", self.min_epsilon),
        ];
        for (name, value) in rates {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} must be in [0, 1], got {value}"),
                });
            }
        }
        if !self.success_threshold.is_finite() {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "success_threshold must be finite, got {}",
                    self.success_threshold
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_match_reference_agent() {
        let config = AgentConfig::default();
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.discount_factor, 0.3);
        assert_eq!(config.epsilon, 0.06);
        assert_eq!(config.encoding, StateEncoding::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(AgentConfig::default().with_epsilon(-0.1).validate().is_err());
        assert!(
            AgentConfig::default()
                .with_discount_factor(1.01)
                .validate()
                .is_err()
        );
        assert!(
            AgentConfig::default()
                .with_discount_factor(1.0)
                .validate()
                .is_err()
        );
        assert!(
            AgentConfig::default()
                .with_discount_factor(0.0)
                .validate()
                .is_ok()
        );
        assert!(
            AgentConfig::default()
                .with_learning_rate(f64::NAN)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"epsilon": 0.2, "encoding": "full"}}"#).unwrap();

        let config = AgentConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.epsilon, 0.2);
        assert_eq!(config.encoding, StateEncoding::Full);
        assert_eq!(config.learning_rate, DEFAULT_LEARNING_RATE);
    }

    #[test]
    fn test_json_with_invalid_rate_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"learning_rate": 3.0}}"#).unwrap();
        assert!(matches!(
            AgentConfig::from_json_file(file.path()),
            Err(Error::InvalidConfiguration { .. })
        ));
    }
}
