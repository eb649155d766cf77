//! # Simulator Configuration
//!
//! Environment-based configuration for the episode generator CLI. Command
//! line flags are layered on top by the binary.

use std::env;
use std::str::FromStr;

use robot_domain::{DomainError, MeasurementRange, RobotParams};
use thiserror::Error;

use crate::episode::EpisodeConfig;

/// Simulator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Robot world and noise parameters
    pub params: RobotParams,

    /// Landmarks per episode
    pub num_landmarks: usize,

    /// Time steps per episode
    pub num_steps: usize,

    /// Commanded move length
    pub distance: f64,

    /// Noise seed; entropy when unset
    pub seed: Option<u64>,

    /// Episodes to generate
    pub episodes: usize,

    /// Logging level
    pub log_level: String,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    Parse { key: &'static str, value: String },

    #[error(transparent)]
    Robot(#[from] DomainError),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

impl SimulatorConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let params = RobotParams {
            world_size: env_or("ROBOT_WORLD_SIZE", defaults.params.world_size)?,
            measurement_range: MeasurementRange::from(env_or(
                "ROBOT_MEASUREMENT_RANGE",
                f64::from(defaults.params.measurement_range),
            )?),
            motion_noise: env_or("ROBOT_MOTION_NOISE", defaults.params.motion_noise)?,
            measurement_noise: env_or(
                "ROBOT_MEASUREMENT_NOISE",
                defaults.params.measurement_noise,
            )?,
        };

        Ok(Self {
            params,
            num_landmarks: env_or("SIM_NUM_LANDMARKS", defaults.num_landmarks)?,
            num_steps: env_or("SIM_NUM_STEPS", defaults.num_steps)?,
            distance: env_or("SIM_DISTANCE", defaults.distance)?,
            seed: env_opt("SIM_SEED")?,
            episodes: env_or("SIM_EPISODES", defaults.episodes)?,
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Reject settings that cannot produce a meaningful run.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;

        if self.num_steps == 0 {
            return Err(ConfigError::Invalid("num_steps must be at least 1".into()));
        }
        if !(self.distance.is_finite() && self.distance >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "distance must be a non-negative number, got {}",
                self.distance
            )));
        }
        Ok(())
    }

    /// Episode settings derived from this configuration
    #[must_use]
    pub fn episode_config(&self) -> EpisodeConfig {
        EpisodeConfig {
            params: self.params,
            num_landmarks: self.num_landmarks,
            num_steps: self.num_steps,
            distance: self.distance,
            ..EpisodeConfig::default()
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        let episode = EpisodeConfig::default();
        Self {
            params: episode.params,
            num_landmarks: episode.num_landmarks,
            num_steps: episode.num_steps,
            distance: episode.distance,
            seed: None,
            episodes: 1,
            log_level: "info".to_string(),
        }
    }
}

fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    Ok(env_opt(key)?.unwrap_or(default))
}

fn env_opt<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Parse { key, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.episodes, 1);
        assert_eq!(config.params, RobotParams::default());
    }

    #[test]
    fn test_episode_config_carries_settings() {
        let config = SimulatorConfig {
            num_landmarks: 8,
            num_steps: 40,
            distance: 12.5,
            ..SimulatorConfig::default()
        };
        let episode = config.episode_config();
        assert_eq!(episode.num_landmarks, 8);
        assert_eq!(episode.num_steps, 40);
        assert_eq!(episode.distance, 12.5);
        assert!(episode.require_full_coverage);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let zero_steps = SimulatorConfig {
            num_steps: 0,
            ..SimulatorConfig::default()
        };
        assert!(matches!(zero_steps.validate(), Err(ConfigError::Invalid(_))));

        let bad_world = SimulatorConfig {
            params: RobotParams::default().with_world_size(-5.0),
            ..SimulatorConfig::default()
        };
        assert!(matches!(bad_world.validate(), Err(ConfigError::Robot(_))));

        let bad_distance = SimulatorConfig {
            distance: f64::NAN,
            ..SimulatorConfig::default()
        };
        assert!(bad_distance.validate().is_err());
    }

    #[test]
    fn test_env_parsing() {
        assert_eq!(
            env_or::<usize>("ROBOT_SIM_TEST_UNSET_VARIABLE", 7).unwrap(),
            7
        );
        assert!(env_opt::<u64>("ROBOT_SIM_TEST_UNSET_VARIABLE").unwrap().is_none());
    }
}
