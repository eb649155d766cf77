//! Episode generation: drive a robot around and record what it senses.
//!
//! The robot picks a random heading and keeps moving in a straight line.
//! When a step would take it out of the world it turns to a new random
//! heading and tries again. Each recorded step holds the measurements taken
//! before the move and the motion that was accepted.

use std::collections::BTreeSet;
use std::f64::consts::TAU;

use chrono::{DateTime, Utc};
use robot_domain::{Landmark, Measurement, Motion, Position, RobotParams};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::noise::{NoiseSource, UniformNoise};
use crate::robot::Robot;

/// Episode generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeConfig {
    pub params: RobotParams,
    pub num_landmarks: usize,
    /// Number of time steps, including the final pose; `num_steps - 1`
    /// sense/move pairs are recorded.
    pub num_steps: usize,
    /// Length of each commanded move
    pub distance: f64,
    /// Headings tried per step before giving up
    pub max_move_attempts: usize,
    /// Whole-episode retries when some landmark was never seen
    pub max_episode_attempts: usize,
    pub require_full_coverage: bool,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            params: RobotParams::default(),
            num_landmarks: 5,
            num_steps: 20,
            distance: 20.0,
            max_move_attempts: 1000,
            max_episode_attempts: 100,
            require_full_coverage: true,
        }
    }
}

/// One recorded time step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub measurements: Vec<Measurement>,
    pub motion: Motion,
}

/// A generated dataset: ground-truth landmarks plus the observation stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub episode_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub seed: Option<u64>,
    pub params: RobotParams,
    pub landmarks: Vec<Landmark>,
    pub steps: Vec<Step>,
    pub final_position: Position,
    /// Generation attempts it took to reach the required coverage
    pub attempts: usize,
}

impl Episode {
    /// Indices of landmarks observed at least once
    #[must_use]
    pub fn observed_landmarks(&self) -> BTreeSet<usize> {
        observed(&self.steps)
    }

    #[must_use]
    pub fn coverage_complete(&self) -> bool {
        self.observed_landmarks().len() == self.landmarks.len()
    }
}

fn observed(steps: &[Step]) -> BTreeSet<usize> {
    steps
        .iter()
        .flat_map(|step| step.measurements.iter().map(|m| m.index))
        .collect()
}

/// Episode generation errors.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("Robot stuck at step {step}: no heading accepted after {attempts} attempts")]
    Stuck { step: usize, attempts: usize },

    #[error(
        "Landmark coverage incomplete after {attempts} episodes: {observed}/{total} landmarks observed"
    )]
    IncompleteCoverage {
        attempts: usize,
        observed: usize,
        total: usize,
    },
}

/// Generates episodes from a single robot and noise stream.
pub struct EpisodeGenerator<N = UniformNoise> {
    config: EpisodeConfig,
    robot: Robot<N>,
    seed: Option<u64>,
}

impl EpisodeGenerator<UniformNoise> {
    #[must_use]
    pub fn new(config: EpisodeConfig) -> Self {
        Self {
            robot: Robot::new(config.params),
            config,
            seed: None,
        }
    }

    /// Generator whose episodes are reproducible from `seed`.
    #[must_use]
    pub fn seeded(config: EpisodeConfig, seed: u64) -> Self {
        Self {
            robot: Robot::seeded(config.params, seed),
            config,
            seed: Some(seed),
        }
    }
}

impl<N: NoiseSource> EpisodeGenerator<N> {
    pub fn with_noise(config: EpisodeConfig, noise: N) -> Self {
        Self {
            robot: Robot::with_noise(config.params, noise),
            config,
            seed: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &EpisodeConfig {
        &self.config
    }

    #[must_use]
    pub const fn robot(&self) -> &Robot<N> {
        &self.robot
    }

    /// Generate one episode.
    ///
    /// Landmarks are regenerated and the robot recentered on every attempt.
    ///
    /// # Errors
    ///
    /// [`SimulationError::Stuck`] if no heading is accepted within
    /// `max_move_attempts`, [`SimulationError::IncompleteCoverage`] if full
    /// coverage is required and not reached within `max_episode_attempts`.
    pub fn generate(&mut self) -> Result<Episode, SimulationError> {
        let max_attempts = self.config.max_episode_attempts.max(1);
        let mut last_observed = 0;

        for attempt in 1..=max_attempts {
            let steps = self.run_once()?;
            let seen = observed(&steps).len();

            if !self.config.require_full_coverage || seen == self.robot.num_landmarks() {
                info!(
                    attempt,
                    steps = steps.len(),
                    landmarks = self.robot.num_landmarks(),
                    observed = seen,
                    "episode generated"
                );
                return Ok(Episode {
                    episode_id: Uuid::new_v4(),
                    generated_at: Utc::now(),
                    seed: self.seed,
                    params: self.config.params,
                    landmarks: self.robot.landmarks().to_vec(),
                    steps,
                    final_position: self.robot.position(),
                    attempts: attempt,
                });
            }

            debug!(
                attempt,
                observed = seen,
                total = self.robot.num_landmarks(),
                "landmark coverage incomplete, regenerating"
            );
            last_observed = seen;
        }

        Err(SimulationError::IncompleteCoverage {
            attempts: max_attempts,
            observed: last_observed,
            total: self.config.num_landmarks,
        })
    }

    fn run_once(&mut self) -> Result<Vec<Step>, SimulationError> {
        let EpisodeConfig {
            num_landmarks,
            num_steps,
            distance,
            max_move_attempts,
            ..
        } = self.config;
        let max_move_attempts = max_move_attempts.max(1);

        self.robot.make_landmarks(num_landmarks);
        self.robot.recenter();

        let mut heading = self.draw_heading();
        let mut steps = Vec::with_capacity(num_steps.saturating_sub(1));

        for step in 0..num_steps.saturating_sub(1) {
            let measurements = self.robot.sense();

            let mut attempts = 0;
            let motion = loop {
                let motion = Motion::from_heading(heading, distance);
                attempts += 1;
                if self.robot.apply(motion) {
                    break motion;
                }
                if attempts >= max_move_attempts {
                    return Err(SimulationError::Stuck { step, attempts });
                }
                heading = self.draw_heading();
            };

            if attempts > 1 {
                debug!(step, attempts, heading, "turned away from boundary");
            }
            steps.push(Step {
                measurements,
                motion,
            });
        }

        Ok(steps)
    }

    fn draw_heading(&mut self) -> f64 {
        self.robot.noise_mut().next_unit() * TAU
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robot_domain::MeasurementRange;

    fn unlimited_config() -> EpisodeConfig {
        EpisodeConfig {
            params: RobotParams::default().with_measurement_range(MeasurementRange::Unlimited),
            ..EpisodeConfig::default()
        }
    }

    #[test]
    fn test_generate_episode() {
        let mut generator = EpisodeGenerator::seeded(unlimited_config(), 17);
        let episode = generator.generate().unwrap();

        assert_eq!(episode.steps.len(), 19);
        assert_eq!(episode.landmarks.len(), 5);
        assert_eq!(episode.seed, Some(17));
        assert_eq!(episode.attempts, 1);
        assert!(episode.coverage_complete());
        assert!(episode.final_position.within(100.0));
        for step in &episode.steps {
            assert_eq!(step.measurements.len(), 5);
        }
    }

    #[test]
    fn test_motions_have_commanded_length() {
        let config = EpisodeConfig {
            distance: 60.0,
            num_steps: 50,
            ..unlimited_config()
        };
        let mut generator = EpisodeGenerator::seeded(config, 4);
        let episode = generator.generate().unwrap();

        for step in &episode.steps {
            let length = step.motion.dx.hypot(step.motion.dy);
            assert!((length - 60.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_same_seed_same_episode() {
        let config = EpisodeConfig::default();
        let a = EpisodeGenerator::seeded(config, 123).generate().unwrap();
        let b = EpisodeGenerator::seeded(config, 123).generate().unwrap();

        assert_eq!(a.landmarks, b.landmarks);
        assert_eq!(a.steps, b.steps);
        assert_eq!(a.final_position, b.final_position);
        assert_ne!(a.episode_id, b.episode_id);
    }

    #[test]
    fn test_default_config_reaches_full_coverage() {
        let mut generator = EpisodeGenerator::seeded(EpisodeConfig::default(), 9);
        let episode = generator.generate().unwrap();
        assert!(episode.coverage_complete());
        assert!(
            episode
                .observed_landmarks()
                .iter()
                .all(|&i| i < episode.landmarks.len())
        );
    }

    #[test]
    fn test_stuck_robot_errors() {
        let config = EpisodeConfig {
            params: RobotParams::default().with_world_size(0.0).noiseless(),
            num_steps: 3,
            distance: 1.0,
            max_move_attempts: 10,
            ..EpisodeConfig::default()
        };
        let mut generator = EpisodeGenerator::seeded(config, 1);
        let err = generator.generate().unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Stuck {
                step: 0,
                attempts: 10
            }
        ));
    }

    #[test]
    fn test_incomplete_coverage() {
        let config = EpisodeConfig {
            params: RobotParams::default()
                .with_measurement_range(MeasurementRange::Limited(0.001))
                .noiseless(),
            num_steps: 2,
            max_episode_attempts: 3,
            ..EpisodeConfig::default()
        };

        let err = EpisodeGenerator::seeded(config, 5).generate().unwrap_err();
        assert!(matches!(
            err,
            SimulationError::IncompleteCoverage {
                attempts: 3,
                total: 5,
                ..
            }
        ));

        let relaxed = EpisodeConfig {
            require_full_coverage: false,
            ..config
        };
        let episode = EpisodeGenerator::seeded(relaxed, 5).generate().unwrap();
        assert_eq!(episode.steps.len(), 1);
        assert!(!episode.coverage_complete());
    }

    #[test]
    fn test_single_step_episode_is_empty() {
        let config = EpisodeConfig {
            num_steps: 1,
            require_full_coverage: false,
            ..EpisodeConfig::default()
        };
        let episode = EpisodeGenerator::seeded(config, 2).generate().unwrap();
        assert!(episode.steps.is_empty());
        assert_eq!(episode.final_position, Position::center(100.0));
    }

    #[test]
    fn test_episode_serializes() {
        let episode = EpisodeGenerator::seeded(unlimited_config(), 31)
            .generate()
            .unwrap();
        let json = serde_json::to_value(&episode).unwrap();
        assert_eq!(json["params"]["measurement_range"], serde_json::json!(-1.0));
        assert_eq!(json["steps"].as_array().unwrap().len(), 19);
        assert_eq!(json["landmarks"].as_array().unwrap().len(), 5);
    }
}
