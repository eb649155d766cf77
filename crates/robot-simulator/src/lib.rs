//! # Robot Simulator
//!
//! Point robot in a bounded 2D world, used to generate synthetic motion and
//! landmark-sensing data for localization and mapping exercises.
//!
//! ## Features
//!
//! - Noisy motion with boundary rejection
//! - Noisy relative-position sensing of landmarks within a per-axis range
//! - Injected, seedable noise source with a fixed draw order
//! - Episode generation for building datasets

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod config;
pub mod episode;
pub mod noise;
pub mod robot;

pub use config::{ConfigError, SimulatorConfig};
pub use episode::{Episode, EpisodeConfig, EpisodeGenerator, SimulationError, Step};
pub use noise::{NoiseSource, ScriptedNoise, UniformNoise};
pub use robot::Robot;
pub use robot_domain::{Landmark, Measurement, MeasurementRange, Motion, Position, RobotParams};
