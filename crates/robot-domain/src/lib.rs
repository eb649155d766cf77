//! # Landmark Robot - Domain Model
//!
//! Value types shared by the robot model, the episode generator and anything
//! downstream that consumes generated data (estimators, plotting notebooks).
//!
//! The world is a square with corners at `(0, 0)` and
//! `(world_size, world_size)`. Landmarks are fixed points inside it and are
//! identified by their index in the robot's landmark list.

use serde::{Deserialize, Serialize};

// =============================================================================
// VALUE OBJECTS
// =============================================================================

/// Robot position in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Center of a square world of the given side length
    #[must_use]
    pub fn center(world_size: f64) -> Self {
        Self {
            x: world_size / 2.0,
            y: world_size / 2.0,
        }
    }

    /// Inclusive bounds test against `[0, world_size] x [0, world_size]`
    #[must_use]
    pub fn within(&self, world_size: f64) -> bool {
        (0.0..=world_size).contains(&self.x) && (0.0..=world_size).contains(&self.y)
    }
}

/// Fixed landmark. Coordinates are whole numbers stored as floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Noise-free offset from `from` to this landmark
    #[must_use]
    pub fn offset_from(&self, from: &Position) -> (f64, f64) {
        (self.x - from.x, self.y - from.y)
    }
}

/// One landmark observation: index into the landmark list and the measured
/// relative position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub index: usize,
    pub dx: f64,
    pub dy: f64,
}

impl Measurement {
    #[must_use]
    pub const fn new(index: usize, dx: f64, dy: f64) -> Self {
        Self { index, dx, dy }
    }
}

/// Commanded displacement for a single move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub dx: f64,
    pub dy: f64,
}

impl Motion {
    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Straight-line step of length `distance` along `heading_rad`
    #[must_use]
    pub fn from_heading(heading_rad: f64, distance: f64) -> Self {
        Self {
            dx: heading_rad.cos() * distance,
            dy: heading_rad.sin() * distance,
        }
    }
}

// =============================================================================
// SENSING RANGE
// =============================================================================

/// Per-axis sensing limit.
///
/// The numeric form uses `-1.0` as the "no limit" sentinel, so a range read
/// from configuration or JSON converts through [`From<f64>`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub enum MeasurementRange {
    Limited(f64),
    Unlimited,
}

impl MeasurementRange {
    /// Numeric sentinel for [`MeasurementRange::Unlimited`]
    pub const UNLIMITED_SENTINEL: f64 = -1.0;

    /// Whether an offset of `(dx, dy)` is observable.
    ///
    /// Unlimited bypasses both axis checks; a limited range needs both.
    #[must_use]
    pub fn admits(&self, dx: f64, dy: f64) -> bool {
        match *self {
            Self::Unlimited => true,
            Self::Limited(range) => dx.abs() <= range && dy.abs() <= range,
        }
    }

    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }
}

#[allow(clippy::float_cmp)]
impl From<f64> for MeasurementRange {
    fn from(value: f64) -> Self {
        if value == Self::UNLIMITED_SENTINEL {
            Self::Unlimited
        } else {
            Self::Limited(value)
        }
    }
}

impl From<MeasurementRange> for f64 {
    fn from(range: MeasurementRange) -> Self {
        match range {
            MeasurementRange::Limited(value) => value,
            MeasurementRange::Unlimited => MeasurementRange::UNLIMITED_SENTINEL,
        }
    }
}

impl Default for MeasurementRange {
    fn default() -> Self {
        Self::Limited(30.0)
    }
}

// =============================================================================
// ROBOT PARAMETERS
// =============================================================================

/// World and noise parameters a robot is built with.
///
/// Noise values scale a uniform `[-1, 1)` draw, so they bound the error
/// rather than act as a standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotParams {
    pub world_size: f64,
    pub measurement_range: MeasurementRange,
    pub motion_noise: f64,
    pub measurement_noise: f64,
}

impl RobotParams {
    #[must_use]
    pub const fn new(
        world_size: f64,
        measurement_range: MeasurementRange,
        motion_noise: f64,
        measurement_noise: f64,
    ) -> Self {
        Self {
            world_size,
            measurement_range,
            motion_noise,
            measurement_noise,
        }
    }

    #[must_use]
    pub const fn with_world_size(mut self, world_size: f64) -> Self {
        self.world_size = world_size;
        self
    }

    #[must_use]
    pub const fn with_measurement_range(mut self, range: MeasurementRange) -> Self {
        self.measurement_range = range;
        self
    }

    #[must_use]
    pub const fn with_motion_noise(mut self, noise: f64) -> Self {
        self.motion_noise = noise;
        self
    }

    #[must_use]
    pub const fn with_measurement_noise(mut self, noise: f64) -> Self {
        self.measurement_noise = noise;
        self
    }

    /// Noise-free parameters, handy for deterministic runs
    #[must_use]
    pub const fn noiseless(self) -> Self {
        self.with_motion_noise(0.0).with_measurement_noise(0.0)
    }

    /// Check parameters before handing them to a robot.
    ///
    /// The robot itself accepts anything; this is for configuration layers
    /// that want to reject obviously broken input up front.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidParameter`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(self.world_size.is_finite() && self.world_size > 0.0) {
            return Err(DomainError::invalid("world_size", self.world_size));
        }
        if let MeasurementRange::Limited(range) = self.measurement_range {
            if !(range.is_finite() && range > 0.0) {
                return Err(DomainError::invalid("measurement_range", range));
            }
        }
        if !(self.motion_noise.is_finite() && self.motion_noise >= 0.0) {
            return Err(DomainError::invalid("motion_noise", self.motion_noise));
        }
        if !(self.measurement_noise.is_finite() && self.measurement_noise >= 0.0) {
            return Err(DomainError::invalid(
                "measurement_noise",
                self.measurement_noise,
            ));
        }
        Ok(())
    }
}

impl Default for RobotParams {
    fn default() -> Self {
        Self {
            world_size: 100.0,
            measurement_range: MeasurementRange::default(),
            motion_noise: 1.0,
            measurement_noise: 1.0,
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid parameter: {name}={value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

impl DomainError {
    const fn invalid(name: &'static str, value: f64) -> Self {
        Self::InvalidParameter { name, value }
    }
}
