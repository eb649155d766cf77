//! Point robot with noisy motion and noisy landmark sensing.
//!
//! The robot lives in a square world, starts at its center and senses the
//! x- and y-offset to each landmark rather than range and bearing. That keeps
//! the measurement model linear, which is what simple SLAM exercises want.

use std::fmt;

use robot_domain::{Landmark, Measurement, Motion, Position, RobotParams};
use tracing::trace;

use crate::noise::{NoiseSource, UniformNoise};

/// Simulated robot.
///
/// Parameters are taken as given. Degenerate values (a zero world, negative
/// noise) produce degenerate behavior, never a panic.
#[derive(Debug, Clone)]
pub struct Robot<N = UniformNoise> {
    params: RobotParams,
    position: Position,
    landmarks: Vec<Landmark>,
    noise: N,
}

impl Robot<UniformNoise> {
    /// Create a robot with an entropy-seeded noise source.
    #[must_use]
    pub fn new(params: RobotParams) -> Self {
        Self::with_noise(params, UniformNoise::from_entropy())
    }

    /// Create a robot whose noise stream is fully determined by `seed`.
    #[must_use]
    pub fn seeded(params: RobotParams, seed: u64) -> Self {
        Self::with_noise(params, UniformNoise::seeded(seed))
    }
}

impl Default for Robot<UniformNoise> {
    fn default() -> Self {
        Self::new(RobotParams::default())
    }
}

impl<N: NoiseSource> Robot<N> {
    /// Create a robot drawing all randomness from `noise`.
    pub fn with_noise(params: RobotParams, noise: N) -> Self {
        Self {
            params,
            position: Position::center(params.world_size),
            landmarks: Vec::new(),
            noise,
        }
    }

    /// Attempt to move by `(dx, dy)` plus motion noise.
    ///
    /// Both noise draws happen before the bounds check. If the noisy target
    /// leaves `[0, world_size]` on either axis nothing changes and `false`
    /// is returned.
    pub fn move_by(&mut self, dx: f64, dy: f64) -> bool {
        let noise_x = self.noise.sample() * self.params.motion_noise;
        let noise_y = self.noise.sample() * self.params.motion_noise;
        let target = Position::new(
            self.position.x + dx + noise_x,
            self.position.y + dy + noise_y,
        );

        if !target.within(self.params.world_size) {
            trace!(x = target.x, y = target.y, "move rejected, target out of bounds");
            return false;
        }

        self.position = target;
        true
    }

    /// Attempt a [`Motion`]; same contract as [`Robot::move_by`].
    pub fn apply(&mut self, motion: Motion) -> bool {
        self.move_by(motion.dx, motion.dy)
    }

    /// Measure every landmark within range.
    ///
    /// Output is in landmark order and may be empty. Two noise draws are
    /// taken per landmark whether or not it ends up observable.
    pub fn sense(&mut self) -> Vec<Measurement> {
        let range = self.params.measurement_range;
        let scale = self.params.measurement_noise;
        let mut measurements = Vec::with_capacity(self.landmarks.len());

        for (index, landmark) in self.landmarks.iter().enumerate() {
            let (true_dx, true_dy) = landmark.offset_from(&self.position);
            let dx = true_dx + self.noise.sample() * scale;
            let dy = true_dy + self.noise.sample() * scale;

            if range.admits(dx, dy) {
                measurements.push(Measurement::new(index, dx, dy));
            }
        }

        measurements
    }

    /// Replace the landmark set with `num_landmarks` random points.
    ///
    /// Coordinates are `round(u * world_size)` for uniform `u` in `[0, 1)`,
    /// rounding half to even, x drawn before y.
    pub fn make_landmarks(&mut self, num_landmarks: usize) {
        let world_size = self.params.world_size;
        let noise = &mut self.noise;
        let landmarks: Vec<Landmark> = (0..num_landmarks)
            .map(|_| {
                let x = (noise.next_unit() * world_size).round_ties_even();
                let y = (noise.next_unit() * world_size).round_ties_even();
                Landmark::new(x, y)
            })
            .collect();

        trace!(count = landmarks.len(), "landmarks generated");
        self.landmarks = landmarks;
    }

    /// Put the robot back at the world center. Landmarks are kept.
    pub fn recenter(&mut self) {
        self.position = Position::center(self.params.world_size);
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn x(&self) -> f64 {
        self.position.x
    }

    #[must_use]
    pub const fn y(&self) -> f64 {
        self.position.y
    }

    #[must_use]
    pub const fn params(&self) -> &RobotParams {
        &self.params
    }

    #[must_use]
    pub const fn world_size(&self) -> f64 {
        self.params.world_size
    }

    /// Landmarks in index order
    #[must_use]
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    #[must_use]
    pub fn num_landmarks(&self) -> usize {
        self.landmarks.len()
    }

    /// The robot's noise stream, for callers that need extra draws in sequence
    /// with the robot's own.
    pub fn noise_mut(&mut self) -> &mut N {
        &mut self.noise
    }
}

impl<N> fmt::Display for Robot<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Robot: [x={:.5} y={:.5}]",
            self.position.x, self.position.y
        )
    }
}
