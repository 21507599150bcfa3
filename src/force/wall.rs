//! Circular containment wall.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::{DEFAULT_SEED, Force, ParamSpec, Params, separation};
use crate::error::SimulationError;
use crate::graph::{Body, BodyId};

const GRAVITATIONAL_CONSTANT: usize = 0;
const CENTER_X: usize = 1;
const CENTER_Y: usize = 2;
const RADIUS: usize = 3;
const MIN_DISTANCE: usize = 4;

static PARAMS: [ParamSpec; 5] = [
    ParamSpec::new("GravitationalConstant", -0.1, -1.0, 1.0),
    ParamSpec::new("CenterX", 0.0, -10_000.0, 10_000.0),
    ParamSpec::new("CenterY", 0.0, -10_000.0, 10_000.0),
    ParamSpec::new("Radius", 100.0, 0.0, 10_000.0),
    ParamSpec::new("MinDistance", 0.01, 0.0, 10.0),
];

/// Inverse-square interaction with a circular wall.
///
/// The magnitude is `G·m/d²`, `d` being the body's distance to the wall. With
/// a negative constant the wall repels from both sides, so bodies inside stay
/// inside.
#[derive(Debug, Clone)]
pub struct CircularWallForce {
    params: Params<5>,
    seed: u64,
    rng: ChaCha8Rng,
}

impl CircularWallForce {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            params: Params::new(&PARAMS),
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Place the wall.
    #[must_use]
    pub fn with_circle(mut self, center: [f32; 2], radius: f32) -> Self {
        self.params.put(CENTER_X, center[0]);
        self.params.put(CENTER_Y, center[1]);
        self.params.put(RADIUS, radius);
        self
    }
}

impl Default for CircularWallForce {
    fn default() -> Self {
        Self::new()
    }
}

impl Force for CircularWallForce {
    fn name(&self) -> &'static str {
        "CircularWallForce"
    }

    fn seed(&self) -> Option<u64> {
        Some(self.seed)
    }

    fn is_body_force(&self) -> bool {
        true
    }

    fn parameters(&self) -> &'static [ParamSpec] {
        self.params.specs()
    }

    fn parameter(&self, name: &str) -> Option<f32> {
        self.params.lookup(name)
    }

    fn set_parameter(&mut self, name: &str, value: f32) -> Result<(), SimulationError> {
        self.params.set(self.name(), name, value)
    }

    fn apply_to_body(&mut self, _id: BodyId, body: &mut Body) {
        let g = self.params.get(GRAVITATIONAL_CONSTANT);
        let center = [self.params.get(CENTER_X), self.params.get(CENTER_Y)];
        let radius = self.params.get(RADIUS);
        let min_distance = self.params.get(MIN_DISTANCE);

        // Outward radial from the center
        let Some((dx, dy, d)) = separation(center, body.location, &mut self.rng) else {
            return;
        };
        let gap = radius - d;
        let side = if gap > 0.0 { 1.0 } else { -1.0 };
        let floored = gap.abs().max(min_distance);
        let v = side * g * body.mass() / (floored * floored);
        body.add_force(v * dx / d, v * dy / d);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn force_at(x: f32, y: f32) -> [f32; 2] {
        let mut body = Body::at(x, y);
        CircularWallForce::new()
            .with_circle([0.0, 0.0], 10.0)
            .apply_to_body(BodyId(0), &mut body);
        body.force
    }

    #[test]
    fn test_inside_pushed_toward_center() {
        let f = force_at(8.0, 0.0);
        // -0.1·1/2² inward
        assert_relative_eq!(f[0], -0.025);
        assert_relative_eq!(f[1], 0.0);
    }

    #[test]
    fn test_outside_pushed_away() {
        let f = force_at(0.0, -12.0);
        assert_relative_eq!(f[0], 0.0);
        assert_relative_eq!(f[1], -0.025);
    }

    #[test]
    fn test_stronger_near_wall() {
        let near = force_at(9.5, 0.0)[0].abs();
        let far = force_at(2.0, 0.0)[0].abs();
        assert!(near > far);
    }

    #[test]
    fn test_at_center_stays_finite() {
        let f = force_at(0.0, 0.0);
        assert!(f[0].is_finite() && f[1].is_finite());
    }

    #[test]
    fn test_on_wall_is_floored() {
        let f = force_at(10.0, 0.0);
        assert!(f[0].is_finite());
        assert!(f[0] > 0.0);
    }
}
