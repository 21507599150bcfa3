//! Uniform gravitational field.

use super::{Force, ParamSpec, Params};
use crate::error::SimulationError;
use crate::graph::{Body, BodyId};

const GRAVITATIONAL_CONSTANT: usize = 0;
const DIRECTION: usize = 1;

static PARAMS: [ParamSpec; 2] = [
    ParamSpec::new("GravitationalConstant", 1e-4, 0.0, 1e-3),
    ParamSpec::new("Direction", -std::f32::consts::FRAC_PI_2, -std::f32::consts::PI, std::f32::consts::PI),
];

/// Constant pull on every body, `F = m·g` along `Direction` (radians).
///
/// The default direction of `-π/2` points down the y axis.
#[derive(Debug, Clone)]
pub struct GravitationalForce {
    params: Params<2>,
}

impl GravitationalForce {
    pub fn new() -> Self {
        Self {
            params: Params::new(&PARAMS),
        }
    }

    /// Set strength and direction.
    #[must_use]
    pub fn with_field(mut self, gravitational_constant: f32, direction: f32) -> Self {
        self.params.put(GRAVITATIONAL_CONSTANT, gravitational_constant);
        self.params.put(DIRECTION, direction);
        self
    }
}

impl Default for GravitationalForce {
    fn default() -> Self {
        Self::new()
    }
}

impl Force for GravitationalForce {
    fn name(&self) -> &'static str {
        "GravitationalForce"
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
        let g = self.params.get(GRAVITATIONAL_CONSTANT) * body.mass();
        let (sin, cos) = self.params.get(DIRECTION).sin_cos();
        body.add_force(g * cos, g * sin);
    }
}
