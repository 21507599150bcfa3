//! Velocity-proportional drag.

use super::{Force, ParamSpec, Params};
use crate::error::SimulationError;
use crate::graph::{Body, BodyId};

const DRAG_COEFFICIENT: usize = 0;

static PARAMS: [ParamSpec; 1] = [ParamSpec::new("DragCoefficient", 0.01, 0.0, 0.1)];

/// Drag opposing each body's velocity, `F = -c·v`.
#[derive(Debug, Clone)]
pub struct DragForce {
    params: Params<1>,
}

impl DragForce {
    pub fn new() -> Self {
        Self {
            params: Params::new(&PARAMS),
        }
    }

    /// Set the drag coefficient.
    #[must_use]
    pub fn with_coefficient(mut self, coefficient: f32) -> Self {
        self.params.put(DRAG_COEFFICIENT, coefficient);
        self
    }
}

impl Default for DragForce {
    fn default() -> Self {
        Self::new()
    }
}

impl Force for DragForce {
    fn name(&self) -> &'static str {
        "DragForce"
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
        let c = self.params.get(DRAG_COEFFICIENT);
        let [vx, vy] = body.velocity;
        body.add_force(-c * vx, -c * vy);
    }
}
