//! Pairwise inverse-square interaction between all bodies.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::{DEFAULT_SEED, Force, ParamSpec, Params, separation};
use crate::error::SimulationError;
use crate::graph::{Body, BodyGraph, BodyId};
use crate::spatial::{PointMass, Quadtree};

const GRAVITATIONAL_CONSTANT: usize = 0;
const DISTANCE: usize = 1;
const THETA: usize = 2;
const MIN_DISTANCE: usize = 3;

static PARAMS: [ParamSpec; 4] = [
    ParamSpec::new("GravitationalConstant", -1.0, -10.0, 10.0),
    ParamSpec::new("Distance", -1.0, -1.0, 500.0),
    ParamSpec::new("BarnesHutTheta", 0.9, 0.0, 1.0),
    ParamSpec::new("MinDistance", 0.01, 0.0, 10.0),
];

/// Inverse-square force between every pair of bodies, `G·m₁·m₂/r²`.
///
/// A negative `GravitationalConstant` makes bodies repel, which is what a
/// force-directed layout wants. Pairs farther apart than `Distance` are
/// ignored when `Distance` is positive. Distant groups are approximated with
/// a Barnes-Hut quadtree rebuilt at the start of every pass; `BarnesHutTheta`
/// of zero disables the approximation.
#[derive(Debug, Clone)]
pub struct NBodyForce {
    params: Params<4>,
    tree: Quadtree,
    seed: u64,
    rng: ChaCha8Rng,
}

impl NBodyForce {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create the force with its own jitter seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            params: Params::new(&PARAMS),
            tree: Quadtree::default(),
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Set the gravitational constant.
    #[must_use]
    pub fn with_strength(mut self, gravitational_constant: f32) -> Self {
        self.params.put(GRAVITATIONAL_CONSTANT, gravitational_constant);
        self
    }
}

impl Default for NBodyForce {
    fn default() -> Self {
        Self::new()
    }
}

impl Force for NBodyForce {
    fn name(&self) -> &'static str {
        "NBodyForce"
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

    fn init(&mut self, graph: &BodyGraph) {
        self.tree.rebuild(graph.bodies().map(|(id, body)| PointMass {
            id,
            location: body.location,
            mass: body.mass(),
        }));
    }

    fn apply_to_body(&mut self, id: BodyId, body: &mut Body) {
        let g = self.params.get(GRAVITATIONAL_CONSTANT);
        let max_distance = self.params.get(DISTANCE);
        let theta = self.params.get(THETA);
        let min_distance = self.params.get(MIN_DISTANCE);
        let mass = body.mass();
        let location = body.location;

        let rng = &mut self.rng;
        let (mut fx, mut fy) = (0.0, 0.0);
        self.tree.visit(location, id, theta, |center, other_mass| {
            let Some((dx, dy, r)) = separation(location, center, rng) else {
                return;
            };
            if max_distance > 0.0 && r > max_distance {
                return;
            }
            let floored = r.max(min_distance);
            let v = g * mass * other_mass / (floored * floored * r);
            fx += v * dx;
            fy += v * dy;
        });
        body.add_force(fx, fy);
    }
}
