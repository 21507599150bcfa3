//! Hooke's-law springs along links.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::{DEFAULT_SEED, Force, ParamSpec, Params, separation};
use crate::error::SimulationError;
use crate::graph::{Body, Link};

const SPRING_COEFFICIENT: usize = 0;
const DEFAULT_SPRING_LENGTH: usize = 1;
const DAMPING_COEFFICIENT: usize = 2;

static PARAMS: [ParamSpec; 3] = [
    ParamSpec::new("SpringCoefficient", 1e-4, 0.0, 1e-3),
    ParamSpec::new("DefaultSpringLength", 50.0, 0.0, 200.0),
    ParamSpec::new("DampingCoefficient", 0.0, 0.0, 1.0),
];

/// Spring force along every link.
///
/// With separation `r` and rest length `L`, each endpoint is pushed along the
/// link by `k·(L - r)`: apart when compressed, together when stretched. A
/// link's own coefficient and length override the defaults when set. The
/// damping term opposes the endpoints' relative speed along the link.
#[derive(Debug, Clone)]
pub struct SpringForce {
    params: Params<3>,
    seed: u64,
    rng: ChaCha8Rng,
}

impl SpringForce {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create the force with its own jitter seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            params: Params::new(&PARAMS),
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Set the default coefficient and rest length.
    #[must_use]
    pub fn with_defaults(mut self, coefficient: f32, length: f32) -> Self {
        self.params.put(SPRING_COEFFICIENT, coefficient);
        self.params.put(DEFAULT_SPRING_LENGTH, length);
        self
    }

    /// Set the damping coefficient.
    #[must_use]
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.params.put(DAMPING_COEFFICIENT, damping);
        self
    }
}

impl Default for SpringForce {
    fn default() -> Self {
        Self::new()
    }
}

impl Force for SpringForce {
    fn name(&self) -> &'static str {
        "SpringForce"
    }

    fn seed(&self) -> Option<u64> {
        Some(self.seed)
    }

    fn is_link_force(&self) -> bool {
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

    fn apply_to_link(&mut self, link: &Link, a: &mut Body, b: &mut Body) {
        let k = link.coefficient_or(self.params.get(SPRING_COEFFICIENT));
        let length = link.length_or(self.params.get(DEFAULT_SPRING_LENGTH));
        let damping = self.params.get(DAMPING_COEFFICIENT);

        let Some((dx, dy, r)) = separation(a.location, b.location, &mut self.rng) else {
            return;
        };

        let f = k * (length - r) / r;
        a.add_force(-f * dx, -f * dy);
        b.add_force(f * dx, f * dy);

        if damping != 0.0 {
            let dvx = b.velocity[0] - a.velocity[0];
            let dvy = b.velocity[1] - a.velocity[1];
            let closing = damping * (dvx * dx + dvy * dy) / (r * r);
            a.add_force(closing * dx, closing * dy);
            b.add_force(-closing * dx, -closing * dy);
        }
    }
}
