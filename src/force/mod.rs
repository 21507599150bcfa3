//! Force functions.
//!
//! A force function contributes to the force accumulators of bodies. Body
//! forces run once per body per accumulation pass; link forces run once per
//! link, with both endpoints borrowed together. Every force exposes a small set
//! of named scalar parameters that a driver can tune between steps.

mod drag;
mod gravity;
mod nbody;
mod registry;
mod spring;
mod wall;

pub use drag::DragForce;
pub use gravity::GravitationalForce;
pub use nbody::NBodyForce;
pub use registry::ForceRegistry;
pub use spring::SpringForce;
pub use wall::CircularWallForce;

use std::fmt;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::SimulationError;
use crate::graph::{Body, BodyGraph, BodyId, Link};

/// Seed used by forces that were not given one explicitly.
pub const DEFAULT_SEED: u64 = 0x5EED_F0CE;

/// Handle of a force registered with a simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForceId(pub u32);

impl ForceId {
    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ForceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Force({})", self.0)
    }
}

/// Description of one tunable force parameter.
///
/// `min` and `max` are the range a UI should offer. They are not enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub default: f32,
    pub min: f32,
    pub max: f32,
}

impl ParamSpec {
    pub const fn new(name: &'static str, default: f32, min: f32, max: f32) -> Self {
        Self { name, default, min, max }
    }
}

/// A pluggable force law.
///
/// Implementations only ever add into `Body::force`; the simulator zeroes the
/// accumulators before each pass.
pub trait Force: Send + fmt::Debug {
    /// Short type name, used in logs and errors.
    fn name(&self) -> &'static str;

    /// Whether `apply_to_body` should run for every body.
    fn is_body_force(&self) -> bool {
        false
    }

    /// Whether `apply_to_link` should run for every link.
    fn is_link_force(&self) -> bool {
        false
    }

    /// Seed of the jitter source, for forces that draw random numbers.
    fn seed(&self) -> Option<u64> {
        None
    }

    /// The parameters this force exposes, in a fixed order.
    fn parameters(&self) -> &'static [ParamSpec];

    /// Current value of a parameter, or `None` for an unknown name.
    fn parameter(&self, name: &str) -> Option<f32>;

    /// Set a parameter. Takes effect on the next accumulation pass.
    ///
    /// # Errors
    ///
    /// * `UnknownParameter` if the force has no parameter called `name`.
    /// * `InvalidValue` if `value` is not finite.
    fn set_parameter(&mut self, name: &str, value: f32) -> Result<(), SimulationError>;

    /// Prepare for a pass over `graph`. Called once per pass, before any
    /// `apply_*` call of that pass.
    fn init(&mut self, _graph: &BodyGraph) {}

    /// Add this force's contribution to one body.
    fn apply_to_body(&mut self, _id: BodyId, _body: &mut Body) {}

    /// Add this force's contribution to both endpoints of a link.
    fn apply_to_link(&mut self, _link: &Link, _a: &mut Body, _b: &mut Body) {}
}

/// Parameter storage shared by the built-in forces.
#[derive(Debug, Clone)]
pub(crate) struct Params<const N: usize> {
    specs: &'static [ParamSpec; N],
    values: [f32; N],
}

impl<const N: usize> Params<N> {
    pub(crate) fn new(specs: &'static [ParamSpec; N]) -> Self {
        Self {
            specs,
            values: std::array::from_fn(|i| specs[i].default),
        }
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> f32 {
        self.values[index]
    }

    #[inline]
    pub(crate) fn put(&mut self, index: usize, value: f32) {
        self.values[index] = value;
    }

    pub(crate) fn specs(&self) -> &'static [ParamSpec] {
        self.specs
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<f32> {
        self.position(name).map(|i| self.values[i])
    }

    pub(crate) fn set(&mut self, force: &'static str, name: &str, value: f32) -> Result<(), SimulationError> {
        let index = self.position(name).ok_or_else(|| SimulationError::UnknownParameter {
            force,
            name: name.to_string(),
        })?;
        self.values[index] = SimulationError::check_finite(self.specs[index].name, value)?;
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|spec| spec.name == name)
    }
}

/// Small random offset used to separate coincident points.
#[inline]
pub(crate) fn jitter(rng: &mut ChaCha8Rng) -> f32 {
    (rng.random::<f32>() - 0.5) / 50.0
}

/// Separation vector `to - from` and its length, jittered when the points
/// coincide. Returns `None` if the points still coincide after jittering.
pub(crate) fn separation(from: [f32; 2], to: [f32; 2], rng: &mut ChaCha8Rng) -> Option<(f32, f32, f32)> {
    let mut dx = to[0] - from[0];
    let mut dy = to[1] - from[1];
    let mut r = dx.hypot(dy);
    if r == 0.0 {
        dx = jitter(rng);
        dy = jitter(rng);
        r = dx.hypot(dy);
    }
    (r > 0.0).then_some((dx, dy, r))
}
