//! Simulator - orchestrates forces and integration over a set of bodies.
//!
//! A layout driver registers bodies, links and forces, then calls
//! [`Simulator::step`] once per frame and reads positions back. Each step
//! accumulates forces for the current state and hands the simulator to its
//! integrator, which may re-accumulate at trial states.

use std::sync::Arc;

use crate::config::SimulatorConfig;
use crate::error::SimulationError;
use crate::force::{Force, ForceId, ForceRegistry};
use crate::graph::{Body, BodyGraph, BodyId, Link, LinkId, PoolStats};
use crate::integrator::{Integrator, IntegratorKind};

/// Default cap on body speed, in layout units per unit of time.
pub const DEFAULT_SPEED_LIMIT: f32 = 1.0;

/// Force simulation over point masses and springs.
///
/// Instances share no state. A simulator is `Send` and may be moved to a
/// worker, but it is driven from one thread at a time.
#[derive(Debug)]
pub struct Simulator {
    graph: BodyGraph,
    forces: ForceRegistry,
    integrator: Arc<dyn Integrator>,
    speed_limit: f32,
}

impl Simulator {
    /// Create an empty simulator using Runge-Kutta integration.
    pub fn new() -> Self {
        Self {
            graph: BodyGraph::new(),
            forces: ForceRegistry::new(),
            integrator: IntegratorKind::default().build(),
            speed_limit: DEFAULT_SPEED_LIMIT,
        }
    }

    /// Create an empty simulator with storage reserved for `bodies` bodies and
    /// `links` links.
    pub fn with_capacity(bodies: usize, links: usize) -> Self {
        Self {
            graph: BodyGraph::with_capacity(bodies, links),
            ..Self::new()
        }
    }

    /// Create a simulator with the configured integrator, speed limit and
    /// forces.
    ///
    /// # Errors
    ///
    /// * If the speed limit or any force parameter is invalid.
    pub fn from_config(config: &SimulatorConfig) -> Result<Self, SimulationError> {
        let mut sim = Self::new();
        sim.set_speed_limit(config.speed_limit)?;
        sim.integrator = config.integrator.build();
        for force in &config.forces {
            sim.add_boxed_force(force.build()?);
        }
        ftlog::info!(
            "simulator configured: integrator {}, speed limit {}, {} forces",
            config.integrator,
            config.speed_limit,
            config.forces.len()
        );
        Ok(sim)
    }

    /// Snapshot of the current settings and built-in forces.
    ///
    /// Forces of types outside this crate are left out.
    ///
    /// # Errors
    ///
    /// * `UnknownIntegrator` if the integrator is not one of the built-in
    ///   kinds, since the snapshot could not rebuild it.
    pub fn config(&self) -> Result<SimulatorConfig, SimulationError> {
        SimulatorConfig::capture(self)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub fn speed_limit(&self) -> f32 {
        self.speed_limit
    }

    /// Set the cap on body speed.
    ///
    /// # Errors
    ///
    /// * If `limit` is negative or not finite. The old limit is kept.
    pub fn set_speed_limit(&mut self, limit: f32) -> Result<(), SimulationError> {
        self.speed_limit = SimulationError::check_non_negative("speed limit", limit)?;
        Ok(())
    }

    pub fn integrator(&self) -> &dyn Integrator {
        self.integrator.as_ref()
    }

    /// Replace the integrator. Takes effect on the next step.
    pub fn set_integrator<I: Integrator + 'static>(&mut self, integrator: I) {
        ftlog::debug!("integrator switched from {} to {}", self.integrator.name(), integrator.name());
        self.integrator = Arc::new(integrator);
    }

    /// Replace the integrator with a built-in one.
    pub fn set_integrator_kind(&mut self, kind: IntegratorKind) {
        ftlog::debug!("integrator switched from {} to {kind}", self.integrator.name());
        self.integrator = kind.build();
    }

    // =========================================================================
    // Forces
    // =========================================================================

    /// Register a force. Forces run in registration order.
    pub fn add_force<F: Force + 'static>(&mut self, force: F) -> ForceId {
        self.forces.add(Box::new(force))
    }

    pub fn add_boxed_force(&mut self, force: Box<dyn Force>) -> ForceId {
        self.forces.add(force)
    }

    pub fn forces(&self) -> &ForceRegistry {
        &self.forces
    }

    pub fn force(&self, id: ForceId) -> Option<&dyn Force> {
        self.forces.get(id)
    }

    pub fn force_mut(&mut self, id: ForceId) -> Option<&mut (dyn Force + 'static)> {
        self.forces.get_mut(id)
    }

    /// Read a force parameter.
    ///
    /// # Errors
    ///
    /// * `UnknownForce` or `UnknownParameter`.
    pub fn force_parameter(&self, id: ForceId, name: &str) -> Result<f32, SimulationError> {
        self.forces.parameter(id, name)
    }

    /// Set a force parameter. Takes effect on the next accumulation pass.
    ///
    /// # Errors
    ///
    /// * `UnknownForce`, `UnknownParameter`, or `InvalidValue` for a
    ///   non-finite value.
    pub fn set_force_parameter(&mut self, id: ForceId, name: &str, value: f32) -> Result<(), SimulationError> {
        self.forces.set_parameter(id, name, value)
    }

    // =========================================================================
    // Bodies
    // =========================================================================

    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.graph.add_body(body)
    }

    /// Unregister a body and reclaim every link attached to it.
    ///
    /// Returns false if the body was not registered.
    pub fn remove_body(&mut self, id: BodyId) -> bool {
        match self.graph.remove_body(id) {
            Some(links) => {
                ftlog::debug!("removed {id} and reclaimed {links} attached links");
                true
            }
            None => false,
        }
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.graph.body(id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.graph.body_mut(id)
    }

    /// Registered bodies in id order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> + '_ {
        self.graph.bodies()
    }

    /// Registered bodies in id order, mutably. Bodies cannot be added or
    /// removed while this borrow is alive.
    pub fn bodies_mut(&mut self) -> impl Iterator<Item = &mut Body> + '_ {
        self.graph.bodies_mut()
    }

    pub fn body_count(&self) -> usize {
        self.graph.body_count()
    }

    /// Upper bound on body ids (max id + 1).
    pub fn body_bound(&self) -> usize {
        self.graph.body_bound()
    }

    // =========================================================================
    // Links
    // =========================================================================

    /// Link two bodies with a spring using the spring force's defaults.
    ///
    /// # Errors
    ///
    /// * `UnknownBody` if either endpoint is not registered.
    /// * `SelfLink` if both endpoints are the same body.
    pub fn add_link(&mut self, a: BodyId, b: BodyId) -> Result<LinkId, SimulationError> {
        self.graph.add_link(a, b, Link::UNSET, Link::UNSET)
    }

    /// Link two bodies with their own spring coefficient and rest length.
    /// Negative values fall back to the spring force's defaults.
    ///
    /// # Errors
    ///
    /// * As for [`Simulator::add_link`], and `InvalidValue` for non-finite
    ///   spring values.
    pub fn add_link_with(
        &mut self,
        a: BodyId,
        b: BodyId,
        coefficient: f32,
        length: f32,
    ) -> Result<LinkId, SimulationError> {
        self.graph.add_link(a, b, coefficient, length)
    }

    /// Reclaim a link. Returns false if it was not registered.
    pub fn remove_link(&mut self, id: LinkId) -> bool {
        self.graph.remove_link(id)
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.graph.link(id)
    }

    /// Replace a link's spring values. Negative values fall back to the
    /// spring force's defaults.
    ///
    /// # Errors
    ///
    /// * If the link is not registered.
    /// * If `coefficient` or `length` is not finite.
    pub fn set_link_spring(&mut self, id: LinkId, coefficient: f32, length: f32) -> Result<(), SimulationError> {
        self.graph.set_link_spring(id, coefficient, length)
    }

    pub fn links(&self) -> impl Iterator<Item = (LinkId, &Link)> + '_ {
        self.graph.links()
    }

    pub fn link_count(&self) -> usize {
        self.graph.link_count()
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.graph.pool_stats()
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Unregister all bodies and reclaim all links. Forces, integrator and
    /// speed limit are kept.
    pub fn clear(&mut self) {
        let (bodies, links) = self.graph.clear();
        ftlog::debug!("cleared {bodies} bodies and {links} links");
    }

    /// Recompute every body's force accumulator for the current state.
    pub fn accumulate(&mut self) {
        self.forces.accumulate(&mut self.graph);
    }

    /// Advance the simulation by `dt`.
    ///
    /// # Errors
    ///
    /// * If `dt` is negative or not finite. Nothing is changed.
    pub fn step(&mut self, dt: f32) -> Result<(), SimulationError> {
        SimulationError::check_non_negative("time step", dt)?;
        self.accumulate();
        let integrator = Arc::clone(&self.integrator);
        integrator.integrate(self, dt);
        ftlog::trace!("stepped {} bodies by {dt} with {}", self.graph.body_count(), integrator.name());
        Ok(())
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Total kinetic energy of all bodies.
    pub fn kinetic_energy(&self) -> f32 {
        self.bodies().map(|(_, body)| body.kinetic_energy()).sum()
    }

    /// Bounding box of all bodies as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        self.graph.bounds()
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}
