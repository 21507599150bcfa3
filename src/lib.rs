//! Force Simulator - WASM Module
//!
//! This module provides a pluggable 2D force simulation engine for computing
//! force-directed layouts. It is compiled to WebAssembly and exposes a
//! JavaScript-friendly API via wasm-bindgen, and is usable as a plain Rust
//! library through [`Simulator`].
//!
//! # Architecture
//!
//! - `graph`: Bodies and pooled links, stored in petgraph's StableGraph
//! - `force`: Force functions (N-body, drag, gravity, spring, circular wall)
//! - `spatial`: Barnes-Hut quadtree used by the N-body force
//! - `integrator`: Euler and Runge-Kutta time stepping
//! - `simulator`: Orchestration of forces and integration
//! - `config`: Serializable simulator settings

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod force;
pub mod graph;
pub mod integrator;
pub mod simulator;
pub mod spatial;

pub use config::{ForceConfig, SimulatorConfig};
pub use error::SimulationError;
pub use force::{
    CircularWallForce, DragForce, Force, ForceId, ForceRegistry, GravitationalForce, NBodyForce, ParamSpec,
    SpringForce,
};
pub use graph::{Body, BodyId, Link, LinkId, PoolStats};
pub use integrator::{EulerIntegrator, Integrator, IntegratorKind, RungeKuttaIntegrator};
pub use simulator::Simulator;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Main entry point for the force simulator.
///
/// This struct wraps the internal Simulator and provides the public API
/// exposed to JavaScript.
#[wasm_bindgen]
pub struct ForceSimulatorWasm {
    sim: Simulator,
}

#[wasm_bindgen]
impl ForceSimulatorWasm {
    /// Create an empty simulator with no forces.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { sim: Simulator::new() }
    }

    /// Create an empty simulator with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `body_capacity` - Expected number of bodies
    /// * `link_capacity` - Expected number of links
    #[wasm_bindgen(js_name = withCapacity)]
    pub fn with_capacity(body_capacity: usize, link_capacity: usize) -> Self {
        Self {
            sim: Simulator::with_capacity(body_capacity, link_capacity),
        }
    }

    /// Create a simulator from a settings object.
    ///
    /// Accepts `{ speedLimit, integrator, forces: [{ type, ...parameters }] }`;
    /// see `SimulatorConfig`.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<ForceSimulatorWasm, JsError> {
        let config: SimulatorConfig =
            serde_wasm_bindgen::from_value(config).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self {
            sim: Simulator::from_config(&config)?,
        })
    }

    /// Current settings, including the parameters of every built-in force.
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.sim.config()?).map_err(|e| JsError::new(&e.to_string()))
    }

    // =========================================================================
    // Body Operations
    // =========================================================================

    /// Add a body at rest at `(x, y)`.
    ///
    /// Returns the stable body ID.
    #[wasm_bindgen(js_name = addBody)]
    pub fn add_body(&mut self, x: f32, y: f32, mass: f32) -> Result<u32, JsError> {
        Ok(self.sim.add_body(Body::new([x, y], mass)?).0)
    }

    /// Bulk add unit-mass bodies from interleaved positions `[x0, y0, x1, y1, ...]`.
    ///
    /// Returns the new body IDs in order. A trailing odd value is ignored.
    #[wasm_bindgen(js_name = addBodiesFromPositions)]
    pub fn add_bodies_from_positions(&mut self, positions: &[f32]) -> Vec<u32> {
        positions
            .chunks_exact(2)
            .map(|xy| self.sim.add_body(Body::at(xy[0], xy[1])).0)
            .collect()
    }

    /// Remove a body and every link attached to it.
    ///
    /// Returns true if the body existed.
    #[wasm_bindgen(js_name = removeBody)]
    pub fn remove_body(&mut self, body_id: u32) -> bool {
        self.sim.remove_body(BodyId(body_id))
    }

    /// Get the number of bodies.
    #[wasm_bindgen(js_name = bodyCount)]
    pub fn body_count(&self) -> u32 {
        self.sim.body_count() as u32
    }

    /// Get the upper bound on body IDs (max ID + 1).
    ///
    /// Read-back buffers have this many entries per component.
    #[wasm_bindgen(js_name = bodyBound)]
    pub fn body_bound(&self) -> u32 {
        self.sim.body_bound() as u32
    }

    /// Get body X position.
    #[wasm_bindgen(js_name = getBodyX)]
    pub fn get_body_x(&self, body_id: u32) -> Option<f32> {
        self.sim.body(BodyId(body_id)).map(|b| b.location[0])
    }

    /// Get body Y position.
    #[wasm_bindgen(js_name = getBodyY)]
    pub fn get_body_y(&self, body_id: u32) -> Option<f32> {
        self.sim.body(BodyId(body_id)).map(|b| b.location[1])
    }

    /// Move a body, e.g. while the user drags it.
    #[wasm_bindgen(js_name = setBodyPosition)]
    pub fn set_body_position(&mut self, body_id: u32, x: f32, y: f32) {
        if let Some(body) = self.sim.body_mut(BodyId(body_id)) {
            body.location = [x, y];
        }
    }

    /// Pin a body (hold it in place during integration).
    #[wasm_bindgen(js_name = pinBody)]
    pub fn pin_body(&mut self, body_id: u32) {
        if let Some(body) = self.sim.body_mut(BodyId(body_id)) {
            body.pinned = true;
            body.velocity = [0.0; 2];
        }
    }

    /// Unpin a body.
    #[wasm_bindgen(js_name = unpinBody)]
    pub fn unpin_body(&mut self, body_id: u32) {
        if let Some(body) = self.sim.body_mut(BodyId(body_id)) {
            body.pinned = false;
        }
    }

    /// Check if a body is pinned.
    #[wasm_bindgen(js_name = isBodyPinned)]
    pub fn is_body_pinned(&self, body_id: u32) -> bool {
        self.sim.body(BodyId(body_id)).is_some_and(|b| b.pinned)
    }

    /// Attach the caller's own key to a body.
    #[wasm_bindgen(js_name = setBodyKey)]
    pub fn set_body_key(&mut self, body_id: u32, key: u32) {
        if let Some(body) = self.sim.body_mut(BodyId(body_id)) {
            body.key = key;
        }
    }

    #[wasm_bindgen(js_name = getBodyKey)]
    pub fn get_body_key(&self, body_id: u32) -> Option<u32> {
        self.sim.body(BodyId(body_id)).map(|b| b.key)
    }

    // =========================================================================
    // Link Operations
    // =========================================================================

    /// Link two bodies with a spring.
    ///
    /// Negative `coefficient` or `length` use the spring force's defaults.
    /// Returns the link ID.
    #[wasm_bindgen(js_name = addLink)]
    pub fn add_link(&mut self, a: u32, b: u32, coefficient: f32, length: f32) -> Result<u32, JsError> {
        Ok(self.sim.add_link_with(BodyId(a), BodyId(b), coefficient, length)?.0)
    }

    /// Bulk add default links from pairs `[a0, b0, a1, b1, ...]`.
    ///
    /// Pairs naming a missing body or the same body twice are skipped.
    /// Returns the number of links added.
    #[wasm_bindgen(js_name = addLinksFromPairs)]
    pub fn add_links_from_pairs(&mut self, pairs: &[u32]) -> u32 {
        let mut added = 0;
        for pair in pairs.chunks_exact(2) {
            if self.sim.add_link(BodyId(pair[0]), BodyId(pair[1])).is_ok() {
                added += 1;
            }
        }
        added
    }

    /// Replace a link's spring values.
    ///
    /// Negative `coefficient` or `length` use the spring force's defaults.
    #[wasm_bindgen(js_name = setLinkSpring)]
    pub fn set_link_spring(&mut self, link_id: u32, coefficient: f32, length: f32) -> Result<(), JsError> {
        Ok(self.sim.set_link_spring(LinkId(link_id), coefficient, length)?)
    }

    /// Remove a link.
    ///
    /// Returns true if the link existed.
    #[wasm_bindgen(js_name = removeLink)]
    pub fn remove_link(&mut self, link_id: u32) -> bool {
        self.sim.remove_link(LinkId(link_id))
    }

    /// Get the number of links.
    #[wasm_bindgen(js_name = linkCount)]
    pub fn link_count(&self) -> u32 {
        self.sim.link_count() as u32
    }

    // =========================================================================
    // Forces
    // =========================================================================

    /// Add an N-body force with default parameters. Returns the force ID.
    #[wasm_bindgen(js_name = addNBodyForce)]
    pub fn add_n_body_force(&mut self) -> u32 {
        self.sim.add_force(NBodyForce::new()).0
    }

    #[wasm_bindgen(js_name = addDragForce)]
    pub fn add_drag_force(&mut self) -> u32 {
        self.sim.add_force(DragForce::new()).0
    }

    #[wasm_bindgen(js_name = addGravitationalForce)]
    pub fn add_gravitational_force(&mut self) -> u32 {
        self.sim.add_force(GravitationalForce::new()).0
    }

    #[wasm_bindgen(js_name = addSpringForce)]
    pub fn add_spring_force(&mut self) -> u32 {
        self.sim.add_force(SpringForce::new()).0
    }

    #[wasm_bindgen(js_name = addCircularWallForce)]
    pub fn add_circular_wall_force(&mut self) -> u32 {
        self.sim.add_force(CircularWallForce::new()).0
    }

    /// Set a named force parameter, e.g. `"GravitationalConstant"`.
    #[wasm_bindgen(js_name = setForceParameter)]
    pub fn set_force_parameter(&mut self, force_id: u32, name: &str, value: f32) -> Result<(), JsError> {
        Ok(self.sim.set_force_parameter(ForceId(force_id), name, value)?)
    }

    #[wasm_bindgen(js_name = getForceParameter)]
    pub fn get_force_parameter(&self, force_id: u32, name: &str) -> Result<f32, JsError> {
        Ok(self.sim.force_parameter(ForceId(force_id), name)?)
    }

    #[wasm_bindgen(js_name = forceCount)]
    pub fn force_count(&self) -> u32 {
        self.sim.forces().len() as u32
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Advance the simulation by `dt`.
    pub fn step(&mut self, dt: f32) -> Result<(), JsError> {
        Ok(self.sim.step(dt)?)
    }

    /// Recompute forces without moving anything.
    pub fn accumulate(&mut self) {
        self.sim.accumulate();
    }

    /// Remove all bodies and links. Forces and settings are kept.
    pub fn clear(&mut self) {
        self.sim.clear();
    }

    #[wasm_bindgen(js_name = setSpeedLimit)]
    pub fn set_speed_limit(&mut self, limit: f32) -> Result<(), JsError> {
        Ok(self.sim.set_speed_limit(limit)?)
    }

    #[wasm_bindgen(js_name = getSpeedLimit)]
    pub fn get_speed_limit(&self) -> f32 {
        self.sim.speed_limit()
    }

    /// Select the integrator: `"euler"` or `"runge_kutta"` (alias `"rk4"`).
    #[wasm_bindgen(js_name = setIntegrator)]
    pub fn set_integrator(&mut self, name: &str) -> Result<(), JsError> {
        self.sim.set_integrator_kind(name.parse::<IntegratorKind>()?);
        Ok(())
    }

    #[wasm_bindgen(js_name = getIntegrator)]
    pub fn get_integrator(&self) -> String {
        self.sim.integrator().name().to_string()
    }

    /// Total kinetic energy, useful for detecting when a layout has settled.
    #[wasm_bindgen(js_name = kineticEnergy)]
    pub fn kinetic_energy(&self) -> f32 {
        self.sim.kinetic_energy()
    }

    /// Get the bounding box of all bodies.
    ///
    /// Returns [min_x, min_y, max_x, max_y], or None if there are no bodies.
    #[wasm_bindgen(js_name = getBounds)]
    pub fn get_bounds(&self) -> Option<Vec<f32>> {
        self.sim
            .bounds()
            .map(|(min_x, min_y, max_x, max_y)| vec![min_x, min_y, max_x, max_y])
    }

    // =========================================================================
    // Read-back
    // =========================================================================

    /// Positions as `[x0, y0, x1, y1, ...]` indexed by body ID.
    ///
    /// Vacant IDs hold NaN.
    #[wasm_bindgen(js_name = getPositions)]
    pub fn get_positions(&self) -> Float32Array {
        Float32Array::from(self.interleaved(|b| b.location).as_slice())
    }

    /// Velocities as `[vx0, vy0, vx1, vy1, ...]` indexed by body ID.
    ///
    /// Vacant IDs hold NaN.
    #[wasm_bindgen(js_name = getVelocities)]
    pub fn get_velocities(&self) -> Float32Array {
        Float32Array::from(self.interleaved(|b| b.velocity).as_slice())
    }
}

impl ForceSimulatorWasm {
    /// The wrapped simulator.
    pub fn simulator(&self) -> &Simulator {
        &self.sim
    }

    fn interleaved(&self, component: impl Fn(&Body) -> [f32; 2]) -> Vec<f32> {
        let mut out = vec![f32::NAN; self.sim.body_bound() * 2];
        for (id, body) in self.sim.bodies() {
            let i = id.0 as usize * 2;
            out[i..i + 2].copy_from_slice(&component(body));
        }
        out
    }
}

impl Default for ForceSimulatorWasm {
    fn default() -> Self {
        Self::new()
    }
}
