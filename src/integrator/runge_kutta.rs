//! Fourth-order Runge-Kutta integration.

use super::{Integrator, clamp_speed};
use crate::graph::Body;
use crate::simulator::Simulator;

/// Classical RK4 over position and velocity.
///
/// The force field is re-evaluated at three trial states per step by writing
/// the trial positions and velocities into the bodies and re-accumulating:
///
/// ```text
/// k1 = f(x, v)
/// k2 = f(x + k1·dt/2)
/// k3 = f(x + k2·dt/2)
/// k4 = f(x + k3·dt)
/// y(t+dt) = y(t) + dt/6·(k1 + 2·k2 + 2·k3 + k4)
/// ```
///
/// Every stage velocity and the final velocity are clamped to the speed
/// limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKuttaIntegrator;

/// Per-body state carried across the four stages.
#[derive(Debug, Clone, Copy)]
struct Stages {
    location: [f32; 2],
    velocity: [f32; 2],
    pinned: bool,
    /// Stage velocities, the position derivative.
    k_x: [[f32; 2]; 4],
    /// Stage accelerations, the velocity derivative.
    k_v: [[f32; 2]; 4],
}

impl Stages {
    fn capture(body: &Body, limit: f32) -> Self {
        let mut stages = Self {
            location: body.location,
            velocity: body.velocity,
            pinned: body.pinned,
            k_x: [[0.0; 2]; 4],
            k_v: [[0.0; 2]; 4],
        };
        if !body.pinned {
            let mut v = body.velocity;
            clamp_speed(&mut v, limit);
            stages.k_x[0] = v;
            stages.k_v[0] = acceleration(body);
        }
        stages
    }

    /// Write the trial state for `stage`, offset by `h` along the previous
    /// stage's derivatives.
    fn place(&mut self, body: &mut Body, stage: usize, h: f32, limit: f32) {
        if self.pinned {
            body.location = self.location;
            body.velocity = [0.0; 2];
            return;
        }
        let (k_x, k_v) = (self.k_x[stage - 1], self.k_v[stage - 1]);
        body.location = [self.location[0] + k_x[0] * h, self.location[1] + k_x[1] * h];
        let mut v = [self.velocity[0] + k_v[0] * h, self.velocity[1] + k_v[1] * h];
        clamp_speed(&mut v, limit);
        body.velocity = v;
        self.k_x[stage] = v;
    }

    fn record(&mut self, body: &Body, stage: usize) {
        if !self.pinned {
            self.k_v[stage] = acceleration(body);
        }
    }

    fn finish(&self, body: &mut Body, dt: f32, limit: f32) {
        if self.pinned {
            body.location = self.location;
            body.velocity = [0.0; 2];
            return;
        }
        let weighted = |k: &[[f32; 2]; 4], axis: usize| {
            dt / 6.0 * (k[0][axis] + 2.0 * k[1][axis] + 2.0 * k[2][axis] + k[3][axis])
        };
        body.location = [
            self.location[0] + weighted(&self.k_x, 0),
            self.location[1] + weighted(&self.k_x, 1),
        ];
        let mut v = [
            self.velocity[0] + weighted(&self.k_v, 0),
            self.velocity[1] + weighted(&self.k_v, 1),
        ];
        clamp_speed(&mut v, limit);
        body.velocity = v;
    }
}

#[inline]
fn acceleration(body: &Body) -> [f32; 2] {
    let inverse_mass = 1.0 / body.mass();
    [body.force[0] * inverse_mass, body.force[1] * inverse_mass]
}

impl Integrator for RungeKuttaIntegrator {
    fn name(&self) -> &'static str {
        "runge_kutta"
    }

    fn integrate(&self, sim: &mut Simulator, dt: f32) {
        let limit = sim.speed_limit();
        let mut stages: Vec<Stages> = sim.bodies().map(|(_, body)| Stages::capture(body, limit)).collect();

        for (stage, h) in [(1, dt / 2.0), (2, dt / 2.0), (3, dt)] {
            for (state, body) in stages.iter_mut().zip(sim.bodies_mut()) {
                state.place(body, stage, h, limit);
            }
            sim.accumulate();
            for (state, (_, body)) in stages.iter_mut().zip(sim.bodies()) {
                state.record(body, stage);
            }
        }

        for (state, body) in stages.iter().zip(sim.bodies_mut()) {
            state.finish(body, dt, limit);
        }
    }
}
