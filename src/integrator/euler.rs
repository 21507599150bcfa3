//! Semi-implicit Euler integration.

use super::{Integrator, clamp_speed};
use crate::simulator::Simulator;

/// First-order integrator: one force evaluation per step.
///
/// ```text
/// v(t+dt) = clamp(v(t) + F/m·dt)
/// x(t+dt) = x(t) + v(t+dt)·dt
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerIntegrator;

impl Integrator for EulerIntegrator {
    fn name(&self) -> &'static str {
        "euler"
    }

    fn integrate(&self, sim: &mut Simulator, dt: f32) {
        let limit = sim.speed_limit();
        for body in sim.bodies_mut() {
            if body.pinned {
                body.velocity = [0.0; 2];
                continue;
            }
            let inverse_mass = 1.0 / body.mass();
            let mut v = [
                body.velocity[0] + body.force[0] * inverse_mass * dt,
                body.velocity[1] + body.force[1] * inverse_mass * dt,
            ];
            clamp_speed(&mut v, limit);
            body.velocity = v;
            body.location[0] += v[0] * dt;
            body.location[1] += v[1] * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::graph::Body;

    #[test]
    fn test_constant_force() {
        let mut sim = Simulator::new();
        let id = sim.add_body(Body::new([0.0, 0.0], 2.0).unwrap());
        sim.body_mut(id).unwrap().force = [1.0, 0.0];

        EulerIntegrator.integrate(&mut sim, 0.5);

        let body = sim.body(id).unwrap();
        assert_relative_eq!(body.velocity[0], 0.25);
        assert_relative_eq!(body.location[0], 0.125);
    }

    #[test]
    fn test_speed_limit() {
        let mut sim = Simulator::new();
        sim.set_speed_limit(0.5).unwrap();
        let id = sim.add_body(Body::at(0.0, 0.0));
        sim.body_mut(id).unwrap().force = [30.0, 40.0];

        EulerIntegrator.integrate(&mut sim, 1.0);

        let body = sim.body(id).unwrap();
        assert_relative_eq!(body.speed(), 0.5);
        assert_relative_eq!(body.location[0], 0.3);
        assert_relative_eq!(body.location[1], 0.4);
    }

    #[test]
    fn test_pinned_body_holds() {
        let mut sim = Simulator::new();
        let id = sim.add_body(Body::at(1.0, 1.0).with_velocity([0.5, 0.0]));
        let body = sim.body_mut(id).unwrap();
        body.pinned = true;
        body.force = [10.0, 10.0];

        EulerIntegrator.integrate(&mut sim, 1.0);

        let body = sim.body(id).unwrap();
        assert_eq!(body.location, [1.0, 1.0]);
        assert_eq!(body.velocity, [0.0, 0.0]);
    }
}
