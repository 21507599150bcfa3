//! Numerical integration of body motion.
//!
//! An integrator advances every body of a simulator by one time step from the
//! forces accumulated for the current state. Integrators are stateless and
//! shared behind an `Arc`, so a simulator can hand itself to its own
//! integrator.

mod euler;
mod runge_kutta;

pub use euler::EulerIntegrator;
pub use runge_kutta::RungeKuttaIntegrator;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::simulator::Simulator;

/// A time-stepping scheme.
pub trait Integrator: Send + Sync + fmt::Debug {
    /// Canonical name.
    fn name(&self) -> &'static str;

    /// Advance every body of `sim` by `dt`.
    ///
    /// Expects the force accumulators to hold the forces for the current
    /// state. Velocities are kept within the simulator's speed limit, and
    /// pinned bodies stay where they are with zero velocity.
    fn integrate(&self, sim: &mut Simulator, dt: f32);
}

/// Rescale `velocity` to length `limit` if it is longer, keeping its
/// direction.
#[inline]
pub fn clamp_speed(velocity: &mut [f32; 2], limit: f32) {
    let speed = velocity[0].hypot(velocity[1]);
    if speed > limit {
        let scale = limit / speed;
        velocity[0] *= scale;
        velocity[1] *= scale;
    }
}

/// Selector for the built-in integrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    #[serde(alias = "explicit_euler")]
    Euler,
    #[default]
    #[serde(alias = "rk4", alias = "runge-kutta")]
    RungeKutta,
}

impl IntegratorKind {
    /// Canonical name, as returned by the integrator itself.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Euler => "euler",
            Self::RungeKutta => "runge_kutta",
        }
    }

    /// Instantiate the integrator.
    pub fn build(self) -> Arc<dyn Integrator> {
        match self {
            Self::Euler => Arc::new(EulerIntegrator),
            Self::RungeKutta => Arc::new(RungeKuttaIntegrator),
        }
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegratorKind {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euler" | "explicit_euler" => Ok(Self::Euler),
            "runge_kutta" | "runge-kutta" | "rk4" => Ok(Self::RungeKutta),
            _ => Err(SimulationError::UnknownIntegrator(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use test_case::test_case;

    use super::*;

    #[test_case("euler", IntegratorKind::Euler)]
    #[test_case("explicit_euler", IntegratorKind::Euler)]
    #[test_case("rk4", IntegratorKind::RungeKutta)]
    #[test_case("runge_kutta", IntegratorKind::RungeKutta)]
    #[test_case("Runge-Kutta", IntegratorKind::RungeKutta)]
    fn test_parse(name: &str, expected: IntegratorKind) {
        assert_eq!(name.parse::<IntegratorKind>(), Ok(expected));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "verlet".parse::<IntegratorKind>(),
            Err(SimulationError::UnknownIntegrator("verlet".to_string()))
        );
    }

    #[test]
    fn test_names_round_trip() {
        for kind in [IntegratorKind::Euler, IntegratorKind::RungeKutta] {
            assert_eq!(kind.build().name(), kind.as_str());
            assert_eq!(kind.to_string().parse::<IntegratorKind>(), Ok(kind));
        }
        assert_eq!(IntegratorKind::default(), IntegratorKind::RungeKutta);
    }

    #[test]
    fn test_serde_aliases() {
        let kind: IntegratorKind = serde_json::from_str("\"rk4\"").unwrap();
        assert_eq!(kind, IntegratorKind::RungeKutta);
        assert_eq!(serde_json::to_string(&IntegratorKind::Euler).unwrap(), "\"euler\"");
    }

    #[test]
    fn test_clamp_speed() {
        let mut v = [3.0, 4.0];
        clamp_speed(&mut v, 1.0);
        assert_relative_eq!(v[0], 0.6);
        assert_relative_eq!(v[1], 0.8);

        let mut slow = [0.1, -0.2];
        clamp_speed(&mut slow, 1.0);
        assert_eq!(slow, [0.1, -0.2]);

        let mut stopped = [2.0, 0.0];
        clamp_speed(&mut stopped, 0.0);
        assert_eq!(stopped, [0.0, 0.0]);
    }
}
