//! Error type shared by the simulator, its force functions, and configuration.
//!
//! Every failure is a local precondition violation reported before any state
//! is mutated. There is nothing to retry or recover.

use std::fmt;

use crate::force::ForceId;
use crate::graph::{BodyId, LinkId};

/// Errors reported by simulator operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A body handle that is not registered with the simulator.
    UnknownBody(BodyId),
    /// A link handle that is not registered with the simulator.
    UnknownLink(LinkId),
    /// A link whose endpoints are the same body.
    SelfLink(BodyId),
    /// A force handle that is not registered with the simulator.
    UnknownForce(ForceId),
    /// A parameter name the force function does not expose.
    UnknownParameter {
        /// Name of the force function.
        force: &'static str,
        /// The requested parameter name.
        name: String,
    },
    /// A scalar outside its domain (non-finite, non-positive mass, negative time step, ...).
    InvalidValue {
        /// What the value was meant to be.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// An integrator name that matches no known integrator or alias.
    UnknownIntegrator(String),
}

impl SimulationError {
    /// Reject `value` unless it is finite.
    pub(crate) fn check_finite(name: &'static str, value: f32) -> Result<f32, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::InvalidValue { name, value })
        }
    }

    /// Reject `value` unless it is finite and not negative.
    pub(crate) fn check_non_negative(name: &'static str, value: f32) -> Result<f32, Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(Self::InvalidValue { name, value })
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownBody(id) => write!(f, "{id} is not registered with the simulator"),
            Self::UnknownLink(id) => write!(f, "{id} is not registered with the simulator"),
            Self::SelfLink(id) => write!(f, "cannot link {id} to itself"),
            Self::UnknownForce(id) => write!(f, "{id} is not registered with the simulator"),
            Self::UnknownParameter { force, name } => {
                write!(f, "{force} has no parameter named '{name}'")
            }
            Self::InvalidValue { name, value } => write!(f, "invalid {name}: {value}"),
            Self::UnknownIntegrator(name) => write!(
                f,
                "unknown integrator '{name}' (expected one of: euler, runge_kutta)"
            ),
        }
    }
}

impl std::error::Error for SimulationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimulationError::UnknownBody(BodyId(3));
        assert_eq!(err.to_string(), "Body(3) is not registered with the simulator");

        let err = SimulationError::UnknownLink(LinkId(4));
        assert_eq!(err.to_string(), "Link(4) is not registered with the simulator");

        let err = SimulationError::UnknownParameter {
            force: "DragForce",
            name: "Drag".to_string(),
        };
        assert_eq!(err.to_string(), "DragForce has no parameter named 'Drag'");
    }

    #[test]
    fn test_check_helpers() {
        assert_eq!(SimulationError::check_finite("mass", 2.0), Ok(2.0));
        assert!(SimulationError::check_finite("mass", f32::NAN).is_err());
        assert_eq!(SimulationError::check_non_negative("speed limit", 0.0), Ok(0.0));
        assert_eq!(
            SimulationError::check_non_negative("speed limit", -1.0),
            Err(SimulationError::InvalidValue {
                name: "speed limit",
                value: -1.0
            })
        );
    }
}
