//! Serializable simulator settings.
//!
//! A `SimulatorConfig` describes a simulator without its bodies: integrator,
//! speed limit and the ordered list of forces. It deserializes from camelCase
//! JSON-like data, so a layout driver can hand over a plain object:
//!
//! ```text
//! {
//!   "speedLimit": 1.0,
//!   "integrator": "rk4",
//!   "forces": [
//!     { "type": "nBody", "gravitationalConstant": -2.0 },
//!     { "type": "spring", "defaultSpringLength": 30.0 },
//!     { "type": "drag" }
//!   ]
//! }
//! ```
//!
//! Parameters left out keep the force's default.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::force::{CircularWallForce, DragForce, Force, GravitationalForce, NBodyForce, SpringForce, DEFAULT_SEED};
use crate::integrator::IntegratorKind;
use crate::simulator::{Simulator, DEFAULT_SPEED_LIMIT};

/// Settings for building a [`Simulator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulatorConfig {
    /// Cap on body speed (default: 1.0).
    pub speed_limit: f32,
    /// Time-stepping scheme (default: Runge-Kutta).
    pub integrator: IntegratorKind,
    /// Forces, in the order they run.
    pub forces: Vec<ForceConfig>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            speed_limit: DEFAULT_SPEED_LIMIT,
            integrator: IntegratorKind::default(),
            forces: Vec::new(),
        }
    }
}

impl SimulatorConfig {
    /// The usual force-directed layout: N-body repulsion, springs along
    /// links, and drag.
    pub fn force_directed() -> Self {
        Self {
            forces: vec![
                ForceConfig::NBody(NBodyConfig::default()),
                ForceConfig::Spring(SpringConfig::default()),
                ForceConfig::Drag(DragConfig::default()),
            ],
            ..Self::default()
        }
    }

    /// Build a simulator from these settings.
    pub fn build(&self) -> Result<Simulator, SimulationError> {
        Simulator::from_config(self)
    }

    pub(crate) fn capture(sim: &Simulator) -> Result<Self, SimulationError> {
        Ok(Self {
            speed_limit: sim.speed_limit(),
            integrator: sim.integrator().name().parse()?,
            forces: sim.forces().iter().filter_map(|(_, force)| ForceConfig::capture(force)).collect(),
        })
    }
}

/// One built-in force and any non-default parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ForceConfig {
    NBody(NBodyConfig),
    Drag(DragConfig),
    Gravity(GravityConfig),
    Spring(SpringConfig),
    CircularWall(CircularWallConfig),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NBodyConfig {
    pub gravitational_constant: Option<f32>,
    pub distance: Option<f32>,
    pub barnes_hut_theta: Option<f32>,
    pub min_distance: Option<f32>,
    /// Seed for the jitter that separates coincident bodies.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DragConfig {
    pub drag_coefficient: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GravityConfig {
    pub gravitational_constant: Option<f32>,
    /// Radians.
    pub direction: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpringConfig {
    pub spring_coefficient: Option<f32>,
    pub default_spring_length: Option<f32>,
    pub damping_coefficient: Option<f32>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CircularWallConfig {
    pub gravitational_constant: Option<f32>,
    pub center_x: Option<f32>,
    pub center_y: Option<f32>,
    pub radius: Option<f32>,
    pub min_distance: Option<f32>,
    pub seed: Option<u64>,
}

impl ForceConfig {
    /// Instantiate the force with the configured parameters applied.
    ///
    /// # Errors
    ///
    /// * `InvalidValue` if a configured parameter is not finite.
    pub fn build(&self) -> Result<Box<dyn Force>, SimulationError> {
        let (force, overrides): (Box<dyn Force>, Vec<(&str, Option<f32>)>) = match self {
            Self::NBody(c) => (
                Box::new(NBodyForce::with_seed(c.seed.unwrap_or(DEFAULT_SEED))),
                vec![
                    ("GravitationalConstant", c.gravitational_constant),
                    ("Distance", c.distance),
                    ("BarnesHutTheta", c.barnes_hut_theta),
                    ("MinDistance", c.min_distance),
                ],
            ),
            Self::Drag(c) => (Box::new(DragForce::new()), vec![("DragCoefficient", c.drag_coefficient)]),
            Self::Gravity(c) => (
                Box::new(GravitationalForce::new()),
                vec![("GravitationalConstant", c.gravitational_constant), ("Direction", c.direction)],
            ),
            Self::Spring(c) => (
                Box::new(SpringForce::with_seed(c.seed.unwrap_or(DEFAULT_SEED))),
                vec![
                    ("SpringCoefficient", c.spring_coefficient),
                    ("DefaultSpringLength", c.default_spring_length),
                    ("DampingCoefficient", c.damping_coefficient),
                ],
            ),
            Self::CircularWall(c) => (
                Box::new(CircularWallForce::with_seed(c.seed.unwrap_or(DEFAULT_SEED))),
                vec![
                    ("GravitationalConstant", c.gravitational_constant),
                    ("CenterX", c.center_x),
                    ("CenterY", c.center_y),
                    ("Radius", c.radius),
                    ("MinDistance", c.min_distance),
                ],
            ),
        };

        let mut force = force;
        for (name, value) in overrides {
            if let Some(value) = value {
                force.set_parameter(name, value)?;
            }
        }
        Ok(force)
    }

    /// Describe a built-in force by its current parameters. `None` for force
    /// types this module does not know.
    pub fn capture(force: &dyn Force) -> Option<Self> {
        let p = |name: &str| force.parameter(name);
        let config = match force.name() {
            "NBodyForce" => Self::NBody(NBodyConfig {
                gravitational_constant: p("GravitationalConstant"),
                distance: p("Distance"),
                barnes_hut_theta: p("BarnesHutTheta"),
                min_distance: p("MinDistance"),
                seed: force.seed(),
            }),
            "DragForce" => Self::Drag(DragConfig {
                drag_coefficient: p("DragCoefficient"),
            }),
            "GravitationalForce" => Self::Gravity(GravityConfig {
                gravitational_constant: p("GravitationalConstant"),
                direction: p("Direction"),
            }),
            "SpringForce" => Self::Spring(SpringConfig {
                spring_coefficient: p("SpringCoefficient"),
                default_spring_length: p("DefaultSpringLength"),
                damping_coefficient: p("DampingCoefficient"),
                seed: force.seed(),
            }),
            "CircularWallForce" => Self::CircularWall(CircularWallConfig {
                gravitational_constant: p("GravitationalConstant"),
                center_x: p("CenterX"),
                center_y: p("CenterY"),
                radius: p("Radius"),
                min_distance: p("MinDistance"),
                seed: force.seed(),
            }),
            _ => return None,
        };
        Some(config)
    }
}
