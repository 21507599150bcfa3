//! Body type and related structures.
//!
//! Bodies are the point masses of the simulation. Each body has:
//! - A stable identifier (survives removal of other bodies)
//! - Location and velocity in layout space
//! - A force accumulator, rebuilt by every accumulation pass
//! - A mass, always positive
//! - An opaque key the layout driver uses to find its visual element
//! - Pinned state (held in place by the integrators)

use std::fmt;

use crate::error::SimulationError;

/// Stable body identifier.
///
/// This ID remains valid after other bodies are removed. Slots vacated by
/// removed bodies are recycled, so a handle kept past its body's removal may
/// later name a different body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl BodyId {
    /// Create a new BodyId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Body({})", self.0)
    }
}

impl From<u32> for BodyId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<BodyId> for u32 {
    #[inline]
    fn from(id: BodyId) -> Self {
        id.0
    }
}

/// Physical state of one point mass.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Position in layout space.
    pub location: [f32; 2],
    /// Velocity, in layout units per unit of time.
    pub velocity: [f32; 2],
    /// Force accumulated by the current pass. Only meaningful between
    /// `accumulate` and the following integration.
    pub force: [f32; 2],
    /// Opaque back-reference for the layout driver. Never read by the engine.
    pub key: u32,
    /// Whether the integrators hold this body in place.
    pub pinned: bool,
    mass: f32,
}

impl Body {
    /// Create a body at rest at `location`.
    ///
    /// # Errors
    ///
    /// * If `mass` is not a finite positive number.
    /// * If `location` has a non-finite coordinate.
    pub fn new(location: [f32; 2], mass: f32) -> Result<Self, SimulationError> {
        let mass = Self::check_mass(mass)?;
        for c in location {
            SimulationError::check_finite("location", c)?;
        }
        Ok(Self {
            location,
            velocity: [0.0; 2],
            force: [0.0; 2],
            key: 0,
            pinned: false,
            mass,
        })
    }

    /// Create a unit-mass body at rest at `(x, y)`.
    ///
    /// Coordinates are taken as given; use [`Body::new`] to validate them.
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            location: [x, y],
            velocity: [0.0; 2],
            force: [0.0; 2],
            key: 0,
            pinned: false,
            mass: 1.0,
        }
    }

    /// Set the driver key.
    #[must_use]
    pub fn with_key(mut self, key: u32) -> Self {
        self.key = key;
        self
    }

    /// Set the initial velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: [f32; 2]) -> Self {
        self.velocity = velocity;
        self
    }

    /// Get the mass.
    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Set the mass.
    ///
    /// # Errors
    ///
    /// * If `mass` is not a finite positive number. The body is left unchanged.
    pub fn set_mass(&mut self, mass: f32) -> Result<(), SimulationError> {
        self.mass = Self::check_mass(mass)?;
        Ok(())
    }

    fn check_mass(mass: f32) -> Result<f32, SimulationError> {
        if mass.is_finite() && mass > 0.0 {
            Ok(mass)
        } else {
            Err(SimulationError::InvalidValue { name: "mass", value: mass })
        }
    }

    /// Zero the force accumulator.
    #[inline]
    pub fn reset_force(&mut self) {
        self.force = [0.0; 2];
    }

    /// Add a contribution to the force accumulator.
    #[inline]
    pub fn add_force(&mut self, fx: f32, fy: f32) {
        self.force[0] += fx;
        self.force[1] += fy;
    }

    /// Magnitude of the velocity.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity[0].hypot(self.velocity[1])
    }

    /// Kinetic energy, `m·|v|²/2`.
    pub fn kinetic_energy(&self) -> f32 {
        let [vx, vy] = self.velocity;
        0.5 * self.mass * (vx * vx + vy * vy)
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::at(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_id() {
        let id = BodyId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.0, 42);
        assert_eq!(format!("{}", id), "Body(42)");
    }

    #[test]
    fn test_body_id_conversion() {
        let id: BodyId = 123.into();
        let raw: u32 = id.into();
        assert_eq!(raw, 123);
    }

    #[test]
    fn test_new_rejects_bad_mass() {
        assert!(Body::new([0.0, 0.0], 0.0).is_err());
        assert!(Body::new([0.0, 0.0], -1.0).is_err());
        assert!(Body::new([0.0, 0.0], f32::INFINITY).is_err());
        assert!(Body::new([f32::NAN, 0.0], 1.0).is_err());

        let body = Body::new([1.0, 2.0], 3.0).unwrap();
        assert_eq!(body.location, [1.0, 2.0]);
        assert_eq!(body.mass(), 3.0);
        assert_eq!(body.velocity, [0.0, 0.0]);
    }

    #[test]
    fn test_set_mass_keeps_old_value_on_error() {
        let mut body = Body::at(0.0, 0.0);
        assert!(body.set_mass(-2.0).is_err());
        assert_eq!(body.mass(), 1.0);
        body.set_mass(4.0).unwrap();
        assert_eq!(body.mass(), 4.0);
    }

    #[test]
    fn test_force_accumulator() {
        let mut body = Body::at(0.0, 0.0);
        body.add_force(1.0, -2.0);
        body.add_force(0.5, 0.5);
        assert_eq!(body.force, [1.5, -1.5]);

        body.reset_force();
        assert_eq!(body.force, [0.0, 0.0]);
    }

    #[test]
    fn test_speed_and_energy() {
        let mut body = Body::at(0.0, 0.0).with_velocity([3.0, 4.0]);
        assert_eq!(body.speed(), 5.0);
        assert_eq!(body.kinetic_energy(), 12.5);

        body.set_mass(2.0).unwrap();
        assert_eq!(body.kinetic_energy(), 25.0);
    }
}
