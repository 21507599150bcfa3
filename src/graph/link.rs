//! Link type and related structures.
//!
//! Links are the springs between bodies. Each link has:
//! - A stable identifier, recycled once the link is reclaimed
//! - Handles to its two endpoint bodies (never ownership)
//! - A spring coefficient and a rest length, either of which may be left
//!   unset so the spring force substitutes its defaults

use std::fmt;

use super::BodyId;

/// Stable link identifier.
///
/// This ID remains valid even after other links are removed. Reclaimed slots
/// are handed out again by later insertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u32);

impl LinkId {
    /// Create a new LinkId from a raw u32.
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

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Link({})", self.0)
    }
}

impl From<u32> for LinkId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<LinkId> for u32 {
    #[inline]
    fn from(id: LinkId) -> Self {
        id.0
    }
}

/// A damped-spring constraint between two bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    a: BodyId,
    b: BodyId,
    /// Spring coefficient; negative means "use the force's default".
    pub coefficient: f32,
    /// Rest length; negative means "use the force's default".
    pub length: f32,
}

impl Link {
    /// Sentinel for an unset coefficient or length.
    pub const UNSET: f32 = -1.0;

    /// Create a link with both spring values unset.
    pub fn new(a: BodyId, b: BodyId) -> Self {
        Self {
            a,
            b,
            coefficient: Self::UNSET,
            length: Self::UNSET,
        }
    }

    /// Create a link with explicit spring values.
    pub fn with_spring(a: BodyId, b: BodyId, coefficient: f32, length: f32) -> Self {
        Self { a, b, coefficient, length }
    }

    /// First endpoint.
    #[inline]
    pub fn a(&self) -> BodyId {
        self.a
    }

    /// Second endpoint.
    #[inline]
    pub fn b(&self) -> BodyId {
        self.b
    }

    #[inline]
    pub fn endpoints(&self) -> (BodyId, BodyId) {
        (self.a, self.b)
    }

    /// The coefficient, or `default` if unset.
    #[inline]
    pub fn coefficient_or(&self, default: f32) -> f32 {
        if self.coefficient < 0.0 { default } else { self.coefficient }
    }

    /// The rest length, or `default` if unset.
    #[inline]
    pub fn length_or(&self, default: f32) -> f32 {
        if self.length < 0.0 { default } else { self.length }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_id() {
        let id = LinkId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Link(42)");
    }

    #[test]
    fn test_unset_values_fall_back() {
        let link = Link::new(BodyId(0), BodyId(1));
        assert_eq!(link.coefficient_or(1e-4), 1e-4);
        assert_eq!(link.length_or(50.0), 50.0);

        let link = Link::with_spring(BodyId(0), BodyId(1), 0.5, 2.0);
        assert_eq!(link.coefficient_or(1e-4), 0.5);
        assert_eq!(link.length_or(50.0), 2.0);
    }

    #[test]
    fn test_zero_is_a_real_value() {
        let link = Link::with_spring(BodyId(0), BodyId(1), 0.0, 0.0);
        assert_eq!(link.coefficient_or(1e-4), 0.0);
        assert_eq!(link.length_or(50.0), 0.0);
    }

    #[test]
    fn test_endpoints() {
        let link = Link::new(BodyId(3), BodyId(7));
        assert_eq!(link.a(), BodyId(3));
        assert_eq!(link.b(), BodyId(7));
        assert_eq!(link.endpoints(), (BodyId(3), BodyId(7)));
    }
}
