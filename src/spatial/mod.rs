//! Spatial partitioning for N-body force approximation.
//!
//! This module provides a Barnes-Hut quadtree that lets distant groups of
//! bodies be treated as a single mass at their center of mass.

mod quadtree;

pub use quadtree::{PointMass, Quadtree, Square};
