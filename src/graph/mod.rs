//! Body and link storage.
//!
//! This module provides the simulation's data records and the store that
//! owns them. Links are pooled: reclaimed link slots are reused by later
//! insertions instead of growing the storage.

mod body;
mod engine;
mod link;

pub use body::{Body, BodyId};
pub use engine::{BodyGraph, PoolStats};
pub use link::{Link, LinkId};
