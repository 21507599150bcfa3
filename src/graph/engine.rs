//! BodyGraph - storage for bodies and the links between them.
//!
//! Bodies are node weights and links are edge weights of a petgraph
//! `StableGraph`. Stable indices double as the public handles, and the graph's
//! free lists of vacated slots make up the link pool: a reclaimed link's slot
//! is handed to the next link added instead of growing the edge storage.

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::NodeIndexable;
use petgraph::Directed;

use super::body::{Body, BodyId};
use super::link::{Link, LinkId};
use crate::error::SimulationError;

/// Counters describing how link storage has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Links that needed a slot never used before.
    pub fresh: usize,
    /// Links stored in a slot reclaimed from an earlier link.
    pub reused: usize,
    /// Reclaimed slots currently waiting for reuse.
    pub vacant: usize,
}

/// Bodies and links of one simulation.
///
/// This struct manages:
/// - Body records, addressed by `BodyId`
/// - Link records, addressed by `LinkId`, always between two distinct
///   registered bodies
/// - Reuse of reclaimed link slots
#[derive(Debug, Clone, Default)]
pub struct BodyGraph {
    /// Bodies are nodes, links are edges.
    graph: StableGraph<Body, Link, Directed>,

    /// One past the highest link slot ever occupied.
    link_slots: usize,

    /// Links placed in never-used slots.
    fresh_links: usize,

    /// Links placed in reclaimed slots.
    reused_links: usize,
}

impl BodyGraph {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with room for `body_capacity` bodies and
    /// `link_capacity` links before reallocating.
    pub fn with_capacity(body_capacity: usize, link_capacity: usize) -> Self {
        Self {
            graph: StableGraph::with_capacity(body_capacity, link_capacity),
            ..Self::default()
        }
    }

    // =========================================================================
    // Body Operations
    // =========================================================================

    /// Register a body.
    pub fn add_body(&mut self, body: Body) -> BodyId {
        let index = self.graph.add_node(body);
        BodyId(index.index() as u32)
    }

    /// Unregister a body, reclaiming every link attached to it.
    ///
    /// Returns the number of reclaimed links, or `None` if the body was not
    /// registered.
    pub fn remove_body(&mut self, id: BodyId) -> Option<usize> {
        let index = node_index(id);
        if !self.graph.contains_node(index) {
            return None;
        }
        let links_before = self.graph.edge_count();
        self.graph.remove_node(index);
        Some(links_before - self.graph.edge_count())
    }

    /// Check whether a body is registered.
    pub fn contains_body(&self, id: BodyId) -> bool {
        self.graph.contains_node(node_index(id))
    }

    /// Get a registered body.
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.graph.node_weight(node_index(id))
    }

    /// Get a registered body as mutable.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.graph.node_weight_mut(node_index(id))
    }

    /// Get the number of registered bodies.
    pub fn body_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the upper bound on body ids (max id + 1).
    ///
    /// May be larger than `body_count()` if bodies have been removed.
    pub fn body_bound(&self) -> usize {
        self.graph.node_bound()
    }

    /// Iterate over registered bodies in id order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> + '_ {
        self.graph
            .node_indices()
            .map(|index| (BodyId(index.index() as u32), &self.graph[index]))
    }

    /// Iterate mutably over registered bodies in id order.
    pub fn bodies_mut(&mut self) -> impl Iterator<Item = &mut Body> + '_ {
        self.graph.node_weights_mut()
    }

    /// Visit every registered body in id order, with its id.
    pub fn for_each_body_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(BodyId, &mut Body),
    {
        for i in 0..self.graph.node_bound() {
            if let Some(body) = self.graph.node_weight_mut(NodeIndex::new(i)) {
                visit(BodyId(i as u32), body);
            }
        }
    }

    // =========================================================================
    // Link Operations
    // =========================================================================

    /// Register a link between two bodies.
    ///
    /// A negative `coefficient` or `length` is stored as unset.
    ///
    /// # Errors
    ///
    /// * If either endpoint is not registered.
    /// * If both endpoints are the same body.
    /// * If `coefficient` or `length` is not finite.
    pub fn add_link(&mut self, a: BodyId, b: BodyId, coefficient: f32, length: f32) -> Result<LinkId, SimulationError> {
        for id in [a, b] {
            if !self.contains_body(id) {
                return Err(SimulationError::UnknownBody(id));
            }
        }
        if a == b {
            return Err(SimulationError::SelfLink(a));
        }
        let (coefficient, length) = spring_values(coefficient, length)?;

        let link = Link::with_spring(a, b, coefficient, length);
        let index = self.graph.add_edge(node_index(a), node_index(b), link);

        if index.index() < self.link_slots {
            self.reused_links += 1;
        } else {
            self.fresh_links += 1;
            self.link_slots = index.index() + 1;
        }

        Ok(LinkId(index.index() as u32))
    }

    /// Reclaim a link.
    ///
    /// Returns true if the link existed.
    pub fn remove_link(&mut self, id: LinkId) -> bool {
        self.graph.remove_edge(edge_index(id)).is_some()
    }

    /// Get a registered link.
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.graph.edge_weight(edge_index(id))
    }

    /// Replace a registered link's spring values. Endpoints are fixed once a
    /// link is registered.
    ///
    /// A negative `coefficient` or `length` is stored as unset.
    ///
    /// # Errors
    ///
    /// * If the link is not registered.
    /// * If `coefficient` or `length` is not finite.
    pub fn set_link_spring(&mut self, id: LinkId, coefficient: f32, length: f32) -> Result<(), SimulationError> {
        let (coefficient, length) = spring_values(coefficient, length)?;
        let link = self
            .graph
            .edge_weight_mut(edge_index(id))
            .ok_or(SimulationError::UnknownLink(id))?;
        link.coefficient = coefficient;
        link.length = length;
        Ok(())
    }

    /// Get the number of registered links.
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate over registered links in id order.
    pub fn links(&self) -> impl Iterator<Item = (LinkId, &Link)> + '_ {
        self.graph
            .edge_indices()
            .map(|index| (LinkId(index.index() as u32), &self.graph[index]))
    }

    /// Visit every registered link in id order, with both endpoints borrowed
    /// mutably.
    pub fn for_each_link_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&Link, &mut Body, &mut Body),
    {
        for i in 0..self.link_slots {
            let index = EdgeIndex::new(i);
            let Some((a, b)) = self.graph.edge_endpoints(index) else {
                continue;
            };
            let link = self.graph[index];
            let (body_a, body_b) = self.graph.index_twice_mut(a, b);
            visit(&link, body_a, body_b);
        }
    }

    /// Link storage counters.
    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            fresh: self.fresh_links,
            reused: self.reused_links,
            vacant: self.link_slots - self.graph.edge_count(),
        }
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    /// Get the bounding box of all registered bodies as
    /// `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        if self.graph.node_count() == 0 {
            return None;
        }

        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;

        for (_, body) in self.bodies() {
            let [x, y] = body.location;
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        if min_x == f32::INFINITY {
            return None;
        }

        Some((min_x, min_y, max_x, max_y))
    }

    /// Unregister every body and reclaim every link.
    ///
    /// Slots are released highest first so that later insertions refill them
    /// from the lowest index up. Returns `(bodies, links)` removed.
    pub fn clear(&mut self) -> (usize, usize) {
        let removed = (self.graph.node_count(), self.graph.edge_count());

        for i in (0..self.link_slots).rev() {
            self.graph.remove_edge(EdgeIndex::new(i));
        }
        for i in (0..self.graph.node_bound()).rev() {
            self.graph.remove_node(NodeIndex::new(i));
        }

        removed
    }
}

/// Validate spring values, clamping negatives to `Link::UNSET`.
fn spring_values(coefficient: f32, length: f32) -> Result<(f32, f32), SimulationError> {
    let coefficient = SimulationError::check_finite("spring coefficient", coefficient)?;
    let length = SimulationError::check_finite("spring length", length)?;
    Ok((coefficient.max(Link::UNSET), length.max(Link::UNSET)))
}

#[inline]
fn node_index(id: BodyId) -> NodeIndex {
    NodeIndex::new(id.0 as usize)
}

#[inline]
fn edge_index(id: LinkId) -> EdgeIndex {
    EdgeIndex::new(id.0 as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_bodies() -> (BodyGraph, BodyId, BodyId) {
        let mut graph = BodyGraph::new();
        let a = graph.add_body(Body::at(0.0, 0.0));
        let b = graph.add_body(Body::at(1.0, 0.0));
        (graph, a, b)
    }

    #[test]
    fn test_add_body() {
        let mut graph = BodyGraph::new();
        let id = graph.add_body(Body::at(10.0, 20.0));

        assert_eq!(graph.body_count(), 1);
        assert_eq!(graph.body(id).map(|b| b.location), Some([10.0, 20.0]));
    }

    #[test]
    fn test_add_link() {
        let (mut graph, a, b) = two_bodies();
        let id = graph.add_link(a, b, 0.5, 2.0).unwrap();

        assert_eq!(graph.link_count(), 1);
        let link = graph.link(id).unwrap();
        assert_eq!(link.endpoints(), (a, b));
        assert_eq!((link.coefficient, link.length), (0.5, 2.0));
    }

    #[test]
    fn test_add_link_rejects_unknown_endpoint() {
        let (mut graph, a, _) = two_bodies();
        let missing = BodyId(99);

        assert_eq!(graph.add_link(a, missing, -1.0, -1.0), Err(SimulationError::UnknownBody(missing)));
        assert_eq!(graph.add_link(missing, a, -1.0, -1.0), Err(SimulationError::UnknownBody(missing)));
        assert_eq!(graph.link_count(), 0);
        assert_eq!(graph.pool_stats(), PoolStats::default());
    }

    #[test]
    fn test_add_link_rejects_self_link() {
        let (mut graph, a, _) = two_bodies();
        assert_eq!(graph.add_link(a, a, -1.0, -1.0), Err(SimulationError::SelfLink(a)));
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn test_negative_spring_values_are_unset() {
        let (mut graph, a, b) = two_bodies();
        let id = graph.add_link(a, b, -7.0, -0.5).unwrap();
        let link = graph.link(id).unwrap();
        assert_eq!(link.coefficient, Link::UNSET);
        assert_eq!(link.length, Link::UNSET);
    }

    #[test]
    fn test_remove_body_reclaims_links() {
        let mut graph = BodyGraph::new();
        let a = graph.add_body(Body::at(0.0, 0.0));
        let b = graph.add_body(Body::at(1.0, 0.0));
        let c = graph.add_body(Body::at(2.0, 0.0));
        graph.add_link(a, b, -1.0, -1.0).unwrap();
        graph.add_link(b, c, -1.0, -1.0).unwrap();
        graph.add_link(a, c, -1.0, -1.0).unwrap();

        assert_eq!(graph.remove_body(b), Some(2));
        assert_eq!(graph.remove_body(b), None);
        assert_eq!(graph.body_count(), 2);
        assert_eq!(graph.link_count(), 1);
        assert_eq!(graph.pool_stats().vacant, 2);

        // Every remaining link refers to registered bodies
        for (_, link) in graph.links() {
            assert!(graph.contains_body(link.a()));
            assert!(graph.contains_body(link.b()));
        }
    }

    #[test]
    fn test_set_link_spring_keeps_endpoints() {
        let mut graph = BodyGraph::new();
        let a = graph.add_body(Body::at(0.0, 0.0));
        let b = graph.add_body(Body::at(1.0, 0.0));
        let c = graph.add_body(Body::at(2.0, 0.0));
        let id = graph.add_link(a, b, -1.0, -1.0).unwrap();

        graph.set_link_spring(id, 0.25, -3.0).unwrap();
        let link = graph.link(id).unwrap();
        assert_eq!(link.endpoints(), (a, b));
        assert_eq!((link.coefficient, link.length), (0.25, Link::UNSET));

        assert!(matches!(
            graph.set_link_spring(id, f32::NAN, 1.0),
            Err(SimulationError::InvalidValue { .. })
        ));
        assert_eq!(graph.link(id).unwrap().coefficient, 0.25);
        assert_eq!(graph.set_link_spring(LinkId(9), 1.0, 1.0), Err(SimulationError::UnknownLink(LinkId(9))));

        // Removing an unrelated body leaves the link alone
        assert_eq!(graph.remove_body(c), Some(0));
        assert_eq!(graph.link_count(), 1);
        assert_eq!(graph.remove_body(b), Some(1));
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn test_with_capacity_starts_empty() {
        let graph = BodyGraph::with_capacity(64, 128);
        assert_eq!(graph.body_count(), 0);
        assert_eq!(graph.link_count(), 0);
        assert_eq!(graph.pool_stats(), PoolStats::default());
    }

    #[test]
    fn test_removed_link_slot_is_reused() {
        let (mut graph, a, b) = two_bodies();
        let first = graph.add_link(a, b, -1.0, -1.0).unwrap();
        assert!(graph.remove_link(first));
        assert!(!graph.remove_link(first));

        let second = graph.add_link(b, a, -1.0, -1.0).unwrap();
        assert_eq!(second, first);
        assert_eq!(
            graph.pool_stats(),
            PoolStats {
                fresh: 1,
                reused: 1,
                vacant: 0
            }
        );
    }

    #[test]
    fn test_for_each_link_mut_sees_both_endpoints() {
        let (mut graph, a, b) = two_bodies();
        graph.add_link(a, b, -1.0, -1.0).unwrap();

        graph.for_each_link_mut(|_, body_a, body_b| {
            body_a.add_force(1.0, 0.0);
            body_b.add_force(-1.0, 0.0);
        });

        assert_eq!(graph.body(a).unwrap().force, [1.0, 0.0]);
        assert_eq!(graph.body(b).unwrap().force, [-1.0, 0.0]);
    }

    #[test]
    fn test_for_each_body_mut_skips_removed() {
        let mut graph = BodyGraph::new();
        let a = graph.add_body(Body::at(0.0, 0.0));
        let b = graph.add_body(Body::at(1.0, 0.0));
        let c = graph.add_body(Body::at(2.0, 0.0));
        graph.remove_body(b);

        let mut seen = Vec::new();
        graph.for_each_body_mut(|id, _| seen.push(id));
        assert_eq!(seen, vec![a, c]);
    }

    #[test]
    fn test_body_bound() {
        let mut graph = BodyGraph::new();
        let a = graph.add_body(Body::at(0.0, 0.0));
        let _b = graph.add_body(Body::at(1.0, 1.0));
        let _c = graph.add_body(Body::at(2.0, 2.0));

        assert_eq!(graph.body_bound(), 3);

        graph.remove_body(a);
        // body_count drops but body_bound stays
        assert_eq!(graph.body_count(), 2);
        assert_eq!(graph.body_bound(), 3);
    }

    #[test]
    fn test_bounds() {
        let mut graph = BodyGraph::new();
        assert_eq!(graph.bounds(), None);

        let a = graph.add_body(Body::at(-100.0, -5.0));
        graph.add_body(Body::at(10.0, 5.0));
        graph.add_body(Body::at(20.0, -1.0));
        assert_eq!(graph.bounds(), Some((-100.0, -5.0, 20.0, 5.0)));

        // Removed bodies no longer count
        graph.remove_body(a);
        assert_eq!(graph.bounds(), Some((10.0, -1.0, 20.0, 5.0)));
    }

    #[test]
    fn test_clear_then_reuse() {
        let mut graph = BodyGraph::new();
        let bodies: Vec<_> = (0..4).map(|i| graph.add_body(Body::at(i as f32, 0.0))).collect();
        for pair in bodies.windows(2) {
            graph.add_link(pair[0], pair[1], -1.0, -1.0).unwrap();
        }

        assert_eq!(graph.clear(), (4, 3));
        assert_eq!(graph.body_count(), 0);
        assert_eq!(graph.link_count(), 0);
        assert_eq!(graph.pool_stats().vacant, 3);

        let a = graph.add_body(Body::at(0.0, 0.0));
        let b = graph.add_body(Body::at(1.0, 0.0));
        let link = graph.add_link(a, b, -1.0, -1.0).unwrap();

        assert!(link.raw() < 3);
        assert_eq!(
            graph.pool_stats(),
            PoolStats {
                fresh: 3,
                reused: 1,
                vacant: 2
            }
        );
    }
}
