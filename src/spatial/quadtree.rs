//! Arena-based Barnes-Hut quadtree.
//!
//! Nodes are stored contiguously in a `Vec` and reference each other by
//! index. Building reorders the tree's own copy of the points so that every
//! subtree covers a contiguous run of them; a leaf is simply a run.

use crate::graph::BodyId;

/// Deepest level before coincident points are kept together in one leaf.
const MAX_DEPTH: usize = 20;

/// A body's position and mass as seen by the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass {
    pub id: BodyId,
    pub location: [f32; 2],
    pub mass: f32,
}

/// An axis-aligned square region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Square {
    /// Lower-left corner.
    pub min: [f32; 2],
    /// Side length.
    pub size: f32,
}

impl Square {
    /// Smallest square anchored at the points' lower-left extent that covers
    /// all of them. `None` for an empty slice.
    pub fn enclosing(points: &[PointMass]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min = [f32::INFINITY; 2];
        let mut max = [f32::NEG_INFINITY; 2];
        for p in points {
            for axis in 0..2 {
                min[axis] = min[axis].min(p.location[axis]);
                max[axis] = max[axis].max(p.location[axis]);
            }
        }
        if !min[0].is_finite() || !min[1].is_finite() {
            min = [0.0; 2];
        }
        let size = (max[0] - min[0]).max(max[1] - min[1]);
        let size = if size.is_finite() && size > 0.0 { size } else { 1.0 };
        Some(Self { min, size })
    }

    fn center(&self) -> [f32; 2] {
        let half = self.size / 2.0;
        [self.min[0] + half, self.min[1] + half]
    }

    /// Whether `point` lies inside or on the edge of the square.
    pub fn contains(&self, point: [f32; 2]) -> bool {
        (0..2).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.min[axis] + self.size)
    }

    /// Quadrant (0-3) of `point`.
    ///
    /// ```text
    /// +---+---+
    /// | 2 | 3 |
    /// +---+---+
    /// | 0 | 1 |
    /// +---+---+
    /// ```
    fn quadrant(&self, point: [f32; 2]) -> usize {
        let center = self.center();
        let x_bit = (point[0] > center[0]) as usize;
        let y_bit = (point[1] > center[1]) as usize;
        x_bit | (y_bit << 1)
    }

    fn subdivide(&self, quadrant: usize) -> Self {
        let half = self.size / 2.0;
        let min = [
            if quadrant & 1 != 0 { self.min[0] + half } else { self.min[0] },
            if quadrant & 2 != 0 { self.min[1] + half } else { self.min[1] },
        ];
        Self { min, size: half }
    }
}

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(u32);

impl NodeId {
    const EMPTY: NodeId = NodeId(u32::MAX);

    fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }

    fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

#[derive(Debug, Clone, Copy)]
enum Node {
    /// A run of points: one point, or several at maximum depth.
    Leaf { start: u32, count: u32 },

    Internal {
        center_of_mass: [f32; 2],
        mass: f32,
        square: Square,
        /// [bottom-left, bottom-right, top-left, top-right]
        children: [NodeId; 4],
    },
}

/// Barnes-Hut quadtree over a snapshot of point masses.
#[derive(Debug, Clone)]
pub struct Quadtree {
    nodes: Vec<Node>,
    points: Vec<PointMass>,
    root: NodeId,
}

impl Default for Quadtree {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            points: Vec::new(),
            root: NodeId::EMPTY,
        }
    }
}

impl Quadtree {
    /// Build a tree over `points`, replacing this tree's contents.
    ///
    /// The arena and point buffers are reused between builds.
    pub fn rebuild(&mut self, points: impl IntoIterator<Item = PointMass>) {
        self.nodes.clear();
        self.points.clear();
        self.points.extend(points);
        self.root = match Square::enclosing(&self.points) {
            Some(square) => {
                let len = self.points.len();
                Self::build(&mut self.nodes, &mut self.points, 0, len, square, 0)
            }
            None => NodeId::EMPTY,
        };
    }

    /// Build a fresh tree over `points`.
    pub fn from_points(points: impl IntoIterator<Item = PointMass>) -> Self {
        let mut tree = Self::default();
        tree.rebuild(points);
        tree
    }

    fn build(
        nodes: &mut Vec<Node>,
        points: &mut [PointMass],
        start: usize,
        end: usize,
        square: Square,
        depth: usize,
    ) -> NodeId {
        let run = &mut points[start..end];
        if run.is_empty() {
            return NodeId::EMPTY;
        }
        if run.len() == 1 || depth >= MAX_DEPTH {
            nodes.push(Node::Leaf {
                start: start as u32,
                count: run.len() as u32,
            });
            return NodeId::new(nodes.len() - 1);
        }

        let (mass, weighted) = run.iter().fold((0.0f32, [0.0f32; 2]), |(m, w), p| {
            (m + p.mass, [w[0] + p.location[0] * p.mass, w[1] + p.location[1] * p.mass])
        });
        let center_of_mass = [weighted[0] / mass, weighted[1] / mass];

        run.sort_unstable_by_key(|p| square.quadrant(p.location));
        let mut bounds = [start; 5];
        for q in 0..4 {
            let in_quadrant = points[bounds[q]..end]
                .iter()
                .take_while(|p| square.quadrant(p.location) == q)
                .count();
            bounds[q + 1] = bounds[q] + in_quadrant;
        }

        let children: [NodeId; 4] = std::array::from_fn(|q| {
            Self::build(nodes, points, bounds[q], bounds[q + 1], square.subdivide(q), depth + 1)
        });

        nodes.push(Node::Internal {
            center_of_mass,
            mass,
            square,
            children,
        });
        NodeId::new(nodes.len() - 1)
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of arena nodes, for diagnostics.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Visit the mass distribution as seen from `location`.
    ///
    /// A cell that does not contain `location` and satisfies
    /// `width / distance < theta` is reported once, as its total mass at its
    /// center of mass. Every other point is reported individually, except
    /// those belonging to `exclude`.
    pub fn visit<F>(&self, location: [f32; 2], exclude: BodyId, theta: f32, mut visit: F)
    where
        F: FnMut([f32; 2], f32),
    {
        self.visit_node(self.root, location, exclude, theta, &mut visit);
    }

    fn visit_node<F>(&self, node: NodeId, location: [f32; 2], exclude: BodyId, theta: f32, visit: &mut F)
    where
        F: FnMut([f32; 2], f32),
    {
        if node.is_empty() {
            return;
        }
        match self.nodes[node.index()] {
            Node::Leaf { start, count } => {
                let start = start as usize;
                for p in &self.points[start..start + count as usize] {
                    if p.id != exclude {
                        visit(p.location, p.mass);
                    }
                }
            }
            Node::Internal {
                center_of_mass,
                mass,
                square,
                children,
            } => {
                let distance = (center_of_mass[0] - location[0]).hypot(center_of_mass[1] - location[1]);
                if !square.contains(location) && square.size / distance < theta {
                    visit(center_of_mass, mass);
                } else {
                    for child in children {
                        self.visit_node(child, location, exclude, theta, visit);
                    }
                }
            }
        }
    }
}
