use netree_common::geom::{Point, Segment};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub point: Point,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Declared pin indices located here. Empty for pseudo-pins.
    pub pins: Vec<usize>,
    /// The input segment joining this node to its parent.
    pub uplink: Option<Segment>,
    /// Position of `uplink` in the segment list the tree was built from.
    pub route: Option<usize>,
}

impl TreeNode {
    pub fn is_pseudo_pin(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn degree(&self) -> usize {
        self.children.len() + usize::from(self.parent.is_some())
    }
}

/// Connectivity of one net, stored as an arena. Nodes are in breadth-first
/// order from the root, so a parent always precedes its children.
#[derive(Clone, Debug, Serialize)]
pub struct NetTree {
    nodes: Vec<TreeNode>,
    root: usize,
    redundant: Vec<Segment>,
    pruned: Vec<Segment>,
}

impl NetTree {
    pub(crate) fn new(
        nodes: Vec<TreeNode>,
        root: usize,
        redundant: Vec<Segment>,
        pruned: Vec<Segment>,
    ) -> Self {
        Self {
            nodes,
            root,
            redundant,
            pruned,
        }
    }

    /// One-node tree for pins that all share a location, or `None` if
    /// they do not.
    pub(crate) fn single_location(pins: &[Point]) -> Option<Self> {
        let &point = pins.first()?;
        if pins.iter().any(|&p| p != point) {
            return None;
        }
        let root = TreeNode {
            point,
            parent: None,
            children: Vec::new(),
            pins: (0..pins.len()).collect(),
            uplink: None,
            route: None,
        };
        Some(Self::new(vec![root], 0, Vec::new(), Vec::new()))
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn root_point(&self) -> Point {
        self.nodes[self.root].point
    }

    pub fn node(&self, idx: usize) -> &TreeNode {
        &self.nodes[idx]
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, p: Point) -> Option<usize> {
        self.nodes.iter().position(|n| n.point == p)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.find(p).is_some()
    }

    /// Segments kept in the tree, in node order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.nodes.iter().filter_map(|n| n.uplink)
    }

    /// Segments dropped because their endpoints were already connected.
    pub fn redundant_segments(&self) -> &[Segment] {
        &self.redundant
    }

    /// Segments removed as dangling stubs.
    pub fn pruned_segments(&self) -> &[Segment] {
        &self.pruned
    }

    pub fn pseudo_pins(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.nodes.iter().filter(|n| n.is_pseudo_pin())
    }

    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    pub fn wirelength(&self) -> u64 {
        self.segments().map(|s| s.length() as u64).sum()
    }

    /// Node indices from `idx` up to and including the root.
    pub fn path_to_root(&self, idx: usize) -> Vec<usize> {
        let mut path = vec![idx];
        let mut cur = idx;
        while let Some(parent) = self.nodes[cur].parent {
            path.push(parent);
            cur = parent;
        }
        path
    }
}
