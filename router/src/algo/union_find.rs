#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct UnionFindNode {
    head: usize,
    // Rank estimate, only meaningful while the node is a root.
    depth: usize,
}

/// Disjoint-set forest over `0..n` with union-by-depth and path compression.
///
/// Indices outside `0..n` are a caller bug and panic.
#[derive(Clone, Debug)]
pub struct UnionFind {
    nodes: Vec<UnionFindNode>,
}

impl UnionFind {
    pub fn new(size: usize) -> Self {
        Self {
            nodes: (0..size)
                .map(|head| UnionFindNode { head, depth: 0 })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root of the group containing `i`. Every node on the walked path is
    /// re-pointed at the root.
    pub fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.nodes[root].head != root {
            root = self.nodes[root].head;
        }

        let mut cur = i;
        while cur != root {
            let next = self.nodes[cur].head;
            self.nodes[cur].head = root;
            cur = next;
        }
        root
    }

    pub fn same_group(&mut self, a: usize, b: usize) -> bool {
        let (_, _, same) = self.same_group_head(a, b);
        same
    }

    /// Roots of `a` and `b`, and whether they coincide. Callers that need to
    /// know if a merge happens use this together with [`UnionFind::union_head`].
    pub fn same_group_head(&mut self, a: usize, b: usize) -> (usize, usize, bool) {
        let ha = self.find(a);
        let hb = self.find(b);
        (ha, hb, ha == hb)
    }

    /// Merges two distinct roots. On a depth tie `ha` becomes the root.
    pub fn union_head(&mut self, ha: usize, hb: usize) {
        debug_assert_ne!(ha, hb, "union_head on a single group");
        debug_assert_eq!(self.nodes[ha].head, ha, "{ha} is not a root");
        debug_assert_eq!(self.nodes[hb].head, hb, "{hb} is not a root");

        let depth_a = self.nodes[ha].depth;
        let depth_b = self.nodes[hb].depth;

        if depth_a == depth_b {
            self.nodes[hb].head = ha;
            self.nodes[ha].depth += 1;
        } else if depth_a > depth_b {
            self.nodes[hb].head = ha;
        } else {
            self.nodes[ha].head = hb;
        }
    }

    /// Returns `true` if the call merged two groups.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (ha, hb, same) = self.same_group_head(a, b);
        if !same {
            self.union_head(ha, hb);
        }
        !same
    }

    /// Depth recorded at the root of `i`'s group.
    pub fn depth(&mut self, i: usize) -> usize {
        let root = self.find(i);
        self.nodes[root].depth
    }

    /// Number of disjoint groups.
    pub fn components(&self) -> usize {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(i, node)| node.head == *i)
            .count()
    }
}
