use super::endpoints::EndpointTable;
use super::tree::{NetTree, TreeNode};
use super::TopologyError;
use crate::algo::UnionFind;
use netree_common::geom::{Point, Segment};
use netree_common::util::config::StubPolicy;
use std::collections::VecDeque;

/// Result of the cycle-elimination pass: the segments that joined two
/// groups, and the ones whose endpoints were already connected.
#[derive(Clone, Debug)]
pub struct SpanningForest {
    retained: Vec<Segment>,
    /// Input position of each retained segment.
    origins: Vec<usize>,
    redundant: Vec<Segment>,
    groups: UnionFind,
}

impl SpanningForest {
    pub fn build(table: &EndpointTable, segments: &[Segment]) -> Self {
        let mut groups = UnionFind::new(table.len());
        let mut retained = Vec::with_capacity(segments.len());
        let mut origins = Vec::with_capacity(segments.len());
        let mut redundant = Vec::new();

        for (pos, seg) in segments.iter().enumerate() {
            let (s, t) = table.segment_indices(seg);
            let (hs, ht, same) = groups.same_group_head(s, t);
            if same {
                redundant.push(*seg);
            } else {
                groups.union_head(hs, ht);
                retained.push(*seg);
                origins.push(pos);
            }
        }

        Self {
            retained,
            origins,
            redundant,
            groups,
        }
    }

    pub fn retained(&self) -> &[Segment] {
        &self.retained
    }

    /// Positions in the input list of the retained segments.
    pub fn retained_origins(&self) -> &[usize] {
        &self.origins
    }

    pub fn redundant(&self) -> &[Segment] {
        &self.redundant
    }

    pub fn components(&self) -> usize {
        self.groups.components()
    }

    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.groups.same_group(a, b)
    }

    /// Number of distinct groups among `indices`.
    fn groups_among(&mut self, indices: impl IntoIterator<Item = usize>) -> usize {
        let mut roots: Vec<usize> = indices.into_iter().map(|i| self.groups.find(i)).collect();
        roots.sort_unstable();
        roots.dedup();
        roots.len()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TopologyBuilder {
    stub_policy: StubPolicy,
}

impl TopologyBuilder {
    pub fn new(stub_policy: StubPolicy) -> Self {
        Self { stub_policy }
    }

    pub fn stub_policy(&self) -> StubPolicy {
        self.stub_policy
    }

    /// Builds the tree of one net. `pins` are in declaration order; the
    /// first one becomes the root. Neither input is modified.
    pub fn build(&self, pins: &[Point], segments: &[Segment]) -> Result<NetTree, TopologyError> {
        let Some(&root_point) = pins.first() else {
            return Err(TopologyError::EmptyNet);
        };

        let table = EndpointTable::from_segments(segments);

        let mut pin_nodes = Vec::with_capacity(pins.len());
        for (pin, &point) in pins.iter().enumerate() {
            match table.index_of(point) {
                Some(idx) => pin_nodes.push(idx),
                None => return Err(TopologyError::MissingPin { pin, point }),
            }
        }

        let mut forest = SpanningForest::build(&table, segments);

        let pin_groups = forest.groups_among(pin_nodes.iter().copied());
        if pin_groups > 1 {
            return Err(TopologyError::DisconnectedNet {
                components: pin_groups,
            });
        }

        let m = table.len();
        let mut pins_at: Vec<Vec<usize>> = vec![Vec::new(); m];
        for (pin, &idx) in pin_nodes.iter().enumerate() {
            pins_at[idx].push(pin);
        }

        let retained = forest.retained();
        let origins = forest.retained_origins();
        let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); m];
        let mut degree = vec![0usize; m];
        for (e, seg) in retained.iter().enumerate() {
            let (s, t) = table.segment_indices(seg);
            adjacency[s].push((t, e));
            adjacency[t].push((s, e));
            degree[s] += 1;
            degree[t] += 1;
        }

        let mut alive = vec![true; retained.len()];
        let mut pruned = Vec::new();
        let stubs: Vec<usize> = (0..m)
            .filter(|&v| pins_at[v].is_empty() && degree[v] == 1)
            .collect();

        match self.stub_policy {
            StubPolicy::Keep => {}
            StubPolicy::Reject => {
                if let Some(&v) = stubs.first() {
                    return Err(TopologyError::DanglingStub {
                        point: table.point(v),
                    });
                }
            }
            StubPolicy::Prune => {
                let mut queue: VecDeque<usize> = stubs.into_iter().collect();
                while let Some(v) = queue.pop_front() {
                    if degree[v] != 1 {
                        continue;
                    }
                    let Some(&(w, e)) = adjacency[v].iter().find(|&&(_, e)| alive[e]) else {
                        continue;
                    };
                    alive[e] = false;
                    degree[v] -= 1;
                    degree[w] -= 1;
                    pruned.push(retained[e]);
                    if pins_at[w].is_empty() && degree[w] == 1 {
                        queue.push_back(w);
                    }
                }
            }
        }

        let root_idx = pin_nodes[0];
        let mut node_of: Vec<Option<usize>> = vec![None; m];
        let mut nodes = vec![TreeNode {
            point: root_point,
            parent: None,
            children: Vec::new(),
            pins: pins_at[root_idx].clone(),
            uplink: None,
            route: None,
        }];
        node_of[root_idx] = Some(0);

        let mut queue = VecDeque::from([root_idx]);
        while let Some(v) = queue.pop_front() {
            let Some(parent) = node_of[v] else {
                continue;
            };
            for &(w, e) in &adjacency[v] {
                if !alive[e] || node_of[w].is_some() {
                    continue;
                }
                let child = nodes.len();
                nodes.push(TreeNode {
                    point: table.point(w),
                    parent: Some(parent),
                    children: Vec::new(),
                    pins: pins_at[w].clone(),
                    uplink: Some(retained[e]),
                    route: Some(origins[e]),
                });
                nodes[parent].children.push(child);
                node_of[w] = Some(child);
                queue.push_back(w);
            }
        }

        let live: Vec<usize> = (0..m)
            .filter(|&v| degree[v] > 0 || !pins_at[v].is_empty())
            .collect();
        if live.iter().any(|&v| node_of[v].is_none()) {
            let components = forest.groups_among(live);
            return Err(TopologyError::DisconnectedNet { components });
        }

        let redundant = forest.redundant().to_vec();
        log::debug!(
            "net tree: {} nodes, {} redundant, {} pruned",
            nodes.len(),
            redundant.len(),
            pruned.len()
        );
        Ok(NetTree::new(nodes, 0, redundant, pruned))
    }
}
