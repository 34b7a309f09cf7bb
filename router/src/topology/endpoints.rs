use netree_common::geom::{Point, Segment};
use std::collections::HashMap;

/// Dense indices `0..m` for the distinct endpoints of a net's segments,
/// assigned in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct EndpointTable {
    points: Vec<Point>,
    index: HashMap<Point, usize>,
}

impl EndpointTable {
    pub fn from_segments(segments: &[Segment]) -> Self {
        let mut table = Self {
            points: Vec::with_capacity(segments.len() + 1),
            index: HashMap::with_capacity(segments.len() + 1),
        };
        for seg in segments {
            for p in seg.endpoints() {
                table.insert(p);
            }
        }
        table
    }

    fn insert(&mut self, p: Point) -> usize {
        if let Some(&idx) = self.index.get(&p) {
            return idx;
        }
        let idx = self.points.len();
        self.points.push(p);
        self.index.insert(p, idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn index_of(&self, p: Point) -> Option<usize> {
        self.index.get(&p).copied()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.index.contains_key(&p)
    }

    pub fn point(&self, idx: usize) -> Point {
        self.points[idx]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Endpoint indices of a segment whose points are in the table.
    pub(crate) fn segment_indices(&self, seg: &Segment) -> (usize, usize) {
        (self.index[&seg.source()], self.index[&seg.target()])
    }
}
