use super::point::Point;
use std::fmt;

/// A 1-based gcell address as written in design files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub row: u32,
    pub col: u32,
    pub layer: u32,
}

impl GridCoord {
    pub fn new(row: u32, col: u32, layer: u32) -> Self {
        Self { row, col, layer }
    }

    /// Lifts a planar point onto `layer`. The point must lie on the grid.
    pub fn from_planar(p: Point, layer: u32) -> Self {
        Self::new(p.x as u32, p.y as u32, layer)
    }

    /// Drops the layer.
    pub fn planar(&self) -> Point {
        Point::new(self.row as i32, self.col as i32)
    }

    pub fn same_gcell(&self, other: &GridCoord) -> bool {
        self.row == other.row && self.col == other.col
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.row, self.col, self.layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_round_trip_keeps_layer_separate() {
        let c = GridCoord::new(3, 7, 2);
        assert_eq!(c.planar(), Point::new(3, 7));
        assert_eq!(GridCoord::from_planar(c.planar(), 2), c);
        assert!(c.same_gcell(&GridCoord::new(3, 7, 1)));
        assert_eq!(c.to_string(), "3 7 2");
    }
}
