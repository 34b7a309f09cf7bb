use super::GeomError;
use super::point::Point;
use serde::Serialize;
use std::fmt;

/// `Horizontal` means the x-coordinates of both endpoints match; `Vertical`
/// means the y-coordinates match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// An axis-aligned wire piece between two distinct grid points.
///
/// The endpoints always differ in exactly one coordinate, so the orientation
/// is computed from them rather than stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Segment {
    source: Point,
    target: Point,
}

impl Segment {
    pub fn new(source: Point, target: Point) -> Result<Self, GeomError> {
        let same_x = source.x == target.x;
        let same_y = source.y == target.y;
        if same_x == same_y {
            return Err(GeomError::InvalidSegment {
                from: source,
                to: target,
            });
        }
        Ok(Self { source, target })
    }

    pub fn source(&self) -> Point {
        self.source
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn endpoints(&self) -> [Point; 2] {
        [self.source, self.target]
    }

    pub fn direction(&self) -> Direction {
        if self.source.x == self.target.x {
            Direction::Horizontal
        } else {
            Direction::Vertical
        }
    }

    /// The shared x-coordinate. Only meaningful for horizontal segments.
    pub fn x(&self) -> Result<i32, GeomError> {
        match self.direction() {
            Direction::Horizontal => Ok(self.source.x),
            Direction::Vertical => Err(GeomError::PreconditionViolated(
                "x() called on a vertical segment",
            )),
        }
    }

    /// The shared y-coordinate. Only meaningful for vertical segments.
    pub fn y(&self) -> Result<i32, GeomError> {
        match self.direction() {
            Direction::Vertical => Ok(self.source.y),
            Direction::Horizontal => Err(GeomError::PreconditionViolated(
                "y() called on a horizontal segment",
            )),
        }
    }

    pub fn length(&self) -> u32 {
        self.source.manhattan(&self.target)
    }

    /// The endpoint opposite to `p`, if `p` is an endpoint at all.
    pub fn other(&self, p: Point) -> Option<Point> {
        if p == self.source {
            Some(self.target)
        } else if p == self.target {
            Some(self.source)
        } else {
            None
        }
    }

    pub fn reversed(&self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(a: (i32, i32), b: (i32, i32)) -> Result<Segment, GeomError> {
        Segment::new(a.into(), b.into())
    }

    #[test]
    fn diagonal_segment_is_rejected() {
        let err = seg((1, 1), (2, 2)).unwrap_err();
        assert_eq!(
            err,
            GeomError::InvalidSegment {
                from: Point::new(1, 1),
                to: Point::new(2, 2)
            }
        );
    }

    #[test]
    fn zero_length_segment_is_rejected() {
        assert!(matches!(
            seg((3, 4), (3, 4)),
            Err(GeomError::InvalidSegment { .. })
        ));
    }

    #[test]
    fn orientation_follows_shared_coordinate() {
        let h = seg((2, 0), (2, 5)).unwrap();
        assert_eq!(h.direction(), Direction::Horizontal);
        assert_eq!(h.x(), Ok(2));
        assert!(matches!(h.y(), Err(GeomError::PreconditionViolated(_))));

        let v = seg((0, 7), (4, 7)).unwrap();
        assert_eq!(v.direction(), Direction::Vertical);
        assert_eq!(v.y(), Ok(7));
        assert!(matches!(v.x(), Err(GeomError::PreconditionViolated(_))));
    }

    #[test]
    fn other_endpoint_lookup() {
        let s = seg((0, 0), (0, 3)).unwrap();
        assert_eq!(s.other(Point::new(0, 0)), Some(Point::new(0, 3)));
        assert_eq!(s.other(Point::new(0, 3)), Some(Point::new(0, 0)));
        assert_eq!(s.other(Point::new(0, 1)), None);
        assert_eq!(s.length(), 3);
        assert_eq!(s.reversed().source(), Point::new(0, 3));
    }
}
