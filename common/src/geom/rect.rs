use super::GeomError;
use super::point::Point;

/// Axis-aligned box given by its four sides. `left..=right` spans x and
/// `bottom..=top` spans y.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    top: i32,
    bottom: i32,
    left: i32,
    right: i32,
}

impl Rect {
    pub fn new(top: i32, bottom: i32, left: i32, right: i32) -> Result<Self, GeomError> {
        if bottom > top || left > right {
            return Err(GeomError::InvalidBox {
                top,
                bottom,
                left,
                right,
            });
        }
        Ok(Self {
            top,
            bottom,
            left,
            right,
        })
    }

    pub fn top(&self) -> i32 {
        self.top
    }
    pub fn bottom(&self) -> i32 {
        self.bottom
    }
    pub fn left(&self) -> i32 {
        self.left
    }
    pub fn right(&self) -> i32 {
        self.right
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }
    pub fn height(&self) -> i32 {
        self.top - self.bottom
    }

    /// Twice the center, so that it stays integral.
    pub fn center_x2(&self) -> Point {
        Point::new(self.left + self.right, self.top + self.bottom)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.bottom && p.y <= self.top
    }
}
