pub mod coord;
pub mod point;
pub mod rect;
pub mod segment;

pub use coord::GridCoord;
pub use point::Point;
pub use rect::Rect;
pub use segment::{Direction, Segment};

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GeomError {
    #[error("invalid segment {from} -> {to}: endpoints must differ in exactly one coordinate")]
    InvalidSegment { from: Point, to: Point },
    #[error("invalid box (top {top}, bottom {bottom}, left {left}, right {right})")]
    InvalidBox {
        top: i32,
        bottom: i32,
        left: i32,
        right: i32,
    },
    #[error("precondition violated: {0}")]
    PreconditionViolated(&'static str),
}
