//! Recovers a tree per net from its declared pins and unordered wire
//! segments.

pub mod builder;
pub mod endpoints;
pub mod tree;

pub use builder::{SpanningForest, TopologyBuilder};
pub use endpoints::EndpointTable;
pub use tree::{NetTree, TreeNode};

use netree_common::geom::{GeomError, Point};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("net declares no pins")]
    EmptyNet,
    #[error("pin {pin} at {point} is not an endpoint of any segment")]
    MissingPin { pin: usize, point: Point },
    #[error("segments leave the net split into {components} components")]
    DisconnectedNet { components: usize },
    #[error("dangling wire end at {point} is neither a pin nor a junction")]
    DanglingStub { point: Point },
    #[error(transparent)]
    Geometry(#[from] GeomError),
}
