mod graph2;
mod graph3;
mod handles;
mod simplex;

pub(crate) mod math;
pub(crate) mod math2;
pub(crate) mod math3;

pub use graph2::{Node2, NodeGraph2};
pub use graph3::{Node3, NodeGraph3};
pub use handles::FixedNodeHandle;
pub use math::{
    validate_coordinate, validate_point2, validate_point3, InsertionError, SideInfo,
};
pub use simplex::{SimplexLocation, Tetrahedron, Triangle};
