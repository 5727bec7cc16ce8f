pub mod geometry;
pub mod node;
pub mod root;
pub mod transform;

// Re-export main types for convenience
pub use geometry::{DrawEnv, GeometryOutcome, SkipReason};
pub use node::{Node, NodeId, NodeKind};
pub use root::{DrawStats, Root};
pub use transform::Transform;
