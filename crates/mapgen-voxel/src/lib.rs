//! Voxel-side building blocks shared by every mapgen crate: content ids and
//! the content table seam, node cells and their rotation, inclusive boxes,
//! the region accessor used for capture and placement, and the deferred
//! node-name resolver.

pub mod area;
pub mod content;
pub mod node;
pub mod region;
pub mod resolver;

pub use area::{VoxelArea, sort_box_vertices};
pub use content::{ContentId, ContentTable, ContentTableError, NodeDef, NodeDefTable, Param2Kind};
pub use node::{MapNode, PROB_ALWAYS, PROB_NEVER, Rotation};
pub use region::{VoxelManip, VoxelRegion};
pub use resolver::{NodeListSlot, NodeResolver, NodeSlot, ResolutionIssue, ResolveReport};
