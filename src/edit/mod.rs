//! Region edits applied on behalf of a player.
//!
//! A fill writes one block over a cuboid and reports every changed voxel to a
//! [`ChangeTracker`], tagged with [`ChangeFlags`] so block history can tell a
//! cut from an ordinary draw.

pub mod delta;
pub mod tracker;
pub mod cut;

pub use delta::{ChangeFlags, ChangeRecord, FillOp};
pub use tracker::{ChangeLog, ChangeTracker};
pub use cut::CutExecutor;
