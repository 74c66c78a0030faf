//! World access: the level being edited and who may edit what.
//!
//! The block store itself belongs to the server; the copy subsystem only sees
//! it through [`World`] and asks [`BlockPermissions`] whether a player may
//! manipulate a given block type.

pub mod block;
pub mod level;
pub mod permission;

pub use level::Level;
pub use permission::{BlockPermissions, Rank};

use crate::core::types::{BlockId, IVec3};
use crate::math::Cuboid;

/// Bounded voxel grid of block ids.
///
/// Every single read and write is expected to be atomic on its own; callers do
/// not lock whole regions.
pub trait World {
    /// Name of the level, used as copy provenance.
    fn name(&self) -> &str;

    /// Width, height and length of the level.
    fn dims(&self) -> IVec3;

    /// Block at `pos`, or `None` outside the level.
    fn block(&self, pos: IVec3) -> Option<BlockId>;

    /// Overwrite the block at `pos`. Returns false outside the level.
    fn set_block(&mut self, pos: IVec3, block: BlockId) -> bool;

    /// Check if `pos` lies within `[0, width) x [0, height) x [0, length)`.
    fn contains(&self, pos: IVec3) -> bool {
        self.bounds().contains(pos)
    }

    /// Cuboid covering the whole level.
    fn bounds(&self) -> Cuboid {
        Cuboid::from_min_size(IVec3::ZERO, self.dims())
    }
}
