//! Edit operation and change record types.

use std::ops::BitOr;

use crate::core::types::{BlockId, IVec3};
use crate::math::Cuboid;
use crate::world::block;

/// Tags describing why a block changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChangeFlags(u8);

impl ChangeFlags {
    pub const NONE: ChangeFlags = ChangeFlags(0);
    /// Written by a drawing operation rather than a single placement.
    pub const DRAWN: ChangeFlags = ChangeFlags(1 << 0);
    /// Cleared by a cut after being copied.
    pub const CUT: ChangeFlags = ChangeFlags(1 << 1);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: ChangeFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ChangeFlags {
    type Output = ChangeFlags;

    fn bitor(self, rhs: ChangeFlags) -> ChangeFlags {
        ChangeFlags(self.0 | rhs.0)
    }
}

/// Fill a cuboid with one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillOp {
    pub region: Cuboid,
    pub block: BlockId,
    pub flags: ChangeFlags,
}

impl FillOp {
    pub fn new(region: Cuboid, block: BlockId) -> Self {
        Self {
            region,
            block,
            flags: ChangeFlags::DRAWN,
        }
    }

    /// Clear a region that was just copied.
    pub fn cut(region: Cuboid) -> Self {
        Self {
            region,
            block: block::AIR,
            flags: ChangeFlags::DRAWN | ChangeFlags::CUT,
        }
    }
}

/// One block changed in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Assigned by the tracker, increasing.
    pub id: u64,
    pub pos: IVec3,
    pub old: BlockId,
    pub new: BlockId,
    pub flags: ChangeFlags,
}
