//! Per-rank block permissions and draw limits

use crate::core::types::BlockId;

/// Yes/no gate deciding whether the acting player may manipulate a block type.
pub trait BlockPermissions {
    fn can_manipulate(&self, block: BlockId) -> bool;
}

/// A player rank: which block types it may touch and how many blocks it may
/// capture in one operation.
#[derive(Clone, Debug)]
pub struct Rank {
    pub name: String,
    /// Largest number of used blocks a single capture may hold.
    pub draw_limit: u64,
    allowed: [bool; 256],
}

impl Rank {
    /// Rank allowed to manipulate every block type.
    pub fn new(name: impl Into<String>, draw_limit: u64) -> Self {
        Self {
            name: name.into(),
            draw_limit,
            allowed: [true; 256],
        }
    }

    /// Builder-style denial of one block type.
    pub fn deny(mut self, block: BlockId) -> Self {
        self.allowed[block as usize] = false;
        self
    }

    pub fn set_allowed(&mut self, block: BlockId, allowed: bool) {
        self.allowed[block as usize] = allowed;
    }
}

impl BlockPermissions for Rank {
    fn can_manipulate(&self, block: BlockId) -> bool {
        self.allowed[block as usize]
    }
}
