//! Well-known block ids.

use crate::core::types::BlockId;

pub const AIR: BlockId = 0;
pub const STONE: BlockId = 1;
pub const GRASS: BlockId = 2;
pub const DIRT: BlockId = 3;
pub const BEDROCK: BlockId = 7;

/// Never a real block. Reads outside a level yield it, and copy buffers store
/// it for voxels the copying player was not allowed to take.
pub const INVALID: BlockId = 0xFF;
