//! Dense in-memory level

use crate::core::types::{BlockId, IVec3};
use super::block;
use super::World;

/// A fixed-size level storing one byte per block, Y-major then Z then X.
#[derive(Clone, Debug)]
pub struct Level {
    name: String,
    dims: IVec3,
    blocks: Vec<BlockId>,
}

impl Level {
    /// Create a level filled with air.
    ///
    /// Non-positive dimensions are clamped to one block.
    pub fn new(name: impl Into<String>, width: i32, height: i32, length: i32) -> Self {
        let dims = IVec3::new(width, height, length).max(IVec3::ONE);
        let volume = dims.x as usize * dims.y as usize * dims.z as usize;
        Self {
            name: name.into(),
            dims,
            blocks: vec![block::AIR; volume],
        }
    }

    /// Create a level with bedrock at y = 0, dirt below `ground` and grass on top.
    pub fn flat(name: impl Into<String>, width: i32, height: i32, length: i32, ground: i32) -> Self {
        let mut level = Self::new(name, width, height, length);
        let top = ground.clamp(0, level.dims.y - 1);
        for y in 0..=top {
            let id = if y == 0 {
                block::BEDROCK
            } else if y == top {
                block::GRASS
            } else {
                block::DIRT
            };
            for z in 0..level.dims.z {
                for x in 0..level.dims.x {
                    level.set_block(IVec3::new(x, y, z), id);
                }
            }
        }
        level
    }

    /// Raw block storage in index order.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    #[inline]
    fn index(&self, pos: IVec3) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let d = self.dims;
        Some(((pos.y as usize * d.z as usize) + pos.z as usize) * d.x as usize + pos.x as usize)
    }
}

impl World for Level {
    fn name(&self) -> &str {
        &self.name
    }

    fn dims(&self) -> IVec3 {
        self.dims
    }

    fn block(&self, pos: IVec3) -> Option<BlockId> {
        self.index(pos).map(|i| self.blocks[i])
    }

    fn set_block(&mut self, pos: IVec3, block: BlockId) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.blocks[i] = block;
                true
            }
            None => false,
        }
    }
}
