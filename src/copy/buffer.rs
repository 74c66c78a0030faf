//! In-memory cuboid snapshot of block ids

use std::fmt;

use crate::core::error::Error;
use crate::core::types::{BlockId, IVec3, Result};
use crate::math::Cuboid;
use crate::world::block;

/// Which end of an axis the origin mark sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    Min,
    Max,
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corner::Min => f.write_str("Min"),
            Corner::Max => f.write_str("Max"),
        }
    }
}

/// Snapshot of a cuboid of blocks plus paste metadata.
///
/// Blocks are stored Y outermost, then Z, X innermost. Voxels the copying
/// player was not allowed to take hold [`block::INVALID`] and are never pasted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopyBuffer {
    origin: IVec3,
    min: IVec3,
    size: IVec3,
    blocks: Vec<BlockId>,
    offset: IVec3,
    used_blocks: u64,
    paste_air: bool,
    source: String,
}

impl CopyBuffer {
    /// Empty buffer over `region`, every voxel set to [`block::INVALID`].
    ///
    /// The offset starts at `region.min - origin`.
    pub fn new(region: Cuboid, origin: IVec3) -> Self {
        let volume = region.volume() as usize;
        Self {
            origin,
            min: region.min,
            size: region.size(),
            blocks: vec![block::INVALID; volume],
            offset: region.min - origin,
            used_blocks: 0,
            paste_air: false,
            source: String::new(),
        }
    }

    /// Rebuild a buffer from decoded parts, checking its invariants.
    ///
    /// The min corner is not persisted, so it is taken to be the origin.
    pub fn from_parts(
        size: IVec3,
        origin: IVec3,
        offset: IVec3,
        used_blocks: u64,
        paste_air: bool,
        blocks: Vec<BlockId>,
    ) -> Result<Self> {
        if size.cmple(IVec3::ZERO).any() {
            return Err(Error::CorruptBuffer(format!(
                "dimensions {}x{}x{} are not positive",
                size.x, size.y, size.z
            )));
        }
        let expected = size.x as usize * size.y as usize * size.z as usize;
        if blocks.len() != expected {
            return Err(Error::VoxelCountMismatch {
                expected,
                actual: blocks.len(),
            });
        }
        if used_blocks > expected as u64 {
            return Err(Error::CorruptBuffer(format!(
                "{} used blocks in a region of {}",
                used_blocks, expected
            )));
        }
        Ok(Self {
            origin,
            min: origin,
            size,
            blocks,
            offset,
            used_blocks,
            paste_air,
            source: String::new(),
        })
    }

    pub fn width(&self) -> i32 {
        self.size.x
    }

    pub fn height(&self) -> i32 {
        self.size.y
    }

    pub fn length(&self) -> i32 {
        self.size.z
    }

    /// Width, height and length.
    pub fn size(&self) -> IVec3 {
        self.size
    }

    pub fn volume(&self) -> usize {
        self.blocks.len()
    }

    /// World region the buffer was captured from.
    pub fn region(&self) -> Cuboid {
        Cuboid::from_min_size(self.min, self.size)
    }

    /// The first mark of the selection.
    pub fn origin(&self) -> IVec3 {
        self.origin
    }

    pub fn min(&self) -> IVec3 {
        self.min
    }

    /// Translation applied to the paste anchor.
    pub fn offset(&self) -> IVec3 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: IVec3) {
        self.offset = offset;
    }

    pub fn used_blocks(&self) -> u64 {
        self.used_blocks
    }

    pub fn paste_air(&self) -> bool {
        self.paste_air
    }

    pub fn set_paste_air(&mut self, paste_air: bool) {
        self.paste_air = paste_air;
    }

    /// Free text naming where the buffer came from (a level or a file).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    /// All voxels in storage order.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Storage index of a buffer-local coordinate.
    #[inline]
    pub fn index(&self, local: IVec3) -> Option<usize> {
        if local.cmplt(IVec3::ZERO).any() || local.cmpge(self.size).any() {
            return None;
        }
        let s = self.size;
        Some(((local.y as usize * s.z as usize) + local.z as usize) * s.x as usize + local.x as usize)
    }

    /// Block at a buffer-local coordinate.
    pub fn get(&self, local: IVec3) -> Option<BlockId> {
        self.index(local).map(|i| self.blocks[i])
    }

    /// Store a captured voxel, counting it as used when it will be pasted.
    ///
    /// Returns false if `index` is outside the buffer.
    pub(crate) fn store(&mut self, index: usize, id: BlockId) -> bool {
        let Some(slot) = self.blocks.get_mut(index) else {
            return false;
        };
        *slot = id;
        if id != block::AIR || self.paste_air {
            self.used_blocks += 1;
        }
        true
    }

    /// For each axis, whether the origin mark is the min or the max corner.
    pub fn origin_corners(&self) -> [Corner; 3] {
        let corner = |origin: i32, min: i32| if origin == min { Corner::Min } else { Corner::Max };
        [
            corner(self.origin.x, self.min.x),
            corner(self.origin.y, self.min.y),
            corner(self.origin.z, self.min.z),
        ]
    }

    /// World positions and blocks a paste anchored at `anchor` would write.
    ///
    /// Local voxel `i` lands on `anchor + offset + i`. Invalid voxels are
    /// skipped, as is air unless the buffer pastes air.
    pub fn placements(&self, anchor: IVec3) -> impl Iterator<Item = (IVec3, BlockId)> + '_ {
        let base = anchor + self.offset;
        Cuboid::from_min_size(IVec3::ZERO, self.size)
            .iter_yzx()
            .zip(self.blocks.iter().copied())
            .filter(move |&(_, id)| id != block::INVALID && (id != block::AIR || self.paste_air))
            .map(move |(local, id)| (base + local, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    fn region() -> Cuboid {
        Cuboid::from_corners(IVec3::new(2, 0, 2), IVec3::new(3, 1, 4))
    }

    #[test]
    fn test_new_buffer() {
        let buf = CopyBuffer::new(region(), IVec3::new(3, 1, 4));
        assert_eq!(buf.size(), IVec3::new(2, 2, 3));
        assert_eq!(buf.volume(), 12);
        assert!(buf.blocks().iter().all(|&b| b == block::INVALID));
        assert_eq!(buf.offset(), IVec3::new(-1, -1, -2));
        assert_eq!(buf.used_blocks(), 0);
        assert_eq!(buf.region(), region());
    }

    #[test]
    fn test_index_order() {
        let buf = CopyBuffer::new(region(), region().min);
        assert_eq!(buf.index(IVec3::ZERO), Some(0));
        assert_eq!(buf.index(IVec3::new(1, 0, 0)), Some(1));
        assert_eq!(buf.index(IVec3::new(0, 0, 1)), Some(2));
        assert_eq!(buf.index(IVec3::new(0, 1, 0)), Some(6));
        assert_eq!(buf.index(IVec3::new(2, 0, 0)), None);
        assert_eq!(buf.index(IVec3::new(0, -1, 0)), None);
    }

    #[test]
    fn test_store_counts_air_only_when_pasting_air() {
        let mut buf = CopyBuffer::new(region(), region().min);
        assert!(buf.store(0, block::AIR));
        assert!(buf.store(1, block::STONE));
        assert_eq!(buf.used_blocks(), 1);

        buf.set_paste_air(true);
        assert!(buf.store(2, block::AIR));
        assert_eq!(buf.used_blocks(), 2);
        assert!(!buf.store(99, block::STONE));
    }

    #[test]
    fn test_origin_corners() {
        let buf = CopyBuffer::new(region(), IVec3::new(2, 1, 4));
        assert_eq!(buf.origin_corners(), [Corner::Min, Corner::Max, Corner::Max]);
        assert_eq!(format!("{}", Corner::Max), "Max");
    }

    #[test]
    fn test_from_parts_rejects_bad_counts() {
        let err = CopyBuffer::from_parts(IVec3::new(2, 1, 2), IVec3::ZERO, IVec3::ZERO, 0, false, vec![1; 3])
            .unwrap_err();
        assert!(matches!(err, Error::VoxelCountMismatch { expected: 4, actual: 3 }));

        let err = CopyBuffer::from_parts(IVec3::new(0, 1, 2), IVec3::ZERO, IVec3::ZERO, 0, false, vec![])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = CopyBuffer::from_parts(IVec3::new(1, 1, 1), IVec3::ZERO, IVec3::ZERO, 2, false, vec![1])
            .unwrap_err();
        assert!(matches!(err, Error::CorruptBuffer(_)));
    }

    #[test]
    fn test_placements_skip_invalid_and_air() {
        let mut buf = CopyBuffer::new(
            Cuboid::from_corners(IVec3::ZERO, IVec3::new(2, 0, 0)),
            IVec3::ZERO,
        );
        buf.store(0, block::STONE);
        buf.store(1, block::AIR);
        // index 2 stays INVALID
        buf.set_offset(IVec3::new(0, 5, 0));

        let placed: Vec<_> = buf.placements(IVec3::new(10, 0, 10)).collect();
        assert_eq!(placed, vec![(IVec3::new(10, 5, 10), block::STONE)]);

        buf.set_paste_air(true);
        let placed: Vec<_> = buf.placements(IVec3::new(10, 0, 10)).collect();
        assert_eq!(
            placed,
            vec![
                (IVec3::new(10, 5, 10), block::STONE),
                (IVec3::new(11, 5, 10), block::AIR),
            ]
        );
    }
}
