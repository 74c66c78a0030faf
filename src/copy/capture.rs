//! Capturing a cuboid of the world into a copy buffer

use crate::core::error::Error;
use crate::core::types::{IVec3, Result};
use crate::math::Cuboid;
use crate::world::{block, BlockPermissions, World};
use super::buffer::CopyBuffer;

/// Modifiers chosen when the copy was requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Count and paste air blocks.
    pub paste_air: bool,
}

/// Scan the cuboid spanned by two marks into a new buffer.
///
/// The marks may be given in either order; `first` becomes the buffer origin.
/// Voxels the player may not manipulate keep [`block::INVALID`] and are not
/// counted. Each read is independent; the region is not locked as a whole.
pub fn capture(
    world: &dyn World,
    permissions: &dyn BlockPermissions,
    first: IVec3,
    second: IVec3,
    options: CaptureOptions,
) -> CopyBuffer {
    let region = Cuboid::from_corners(first, second);
    let mut buffer = CopyBuffer::new(region, first);
    buffer.set_paste_air(options.paste_air);

    for (index, pos) in region.iter_yzx().enumerate() {
        let id = world.block(pos).unwrap_or(block::INVALID);
        if id == block::INVALID || !permissions.can_manipulate(id) {
            continue;
        }
        buffer.store(index, id);
    }

    buffer.set_source(format!("level {}", world.name()));
    log::debug!(
        "Captured {:?}..{:?} from {}: {} used of {}",
        region.min,
        region.max,
        world.name(),
        buffer.used_blocks(),
        buffer.volume()
    );
    buffer
}

/// [`capture`], then discard the whole buffer if it holds more used blocks
/// than `limit`.
pub fn capture_within_quota(
    world: &dyn World,
    permissions: &dyn BlockPermissions,
    first: IVec3,
    second: IVec3,
    options: CaptureOptions,
    limit: u64,
) -> Result<CopyBuffer> {
    let buffer = capture(world, permissions, first, second, options);
    if buffer.used_blocks() > limit {
        return Err(Error::QuotaExceeded {
            used: buffer.used_blocks(),
            limit,
        });
    }
    Ok(buffer)
}
