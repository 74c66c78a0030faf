//! Region fill executor used by cut.

use crate::math::Cuboid;
use crate::world::{BlockPermissions, World};
use super::delta::FillOp;
use super::tracker::ChangeTracker;

/// Applies fills to the world on behalf of one player.
pub struct CutExecutor<'a> {
    world: &'a mut dyn World,
    permissions: &'a dyn BlockPermissions,
    tracker: &'a mut dyn ChangeTracker,
}

impl<'a> CutExecutor<'a> {
    pub fn new(
        world: &'a mut dyn World,
        permissions: &'a dyn BlockPermissions,
        tracker: &'a mut dyn ChangeTracker,
    ) -> Self {
        Self {
            world,
            permissions,
            tracker,
        }
    }

    /// Fill `op.region` with `op.block`, returning the number of changed blocks.
    ///
    /// Blocks the player may not manipulate, blocks already equal to the fill
    /// and positions outside the world are left alone.
    pub fn apply(&mut self, op: &FillOp) -> usize {
        let mut changed = 0;
        for pos in op.region.iter_yzx() {
            let Some(old) = self.world.block(pos) else {
                continue;
            };
            if old == op.block || !self.permissions.can_manipulate(old) {
                continue;
            }
            if self.world.set_block(pos, op.block) {
                self.tracker.record(pos, old, op.block, op.flags);
                changed += 1;
            }
        }
        log::debug!(
            "Fill {:?}..{:?} with {} changed {} blocks",
            op.region.min,
            op.region.max,
            op.block,
            changed
        );
        changed
    }

    /// Clear a copied region to air, tagged as a cut.
    pub fn cut(&mut self, region: Cuboid) -> usize {
        self.apply(&FillOp::cut(region))
    }
}
