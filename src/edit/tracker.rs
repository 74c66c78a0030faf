//! Change tracking for block history.

use crate::core::types::{BlockId, IVec3};
use super::delta::{ChangeFlags, ChangeRecord};

/// Receives every block changed by an edit operation.
pub trait ChangeTracker {
    fn record(&mut self, pos: IVec3, old: BlockId, new: BlockId, flags: ChangeFlags);
}

/// In-memory list of changes in the order they happened.
#[derive(Debug, Default)]
pub struct ChangeLog {
    records: Vec<ChangeRecord>,
    next_id: u64,
}

impl ChangeLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Get all records.
    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    /// Records carrying all of `flags`.
    pub fn with_flags(&self, flags: ChangeFlags) -> impl Iterator<Item = &ChangeRecord> + '_ {
        self.records.iter().filter(move |r| r.flags.contains(flags))
    }

    /// Latest change at a position.
    pub fn last_at(&self, pos: IVec3) -> Option<&ChangeRecord> {
        self.records.iter().rev().find(|r| r.pos == pos)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove all records, returning them.
    pub fn take(&mut self) -> Vec<ChangeRecord> {
        std::mem::take(&mut self.records)
    }
}

impl ChangeTracker for ChangeLog {
    fn record(&mut self, pos: IVec3, old: BlockId, new: BlockId, flags: ChangeFlags) {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.records.push(ChangeRecord {
            id,
            pos,
            old,
            new,
            flags,
        });
    }
}
