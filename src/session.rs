//! Per-player session state.
//!
//! Each connected player owns one [`PlayerSession`]. Nothing in here is shared
//! between players, so no locking is involved; the server passes the session
//! along with each incoming edit or command.
//!
//! The session is generic over the state a pending selection carries, so any
//! building command can park its own arguments in it.

use crate::copy::CopyBuffer;
use crate::core::types::{BlockId, IVec3};
use crate::edit::{ChangeFlags, ChangeTracker};
use crate::selection::{CompleteFn, MarkContext, MarkCount, MarkFn, MarkOutcome, SelectionMachine};
use crate::world::{block, BlockPermissions, Rank, World};

/// A block placed or broken by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockEdit {
    pub pos: IVec3,
    /// Block being placed, or [`block::AIR`] when breaking.
    pub block: BlockId,
}

impl BlockEdit {
    pub fn place(pos: IVec3, block: BlockId) -> Self {
        Self { pos, block }
    }

    pub fn destroy(pos: IVec3) -> Self {
        Self { pos, block: block::AIR }
    }
}

/// What happened to an edit.
#[derive(Debug)]
pub enum EditOutcome {
    /// Written to the world.
    Applied,
    /// Consumed as a selection mark; the world is untouched and the client
    /// should be shown `restore` again (`None` outside the level).
    Reverted { pos: IVec3, restore: Option<BlockId>, mark: MarkOutcome },
    /// Refused: outside the level or not permitted.
    Denied,
}

/// Everything about a player except the pending selection.
#[derive(Debug)]
pub struct PlayerState {
    name: String,
    rank: Rank,
    current_copy: Option<CopyBuffer>,
    last_click: IVec3,
    messages: Vec<String>,
}

impl PlayerState {
    pub fn new(name: impl Into<String>, rank: Rank) -> Self {
        Self {
            name: name.into(),
            rank,
            current_copy: None,
            last_click: IVec3::ZERO,
            messages: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rank(&self) -> &Rank {
        &self.rank
    }

    /// The buffer pastes and saves use.
    pub fn current_copy(&self) -> Option<&CopyBuffer> {
        self.current_copy.as_ref()
    }

    /// Install a new current buffer, returning the one it replaces.
    pub fn set_current_copy(&mut self, buffer: CopyBuffer) -> Option<CopyBuffer> {
        self.current_copy.replace(buffer)
    }

    pub fn clear_current_copy(&mut self) -> Option<CopyBuffer> {
        self.current_copy.take()
    }

    /// Position of the last block the player placed or broke.
    pub fn last_click(&self) -> IVec3 {
        self.last_click
    }

    /// Queue a message for the player.
    pub fn message(&mut self, text: impl Into<String>) {
        self.messages.push(text.into());
    }

    /// Queued messages, oldest first.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn drain_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}

/// A player's state plus the selection they may be in the middle of.
///
/// `S` is the per-command state stored with a pending selection.
pub struct PlayerSession<S> {
    pub state: PlayerState,
    selection: SelectionMachine<S>,
}

impl<S> PlayerSession<S> {
    pub fn new(name: impl Into<String>, rank: Rank) -> Self {
        Self {
            state: PlayerState::new(name, rank),
            selection: SelectionMachine::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.state.name()
    }

    pub fn selection(&self) -> &SelectionMachine<S> {
        &self.selection
    }

    /// Ask for `required` marks. Any selection already pending is replaced.
    pub fn begin_selection(
        &mut self,
        required: MarkCount,
        prompt: &str,
        state: S,
        on_mark: MarkFn<S>,
        on_complete: CompleteFn<S>,
    ) {
        if self.selection.begin(required, prompt, state, on_mark, on_complete) {
            log::debug!("{}: replaced pending selection", self.state.name);
        }
        self.state.message(prompt);
    }

    /// Abandon the pending selection, if any. No callback runs.
    pub fn cancel_selection(&mut self) -> bool {
        self.selection.cancel()
    }

    /// Route a block edit: into the pending selection if there is one,
    /// otherwise into the world.
    pub fn handle_edit(
        &mut self,
        world: &mut dyn World,
        tracker: &mut dyn ChangeTracker,
        edit: BlockEdit,
    ) -> EditOutcome {
        self.state.last_click = edit.pos;

        if self.selection.is_pending() {
            let mut ctx = MarkContext {
                world: &mut *world,
                player: &mut self.state,
                tracker: &mut *tracker,
            };
            let mark = self.selection.handle_mark(&mut ctx, edit.pos);
            return EditOutcome::Reverted {
                pos: edit.pos,
                restore: world.block(edit.pos),
                mark,
            };
        }

        let Some(old) = world.block(edit.pos) else {
            return EditOutcome::Denied;
        };
        if !self.state.rank.can_manipulate(old) || !self.state.rank.can_manipulate(edit.block) {
            self.state.message(format!("You are not allowed to change block {} here", old));
            return EditOutcome::Denied;
        }
        if old != edit.block && world.set_block(edit.pos, edit.block) {
            tracker.record(edit.pos, old, edit.block, ChangeFlags::NONE);
        }
        EditOutcome::Applied
    }
}
