//! Multi-mark region selection.
//!
//! A building command asks for two or three marks. While a selection is
//! pending, every block the player places or breaks is turned into a mark
//! instead of changing the world. Each accepted mark is passed to the
//! command's `on_mark`; the last one also runs `on_complete` and clears the
//! selection.

use crate::core::error::Error;
use crate::core::types::IVec3;
use crate::edit::ChangeTracker;
use crate::session::PlayerState;
use crate::world::World;

/// Number of marks a selection needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkCount {
    Two,
    Three,
}

impl MarkCount {
    pub fn get(self) -> usize {
        match self {
            MarkCount::Two => 2,
            MarkCount::Three => 3,
        }
    }
}

/// What a mark callback may touch while handling a mark.
pub struct MarkContext<'a> {
    pub world: &'a mut dyn World,
    pub player: &'a mut PlayerState,
    pub tracker: &'a mut dyn ChangeTracker,
}

/// Called for every accepted mark with its zero-based index and all marks so far.
pub type MarkFn<S> = fn(&mut MarkContext<'_>, usize, &[IVec3], &mut S);

/// Called once with all marks after the last one.
pub type CompleteFn<S> = fn(&mut MarkContext<'_>, &[IVec3], S);

/// A pending selection with its command state.
pub struct Selection<S> {
    required: MarkCount,
    prompt: String,
    marks: Vec<IVec3>,
    state: S,
    on_mark: MarkFn<S>,
    on_complete: CompleteFn<S>,
}

impl<S> Selection<S> {
    pub fn required(&self) -> MarkCount {
        self.required
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Marks accepted so far, in order.
    pub fn marks(&self) -> &[IVec3] {
        &self.marks
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

/// Result of feeding one edit to the machine.
#[derive(Debug)]
pub enum MarkOutcome {
    /// No selection is pending; the edit should reach the world.
    Ignored,
    /// The mark was outside the level; the same index is retried next time.
    Rejected(Error),
    /// The mark was accepted and more are needed.
    Advanced { index: usize },
    /// The final mark was accepted and the selection completed.
    Completed,
}

impl MarkOutcome {
    /// Whether the edit was consumed by the selection.
    pub fn intercepted(&self) -> bool {
        !matches!(self, MarkOutcome::Ignored)
    }
}

/// Per-player selection controller. Holds at most one pending selection.
pub struct SelectionMachine<S> {
    pending: Option<Selection<S>>,
}

impl<S> Default for SelectionMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SelectionMachine<S> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Start a selection, replacing any pending one. Returns true if one was replaced.
    pub fn begin(
        &mut self,
        required: MarkCount,
        prompt: impl Into<String>,
        state: S,
        on_mark: MarkFn<S>,
        on_complete: CompleteFn<S>,
    ) -> bool {
        let replaced = self.pending.is_some();
        self.pending = Some(Selection {
            required,
            prompt: prompt.into(),
            marks: Vec::with_capacity(required.get()),
            state,
            on_mark,
            on_complete,
        });
        replaced
    }

    /// Drop the pending selection without running any callback.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&Selection<S>> {
        self.pending.as_ref()
    }

    /// Turn an edit at `pos` into a mark.
    pub fn handle_mark(&mut self, ctx: &mut MarkContext<'_>, pos: IVec3) -> MarkOutcome {
        let Some(selection) = self.pending.as_mut() else {
            return MarkOutcome::Ignored;
        };

        if !ctx.world.contains(pos) {
            let err = Error::out_of_bounds(pos);
            ctx.player.message(err.to_string());
            return MarkOutcome::Rejected(err);
        }

        selection.marks.push(pos);
        let index = selection.marks.len() - 1;
        log::debug!("{}: mark {} at {:?}", ctx.player.name(), index, pos);
        (selection.on_mark)(ctx, index, &selection.marks, &mut selection.state);

        if index + 1 < selection.required.get() {
            return MarkOutcome::Advanced { index };
        }

        if let Some(done) = self.pending.take() {
            (done.on_complete)(ctx, &done.marks, done.state);
        }
        MarkOutcome::Completed
    }
}
