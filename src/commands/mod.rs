//! Chat command glue for the copy tools.
//!
//! Recognised commands: `/copy` (alias `/c`), `/cut` (same as `/copy cut`),
//! and `/click` (alias `/x`).
//!
//! Dispatch is async: saved-copy file I/O runs on `tokio::fs` so it never
//! blocks the caller's thread.

pub mod click;
pub mod copy;

pub use click::ClickCommand;
pub use copy::{CopyCommand, CopyRequest};

use crate::edit::ChangeTracker;
use crate::session::PlayerSession;
use crate::store::BufferStore;
use crate::world::World;

/// State parked in a player's selection by the command that started it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandSelection {
    Copy(CopyRequest),
}

/// Session type the command glue works with.
pub type CommandSession = PlayerSession<CommandSelection>;

/// Run one chat line for a player. Returns false if the line is not one of
/// the copy commands, leaving it for other handlers.
pub async fn dispatch(
    line: &str,
    session: &mut CommandSession,
    world: &mut dyn World,
    tracker: &mut dyn ChangeTracker,
    store: &BufferStore,
) -> bool {
    let line = line.trim();
    let line = line.strip_prefix('/').unwrap_or(line);
    let (name, args) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    log::debug!("{}: /{} {}", session.name(), name, args);
    match name.to_ascii_lowercase().as_str() {
        "copy" | "c" => copy::execute(CopyCommand::parse(args), session, store).await,
        "cut" => copy::execute(CopyCommand::parse(&format!("cut {}", args)), session, store).await,
        "click" | "x" => {
            let command = ClickCommand::parse(args, session.state.last_click(), world.dims());
            click::execute(command, session, world, tracker);
        }
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::ChangeLog;
    use crate::world::{Level, Rank};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_unknown_command_is_ignored() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let store = BufferStore::new(temp_dir.path(), 15, 64);
        let mut level = Level::new("d", 4, 4, 4);
        let mut log = ChangeLog::new();
        let mut session = CommandSession::new("erin", Rank::new("builder", 10));

        assert!(!dispatch("/paste", &mut session, &mut level, &mut log, &store).await);
        assert!(session.state.messages().is_empty());

        assert!(dispatch("  /C  ", &mut session, &mut level, &mut log, &store).await);
        assert!(session.selection().is_pending());
        assert_eq!(
            session.selection().pending().unwrap().state(),
            &CommandSelection::Copy(CopyRequest::default())
        );

        assert!(dispatch("/cut air", &mut session, &mut level, &mut log, &store).await);
        assert_eq!(
            session.selection().pending().unwrap().state(),
            &CommandSelection::Copy(CopyRequest { cut: true, air: true, offset_mark: false })
        );
    }
}
