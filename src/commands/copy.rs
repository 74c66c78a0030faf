//! `/copy`: capture a region, and save, load, delete or list saved copies.

use crate::copy::{capture_within_quota, CaptureOptions};
use crate::core::error::Error;
use crate::core::types::IVec3;
use crate::edit::CutExecutor;
use crate::selection::{MarkContext, MarkCount};
use crate::store::{BufferStore, Listing};

use super::{CommandSelection, CommandSession};

pub const SELECT_PROMPT: &str = "Place or break two blocks to determine the edges.";

const HELP: &[&str] = &[
    "/copy - Copies the blocks in an area.",
    "/copy save [name] - Saves what you have copied.",
    "/copy load [name] - Loads what you have saved.",
    "/copy delete [name] - Deletes the specified copy.",
    "/copy list - Lists all saved copies you have",
    "/copy cut - Copies the blocks in an area, then removes them.",
    "/copy air - Copies the blocks in an area, including air.",
    "/copy @ - @ toggle for all the above, gives you a third click after copying that determines where to paste from",
];

/// Modifiers carried through a copy selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CopyRequest {
    /// Clear the region after capturing it.
    pub cut: bool,
    /// Include air blocks.
    pub air: bool,
    /// Ask for a third mark choosing the paste origin.
    pub offset_mark: bool,
}

/// Parsed `/copy` arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CopyCommand {
    Select(CopyRequest),
    Save(String),
    Load(String),
    Delete(String),
    List,
    Help,
}

impl CopyCommand {
    /// Parse the text after `/copy`. An `@` anywhere requests the third mark.
    pub fn parse(args: &str) -> Self {
        let offset_mark = args.contains('@');
        let cleaned = args.replace('@', "");
        let parts: Vec<&str> = cleaned.split_whitespace().collect();

        let opt = parts.first().map(|s| s.to_ascii_lowercase()).unwrap_or_default();
        let named = |make: fn(String) -> CopyCommand| match parts.as_slice() {
            [_, name] => make(name.to_string()),
            _ => CopyCommand::Help,
        };
        match opt.as_str() {
            "save" => named(CopyCommand::Save),
            "load" => named(CopyCommand::Load),
            "delete" => named(CopyCommand::Delete),
            "list" => CopyCommand::List,
            _ => {
                let mut request = CopyRequest {
                    offset_mark,
                    ..CopyRequest::default()
                };
                for part in &parts {
                    if part.eq_ignore_ascii_case("cut") {
                        request.cut = true;
                    } else if part.eq_ignore_ascii_case("air") {
                        request.air = true;
                    } else {
                        return CopyCommand::Help;
                    }
                }
                CopyCommand::Select(request)
            }
        }
    }
}

/// Run a parsed `/copy`, reporting the result to the player.
pub async fn execute(command: CopyCommand, session: &mut CommandSession, store: &BufferStore) {
    if let Err(err) = run(command, session, store).await {
        log::warn!("/copy by {} failed: {}", session.name(), err);
        session.state.message(err.to_string());
    }
}

async fn run(command: CopyCommand, session: &mut CommandSession, store: &BufferStore) -> Result<(), Error> {
    let player = session.name().to_string();
    match command {
        CopyCommand::Select(request) => {
            let marks = if request.offset_mark { MarkCount::Three } else { MarkCount::Two };
            session.begin_selection(
                marks,
                SELECT_PROMPT,
                CommandSelection::Copy(request),
                copy_mark,
                copy_complete,
            );
        }
        CopyCommand::Save(name) => {
            let buffer = session.state.current_copy().ok_or(Error::NoCurrentBuffer)?;
            store.save(&player, &name, buffer).await?;
            session.state.message(format!("Saved copy as {}", name));
        }
        CopyCommand::Load(name) => {
            let buffer = store.load(&player, &name).await?;
            session.state.set_current_copy(buffer);
            session.state.message(format!("Loaded copy from {}", name));
        }
        CopyCommand::Delete(name) => {
            store.delete(&player, &name).await?;
            session.state.message(format!("Deleted copy {}", name));
        }
        CopyCommand::List => match store.list(&player).await? {
            Listing::NoDirectory => session.state.message("No such directory exists"),
            Listing::Names(names) => {
                for name in names {
                    session.state.message(name);
                }
            }
        },
        CopyCommand::Help => {
            for line in HELP {
                session.state.message(*line);
            }
        }
    }
    Ok(())
}

fn copy_mark(ctx: &mut MarkContext<'_>, index: usize, _marks: &[IVec3], state: &mut CommandSelection) {
    let CommandSelection::Copy(request) = state;
    if index == 1 && request.offset_mark {
        ctx.player.message("Place a block to determine where to paste from");
    }
}

fn copy_complete(ctx: &mut MarkContext<'_>, marks: &[IVec3], state: CommandSelection) {
    let CommandSelection::Copy(request) = state;
    let &[first, second, ..] = marks else {
        return;
    };
    let options = CaptureOptions { paste_air: request.air };
    let limit = ctx.player.rank().draw_limit;

    let mut buffer = match capture_within_quota(&*ctx.world, ctx.player.rank(), first, second, options, limit) {
        Ok(buffer) => buffer,
        Err(err) => {
            log::warn!("{}: copy discarded: {}", ctx.player.name(), err);
            ctx.player.message(err.to_string());
            return;
        }
    };

    let third = marks.get(2).copied();
    if let Some(third) = third {
        buffer.set_offset(first - third);
    }

    let used = buffer.used_blocks();
    let [cx, cy, cz] = buffer.origin_corners();
    let region = buffer.region();
    log::info!(
        "{} copied {} blocks ({}x{}x{}) from {}",
        ctx.player.name(),
        used,
        buffer.width(),
        buffer.height(),
        buffer.length(),
        buffer.source()
    );
    ctx.player.set_current_copy(buffer);

    if request.cut {
        let mut executor = CutExecutor::new(&mut *ctx.world, ctx.player.rank(), &mut *ctx.tracker);
        let cleared = executor.cut(region);
        log::debug!("{}: cut cleared {} blocks", ctx.player.name(), cleared);
    }

    ctx.player.message(format!(
        "Copied {} blocks, origin at ({}, {}, {}) corner",
        used, cx, cy, cz
    ));
    if !request.air {
        ctx.player.message("To also copy air blocks, use /copy air");
    }
    if third.is_some() {
        ctx.player.message("Set offset of where to paste from.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::dispatch;
    use crate::copy::codec::tests::legacy_bytes;
    use crate::edit::{ChangeFlags, ChangeLog};
    use crate::session::BlockEdit;
    use crate::world::{block, Level, Rank, World};
    use tempfile::TempDir;

    struct Harness {
        level: Level,
        log: ChangeLog,
        session: CommandSession,
        store: BufferStore,
        _temp_dir: TempDir,
    }

    impl Harness {
        fn new(limit: u64) -> Self {
            let temp_dir = TempDir::new().expect("failed to create temp dir");
            let mut level = Level::new("main", 16, 8, 16);
            for z in 0..16 {
                for x in 0..16 {
                    level.set_block(IVec3::new(x, 0, z), block::STONE);
                }
            }
            Self {
                level,
                log: ChangeLog::new(),
                session: CommandSession::new("alice", Rank::new("builder", limit)),
                store: BufferStore::new(temp_dir.path().join("savecopy"), 15, 64),
                _temp_dir: temp_dir,
            }
        }

        async fn run(&mut self, line: &str) -> Vec<String> {
            assert!(dispatch(line, &mut self.session, &mut self.level, &mut self.log, &self.store).await);
            self.session.state.drain_messages()
        }

        fn click(&mut self, pos: IVec3) -> Vec<String> {
            self.session.handle_edit(&mut self.level, &mut self.log, BlockEdit::place(pos, block::DIRT));
            self.session.state.drain_messages()
        }

        async fn copy(&mut self, a: IVec3, b: IVec3) -> Vec<String> {
            self.run("/copy").await;
            self.click(a);
            self.click(b)
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(CopyCommand::parse(""), CopyCommand::Select(CopyRequest::default()));
        assert_eq!(
            CopyCommand::parse("CUT air"),
            CopyCommand::Select(CopyRequest { cut: true, air: true, offset_mark: false })
        );
        assert_eq!(
            CopyCommand::parse("@ air"),
            CopyCommand::Select(CopyRequest { cut: false, air: true, offset_mark: true })
        );
        assert_eq!(
            CopyCommand::parse("cut@"),
            CopyCommand::Select(CopyRequest { cut: true, air: false, offset_mark: true })
        );
        assert_eq!(CopyCommand::parse("save house"), CopyCommand::Save("house".to_string()));
        assert_eq!(CopyCommand::parse("Load house"), CopyCommand::Load("house".to_string()));
        assert_eq!(CopyCommand::parse("delete house"), CopyCommand::Delete("house".to_string()));
        assert_eq!(CopyCommand::parse("list"), CopyCommand::List);
        assert_eq!(CopyCommand::parse("save"), CopyCommand::Help);
        assert_eq!(CopyCommand::parse("save a b"), CopyCommand::Help);
        assert_eq!(CopyCommand::parse("sideways"), CopyCommand::Help);
    }

    #[tokio::test]
    async fn test_copy_two_by_two_floor() {
        let mut h = Harness::new(100);
        assert_eq!(h.run("/copy").await, vec![SELECT_PROMPT]);
        assert!(h.click(IVec3::ZERO).is_empty());
        let messages = h.click(IVec3::new(1, 0, 1));

        assert_eq!(
            messages,
            vec![
                "Copied 4 blocks, origin at (Min, Min, Min) corner",
                "To also copy air blocks, use /copy air",
            ]
        );
        let buf = h.session.state.current_copy().unwrap();
        assert_eq!(buf.used_blocks(), 4);
        assert_eq!(buf.size(), IVec3::new(2, 1, 2));
        assert_eq!(buf.source(), "level main");
        // marks were reverted
        assert_eq!(h.level.block(IVec3::ZERO), Some(block::STONE));
        assert!(h.log.is_empty());
    }

    #[tokio::test]
    async fn test_origin_corner_per_axis() {
        let mut h = Harness::new(100);
        let messages = h.copy(IVec3::new(3, 0, 0), IVec3::new(0, 1, 2)).await;
        assert_eq!(messages[0], "Copied 12 blocks, origin at (Max, Min, Min) corner");

        let messages = h.copy(IVec3::new(0, 0, 2), IVec3::new(1, 0, 0)).await;
        assert_eq!(messages[0], "Copied 6 blocks, origin at (Min, Min, Max) corner");
    }

    #[tokio::test]
    async fn test_quota_keeps_previous_buffer() {
        let mut h = Harness::new(4);
        h.copy(IVec3::ZERO, IVec3::new(1, 0, 1)).await;
        assert_eq!(h.session.state.current_copy().unwrap().used_blocks(), 4);

        let messages = h.copy(IVec3::ZERO, IVec3::new(4, 0, 0)).await;
        assert_eq!(messages, vec!["You tried to copy 5 blocks. You cannot copy more than 4 blocks."]);
        let buf = h.session.state.current_copy().unwrap();
        assert_eq!(buf.used_blocks(), 4);
        assert_eq!(buf.size(), IVec3::new(2, 1, 2));
        assert!(!h.session.selection().is_pending());
    }

    #[tokio::test]
    async fn test_cut_clears_region() {
        let mut h = Harness::new(100);
        h.run("/cut").await;
        h.click(IVec3::new(2, 0, 2));
        h.click(IVec3::new(3, 1, 3));

        assert_eq!(h.session.state.current_copy().unwrap().used_blocks(), 4);
        for pos in [IVec3::new(2, 0, 2), IVec3::new(3, 0, 3)] {
            assert_eq!(h.level.block(pos), Some(block::AIR));
        }
        assert_eq!(h.level.block(IVec3::new(4, 0, 4)), Some(block::STONE));
        assert_eq!(h.log.with_flags(ChangeFlags::CUT).count(), 4);
    }

    #[tokio::test]
    async fn test_third_mark_sets_offset() {
        let mut h = Harness::new(100);
        h.run("/copy @").await;
        assert!(h.click(IVec3::ZERO).is_empty());
        assert_eq!(h.click(IVec3::new(1, 0, 1)), vec!["Place a block to determine where to paste from"]);
        assert!(h.session.state.current_copy().is_none());

        let messages = h.click(IVec3::new(3, 2, 3));
        assert_eq!(messages.last().unwrap(), "Set offset of where to paste from.");
        let buf = h.session.state.current_copy().unwrap();
        assert_eq!(buf.offset(), IVec3::new(-3, -2, -3));
    }

    #[tokio::test]
    async fn test_air_modifier() {
        let mut h = Harness::new(100);
        h.run("/copy air").await;
        h.click(IVec3::ZERO);
        let messages = h.click(IVec3::new(1, 1, 1));
        assert_eq!(messages, vec!["Copied 8 blocks, origin at (Min, Min, Min) corner"]);
        assert!(h.session.state.current_copy().unwrap().paste_air());
    }

    #[tokio::test]
    async fn test_cancel_then_copy_again() {
        let mut h = Harness::new(100);
        h.run("/copy @").await;
        h.click(IVec3::ZERO);
        assert!(h.session.cancel_selection());

        let messages = h.copy(IVec3::new(5, 0, 5), IVec3::new(6, 0, 6)).await;
        assert_eq!(messages[0], "Copied 4 blocks, origin at (Min, Min, Min) corner");
        assert_eq!(h.session.state.current_copy().unwrap().offset(), IVec3::ZERO);
    }

    #[tokio::test]
    async fn test_save_load_delete_list() {
        let mut h = Harness::new(100);
        assert_eq!(h.run("/copy save house").await, vec!["You have not copied anything yet"]);
        assert_eq!(h.run("/copy list").await, vec!["No such directory exists"]);

        h.copy(IVec3::ZERO, IVec3::new(1, 0, 1)).await;
        assert_eq!(h.run("/copy save house").await, vec!["Saved copy as house"]);
        assert_eq!(h.run("/copy list").await, vec!["house"]);

        h.copy(IVec3::ZERO, IVec3::new(2, 0, 0)).await;
        assert_eq!(h.session.state.current_copy().unwrap().used_blocks(), 3);
        assert_eq!(h.run("/copy load house").await, vec!["Loaded copy from house"]);
        let buf = h.session.state.current_copy().unwrap();
        assert_eq!(buf.used_blocks(), 4);
        assert_eq!(buf.source(), "file house");

        assert_eq!(h.run("/copy delete house").await, vec!["Deleted copy house"]);
        assert_eq!(h.run("/copy load house").await, vec!["No such copy exists: house"]);
        // failed load leaves the buffer alone
        assert_eq!(h.session.state.current_copy().unwrap().source(), "file house");
        assert_eq!(h.run("/copy save ../x").await, vec!["\"../x\" is not a valid name for a saved copy"]);
    }

    #[tokio::test]
    async fn test_bad_legacy_load_keeps_current_buffer() {
        let mut h = Harness::new(100);
        h.copy(IVec3::ZERO, IVec3::new(1, 0, 1)).await;
        let before = h.session.state.current_copy().unwrap().blocks().to_vec();

        let dir = h.store.player_dir("alice").unwrap();
        std::fs::create_dir_all(&dir).unwrap();
        // header says 2x1x2 but only three voxels follow
        std::fs::write(dir.join("short.cpy"), legacy_bytes([2, 1, 2], IVec3::ZERO, 3, false, &[1, 1, 1]))
            .unwrap();

        assert_eq!(
            h.run("/copy load short").await,
            vec!["Saved copy is corrupt: header declares 4 blocks but 3 were stored"]
        );
        let buf = h.session.state.current_copy().unwrap();
        assert_eq!(buf.blocks(), before.as_slice());
        assert_eq!(buf.source(), "level main");
        assert_eq!(buf.used_blocks(), 4);
    }

    #[tokio::test]
    async fn test_help() {
        let mut h = Harness::new(100);
        assert_eq!(h.run("/copy sideways").await.len(), HELP.len());
        assert!(!h.session.selection().is_pending());
    }
}
