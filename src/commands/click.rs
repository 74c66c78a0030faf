//! `/click`: fake a block placement, usually to feed a pending selection.

use crate::core::types::IVec3;
use crate::edit::ChangeTracker;
use crate::session::BlockEdit;
use crate::world::{block, World};

use super::CommandSession;

const HELP: &[&str] = &[
    "/click [x y z] - Fakes a click",
    "If no xyz is given, it uses the last place clicked",
    "/click 200 y 200 will cause it to click at 200x, last y and 200z",
];

/// Parsed `/click` arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickCommand {
    At(IVec3),
    /// An argument that is neither a placeholder nor a coordinate inside the level.
    Invalid(String),
    Help,
}

impl ClickCommand {
    /// Parse `[x y z]`. Each argument is a coordinate or one of the
    /// placeholders `x`, `y`, `z`, which keep that axis of `last`.
    pub fn parse(args: &str, last: IVec3, dims: IVec3) -> Self {
        let parts: Vec<&str> = args.split_whitespace().collect();
        if parts.is_empty() {
            return ClickCommand::At(last);
        }
        if parts.len() != 3 {
            return ClickCommand::Help;
        }

        let mut target = last;
        for (axis, part) in parts.iter().enumerate() {
            let lower = part.to_ascii_lowercase();
            if matches!(lower.as_str(), "x" | "y" | "z") {
                continue;
            }
            match part.parse::<u16>() {
                Ok(value) if i32::from(value) < dims[axis] => target[axis] = i32::from(value),
                _ => return ClickCommand::Invalid(part.to_string()),
            }
        }
        ClickCommand::At(target)
    }
}

/// Run `/click` as a stone placement through the normal edit path.
pub fn execute(
    command: ClickCommand,
    session: &mut CommandSession,
    world: &mut dyn World,
    tracker: &mut dyn ChangeTracker,
) {
    match command {
        ClickCommand::At(pos) => {
            session.handle_edit(world, tracker, BlockEdit::place(pos, block::STONE));
            session.state.message(format!("Clicked ({}, {}, {})", pos.x, pos.y, pos.z));
        }
        ClickCommand::Invalid(arg) => session.state.message(format!("\"{}\" was not valid", arg)),
        ClickCommand::Help => {
            for line in HELP {
                session.state.message(*line);
            }
        }
    }
}
