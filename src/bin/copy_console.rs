//! Interactive console for the copy tools.
//!
//! Plays one player on a flat in-memory level. Chat commands (`/copy`,
//! `/cut`, `/click`) go through the normal dispatcher; `place` and `break`
//! simulate block edits so selections can be made without a client.
//! Saved-copy I/O runs on a tokio runtime owned by the console.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use voxcopy::commands::{self, CommandSession};
use voxcopy::core::{logging, CopyConfig, IVec3};
use voxcopy::edit::ChangeLog;
use voxcopy::session::{BlockEdit, EditOutcome};
use voxcopy::store::BufferStore;
use voxcopy::world::{block, Level, Rank};

const DEFAULT_CONFIG: &str = "copy.json";
const DEFAULT_PLAYER: &str = "console";
const DEFAULT_SIZE: i32 = 64;
const DEFAULT_DRAW_LIMIT: u64 = 400_000;

#[derive(Debug)]
struct Args {
    config: PathBuf,
    player: String,
    size: i32,
    draw_limit: u64,
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);

    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut player = DEFAULT_PLAYER.to_string();
    let mut size = DEFAULT_SIZE;
    let mut draw_limit = DEFAULT_DRAW_LIMIT;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                if let Some(v) = args.next() {
                    config = PathBuf::from(v);
                }
            }
            "-p" | "--player" => {
                if let Some(v) = args.next() {
                    player = v;
                }
            }
            "-s" | "--size" => {
                if let Some(v) = args.next() {
                    size = v.parse().unwrap_or(DEFAULT_SIZE).max(1);
                }
            }
            "-l" | "--limit" => {
                if let Some(v) = args.next() {
                    draw_limit = v.parse().unwrap_or(DEFAULT_DRAW_LIMIT);
                }
            }
            "-h" | "--help" | "help" => {
                return Err("show_help".to_string());
            }
            other => {
                return Err(format!("unknown argument: {}", other));
            }
        }
    }

    Ok(Args {
        config,
        player,
        size,
        draw_limit,
    })
}

fn print_help() {
    println!("Copy Console");
    println!("============");
    println!();
    println!("Usage: copy_console [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <FILE>   Copy settings (default: copy.json)");
    println!("  -p, --player <NAME>   Player name (default: console)");
    println!("  -s, --size <N>        Level width and length (default: 64)");
    println!("  -l, --limit <N>       Draw limit of the player's rank (default: 400000)");
    println!();
    println!("Console commands:");
    println!("  place <x> <y> <z> [block]   Place a block (default stone)");
    println!("  break <x> <y> <z>           Break a block");
    println!("  /copy ..., /cut, /click ... Chat commands");
    println!("  quit                        Exit");
}

fn parse_pos(parts: &[&str]) -> Option<IVec3> {
    match parts {
        [x, y, z, ..] => Some(IVec3::new(x.parse().ok()?, y.parse().ok()?, z.parse().ok()?)),
        _ => None,
    }
}

fn main() {
    logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) if e == "show_help" => {
            print_help();
            return;
        }
        Err(e) => {
            eprintln!("{}", e);
            print_help();
            std::process::exit(2);
        }
    };

    let config = match CopyConfig::load_sync(&args.config) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to read {}: {}", args.config.display(), e);
            std::process::exit(1);
        }
    };
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("Failed to start tokio runtime: {}", e);
            std::process::exit(1);
        }
    };
    let store = BufferStore::from_config(&config);
    let mut level = Level::flat("console", args.size, 32, args.size, 4);
    let mut tracker = ChangeLog::new();
    let mut session = CommandSession::new(args.player, Rank::new("builder", args.draw_limit));

    log::info!(
        "{} on a {}x32x{} level, saves under {}",
        session.name(),
        args.size,
        args.size,
        store.root().display()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                log::error!("stdin read error: {}", e);
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        match parts[0] {
            "quit" | "exit" => break,
            "place" | "break" => {
                let Some(pos) = parse_pos(&parts[1..]) else {
                    let _ = writeln!(out, "usage: {} <x> <y> <z>", parts[0]);
                    continue;
                };
                let edit = if parts[0] == "break" {
                    BlockEdit::destroy(pos)
                } else {
                    let id = parts.get(4).and_then(|b| b.parse().ok()).unwrap_or(block::STONE);
                    BlockEdit::place(pos, id)
                };
                match session.handle_edit(&mut level, &mut tracker, edit) {
                    EditOutcome::Applied => {}
                    EditOutcome::Reverted { pos, .. } => {
                        let _ = writeln!(out, "(marked {} {} {})", pos.x, pos.y, pos.z);
                    }
                    EditOutcome::Denied => {
                        let _ = writeln!(out, "(edit refused)");
                    }
                }
            }
            _ => {
                let handled =
                    runtime.block_on(commands::dispatch(trimmed, &mut session, &mut level, &mut tracker, &store));
                if !handled {
                    let _ = writeln!(out, "Unknown command: {}", parts[0]);
                }
            }
        }

        for message in session.state.drain_messages() {
            if let Err(e) = writeln!(out, "{}", message) {
                log::error!("stdout write error: {}", e);
                return;
            }
        }
        let _ = out.flush();
    }

    log::info!("{} block changes this session", tracker.len());
}
