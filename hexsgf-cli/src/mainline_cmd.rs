//! Mainline command - print the main line of a record
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: collect_main_line(), report_main_line()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use hexsgf_core::{GameInfo, GameTree, Move, Player};

use crate::input::load_game;

#[derive(Args)]
pub struct MainlineArgs {
    /// Record to read
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Moves along the first-child path and who plays next
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct MainLine {
    board: GameInfo,
    moves: Vec<Move>,
    to_move: Player,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: MainlineArgs) -> Result<()> {
    let game = load_game(&args.input)?;
    let line = collect_main_line(&game.tree, game.info);

    tracing::info!("{}: {} move(s) on the main line", args.input.display(), line.moves.len());

    report_main_line(&line, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn collect_main_line(tree: &GameTree, board: GameInfo) -> MainLine {
    let nodes = tree.main_line();
    let moves = nodes.iter().filter_map(|&id| tree.get(id).mv()).collect();
    let last = nodes.last().copied().unwrap_or_else(|| tree.root());

    MainLine {
        board,
        moves,
        to_move: tree.player_to_move(last),
    }
}

fn report_main_line(line: &MainLine, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(line)?);
    } else {
        print!("{}", format_main_line(line));
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_main_line(line: &MainLine) -> String {
    let mut out = format!(
        "Board: {}x{}\n",
        line.board.board_width, line.board.board_height
    );
    for (i, mv) in line.moves.iter().enumerate() {
        out.push_str(&format!("{:>3}. {}\n", i + 1, mv));
    }
    out.push_str(&format!("To move: {}\n", line.to_move));
    out
}
