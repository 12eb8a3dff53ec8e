//! Rewrite command - normalize a record through the writer
//!
//! Parsing and writing back applies every normalization the reader knows:
//! canonical point names, HexGui swap-pieces repair and a fresh header.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexsgf_format::{write_sgf_with, WriterConfig, DEFAULT_LINE_WIDTH};

use crate::input::load_game;

#[derive(Args)]
pub struct RewriteArgs {
    /// Record to read
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination file (stdout when omitted)
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Wrap output lines at this column
    #[arg(long, default_value_t = DEFAULT_LINE_WIDTH)]
    pub width: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: RewriteArgs) -> Result<()> {
    let game = load_game(&args.input)?;
    if !game.warnings.is_empty() {
        tracing::warn!(
            "{}: {} warning(s) while reading",
            args.input.display(),
            game.warnings.len()
        );
    }

    let config = WriterConfig::default().with_line_width(args.width);

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_sgf_with(BufWriter::new(file), &game.tree, &game.info, &config)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(
                "Rewrote {} -> {} ({} nodes)",
                args.input.display(),
                path.display(),
                game.tree.node_count()
            );
        }
        None => {
            write_sgf_with(io::stdout().lock(), &game.tree, &game.info, &config)
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}
