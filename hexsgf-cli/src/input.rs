//! Shared record loading

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use hexsgf_format::{read_sgf, SgfGame};

/// Open and parse a record
pub fn load_game(path: &Path) -> Result<SgfGame> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let game = read_sgf(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::debug!(
        "Loaded {}: {} nodes, board {}",
        path.display(),
        game.tree.node_count(),
        game.info.size_value()
    );
    Ok(game)
}
