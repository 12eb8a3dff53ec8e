//! Board dimensions shared by a parsed game

use serde::{Deserialize, Serialize};

use crate::point::DEFAULT_SIZE;

/// Board width and height
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub board_width: usize,
    pub board_height: usize,
}

impl GameInfo {
    pub fn new(board_width: usize, board_height: usize) -> Self {
        Self {
            board_width,
            board_height,
        }
    }

    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    pub fn is_square(&self) -> bool {
        self.board_width == self.board_height
    }

    /// Size declaration as written in a game record: "N" or "W:H"
    pub fn size_value(&self) -> String {
        if self.is_square() {
            self.board_width.to_string()
        } else {
            format!("{}:{}", self.board_width, self.board_height)
        }
    }
}

impl Default for GameInfo {
    fn default() -> Self {
        Self::square(DEFAULT_SIZE)
    }
}
