//! Colors and moves

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::point::HexPoint;

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Property key used for this player's moves ("B" or "W")
    pub fn sgf_key(self) -> &'static str {
        match self {
            Player::Black => "B",
            Player::White => "W",
        }
    }

    pub fn from_sgf_key(key: &str) -> Option<Self> {
        match key {
            "B" => Some(Player::Black),
            "W" => Some(Player::White),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => f.write_str("black"),
            Player::White => f.write_str("white"),
        }
    }
}

/// Setup placement color
///
/// `Empty` marks a point explicitly cleared by a setup node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stone {
    Black,
    White,
    Empty,
}

impl Stone {
    /// Setup property key ("AB", "AW" or "AE")
    pub fn setup_key(self) -> &'static str {
        match self {
            Stone::Black => "AB",
            Stone::White => "AW",
            Stone::Empty => "AE",
        }
    }
}

impl From<Player> for Stone {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Stone::Black,
            Player::White => Stone::White,
        }
    }
}

/// A point played by one player
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    point: HexPoint,
    player: Player,
}

impl Move {
    pub fn new(point: HexPoint, player: Player) -> Self {
        Self { point, player }
    }

    pub fn point(&self) -> HexPoint {
        self.point
    }

    pub fn player(&self) -> Player {
        self.player
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.player.sgf_key(), self.point)
    }
}
