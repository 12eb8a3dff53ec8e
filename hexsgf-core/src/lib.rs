//! HEXSGF Core - Points, moves and game trees for Hex records
//!
//! This crate provides the data model behind the game-record format:
//! - Point addressing (cells, board edges, special moves) with stable names
//! - Player colors, setup stones and moves
//! - Board dimensions
//! - Arena-allocated game tree with navigation and player-to-move rules

pub mod alphabet;
pub mod point;
pub mod moves;
pub mod game_info;
pub mod tree;

// Re-exports for convenient access
pub use alphabet::{alphabet_number, parse_alphabet_number};
pub use point::{HexPoint, PointError, points_to_string, MAX_WIDTH, MAX_HEIGHT, MAX_POINTS};
pub use moves::{Move, Player, Stone};
pub use game_info::GameInfo;
pub use tree::{GameTree, Node, NodeId, TreeError};
