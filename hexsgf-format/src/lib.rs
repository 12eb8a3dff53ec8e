//! HEXSGF Format - Reading and writing Hex game records
//!
//! The record syntax is the SGF tree notation with Hex-specific property
//! rules (game type 11, `SZ[N]` or `SZ[W:H]`, named special moves).
//!
//! ## Usage
//!
//! ```
//! use hexsgf_format::{parse_sgf, to_sgf_string, WriterConfig};
//!
//! let game = parse_sgf("(;FF[4]GM[11]SZ[5];B[c3];W[swap-sides])").unwrap();
//! assert_eq!(game.tree.node_count(), 3);
//!
//! let text = to_sgf_string(&game.tree, &game.info, &WriterConfig::default());
//! assert!(text.ends_with(";B[c3];W[swap-sides])\n"));
//! ```

pub mod config;
pub mod error;
pub mod lexer;
pub mod reader;
pub mod writer;

pub use config::{WriterConfig, DEFAULT_LINE_WIDTH, FORMAT_VERSION, HEX_GAME_TYPE};
pub use error::{ParseErrorKind, SgfError, SgfWarning};
pub use reader::{has_swap_bug, parse_sgf, read_sgf, SgfGame};
pub use writer::{to_sgf_string, write_sgf, write_sgf_with};
