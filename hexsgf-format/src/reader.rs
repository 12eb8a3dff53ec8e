//! Game record reader
//!
//! Single pass over the token stream:
//!
//! ```text
//! GameTree ::= '(' Node ')'
//! Node     ::= ';' Property* (GameTree | Node)?
//! Property ::= Key Value+
//! ```
//!
//! Variations are followed with an explicit stack, so arbitrarily deep
//! records parse without recursion.
//!
//! Two value regimes exist. Comments (`C`) keep newlines and drop
//! backslash-newline pairs; every other value turns all whitespace into
//! spaces.
//!
//! Records written by HexGui 0.9 and earlier used "swap-pieces" where
//! "swap-sides" was meant. An `AP[HexGui:0.<digit>]` header switches on a
//! rewrite of that move value for the rest of the parse.

use std::io::Read;
use std::sync::OnceLock;

use hexsgf_core::tree::COMMENT_KEY;
use hexsgf_core::{
    parse_alphabet_number, GameInfo, GameTree, HexPoint, Move, NodeId, Player, Stone, MAX_HEIGHT,
    MAX_WIDTH,
};
use regex::Regex;

use crate::config::HEX_GAME_TYPE;
use crate::error::{ParseErrorKind, SgfError, SgfWarning};
use crate::lexer::{Token, Tokenizer};

/// A successfully parsed record
#[derive(Clone, Debug)]
pub struct SgfGame {
    pub tree: GameTree,
    pub info: GameInfo,
    pub warnings: Vec<SgfWarning>,
}

/// Read a record from a byte stream
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_sgf<R: Read>(mut input: R) -> Result<SgfGame, SgfError> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    parse_sgf(&String::from_utf8_lossy(&bytes))
}

/// Parse a record held in memory
pub fn parse_sgf(text: &str) -> Result<SgfGame, SgfError> {
    SgfReader::new(text).parse()
}

fn swap_bug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^HexGui:0\.[0-9](?:$|[^0-9])").unwrap())
}

/// True if `application` names a writer with the swap-pieces defect
pub fn has_swap_bug(application: &str) -> bool {
    swap_bug_pattern().is_match(application)
}

// ============================================================================
// READER STATE
// ============================================================================

struct SgfReader {
    tokens: Tokenizer,
    tree: GameTree,
    info: Option<GameInfo>,
    warnings: Vec<SgfWarning>,
    swap_bug: bool,
}

impl SgfReader {
    fn new(text: &str) -> Self {
        Self {
            tokens: Tokenizer::new(text),
            tree: GameTree::new(),
            info: None,
            warnings: Vec::new(),
            swap_bug: false,
        }
    }

    fn parse(mut self) -> Result<SgfGame, SgfError> {
        if !self.tokens.skip_to_tree() {
            return Err(self.error(ParseErrorKind::NoGameTree));
        }
        self.parse_game_tree()?;

        let Some(info) = self.info else {
            return Err(self.error(ParseErrorKind::MissingBoardSize));
        };
        tracing::trace!(
            nodes = self.tree.node_count(),
            warnings = self.warnings.len(),
            "parsed game tree"
        );
        Ok(SgfGame {
            tree: self.tree,
            info,
            warnings: self.warnings,
        })
    }

    fn error(&self, kind: ParseErrorKind) -> SgfError {
        SgfError::Parse {
            line: self.tokens.line(),
            kind,
        }
    }

    fn warn(&mut self, message: &str) {
        let line = self.tokens.line();
        tracing::warn!(line, "{}", message);
        self.warnings.push(SgfWarning {
            line,
            message: message.to_string(),
        });
    }

    // ========================================================================
    // STRUCTURE
    // ========================================================================

    /// Walk the whole game tree
    ///
    /// Nested variations are tracked on an explicit stack holding the node
    /// each variation branches from, so nesting depth is bounded by memory
    /// and not by the call stack. A `;` simply extends the current line.
    fn parse_game_tree(&mut self) -> Result<(), SgfError> {
        // skip_to_tree stops in front of the opening parenthesis
        self.tokens.next_token();
        self.expect_node_start()?;

        let root = self.tree.root();
        let mut current = root;
        let mut branches: Vec<NodeId> = Vec::new();

        loop {
            match self.tokens.next_token() {
                Token::TreeOpen => {
                    self.expect_node_start()?;
                    branches.push(current);
                    current = self.tree.push_child(current, None);
                }
                Token::NodeStart => current = self.tree.push_child(current, None),
                Token::TreeClose => match branches.pop() {
                    Some(branch) => current = branch,
                    None => return Ok(()),
                },
                Token::Word(name) => self.parse_property(current, &name, current == root)?,
                Token::Eof => return Err(self.error(ParseErrorKind::UnexpectedEof)),
                Token::ValueOpen => return Err(self.error(ParseErrorKind::UnexpectedChar('['))),
                Token::Other(c) => return Err(self.error(ParseErrorKind::UnexpectedChar(c))),
            }
        }
    }

    fn expect_node_start(&mut self) -> Result<(), SgfError> {
        if self.tokens.next_token() != Token::NodeStart {
            return Err(self.error(ParseErrorKind::BadNodeHead));
        }
        Ok(())
    }

    fn parse_property(&mut self, node: NodeId, name: &str, is_root: bool) -> Result<(), SgfError> {
        let mut values = 0;
        loop {
            let token = self.tokens.next_token();
            if token != Token::ValueOpen {
                self.tokens.push_back(token);
                break;
            }
            let value = if name == COMMENT_KEY {
                self.read_text(name)?
            } else {
                self.read_simple_text(name)?
            };
            self.apply_property(node, name, value, is_root)?;
            values += 1;
        }

        if values == 0 {
            return Err(self.error(ParseErrorKind::MissingValue(name.to_string())));
        }
        Ok(())
    }

    // ========================================================================
    // VALUES
    // ========================================================================

    /// Text regime, used for comments
    fn read_text(&mut self, name: &str) -> Result<String, SgfError> {
        let mut value = String::new();
        let mut quoted = false;
        loop {
            let Some(c) = self.tokens.next_raw() else {
                return Err(self.error(ParseErrorKind::UnterminatedValue(name.to_string())));
            };
            if quoted {
                quoted = false;
                if c == '\n' {
                    // Soft line break
                } else if c.is_whitespace() {
                    value.push(' ');
                } else {
                    value.push(c);
                }
            } else if c == ']' {
                return Ok(value);
            } else if c == '\\' {
                quoted = true;
            } else if c.is_whitespace() && c != '\n' {
                value.push(' ');
            } else {
                value.push(c);
            }
        }
    }

    /// SimpleText regime, used for everything but comments
    fn read_simple_text(&mut self, name: &str) -> Result<String, SgfError> {
        let mut value = String::new();
        let mut quoted = false;
        loop {
            let Some(c) = self.tokens.next_raw() else {
                return Err(self.error(ParseErrorKind::UnterminatedValue(name.to_string())));
            };
            if quoted {
                quoted = false;
                value.push(if c.is_whitespace() { ' ' } else { c });
            } else if c == ']' {
                return Ok(value);
            } else if c == '\\' {
                quoted = true;
            } else {
                value.push(if c.is_whitespace() { ' ' } else { c });
            }
        }
    }

    // ========================================================================
    // PROPERTY SEMANTICS
    // ========================================================================

    fn apply_property(
        &mut self,
        id: NodeId,
        name: &str,
        value: String,
        is_root: bool,
    ) -> Result<(), SgfError> {
        match name {
            "B" | "W" => {
                let player = if name == "B" { Player::Black } else { Player::White };
                let point = self.parse_move(&value)?;
                self.tree.get_mut(id).set_move(Some(Move::new(point, player)));
            }
            "AB" | "AW" | "AE" => {
                let stone = match name {
                    "AB" => Stone::Black,
                    "AW" => Stone::White,
                    _ => Stone::Empty,
                };
                let point = self.parse_point(&value)?;
                self.tree.get_mut(id).add_setup(stone, point);
            }
            "LB" => self.tree.get_mut(id).add_label(value),
            "FF" => {
                let version = self.parse_int(&value)?;
                self.tree.get_mut(id).set_property(name, value);
                if !(1..=4).contains(&version) {
                    return Err(self.error(ParseErrorKind::InvalidVersion(version)));
                }
            }
            "GM" => {
                if self.tree.get(id).property(name).is_some() {
                    self.warn("duplicate GM property in node");
                }
                if !is_root {
                    self.warn("GM property in non-root node");
                }
                let game = self.parse_int(&value)?;
                self.tree.get_mut(id).set_property(name, value);
                if game != HEX_GAME_TYPE {
                    return Err(self.error(ParseErrorKind::NotHexGame(game)));
                }
            }
            "SZ" => {
                if !is_root {
                    self.warn("SZ property in non-root node");
                }
                let info = self.parse_board_size(&value)?;
                self.tree.get_mut(id).set_property(name, value);
                self.info = Some(info);
            }
            "AP" => {
                if has_swap_bug(&value) {
                    tracing::debug!(application = %value, "enabling swap-pieces compatibility");
                    self.swap_bug = true;
                }
                self.tree.get_mut(id).set_property(name, value);
            }
            _ => self.tree.get_mut(id).set_property(name, value),
        }
        Ok(())
    }

    fn parse_int(&self, value: &str) -> Result<i64, SgfError> {
        value
            .parse()
            .map_err(|_| self.error(ParseErrorKind::InvalidInteger(value.to_string())))
    }

    /// "N" for a square board or "W:H"
    fn parse_board_size(&self, value: &str) -> Result<GameInfo, SgfError> {
        let parts: Vec<&str> = value.split(':').collect();
        let (width, height) = match parts.as_slice() {
            [size] => {
                let size = self.parse_int(size)?;
                (size, size)
            }
            [width, height] => (self.parse_int(width)?, self.parse_int(height)?),
            _ => return Err(self.error(ParseErrorKind::MalformedBoardSize(value.to_string()))),
        };

        let fits = |n: i64, max: usize| n >= 1 && n <= max as i64;
        if !fits(width, MAX_WIDTH) || !fits(height, MAX_HEIGHT) {
            return Err(self.error(ParseErrorKind::MalformedBoardSize(value.to_string())));
        }
        Ok(GameInfo::new(width as usize, height as usize))
    }

    // ========================================================================
    // POINTS AND MOVES
    // ========================================================================

    /// Move value: special names first, then coordinates
    fn parse_move(&self, value: &str) -> Result<HexPoint, SgfError> {
        let mut name = value.trim().to_lowercase();
        if self.swap_bug && name == "swap-pieces" {
            tracing::debug!("rewriting swap-pieces to swap-sides");
            name = "swap-sides".to_string();
        }
        if let Some(point) = HexPoint::by_name(&name) {
            return Ok(point);
        }
        self.parse_point(&name)
    }

    /// Coordinate value, never a special move
    ///
    /// Two letters are column and row, both 0-indexed ("aa" is a1).
    /// Otherwise letters give the column and a decimal number the 1-indexed
    /// row ("c4", "aa12").
    fn parse_point(&self, value: &str) -> Result<HexPoint, SgfError> {
        let name = value.trim().to_lowercase();
        parse_coordinates(&name)
            .ok_or_else(|| self.error(ParseErrorKind::InvalidPoint(name.clone())))
    }
}

fn parse_coordinates(name: &str) -> Option<HexPoint> {
    let bytes = name.as_bytes();
    if bytes.len() == 2 && bytes.iter().all(u8::is_ascii_lowercase) {
        let x = (bytes[0] - b'a') as i32;
        let y = (bytes[1] - b'a') as i32;
        return HexPoint::by_coords(x, y).ok();
    }

    let split = name.find(|c: char| !c.is_ascii_lowercase())?;
    let (letters, digits) = name.split_at(split);
    if letters.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let x = parse_alphabet_number(letters)? - 1;
    let y = digits.parse::<i32>().ok()? - 1;
    HexPoint::by_coords(x, y).ok()
}

// ============================================================================
// TESTS
// ============================================================================
