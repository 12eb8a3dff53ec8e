//! Parse errors and warnings

use std::fmt;

/// Fatal problems found while reading a game record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("no game tree found")]
    NoGameTree,

    #[error("missing ';' at head of node")]
    BadNodeHead,

    #[error("unexpected end of file in node")]
    UnexpectedEof,

    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("property {0} has no value")]
    MissingValue(String),

    #[error("property {0} runs to end of file")]
    UnterminatedValue(String),

    #[error("error parsing integer '{0}'")]
    InvalidInteger(String),

    #[error("invalid format version ({0})")]
    InvalidVersion(i64),

    #[error("not a Hex game (game type {0})")]
    NotHexGame(i64),

    #[error("malformed board size '{0}'")]
    MalformedBoardSize(String),

    #[error("missing SZ property")]
    MissingBoardSize,

    #[error("invalid point '{0}'")]
    InvalidPoint(String),
}

/// Error type for reading game records
#[derive(Debug, thiserror::Error)]
pub enum SgfError {
    #[error("line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },

    #[error("failed to read game record: {0}")]
    Io(#[from] std::io::Error),
}

impl SgfError {
    /// 1-based line of a parse failure
    pub fn line(&self) -> Option<usize> {
        match self {
            SgfError::Parse { line, .. } => Some(*line),
            SgfError::Io(_) => None,
        }
    }

    pub fn kind(&self) -> Option<&ParseErrorKind> {
        match self {
            SgfError::Parse { kind, .. } => Some(kind),
            SgfError::Io(_) => None,
        }
    }
}

/// A non-fatal anomaly, reported alongside the parsed tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SgfWarning {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for SgfWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}
