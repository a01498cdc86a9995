//! # Foxkit Semantic Tokens
//!
//! Semantic token encoding for LSP.
//!
//! Tokens are pushed into a [`SemanticTokensBuilder`] in source order and
//! committed to a [`SemanticTokensDocument`], which answers full, range and
//! delta requests from the relative integer encoding:
//!
//! ```text
//! [deltaLine, deltaStart, length, tokenType, tokenModifiers] * n
//! ```

pub mod builder;
pub mod codec;
pub mod config;
pub mod delta;
pub mod document;
pub mod legend;
pub mod range;
pub mod store;

use serde::{Deserialize, Serialize};

pub use builder::SemanticTokensBuilder;
pub use codec::{apply_edits, decode_tokens, encode_tokens, AbsoluteToken, NamedToken};
pub use config::SemanticTokensConfig;
pub use delta::compute_edit;
pub use document::SemanticTokensDocument;
pub use legend::{SemanticTokenModifier, SemanticTokenType, SemanticTokensLegend};
pub use range::extract_range;
pub use store::{SemanticTokensEvent, SemanticTokensStore};

/// Number of integers per encoded token
pub const TOKEN_STRIDE: usize = 5;

/// Semantic tokens error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticTokensError {
    #[error("Invalid token range {start:?}..{end:?}: tokens must not span lines")]
    InvalidRange { start: Position, end: Position },

    #[error("Malformed token data: length {len} is not a multiple of 5")]
    MalformedData { len: usize },

    #[error("Token {index} position overflows u32")]
    PositionOverflow { index: usize },

    #[error("Edit out of bounds: start {start} + delete {delete_count} exceeds length {len}")]
    EditOutOfBounds {
        start: u32,
        delete_count: u32,
        len: usize,
    },

    #[error("Range requests are disabled")]
    RangeUnsupported,
}

pub type Result<T> = std::result::Result<T, SemanticTokensError>;

/// Position in document (zero-based)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Half-open range `[start, end)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range on a single line
    pub fn on_line(line: u32, start: u32, end: u32) -> Self {
        Self {
            start: Position::new(line, start),
            end: Position::new(line, end),
        }
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }
}

/// Full or range result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticTokens {
    /// Result ID for delta requests
    pub result_id: String,
    /// Encoded token data
    pub data: Vec<u32>,
}

impl SemanticTokens {
    pub fn token_count(&self) -> usize {
        self.data.len() / TOKEN_STRIDE
    }
}

/// Semantic tokens edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticTokensEdit {
    /// Start index
    pub start: u32,
    /// Number of elements to delete
    pub delete_count: u32,
    /// Elements to insert
    pub data: Vec<u32>,
}

impl SemanticTokensEdit {
    pub fn new(start: u32, delete_count: u32, data: Vec<u32>) -> Self {
        Self { start, delete_count, data }
    }

    /// Edit that changes nothing
    pub fn is_noop(&self) -> bool {
        self.delete_count == 0 && self.data.is_empty()
    }
}

/// Semantic tokens delta
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticTokensDelta {
    /// New result ID
    pub result_id: String,
    /// Edits to apply
    pub edits: Vec<SemanticTokensEdit>,
}

impl SemanticTokensDelta {
    pub fn has_changes(&self) -> bool {
        self.edits.iter().any(|edit| !edit.is_noop())
    }
}

/// Answer to a delta request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SemanticTokensFullOrDelta {
    /// No diff base was available
    Full(SemanticTokens),
    Delta(SemanticTokensDelta),
}

impl SemanticTokensFullOrDelta {
    pub fn result_id(&self) -> &str {
        match self {
            Self::Full(tokens) => &tokens.result_id,
            Self::Delta(delta) => &delta.result_id,
        }
    }

    pub fn is_delta(&self) -> bool {
        matches!(self, Self::Delta(_))
    }
}
