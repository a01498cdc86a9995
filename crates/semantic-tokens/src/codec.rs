//! Decoding and re-encoding of token arrays

use crate::legend::SemanticTokensLegend;
use crate::{Result, SemanticTokensEdit, SemanticTokensError, TOKEN_STRIDE};

/// Token with absolute position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AbsoluteToken {
    pub line: u32,
    pub start: u32,
    pub length: u32,
    pub token_type: u32,
    pub token_modifiers: u32,
}

impl AbsoluteToken {
    pub fn new(line: u32, start: u32, length: u32, token_type: u32, token_modifiers: u32) -> Self {
        Self {
            line,
            start,
            length,
            token_type,
            token_modifiers,
        }
    }

    pub fn end(&self) -> u32 {
        self.start.saturating_add(self.length)
    }

    /// Resolve type and modifier names through a legend
    pub fn named(&self, legend: &SemanticTokensLegend) -> NamedToken {
        NamedToken {
            line: self.line,
            start: self.start,
            length: self.length,
            token_type: legend
                .token_type_name(self.token_type)
                .unwrap_or("unknown")
                .to_string(),
            modifiers: legend
                .modifier_names(self.token_modifiers)
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Decoded token with legend names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedToken {
    pub line: u32,
    pub start: u32,
    pub length: u32,
    pub token_type: String,
    pub modifiers: Vec<String>,
}

pub(crate) fn check_stride(data: &[u32]) -> Result<()> {
    if data.len() % TOKEN_STRIDE != 0 {
        return Err(SemanticTokensError::MalformedData { len: data.len() });
    }
    Ok(())
}

/// Undo the relative encoding
pub fn decode_tokens(data: &[u32]) -> Result<Vec<AbsoluteToken>> {
    check_stride(data)?;

    let mut tokens = Vec::with_capacity(data.len() / TOKEN_STRIDE);
    let mut line: u32 = 0;
    let mut start: u32 = 0;

    for (index, chunk) in data.chunks_exact(TOKEN_STRIDE).enumerate() {
        let position = if chunk[0] > 0 {
            line.checked_add(chunk[0]).map(|line| (line, chunk[1]))
        } else {
            start.checked_add(chunk[1]).map(|start| (line, start))
        };
        (line, start) = position.ok_or(SemanticTokensError::PositionOverflow { index })?;

        tokens.push(AbsoluteToken::new(line, start, chunk[2], chunk[3], chunk[4]));
    }

    Ok(tokens)
}

/// Encode tokens sorted by position.
///
/// Unsorted input is not detected; its deltas wrap like the builder's.
pub fn encode_tokens(tokens: &[AbsoluteToken]) -> Vec<u32> {
    let mut data = Vec::with_capacity(tokens.len() * TOKEN_STRIDE);
    let mut prev_line: u32 = 0;
    let mut prev_start: u32 = 0;

    for token in tokens {
        let delta_line = token.line.wrapping_sub(prev_line);
        let delta_start = if delta_line > 0 {
            token.start
        } else {
            token.start.wrapping_sub(prev_start)
        };

        data.extend_from_slice(&[
            delta_line,
            delta_start,
            token.length,
            token.token_type,
            token.token_modifiers,
        ]);

        prev_line = token.line;
        prev_start = token.start;
    }

    data
}

/// Apply delta edits to a previously received array, in order.
///
/// `data` is left untouched when an error is returned.
pub fn apply_edits(data: &mut Vec<u32>, edits: &[SemanticTokensEdit]) -> Result<()> {
    let mut patched = data.clone();
    for edit in edits {
        let start = edit.start as usize;
        let end = start + edit.delete_count as usize;
        if end > patched.len() {
            return Err(SemanticTokensError::EditOutOfBounds {
                start: edit.start,
                delete_count: edit.delete_count,
                len: patched.len(),
            });
        }

        patched.splice(start..end, edit.data.iter().copied());
    }

    check_stride(&patched)?;
    *data = patched;
    Ok(())
}
