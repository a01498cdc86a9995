//! Token encoder

use crate::document::SemanticTokensDocument;
use crate::legend::{SemanticTokenModifier, SemanticTokenType, SemanticTokensLegend};
use crate::{Range, Result, SemanticTokensError, TOKEN_STRIDE};

/// Accumulates tokens for one document and encodes them relative to the
/// previously pushed token.
///
/// Tokens must be pushed in ascending `(line, start)` order. A builder is
/// obtained from [`SemanticTokensDocument::create`] or
/// [`SemanticTokensDocument::edit`] and consumed by [`commit`](Self::commit).
pub struct SemanticTokensBuilder<'a> {
    document: &'a mut SemanticTokensDocument,
    data: Vec<u32>,
    prev_line: u32,
    prev_char: u32,
}

impl<'a> SemanticTokensBuilder<'a> {
    pub(crate) fn new(document: &'a mut SemanticTokensDocument) -> Self {
        Self {
            document,
            data: Vec::new(),
            prev_line: 0,
            prev_char: 0,
        }
    }

    pub fn legend(&self) -> &SemanticTokensLegend {
        self.document.legend()
    }

    /// Number of tokens pushed so far
    pub fn len(&self) -> usize {
        self.data.len() / TOKEN_STRIDE
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Push a token with a resolved type id and modifier mask
    pub fn push(
        &mut self,
        line: u32,
        start_char: u32,
        length: u32,
        token_type: u32,
        token_modifiers: u32,
    ) {
        debug_assert!(
            self.is_empty() || (line, start_char) >= (self.prev_line, self.prev_char),
            "tokens pushed out of order: ({line}, {start_char}) after ({}, {})",
            self.prev_line,
            self.prev_char,
        );

        let (delta_line, delta_char) = if self.is_empty() {
            (line, start_char)
        } else {
            let delta_line = line.wrapping_sub(self.prev_line);
            let delta_char = if delta_line == 0 {
                start_char.wrapping_sub(self.prev_char)
            } else {
                start_char
            };
            (delta_line, delta_char)
        };

        self.data.extend_from_slice(&[
            delta_line,
            delta_char,
            length,
            token_type,
            token_modifiers,
        ]);

        self.prev_line = line;
        self.prev_char = start_char;
    }

    /// Push a token, resolving its type and modifiers through the legend
    pub fn push_token(
        &mut self,
        line: u32,
        start_char: u32,
        length: u32,
        token_type: Option<&SemanticTokenType>,
        modifiers: &[SemanticTokenModifier],
    ) {
        let legend = self.document.legend();
        let type_id = legend.token_type_id(token_type);
        let mask = legend.modifier_mask(modifiers);
        self.push(line, start_char, length, type_id, mask);
    }

    /// Push a token given by name
    pub fn push_named<I>(
        &mut self,
        line: u32,
        start_char: u32,
        length: u32,
        token_type: &str,
        modifiers: I,
    )
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let legend = self.document.legend();
        let type_id = legend.type_id(token_type);
        let mask = legend.modifier_mask(modifiers);
        self.push(line, start_char, length, type_id, mask);
    }

    /// Push a token covering `range`, which must lie on one line
    pub fn push_range(
        &mut self,
        range: Range,
        token_type: Option<&SemanticTokenType>,
        modifiers: &[SemanticTokenModifier],
    ) -> Result<()> {
        let length = single_line_length(range)?;
        self.push_token(range.start.line, range.start.character, length, token_type, modifiers);
        Ok(())
    }

    /// Push a token covering `range` with a resolved type id and modifier mask
    pub fn push_range_encoded(
        &mut self,
        range: Range,
        token_type: u32,
        token_modifiers: u32,
    ) -> Result<()> {
        let length = single_line_length(range)?;
        self.push(range.start.line, range.start.character, length, token_type, token_modifiers);
        Ok(())
    }

    /// Hand the encoded tokens to the document
    pub fn commit(self) -> &'a mut SemanticTokensDocument {
        let token_count = self.len();
        tracing::debug!(
            document = self.document.id(),
            token_count,
            "Committing semantic tokens"
        );
        self.document.set_data(self.data);
        self.document
    }
}

fn single_line_length(range: Range) -> Result<u32> {
    if !range.is_single_line() || range.end.character < range.start.character {
        return Err(SemanticTokensError::InvalidRange {
            start: range.start,
            end: range.end,
        });
    }
    Ok(range.end.character - range.start.character)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn document() -> SemanticTokensDocument {
        SemanticTokensDocument::new(SemanticTokensLegend::from_names(
            ["keyword", "function", "variable"],
            ["declaration", "static"],
        ))
    }

    #[test]
    fn test_first_token_is_absolute() {
        let mut doc = document();
        let mut builder = doc.create();
        builder.push(3, 7, 2, 1, 0);
        builder.commit();

        assert_eq!(doc.data(), &[3, 7, 2, 1, 0]);
    }

    #[test]
    fn test_relative_encoding() {
        let mut doc = document();
        let mut builder = doc.create();
        builder.push(0, 0, 3, 0, 0);
        builder.push(0, 4, 5, 1, 1);
        builder.push(2, 8, 1, 2, 0);
        builder.push(2, 10, 4, 2, 2);
        assert_eq!(builder.len(), 4);
        builder.commit();

        assert_eq!(
            doc.data(),
            &[
                0, 0, 3, 0, 0, //
                0, 4, 5, 1, 1, //
                2, 8, 1, 2, 0, //
                0, 2, 4, 2, 2,
            ]
        );
    }

    #[test]
    fn test_push_named_resolves_through_legend() {
        let mut doc = document();
        let mut builder = doc.create();
        builder.push_named(0, 0, 2, "function", ["static", "declaration"]);
        builder.push_named(0, 5, 2, "no-such-type", ["bogus"]);
        builder.push_token(
            1,
            0,
            3,
            Some(&SemanticTokenType::VARIABLE),
            &[SemanticTokenModifier::STATIC],
        );
        builder.commit();

        assert_eq!(
            doc.data(),
            &[
                0, 0, 2, 1, 0b11, //
                0, 5, 2, 0, 0, //
                1, 0, 3, 2, 0b10,
            ]
        );
    }

    #[test]
    fn test_push_range() {
        let mut doc = document();
        let mut builder = doc.create();
        builder
            .push_range(Range::on_line(4, 2, 9), Some(&SemanticTokenType::KEYWORD), &[])
            .unwrap();
        builder.push_range_encoded(Range::on_line(4, 10, 11), 2, 1).unwrap();
        builder.commit();

        assert_eq!(doc.data(), &[4, 2, 7, 0, 0, 0, 8, 1, 2, 1]);
    }

    #[test]
    fn test_push_range_rejects_multiline() {
        let mut doc = document();
        let mut builder = doc.create();
        let range = Range::new(Position::new(1, 4), Position::new(2, 0));

        let err = builder.push_range(range, None, &[]).unwrap_err();
        assert_eq!(
            err,
            SemanticTokensError::InvalidRange {
                start: range.start,
                end: range.end
            }
        );
        assert!(builder.is_empty());
    }

    #[test]
    fn test_push_range_rejects_reversed() {
        let mut doc = document();
        let mut builder = doc.create();

        assert!(builder.push_range_encoded(Range::on_line(0, 5, 2), 0, 0).is_err());
    }

    #[test]
    fn test_commit_empty() {
        let mut doc = document();
        doc.create().commit();

        assert!(doc.data().is_empty());
    }
}
