//! Property-based tests for token encoding
//!
//! - decoding a committed encoding reproduces the pushed tokens
//! - range extraction keeps exactly the clipped tokens inside the range
//! - a computed edit turns the previous encoding into the current one

use proptest::prelude::*;
use semantic_tokens::{
    apply_edits, compute_edit, decode_tokens, extract_range, AbsoluteToken, Position, Range,
    SemanticTokensDocument, SemanticTokensFullOrDelta, SemanticTokensLegend,
};

/// Generate tokens in ascending, non-overlapping order
fn tokens_strategy() -> impl Strategy<Value = Vec<AbsoluteToken>> {
    prop::collection::vec((0u32..3, 0u32..6, 1u32..8, 0u32..6, 0u32..16), 0..40).prop_map(|raw| {
        let mut tokens = Vec::with_capacity(raw.len());
        let mut line = 0;
        let mut next_free = 0;
        for (line_gap, col_gap, length, token_type, modifiers) in raw {
            let start = if line_gap > 0 {
                line += line_gap;
                col_gap
            } else {
                next_free + col_gap
            };
            next_free = start + length;
            tokens.push(AbsoluteToken::new(line, start, length, token_type, modifiers));
        }
        tokens
    })
}

fn range_strategy() -> impl Strategy<Value = Range> {
    (0u32..40, 0u32..30, 0u32..10, 0u32..30).prop_map(|(line, character, span, end_character)| {
        Range::new(
            Position::new(line, character),
            Position::new(line + span, end_character),
        )
    })
}

fn commit(doc: &mut SemanticTokensDocument, tokens: &[AbsoluteToken]) -> Vec<u32> {
    let mut builder = doc.create();
    for t in tokens {
        builder.push(t.line, t.start, t.length, t.token_type, t.token_modifiers);
    }
    builder.commit().data().to_vec()
}

/// Clip each token to the range, straight from absolute positions
fn clip_expected(tokens: &[AbsoluteToken], range: Range) -> Vec<AbsoluteToken> {
    tokens
        .iter()
        .filter(|t| t.line >= range.start.line && t.line <= range.end.line)
        .filter_map(|t| {
            let mut start = t.start;
            let mut end = t.end();
            if t.line == range.start.line {
                start = start.max(range.start.character);
            }
            if t.line == range.end.line {
                end = end.min(range.end.character);
            }
            (end > start).then(|| {
                AbsoluteToken::new(t.line, start, end - start, t.token_type, t.token_modifiers)
            })
        })
        .collect()
}

proptest! {
    #[test]
    fn decode_reproduces_pushed_tokens(tokens in tokens_strategy()) {
        let mut doc = SemanticTokensDocument::new(SemanticTokensLegend::default());
        let data = commit(&mut doc, &tokens);

        prop_assert_eq!(data.len(), tokens.len() * 5);
        prop_assert_eq!(decode_tokens(&data).unwrap(), tokens);
    }

    #[test]
    fn range_keeps_exactly_the_clipped_tokens(
        tokens in tokens_strategy(),
        range in range_strategy(),
    ) {
        let mut doc = SemanticTokensDocument::new(SemanticTokensLegend::default());
        let data = commit(&mut doc, &tokens);

        let extracted = decode_tokens(&extract_range(&data, range)).unwrap();
        for token in &extracted {
            prop_assert!(range.contains(Position::new(token.line, token.start)));
            prop_assert!(token.length > 0);
            if token.line == range.end.line {
                prop_assert!(token.end() <= range.end.character);
            }
        }
        prop_assert_eq!(extracted, clip_expected(&tokens, range));
    }

    #[test]
    fn edit_transforms_previous_into_current(
        previous in tokens_strategy(),
        current in tokens_strategy(),
    ) {
        let mut doc = SemanticTokensDocument::new(SemanticTokensLegend::default());
        let previous_data = commit(&mut doc, &previous);
        let id = doc.id().to_string();

        let mut builder = doc.edit(&id);
        for t in &current {
            builder.push(t.line, t.start, t.length, t.token_type, t.token_modifiers);
        }
        let result = builder.commit().get_edits();

        let SemanticTokensFullOrDelta::Delta(delta) = result else {
            return Err(TestCaseError::fail("expected a delta"));
        };
        prop_assert_eq!(delta.edits.len(), 1);

        let mut patched = previous_data.clone();
        apply_edits(&mut patched, &delta.edits).unwrap();
        prop_assert_eq!(&patched, doc.data());

        let edit = &delta.edits[0];
        prop_assert!(edit.delete_count as usize <= previous_data.len());
        prop_assert_eq!(edit, &compute_edit(&previous_data, doc.data()));
    }
}
