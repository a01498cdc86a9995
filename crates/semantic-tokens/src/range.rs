//! Range extraction over encoded token data

use crate::{Range, TOKEN_STRIDE};

/// Extract the tokens intersecting `range` from encoded `data`.
///
/// Tokens straddling either end of the range are clipped to it, and tokens
/// left with no length are dropped. The result is a standalone encoding: its
/// first token carries an absolute line and column.
pub fn extract_range(data: &[u32], range: Range) -> Vec<u32> {
    debug_assert!(data.len() % TOKEN_STRIDE == 0, "malformed token data");

    let mut result = Vec::new();
    let mut line: u32 = 0;
    let mut start: u32 = 0;
    let mut last_emitted: Option<(u32, u32)> = None;

    for chunk in data.chunks_exact(TOKEN_STRIDE) {
        if chunk[0] > 0 {
            line += chunk[0];
            start = chunk[1];
        } else {
            start += chunk[1];
        }

        if line < range.start.line {
            continue;
        }
        if line > range.end.line || (line == range.end.line && start >= range.end.character) {
            break;
        }

        let mut clipped_start = start;
        let mut clipped_end = start.saturating_add(chunk[2]);
        if line == range.start.line {
            clipped_start = clipped_start.max(range.start.character);
        }
        if line == range.end.line {
            clipped_end = clipped_end.min(range.end.character);
        }
        if clipped_end <= clipped_start {
            continue;
        }

        let (delta_line, delta_start) = match last_emitted {
            None => (line, clipped_start),
            Some((prev_line, _)) if line > prev_line => (line - prev_line, clipped_start),
            Some((_, prev_start)) => (0, clipped_start - prev_start),
        };

        result.extend_from_slice(&[
            delta_line,
            delta_start,
            clipped_end - clipped_start,
            chunk[3],
            chunk[4],
        ]);
        last_emitted = Some((line, clipped_start));
    }

    result
}
