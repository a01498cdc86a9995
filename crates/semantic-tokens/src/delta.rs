//! Single-edit diff between two encoded arrays

use crate::SemanticTokensEdit;

/// Length of the common prefix of `a` and `b`
fn common_prefix(a: &[u32], b: &[u32]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Length of the common suffix, never reaching into the first `skip` elements
fn common_suffix(a: &[u32], b: &[u32], skip: usize) -> usize {
    let max = a.len().min(b.len()) - skip;
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take(max)
        .take_while(|(x, y)| x == y)
        .count()
}

/// Compute the edit that turns `previous` into `current`.
///
/// The edit replaces the region between the longest common prefix and the
/// longest common suffix. Identical arrays produce a no-op edit at index 0.
pub fn compute_edit(previous: &[u32], current: &[u32]) -> SemanticTokensEdit {
    let prefix = common_prefix(previous, current);
    let suffix = common_suffix(previous, current, prefix);

    tracing::trace!(
        previous_len = previous.len(),
        current_len = current.len(),
        prefix,
        suffix,
        "Computed semantic tokens diff"
    );

    if prefix < current.len() && prefix < previous.len() {
        SemanticTokensEdit {
            start: prefix as u32,
            delete_count: (previous.len() - suffix - prefix) as u32,
            data: current[prefix..current.len() - suffix].to_vec(),
        }
    } else if prefix < current.len() {
        SemanticTokensEdit {
            start: prefix as u32,
            delete_count: 0,
            data: current[prefix..].to_vec(),
        }
    } else if prefix < previous.len() {
        SemanticTokensEdit {
            start: prefix as u32,
            delete_count: (previous.len() - prefix) as u32,
            data: Vec::new(),
        }
    } else {
        SemanticTokensEdit::default()
    }
}
