//! Versioned token store for one open document

use std::sync::Arc;

use uuid::Uuid;

use crate::builder::SemanticTokensBuilder;
use crate::delta::compute_edit;
use crate::legend::SemanticTokensLegend;
use crate::range::extract_range;
use crate::{Range, SemanticTokens, SemanticTokensDelta, SemanticTokensFullOrDelta, TOKEN_STRIDE};

/// Semantic tokens of one document.
///
/// Holds the last committed encoding and, while a delta request is being
/// served, the encoding the client already has.
#[derive(Debug, Clone)]
pub struct SemanticTokensDocument {
    legend: Arc<SemanticTokensLegend>,
    id: String,
    data: Vec<u32>,
    prev_data: Option<Vec<u32>>,
}

fn new_result_id() -> String {
    Uuid::new_v4().to_string()
}

impl SemanticTokensDocument {
    pub fn new(legend: SemanticTokensLegend) -> Self {
        Self::with_shared_legend(Arc::new(legend))
    }

    pub fn with_shared_legend(legend: Arc<SemanticTokensLegend>) -> Self {
        Self {
            legend,
            id: new_result_id(),
            data: Vec::new(),
            prev_data: None,
        }
    }

    pub fn legend(&self) -> &SemanticTokensLegend {
        &self.legend
    }

    /// Current result id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Last committed encoding
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    pub fn token_count(&self) -> usize {
        self.data.len() / TOKEN_STRIDE
    }

    /// Whether a diff base is held for the next [`get_edits`](Self::get_edits)
    pub fn has_previous(&self) -> bool {
        self.prev_data.is_some()
    }

    /// Start a complete re-tokenization
    pub fn create(&mut self) -> SemanticTokensBuilder<'_> {
        self.prev_data = None;
        self.id = new_result_id();
        tracing::debug!(document = %self.id, "Full semantic tokens encode");
        SemanticTokensBuilder::new(self)
    }

    /// Start a re-tokenization that will be answered as a delta against
    /// `previous_result_id`, if it is still the current result.
    pub fn edit(&mut self, previous_result_id: &str) -> SemanticTokensBuilder<'_> {
        if previous_result_id == self.id {
            self.prev_data = Some(self.data.clone());
            tracing::debug!(document = %self.id, "Captured semantic tokens diff base");
            SemanticTokensBuilder::new(self)
        } else {
            tracing::debug!(
                document = %self.id,
                previous_result_id,
                "Stale result id, falling back to full encode"
            );
            self.create()
        }
    }

    pub(crate) fn set_data(&mut self, data: Vec<u32>) {
        debug_assert!(data.len() % TOKEN_STRIDE == 0, "malformed token data");
        self.data = data;
    }

    /// Full snapshot
    pub fn get_tokens(&mut self) -> SemanticTokens {
        self.prev_data = None;
        SemanticTokens {
            result_id: self.id.clone(),
            data: self.data.clone(),
        }
    }

    /// Tokens intersecting `range`, clipped to it.
    ///
    /// Positions stay document-absolute: the first token's line and column are
    /// not rebased onto `range.start`.
    pub fn get_tokens_in_range(&mut self, range: Range) -> SemanticTokens {
        self.prev_data = None;
        SemanticTokens {
            result_id: self.id.clone(),
            data: extract_range(&self.data, range),
        }
    }

    /// Edit against the captured diff base, or a full snapshot without one
    pub fn get_edits(&mut self) -> SemanticTokensFullOrDelta {
        let Some(prev_data) = self.prev_data.as_deref() else {
            return SemanticTokensFullOrDelta::Full(self.get_tokens());
        };

        let edit = compute_edit(prev_data, &self.data);
        tracing::debug!(
            document = %self.id,
            start = edit.start,
            delete_count = edit.delete_count,
            inserted = edit.data.len(),
            "Semantic tokens delta"
        );

        SemanticTokensFullOrDelta::Delta(SemanticTokensDelta {
            result_id: self.id.clone(),
            edits: vec![edit],
        })
    }
}

impl Default for SemanticTokensDocument {
    fn default() -> Self {
        Self::new(SemanticTokensLegend::default())
    }
}
