//! Per-document semantic tokens store

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;

use crate::builder::SemanticTokensBuilder;
use crate::config::SemanticTokensConfig;
use crate::document::SemanticTokensDocument;
use crate::legend::SemanticTokensLegend;
use crate::{Range, Result, SemanticTokens, SemanticTokensError, SemanticTokensFullOrDelta};

/// Semantic tokens event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticTokensEvent {
    Updated { uri: String, result_id: String },
    Closed { uri: String },
}

/// Owns one [`SemanticTokensDocument`] per open document.
///
/// Requests for the same document are serialised by that document's lock;
/// requests for different documents proceed independently.
pub struct SemanticTokensStore {
    /// Documents by URI
    documents: RwLock<HashMap<String, Arc<Mutex<SemanticTokensDocument>>>>,
    /// Token legend shared by every document
    legend: Arc<SemanticTokensLegend>,
    /// Events
    events: broadcast::Sender<SemanticTokensEvent>,
    /// Configuration
    config: SemanticTokensConfig,
}

impl SemanticTokensStore {
    pub fn new(config: SemanticTokensConfig) -> Self {
        let (events, _) = broadcast::channel(64);

        Self {
            documents: RwLock::new(HashMap::new()),
            legend: Arc::new(config.legend()),
            events,
            config,
        }
    }

    pub fn with_legend(legend: SemanticTokensLegend) -> Self {
        let mut store = Self::new(SemanticTokensConfig::default());
        store.legend = Arc::new(legend);
        store
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<SemanticTokensEvent> {
        self.events.subscribe()
    }

    pub fn legend(&self) -> &SemanticTokensLegend {
        &self.legend
    }

    pub fn config(&self) -> &SemanticTokensConfig {
        &self.config
    }

    /// Get or create the document for `uri`
    pub fn open(&self, uri: &str) -> Arc<Mutex<SemanticTokensDocument>> {
        if let Some(document) = self.documents.read().get(uri) {
            return Arc::clone(document);
        }

        let mut documents = self.documents.write();
        let document = documents.entry(uri.to_string()).or_insert_with(|| {
            tracing::debug!(uri, "Opened semantic tokens document");
            Arc::new(Mutex::new(SemanticTokensDocument::with_shared_legend(Arc::clone(
                &self.legend,
            ))))
        });
        Arc::clone(document)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.documents.read().contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Drop the document for `uri`
    pub fn close(&self, uri: &str) -> bool {
        let removed = self.documents.write().remove(uri).is_some();
        if removed {
            tracing::debug!(uri, "Closed semantic tokens document");
            let _ = self.events.send(SemanticTokensEvent::Closed { uri: uri.to_string() });
        }
        removed
    }

    /// Drop every document, emitting `Closed` for each
    pub fn clear(&self) {
        let closed: Vec<String> = self.documents.write().drain().map(|(uri, _)| uri).collect();
        for uri in closed {
            tracing::debug!(uri = %uri, "Closed semantic tokens document");
            let _ = self.events.send(SemanticTokensEvent::Closed { uri });
        }
    }

    /// Re-tokenize `uri` and return the full result.
    ///
    /// Returns `None` when full requests are disabled.
    pub fn full<F>(&self, uri: &str, tokenize: F) -> Result<Option<SemanticTokens>>
    where
        F: FnOnce(&mut SemanticTokensBuilder<'_>) -> Result<()>,
    {
        if !(self.config.enabled && self.config.full) {
            return Ok(None);
        }

        let document = self.open(uri);
        let mut document = document.lock();
        let mut builder = document.create();
        tokenize(&mut builder)?;
        let tokens = builder.commit().get_tokens();

        self.notify_updated(uri, &tokens.result_id);
        Ok(Some(tokens))
    }

    /// Re-tokenize `uri` and answer with an edit against
    /// `previous_result_id` when possible.
    pub fn full_delta<F>(
        &self,
        uri: &str,
        previous_result_id: &str,
        tokenize: F,
    ) -> Result<Option<SemanticTokensFullOrDelta>>
    where
        F: FnOnce(&mut SemanticTokensBuilder<'_>) -> Result<()>,
    {
        if !self.config.delta {
            tracing::debug!(uri, "Delta requests disabled, answering in full");
            return Ok(self.full(uri, tokenize)?.map(SemanticTokensFullOrDelta::Full));
        }
        if !self.config.enabled {
            return Ok(None);
        }

        let document = self.open(uri);
        let mut document = document.lock();
        let mut builder = document.edit(previous_result_id);
        tokenize(&mut builder)?;
        let result = builder.commit().get_edits();

        self.notify_updated(uri, result.result_id());
        Ok(Some(result))
    }

    /// Re-tokenize `uri` and return the tokens inside `range`.
    pub fn range<F>(&self, uri: &str, range: Range, tokenize: F) -> Result<Option<SemanticTokens>>
    where
        F: FnOnce(&mut SemanticTokensBuilder<'_>) -> Result<()>,
    {
        if !self.config.enabled {
            return Ok(None);
        }
        if !self.config.range {
            return Err(SemanticTokensError::RangeUnsupported);
        }

        let document = self.open(uri);
        let mut document = document.lock();
        let mut builder = document.create();
        tokenize(&mut builder)?;
        let tokens = builder.commit().get_tokens_in_range(range);

        self.notify_updated(uri, &tokens.result_id);
        Ok(Some(tokens))
    }

    fn notify_updated(&self, uri: &str, result_id: &str) {
        let _ = self.events.send(SemanticTokensEvent::Updated {
            uri: uri.to_string(),
            result_id: result_id.to_string(),
        });
    }
}

impl Default for SemanticTokensStore {
    fn default() -> Self {
        Self::new(SemanticTokensConfig::default())
    }
}
