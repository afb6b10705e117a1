//! Knowledge fetcher — turns recent evaluation records into the text
//! block the composer injects into the prompt.
//!
//! Every turn re-queries the store; there is no caching. Any store
//! failure (unreachable, missing index) fails soft: the turn proceeds
//! with an empty knowledge block and a local warning.

use std::sync::Arc;
use tracing::{debug, warn};
use unihelp_core::evaluation::{EvaluationQuery, EvaluationRecord, SearchFilters};
use unihelp_core::store::DocumentStore;

/// The rendered digest of recently stored evaluation records.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBlock {
    /// One line per record, fixed template, identifier first.
    pub text: String,

    /// The records behind the text, in the same order.
    pub records: Vec<EvaluationRecord>,

    /// Set when the store query failed and the block is empty because of
    /// it (rather than because nothing matched).
    pub degraded: bool,
}

impl KnowledgeBlock {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Fetches and renders the knowledge block for one turn.
pub struct KnowledgeFetcher {
    store: Arc<dyn DocumentStore>,
    limit: usize,
}

impl KnowledgeFetcher {
    pub fn new(store: Arc<dyn DocumentStore>, limit: usize) -> Self {
        Self { store, limit }
    }

    /// Fetch the most recent matching evaluations and render them.
    ///
    /// Infallible by contract: a store failure degrades to an empty block
    /// and never aborts the user's turn.
    pub async fn fetch(&self, filters: &SearchFilters) -> KnowledgeBlock {
        let query = EvaluationQuery::new(filters.clone()).with_limit(self.limit);

        let records = match self.store.recent_evaluations(&query).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Knowledge query failed; continuing without knowledge block");
                return KnowledgeBlock {
                    degraded: true,
                    ..Default::default()
                };
            }
        };

        debug!(count = records.len(), "Knowledge records fetched");

        let text = records
            .iter()
            .map(render_record)
            .collect::<Vec<_>>()
            .join("\n");

        KnowledgeBlock {
            text,
            records,
            degraded: false,
        }
    }
}

/// Render one record in the fixed template downstream parsing relies on:
/// identifier, free-text opinion, subject, instructor — in that order.
fn render_record(record: &EvaluationRecord) -> String {
    format!(
        "[ID:{}] \"{}\" (subject: {}, instructor: {})",
        record.id, record.free_text, record.subject, record.instructor
    )
}
