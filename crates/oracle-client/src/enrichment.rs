//! Best-effort taste enrichment.
//!
//! Runs the configured tagger over every input and pools the tags. Errors are
//! logged and skipped; nothing here can fail the request.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use catalog::{TasteInput, normalize_name};
use futures::{StreamExt, stream};
use tracing::{debug, info, warn};

use crate::tagger::TasteTagger;

/// Most tagging calls in flight for one request
pub const MAX_CONCURRENT_TAGS: usize = 4;

/// Pools tags from a [`TasteTagger`] across all inputs of a request.
///
/// Built without a tagger when no credential is configured, in which case
/// enrichment is skipped entirely.
#[derive(Clone, Default)]
pub struct Enricher {
    tagger: Option<Arc<dyn TasteTagger>>,
}

impl Enricher {
    pub fn new(tagger: Arc<dyn TasteTagger>) -> Self {
        Self {
            tagger: Some(tagger),
        }
    }

    /// An enricher that never calls out and always yields no tags.
    pub fn disabled() -> Self {
        Self { tagger: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.tagger.is_some()
    }

    /// Fetch tags for every input and return them deduplicated and sorted.
    ///
    /// Inputs that normalize to the same name are looked up once. At most
    /// [`MAX_CONCURRENT_TAGS`] calls run at a time. A failure on one input is
    /// logged at warn level and does not affect the others.
    pub async fn enrich(&self, inputs: &[TasteInput]) -> Vec<String> {
        let Some(tagger) = &self.tagger else {
            debug!("Enrichment disabled, skipping tag lookup");
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let unique: Vec<&TasteInput> = inputs
            .iter()
            .filter(|input| {
                let key = normalize_name(&input.name);
                !key.is_empty() && seen.insert(key)
            })
            .collect();
        debug!(inputs = inputs.len(), unique = unique.len(), "Looking up taste tags");

        let lookups: Vec<_> = unique
            .into_iter()
            .map(|input| async move { (input, tagger.tags_for(input).await) })
            .collect();
        let outcomes: Vec<_> = stream::iter(lookups)
            .buffer_unordered(MAX_CONCURRENT_TAGS)
            .collect()
            .await;

        let mut pooled = BTreeSet::new();
        for (input, outcome) in outcomes {
            match outcome {
                Ok(tags) => pooled.extend(tags),
                Err(e) => warn!(
                    tagger = tagger.name(),
                    name = %input.name,
                    "Taste enrichment failed for input: {e}"
                ),
            }
        }

        info!(
            inputs = inputs.len(),
            tags = pooled.len(),
            "Taste enrichment complete"
        );
        pooled.into_iter().collect()
    }
}

impl std::fmt::Debug for Enricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enricher")
            .field("tagger", &self.tagger.as_ref().map(|t| t.name().to_string()))
            .finish()
    }
}
