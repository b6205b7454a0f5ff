//! The Sign Selection Engine.
//!
//! ## Algorithm
//! 1. Build one prompt from the catalog, the inputs and the enrichment tags
//! 2. Call the generative service once (no retry)
//! 3. Strip any code fence and decode the three-field reply
//! 4. Resolve `chosen_sign_name` by exact match against the catalog
//!
//! The three possible endings are returned as [`SelectionOutcome`] rather
//! than through error propagation, so the caller decides what each means.

use std::sync::Arc;

use catalog::{Catalog, ResultRecord, SignRecord, TasteInput, TasteTwin};
use oracle_client::{GenerationError, TextGenerator};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::fallback::oracle_choice_reading;
use crate::prompt::build_prompt;
use crate::reply::{OracleReply, parse_reply};

/// Most tags kept on a reading built from enrichment data
const MAX_TASTE_TAGS: usize = 7;

/// How a selection attempt ended.
#[derive(Debug)]
pub enum SelectionOutcome {
    /// The model picked a catalog sign.
    Chosen(ResultRecord),
    /// The reply decoded but named no catalog sign; a random sign carries the
    /// model's text.
    NameMiss {
        requested: String,
        result: ResultRecord,
    },
    /// The call or the decode failed. The caller must fall back.
    Failed(GenerationError),
}

impl SelectionOutcome {
    /// The reading, unless generation failed.
    pub fn into_result(self) -> Option<ResultRecord> {
        match self {
            SelectionOutcome::Chosen(result) | SelectionOutcome::NameMiss { result, .. } => {
                Some(result)
            }
            SelectionOutcome::Failed(_) => None,
        }
    }
}

/// Asks the generative service to choose a sign.
#[derive(Clone)]
pub struct SelectionEngine {
    catalog: Arc<Catalog>,
    generator: Arc<dyn TextGenerator>,
}

impl SelectionEngine {
    pub fn new(catalog: Arc<Catalog>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { catalog, generator }
    }

    /// Run one selection for `inputs`, with optional enrichment `tags`.
    pub async fn select(&self, inputs: &[TasteInput], tags: &[String]) -> SelectionOutcome {
        let reply = match self.consult(inputs, tags).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(generator = self.generator.name(), "Sign selection failed: {e}");
                return SelectionOutcome::Failed(e);
            }
        };

        resolve_reply(&self.catalog, reply, tags, &mut rand::rng())
    }

    /// Prompt, call and decode. Every failure collapses into one error.
    async fn consult(
        &self,
        inputs: &[TasteInput],
        tags: &[String],
    ) -> Result<OracleReply, GenerationError> {
        let prompt = build_prompt(&self.catalog, inputs, tags);
        debug!(prompt_len = prompt.len(), "Built selection prompt");

        let raw = self.generator.generate(&prompt).await?;
        parse_reply(&raw)
    }
}

impl std::fmt::Debug for SelectionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionEngine")
            .field("signs", &self.catalog.len())
            .field("generator", &self.generator.name())
            .finish()
    }
}

/// Resolve a decoded reply against the catalog.
///
/// An unknown sign name is not an error: a random sign is substituted and the
/// model's prophecy and symbolism are kept.
pub fn resolve_reply<R>(
    catalog: &Catalog,
    reply: OracleReply,
    tags: &[String],
    rng: &mut R,
) -> SelectionOutcome
where
    R: Rng + ?Sized,
{
    match catalog.get(&reply.chosen_sign_name) {
        Some(sign) => {
            info!(sign = %sign.name, "Oracle chose a catalog sign");
            SelectionOutcome::Chosen(ResultRecord::from_sign(
                sign,
                reply.prophecy,
                reply.symbolism,
                reading_tags(sign, tags),
                kindred_twin(sign),
            ))
        }
        None => {
            let requested = reply.chosen_sign_name.clone();
            warn!(requested = %requested, "Oracle named a sign outside the catalog");
            SelectionOutcome::NameMiss {
                requested,
                result: oracle_choice_reading(catalog, reply, rng),
            }
        }
    }
}

/// Enrichment tags when there are any, otherwise the sign's own keywords.
fn reading_tags(sign: &SignRecord, tags: &[String]) -> Vec<String> {
    let source: &[String] = if tags.is_empty() { &sign.keywords } else { tags };
    source
        .iter()
        .take(MAX_TASTE_TAGS)
        .map(|tag| title_case(tag))
        .collect()
}

/// Companion persona for a successful reading, derived from the sign.
fn kindred_twin(sign: &SignRecord) -> TasteTwin {
    TasteTwin::new(
        format!("The {} Kindred Spirit", sign.mood),
        sign.emoji.clone(),
        format!(
            "Another soul under the {} constellation. {}",
            sign.constellation, sign.compatibility
        ),
    )
}

fn title_case(tag: &str) -> String {
    tag.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
