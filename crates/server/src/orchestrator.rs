//! # Zodiac Orchestrator
//!
//! This module coordinates the whole resolution chain for one request:
//! 1. Build the demo key and check the demo table
//! 2. Enrich the inputs with taste tags (best effort)
//! 3. Ask the selection engine for a sign
//! 4. Fall back to a random fated reading if generation failed
//! 5. Wrap the result with the full catalog
//!
//! Nothing after step 1 can make the request fail.

use std::sync::Arc;
use std::time::Instant;

use catalog::{Catalog, DemoTable, ResultRecord, SignRecord, TasteInput, demo_key_for};
use oracle_client::{
    Enricher, GeminiGenerator, GeneratorConfig, QlooTagger, TaggerConfig, TextGenerator,
};
use pipeline::{SelectionEngine, SelectionOutcome, fallback_reading};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::config::Settings;
use crate::error::ServerError;

/// Request body for `POST /get-zodiac`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZodiacRequest {
    pub inputs: Vec<TasteInput>,
}

/// Response body for every `POST /get-zodiac`, whichever path produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub result: ResultRecord,
    pub all_signs: Vec<SignRecord>,
}

/// Which producer built a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    Demo,
    Oracle,
    OracleChoice,
    Fallback,
}

/// A reading and the path that produced it.
#[derive(Debug, Clone)]
pub struct Reading {
    pub result: ResultRecord,
    pub path: ResolutionPath,
}

/// Main orchestrator that coordinates demo lookup, enrichment, selection and
/// fallback.
#[derive(Clone, Debug)]
pub struct ZodiacOrchestrator {
    catalog: Arc<Catalog>,
    demos: Arc<DemoTable>,
    enricher: Enricher,
    engine: SelectionEngine,
}

impl ZodiacOrchestrator {
    pub fn new(
        catalog: Arc<Catalog>,
        demos: Arc<DemoTable>,
        enricher: Enricher,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let engine = SelectionEngine::new(catalog.clone(), generator);
        Self {
            catalog,
            demos,
            enricher,
            engine,
        }
    }

    /// Load static content and build the upstream clients from settings.
    ///
    /// A missing tagging credential only disables enrichment.
    pub fn from_settings(settings: &Settings) -> Result<Self, ServerError> {
        let catalog = match &settings.catalog_path {
            Some(path) => Catalog::load_from_file(path)?,
            None => Catalog::embedded()?,
        };
        let demos = DemoTable::embedded(&catalog)?;

        let enricher = match &settings.qloo_api_key {
            Some(api_key) => {
                let tagger = QlooTagger::new(TaggerConfig {
                    base_url: settings.qloo_base_url.clone(),
                    api_key: api_key.clone(),
                    connect_timeout: settings.connect_timeout,
                    timeout: settings.tagger_timeout,
                })
                .map_err(|e| ServerError::Client {
                    service: "tagging",
                    reason: e.to_string(),
                })?;
                Enricher::new(Arc::new(tagger))
            }
            None => {
                warn!("QLOO_API_KEY not set, taste enrichment is disabled");
                Enricher::disabled()
            }
        };

        let generator = GeminiGenerator::new(GeneratorConfig {
            base_url: settings.gemini_base_url.clone(),
            api_key: settings.gemini_api_key.clone(),
            model: settings.gemini_model.clone(),
            connect_timeout: settings.connect_timeout,
            timeout: settings.generator_timeout,
            temperature: None,
        })
        .map_err(|e| ServerError::Client {
            service: "generative",
            reason: e.to_string(),
        })?;
        info!(
            model = generator.model(),
            enrichment = enricher.is_enabled(),
            "Upstream clients ready"
        );

        Ok(Self::new(
            Arc::new(catalog),
            Arc::new(demos),
            enricher,
            Arc::new(generator),
        ))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Main entry point: resolve a set of inputs into a full response.
    pub async fn get_zodiac(&self, inputs: &[TasteInput]) -> ResponseEnvelope {
        let reading = self.resolve(inputs).await;
        self.assemble(reading.result)
    }

    /// Run the resolution chain and report which path fired.
    #[instrument(skip_all, fields(inputs = inputs.len()))]
    pub async fn resolve(&self, inputs: &[TasteInput]) -> Reading {
        let start_time = Instant::now();

        let key = demo_key_for(inputs);
        info!(demo_key = %key, "Generated demo key");

        let reading = match self.demos.get(&key) {
            Some(result) => {
                info!(demo_key = %key, "Demo key found, returning pre-baked reading");
                Reading {
                    result: result.clone(),
                    path: ResolutionPath::Demo,
                }
            }
            None => self.resolve_live(inputs).await,
        };

        info!(
            sign = %reading.result.name(),
            path = ?reading.path,
            "Resolved reading in {:.2?}",
            start_time.elapsed()
        );
        reading
    }

    async fn resolve_live(&self, inputs: &[TasteInput]) -> Reading {
        let tags = self.enricher.enrich(inputs).await;

        match self.engine.select(inputs, &tags).await {
            SelectionOutcome::Chosen(result) => Reading {
                result,
                path: ResolutionPath::Oracle,
            },
            SelectionOutcome::NameMiss { result, .. } => Reading {
                result,
                path: ResolutionPath::OracleChoice,
            },
            SelectionOutcome::Failed(e) => {
                warn!("Falling back to a fated reading: {e}");
                Reading {
                    result: fallback_reading(&self.catalog, &mut rand::rng()),
                    path: ResolutionPath::Fallback,
                }
            }
        }
    }

    /// Wrap a result with the complete, unmodified catalog.
    pub fn assemble(&self, result: ResultRecord) -> ResponseEnvelope {
        ResponseEnvelope {
            result,
            all_signs: self.catalog.signs().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use oracle_client::{GenerationError, TaggerError, TasteTagger};
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    /// Generator that replays one canned answer and counts calls
    struct CannedGenerator {
        reply: Option<String>,
        calls: AtomicUsize,
    }

    impl CannedGenerator {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(text.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn unreachable() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().ok_or(GenerationError::EmptyReply)
        }
    }

    /// Tagger that records the tags it handed out
    struct RecordingTagger {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TasteTagger for RecordingTagger {
        fn name(&self) -> &str {
            "recording"
        }

        async fn tags_for(&self, input: &TasteInput) -> Result<Vec<String>, TaggerError> {
            self.seen.lock().unwrap().push(input.name.clone());
            if input.name == "Broken" {
                return Err(TaggerError::Status {
                    status: 502,
                    body: String::new(),
                });
            }
            Ok(vec![format!("{} vibes", input.name.to_lowercase())])
        }
    }

    fn build_test_orchestrator(
        generator: Arc<dyn TextGenerator>,
        enricher: Enricher,
    ) -> ZodiacOrchestrator {
        let catalog = Catalog::embedded().expect("embedded catalog");
        let demos = DemoTable::embedded(&catalog).expect("embedded demos");
        ZodiacOrchestrator::new(Arc::new(catalog), Arc::new(demos), enricher, generator)
    }

    fn inputs(names: &[&str]) -> Vec<TasteInput> {
        names.iter().map(|n| TasteInput::new(*n, "movie")).collect()
    }

    const CHOSEN_REPLY: &str = r#"{"chosen_sign_name": "Extinct Mall Mascot",
        "prophecy": "Food courts await.", "symbolism": "Malls are memory."}"#;

    // ============================================================================
    // Demo path
    // ============================================================================

    #[tokio::test]
    async fn test_demo_path_skips_upstream_services() {
        let generator = CannedGenerator::unreachable();
        let orchestrator = build_test_orchestrator(generator.clone(), Enricher::disabled());

        let reading = orchestrator
            .resolve(&inputs(&["Street Fighter II", "  blade runner "]))
            .await;

        assert_eq!(reading.path, ResolutionPath::Demo);
        assert_eq!(reading.result.name(), "Abandoned Arcade Heartthrob");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_demo_path_is_idempotent() {
        let orchestrator =
            build_test_orchestrator(CannedGenerator::unreachable(), Enricher::disabled());
        let request = inputs(&["Blade Runner", "Street Fighter II"]);

        let first = orchestrator.get_zodiac(&request).await;
        let second = orchestrator.get_zodiac(&request).await;

        assert_eq!(first, second);
    }

    // ============================================================================
    // Live paths
    // ============================================================================

    #[tokio::test]
    async fn test_live_path_uses_model_choice_and_tags() {
        let tagger = Arc::new(RecordingTagger {
            seen: Mutex::new(Vec::new()),
        });
        let orchestrator = build_test_orchestrator(
            CannedGenerator::replying(CHOSEN_REPLY),
            Enricher::new(tagger.clone()),
        );

        let reading = orchestrator.resolve(&inputs(&["Broken", "Mallrats"])).await;

        assert_eq!(reading.path, ResolutionPath::Oracle);
        assert_eq!(reading.result.name(), "Extinct Mall Mascot");
        assert_eq!(reading.result.taste_tags, vec!["Mallrats Vibes"]);
        assert_eq!(tagger.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_name_miss_path() {
        let orchestrator = build_test_orchestrator(
            CannedGenerator::replying(
                r#"{"chosen_sign_name": "Cosmic Hamster", "prophecy": "Run.", "symbolism": "Wheels."}"#,
            ),
            Enricher::disabled(),
        );

        let reading = orchestrator.resolve(&inputs(&["Hamtaro"])).await;

        assert_eq!(reading.path, ResolutionPath::OracleChoice);
        assert_eq!(reading.result.prophecy, "Run.");
        assert_eq!(reading.result.taste_tags, vec!["AI-Generated", "Eclectic", "Dynamic"]);
    }

    #[tokio::test]
    async fn test_generation_failure_falls_back() {
        let orchestrator =
            build_test_orchestrator(CannedGenerator::unreachable(), Enricher::disabled());

        let reading = orchestrator.resolve(&inputs(&["Arcane"])).await;

        assert_eq!(reading.path, ResolutionPath::Fallback);
        assert!(orchestrator.catalog().contains(reading.result.name()));
        assert_eq!(
            reading.result.taste_tags,
            vec!["Fated", "Cosmic Interference", "Meant To Be"]
        );
    }

    #[tokio::test]
    async fn test_fallback_reaches_every_sign() {
        let orchestrator =
            build_test_orchestrator(CannedGenerator::unreachable(), Enricher::disabled());
        let request = inputs(&["Arcane"]);

        let mut seen = HashSet::new();
        for _ in 0..1000 {
            seen.insert(orchestrator.resolve(&request).await.result.sign.name);
        }

        assert_eq!(seen.len(), orchestrator.catalog().len());
    }

    // ============================================================================
    // Assembly
    // ============================================================================

    #[tokio::test]
    async fn test_all_signs_matches_catalog_on_every_path() {
        let catalog = Catalog::embedded().unwrap();
        for generator in [
            CannedGenerator::replying(CHOSEN_REPLY),
            CannedGenerator::unreachable(),
        ] {
            let orchestrator = build_test_orchestrator(generator, Enricher::disabled());
            for request in [inputs(&["Blade Runner", "Street Fighter II"]), inputs(&["Dune"])] {
                let envelope = orchestrator.get_zodiac(&request).await;
                assert_eq!(envelope.all_signs, catalog.signs());
            }
        }
    }

    #[tokio::test]
    async fn test_empty_inputs_still_answer() {
        let orchestrator =
            build_test_orchestrator(CannedGenerator::replying(CHOSEN_REPLY), Enricher::disabled());

        let envelope = orchestrator.get_zodiac(&[]).await;

        assert_eq!(envelope.result.name(), "Extinct Mall Mascot");
        assert_eq!(envelope.all_signs.len(), 16);
    }
}
