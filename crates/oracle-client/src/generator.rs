//! Client for the generative-text service (Gemini `generateContent`).
//!
//! The client only moves text: prompt in, first candidate's text out.
//! Interpreting that text is the selection engine's job.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::endpoint::join_under;
use crate::error::GenerationError;

/// Header carrying the generative service credential
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Anything that can turn a prompt into a text reply.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the name of this generator (for logging/debugging)
    fn name(&self) -> &str;

    /// Send one prompt and return the raw reply text.
    ///
    /// A reply that is missing or blank is an error.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Settings for [`GeminiGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub temperature: Option<f32>,
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate, if any.
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
    temperature: Option<f32>,
}

impl GeminiGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::ClientBuild(e.to_string()))?;

        let endpoint = join_under(
            &config.base_url,
            &format!("v1beta/models/{}:generateContent", config.model),
        )
        .map_err(GenerationError::InvalidUrl)?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key,
            model: config.model,
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: self.temperature,
            },
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending generation request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Generative service returned an error");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;

        if let Some(usage) = &parsed.usage_metadata {
            info!(
                "Generation usage - prompt: {:?} tokens, reply: {:?} tokens",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        match parsed.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(GenerationError::EmptyReply),
        }
    }
}
