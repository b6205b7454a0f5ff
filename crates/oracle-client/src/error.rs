//! Errors for the upstream service clients.

use thiserror::Error;

/// Errors from the taste-tagging service.
///
/// None of these ever reach a caller of the enrichment step; they are logged
/// and the item is skipped.
#[derive(Error, Debug)]
pub enum TaggerError {
    #[error("Invalid tagging service URL: {0}")]
    InvalidUrl(String),

    #[error("Tagging request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Tagging service returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Errors from the generative-text service, or from decoding its reply.
///
/// Every variant means the same thing to the selection engine: generation
/// failed and the fallback reading is used.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Invalid generative service URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to build generative service client: {0}")]
    ClientBuild(String),

    #[error("Generation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Generative service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Generative service returned an empty reply")]
    EmptyReply,

    #[error("Failed to decode generated reply: {0}")]
    Decode(String),
}
