//! Sign selection and fallback for the cultural zodiac.
//!
//! This crate provides:
//! - prompt building and reply decoding for the generative service
//! - [`SelectionEngine`] which asks the model for a sign and resolves the answer
//! - fallback readings for when the model cannot be used
//!
//! ## Architecture
//! A live reading ends in one of three ways:
//! 1. **Chosen**: the model named a catalog sign
//! 2. **NameMiss**: the reply decoded but the sign is unknown, so a random
//!    sign carries the model's prophecy ("Oracle's Choice")
//! 3. **Failed**: the call or decode failed, so [`fallback_reading`] builds a
//!    fixed reading around a random sign ("The Glitch")
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{SelectionEngine, SelectionOutcome, fallback_reading};
//!
//! let engine = SelectionEngine::new(catalog.clone(), generator);
//! let result = match engine.select(&inputs, &tags).await {
//!     SelectionOutcome::Failed(_) => fallback_reading(&catalog, &mut rand::rng()),
//!     outcome => outcome.into_result().expect("non-failed outcome"),
//! };
//! ```

pub mod fallback;
pub mod prompt;
pub mod reply;
pub mod selection;

// Re-export main types
pub use fallback::{
    FALLBACK_TAGS, ORACLE_CHOICE_TAGS, fallback_reading, oracle_choice_reading, pick_random_sign,
};
pub use prompt::build_prompt;
pub use reply::{OracleReply, parse_reply, strip_code_fence};
pub use selection::{SelectionEngine, SelectionOutcome, resolve_reply};
