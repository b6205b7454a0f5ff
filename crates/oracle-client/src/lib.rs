//! Clients for the two upstream services the oracle consults.
//!
//! This crate provides:
//! - [`TasteTagger`] / [`QlooTagger`]: per-item taste tags from the tagging service
//! - [`Enricher`]: best-effort pooling of tags across a request's inputs
//! - [`TextGenerator`] / [`GeminiGenerator`]: one prompt in, one text reply out
//!
//! Both services sit behind traits so the pipeline and the HTTP layer can be
//! exercised without the network.

mod endpoint;
pub mod enrichment;
pub mod error;
pub mod generator;
pub mod tagger;

pub use enrichment::{Enricher, MAX_CONCURRENT_TAGS};
pub use error::{GenerationError, TaggerError};
pub use generator::{GeminiGenerator, GeneratorConfig, TextGenerator};
pub use tagger::{QlooTagger, TaggerConfig, TasteTagger};
