//! HTTP service for the Cultural Zodiac.
//!
//! The [`ZodiacOrchestrator`] runs the resolution chain. The `routes` module
//! exposes it over axum, and [`serve`] wires settings, router and listener
//! together.

pub mod app;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use app::serve;
pub use config::Settings;
pub use error::ServerError;
pub use orchestrator::{
    Reading, ResolutionPath, ResponseEnvelope, ZodiacOrchestrator, ZodiacRequest,
};
pub use routes::build_router;
pub use state::AppState;
pub use telemetry::init_tracing;
