use std::sync::Arc;

use crate::config::Settings;
use crate::orchestrator::ZodiacOrchestrator;

/// Shared, read-only state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub orchestrator: Arc<ZodiacOrchestrator>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(orchestrator: ZodiacOrchestrator, settings: Settings) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            settings: Arc::new(settings),
        }
    }
}
