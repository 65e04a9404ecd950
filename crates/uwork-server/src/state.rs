use std::sync::Arc;

use uwork_chat::ToolBridge;
use uwork_core::ItemService;

/// Shared application state passed to all route handlers.
///
/// The item service is constructed around a store opened once at startup;
/// the bridge is present only when an LLM API key was configured.
#[derive(Clone)]
pub struct AppState {
    pub service: ItemService,
    pub bridge: Option<Arc<ToolBridge>>,
}

impl AppState {
    pub fn new(service: ItemService, bridge: Option<Arc<ToolBridge>>) -> Self {
        Self { service, bridge }
    }
}
