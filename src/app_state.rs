//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::persistence::PgSwapStore;
use crate::service::SwapCoordinator;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Swap coordinator for all business logic.
    pub coordinator: Arc<SwapCoordinator<PgSwapStore>>,
}
