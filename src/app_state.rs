//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::domain::RoomRegistry;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Room membership registry shared by every connection.
    pub registry: Arc<RoomRegistry>,
    /// Runtime configuration.
    pub config: Arc<RelayConfig>,
}

impl AppState {
    /// Builds state around an existing registry.
    #[must_use]
    pub fn new(registry: Arc<RoomRegistry>, config: RelayConfig) -> Self {
        Self {
            registry,
            config: Arc::new(config),
        }
    }
}
