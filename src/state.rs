//! Application state for Axum web framework.

use std::sync::Arc;
use std::time::Duration;

use crate::db::{AsyncDbPool, StoreProbe};
use crate::repositories::Repositories;
use crate::services::Services;

/// Shared state handed to every handler.
///
/// Cloning is cheap: services hold `Arc`s and the pool is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Connectivity check for the health endpoint
    pub store: Arc<dyn StoreProbe>,
    /// Upper bound for a single store round trip, health checks included
    pub query_timeout: Duration,
}

impl AppState {
    /// Wires repositories and services on top of `pool`.
    pub fn new(pool: AsyncDbPool, query_timeout: Duration) -> Self {
        let repos = Repositories::new(pool.clone());
        Self::from_parts(repos, Arc::new(pool), query_timeout)
    }

    pub fn from_parts(
        repos: Repositories,
        store: Arc<dyn StoreProbe>,
        query_timeout: Duration,
    ) -> Self {
        Self {
            services: Services::new(repos, query_timeout),
            store,
            query_timeout,
        }
    }
}
