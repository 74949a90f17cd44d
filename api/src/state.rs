use crate::store::MovieStore;
use prometheus::Registry;
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MovieStore>,
    pub started_at: Instant,
    pub registry: Registry,
}

impl AppState {
    pub fn new(store: MovieStore, registry: Registry) -> Self {
        Self {
            store: Arc::new(store),
            started_at: Instant::now(),
            registry,
        }
    }
}
