use std::sync::Arc;

use crate::{config::Config, store::RatingStore};

/// Shared application state
///
/// The store is fully built before the router exists and is only ever read,
/// so handlers share it through an `Arc` without a lock.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RatingStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: RatingStore, config: Config) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}
