//! Shared application state for all routes.

use crate::store::BakeryStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Built once at startup; each handler call borrows a pooled connection for one operation.
    pub store: Arc<dyn BakeryStore>,
}

impl AppState {
    pub fn new(store: impl BakeryStore + 'static) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }
}
