use crate::storage::VisitStore;
use std::path::PathBuf;

/// Shared by every handler. Holds no visit data; each request re-reads the store.
#[derive(Clone)]
pub struct AppState {
    pub store: VisitStore,
}

impl AppState {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            store: VisitStore::new(db_path),
        }
    }
}
