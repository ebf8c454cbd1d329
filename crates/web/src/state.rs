use std::sync::Arc;

use storage::PlacementRepository;

/// Shared handler state. The repository is the only thing shared between
/// requests; every dashboard is recomputed from it on demand.
#[derive(Clone)]
pub struct AppState {
    repo: Arc<dyn PlacementRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn PlacementRepository>) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &dyn PlacementRepository {
        self.repo.as_ref()
    }
}
