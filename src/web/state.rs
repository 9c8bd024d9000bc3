use crate::{Config, model::ModelManager};

#[derive(Debug, Clone)]
pub struct AppState {
    mm: ModelManager,
}

impl AppState {
    pub fn new(mm: ModelManager) -> Self {
        Self { mm }
    }

    pub fn pool(&self) -> &ModelManager {
        &self.mm
    }

    /// Process-wide configuration, loaded on first use.
    pub async fn config(&self) -> &'static Config {
        Config::get_or_init(cfg!(debug_assertions)).await
    }
}
