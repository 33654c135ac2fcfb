use std::sync::Arc;

use crate::config::{AppConfig, StatsConfig};
use crate::storage::StorageConfig;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
    pub stats: Arc<StatsConfig>,
    pub cors_origin: String,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            storage: Arc::new(StorageConfig::new(config.data_dir.clone())),
            stats: Arc::new(config.stats.clone()),
            cors_origin: config.server.cors_origin.clone(),
        }
    }
}
