//! Filesystem data lake operations.
//!
//! Match rows and part tables are exported from the hosted database as JSONL:
//! - `matches.jsonl` at the data root
//! - one file per part slot under `parts/`

mod jsonl;

pub use jsonl::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join(EntityType::Match.filename())
    }

    pub fn parts_dir(&self) -> PathBuf {
        self.data_dir.join("parts")
    }

    /// Path of the file holding `entity`.
    pub fn entity_path(&self, entity: EntityType) -> PathBuf {
        match entity {
            EntityType::Match => self.matches_path(),
            _ => self.parts_dir().join(entity.filename()),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.matches_path(), PathBuf::from("/data/matches.jsonl"));
        assert_eq!(config.parts_dir(), PathBuf::from("/data/parts"));
        assert_eq!(
            config.entity_path(EntityType::Bit),
            PathBuf::from("/data/parts/bits.jsonl")
        );
        assert_eq!(
            config.entity_path(EntityType::Match),
            PathBuf::from("/data/matches.jsonl")
        );
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }
}
