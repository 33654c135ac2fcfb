//! JSONL (JSON Lines) storage.
//!
//! Each line is one JSON object: a match row or a part table row.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{StorageConfig, StorageError};
use crate::models::{AssistBlade, Bit, Blade, Lockchip, MatchRecord, PartTables, Ratchet};

/// Entity types for JSONL storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Match,
    Blade,
    Ratchet,
    Bit,
    Lockchip,
    AssistBlade,
}

impl EntityType {
    pub const ALL: [EntityType; 6] = [
        EntityType::Match,
        EntityType::Blade,
        EntityType::Ratchet,
        EntityType::Bit,
        EntityType::Lockchip,
        EntityType::AssistBlade,
    ];

    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Match => "matches.jsonl",
            EntityType::Blade => "blades.jsonl",
            EntityType::Ratchet => "ratchets.jsonl",
            EntityType::Bit => "bits.jsonl",
            EntityType::Lockchip => "lockchips.jsonl",
            EntityType::AssistBlade => "assist_blades.jsonl",
        }
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a reader for a specific entity type.
    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(config.entity_path(entity))
    }

    /// Check if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all entities from the file.
    ///
    /// A missing file reads as empty. Lines that fail to parse are logged and
    /// skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        idx + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }

    /// Count non-blank lines in the file.
    pub fn count(&self) -> Result<usize, StorageError> {
        if !self.path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut count = 0;
        for line in reader.lines() {
            if !line?.trim().is_empty() {
                count += 1;
            }
        }

        Ok(count)
    }
}

/// Read every exported match row.
pub fn read_matches(config: &StorageConfig) -> Result<Vec<MatchRecord>, StorageError> {
    JsonlReader::for_entity(config, EntityType::Match).read_all()
}

/// Read all part tables. Missing tables read as empty.
pub fn read_part_tables(config: &StorageConfig) -> Result<PartTables, StorageError> {
    let tables = PartTables {
        blades: JsonlReader::<Blade>::for_entity(config, EntityType::Blade).read_all()?,
        ratchets: JsonlReader::<Ratchet>::for_entity(config, EntityType::Ratchet).read_all()?,
        bits: JsonlReader::<Bit>::for_entity(config, EntityType::Bit).read_all()?,
        lockchips: JsonlReader::<Lockchip>::for_entity(config, EntityType::Lockchip).read_all()?,
        assist_blades: JsonlReader::<AssistBlade>::for_entity(config, EntityType::AssistBlade)
            .read_all()?,
    };

    if tables.is_empty() {
        warn!(
            "No part tables found under {:?}; combinations will not be decomposed",
            config.parts_dir()
        );
    }
    Ok(tables)
}

/// Line count per entity file, as reported by `validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityCount {
    pub entity: EntityType,
    pub exists: bool,
    pub lines: usize,
    pub parsed: usize,
}

impl EntityCount {
    pub fn rejected(&self) -> usize {
        self.lines.saturating_sub(self.parsed)
    }
}

fn count_entity<T: DeserializeOwned>(
    config: &StorageConfig,
    entity: EntityType,
) -> Result<EntityCount, StorageError> {
    let reader = JsonlReader::<T>::for_entity(config, entity);
    Ok(EntityCount {
        entity,
        exists: reader.exists(),
        lines: reader.count()?,
        parsed: reader.read_all()?.len(),
    })
}

/// Check every entity file and report how many lines parse.
pub fn validate(config: &StorageConfig) -> Result<Vec<EntityCount>, StorageError> {
    EntityType::ALL
        .iter()
        .map(|&entity| match entity {
            EntityType::Match => count_entity::<MatchRecord>(config, entity),
            EntityType::Blade => count_entity::<Blade>(config, entity),
            EntityType::Ratchet => count_entity::<Ratchet>(config, entity),
            EntityType::Bit => count_entity::<Bit>(config, entity),
            EntityType::Lockchip => count_entity::<Lockchip>(config, entity),
            EntityType::AssistBlade => count_entity::<AssistBlade>(config, entity),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Deserialize, PartialEq)]
    struct TestEntity {
        id: String,
        name: String,
        value: u32,
    }

    fn test_config(temp_dir: &TempDir) -> StorageConfig {
        StorageConfig::new(temp_dir.path().to_path_buf())
    }

    #[test]
    fn test_jsonl_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.jsonl");
        std::fs::write(
            &path,
            "{\"id\":\"1\",\"name\":\"First\",\"value\":100}\n{\"id\":\"2\",\"name\":\"Second\",\"value\":200}\n",
        )
        .unwrap();

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        assert!(reader.exists());

        let entities = reader.read_all().unwrap();
        assert_eq!(
            entities,
            vec![
                TestEntity {
                    id: "1".to_string(),
                    name: "First".to_string(),
                    value: 100,
                },
                TestEntity {
                    id: "2".to_string(),
                    name: "Second".to_string(),
                    value: 200,
                },
            ]
        );
        assert_eq!(reader.count().unwrap(), 2);
    }

    #[test]
    fn test_jsonl_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.jsonl");

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        assert!(!reader.exists());
        assert!(reader.read_all().unwrap().is_empty());
        assert_eq!(reader.count().unwrap(), 0);
    }

    #[test]
    fn test_read_all_skips_bad_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad_lines.jsonl");

        std::fs::write(
            &path,
            r#"{"id":"1","name":"Good","value":1}
not-valid-json

{"id":"2","name":"Also Good","value":2}
"#,
        )
        .unwrap();

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        let entities = reader.read_all().unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[1].name, "Also Good");
        assert_eq!(reader.count().unwrap(), 3);
    }

    #[test]
    fn test_entity_type_filenames() {
        assert_eq!(EntityType::Match.filename(), "matches.jsonl");
        assert_eq!(EntityType::AssistBlade.filename(), "assist_blades.jsonl");
        assert_eq!(EntityType::ALL.len(), 6);
    }

    #[test]
    fn test_read_matches_and_part_tables() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        std::fs::write(
            config.matches_path(),
            "{\"id\":\"m1\",\"player1\":\"Alice\"}\n",
        )
        .unwrap();
        std::fs::create_dir_all(config.parts_dir()).unwrap();
        std::fs::write(
            config.entity_path(EntityType::Bit),
            "{\"name\":\"Flat\",\"abbreviation\":\"F\",\"attack\":70}\n",
        )
        .unwrap();

        let matches = read_matches(&config).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].player1.as_deref(), Some("Alice"));
        assert_eq!(matches[0].id.as_ref().map(|id| id.as_str()), Some("m1"));

        let tables = read_part_tables(&config).unwrap();
        assert_eq!(tables.bits.len(), 1);
        assert_eq!(tables.bits[0].name, "Flat");
        assert_eq!(tables.bits[0].abbreviation.as_deref(), Some("F"));
        assert!(tables.blades.is_empty());
    }

    #[test]
    fn test_read_part_tables_empty_lake() {
        let temp_dir = TempDir::new().unwrap();
        let tables = read_part_tables(&test_config(&temp_dir)).unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn test_validate_reports_rejected_lines() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        std::fs::write(
            config.matches_path(),
            "{\"id\":\"m1\"}\n{\"round_number\":\"two\"}\n",
        )
        .unwrap();

        let report = validate(&config).unwrap();
        let matches = report
            .iter()
            .find(|c| c.entity == EntityType::Match)
            .unwrap();
        assert!(matches.exists);
        assert_eq!(matches.lines, 2);
        assert_eq!(matches.parsed, 1);
        assert_eq!(matches.rejected(), 1);

        let blades = report
            .iter()
            .find(|c| c.entity == EntityType::Blade)
            .unwrap();
        assert!(!blades.exists);
        assert_eq!(blades.lines, 0);
    }
}
