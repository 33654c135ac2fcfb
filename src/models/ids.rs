//! Identifier and grouping-key types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque identifier as stored in the match tables.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create a new EntityId from a raw string.
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the ID carries no characters after trimming.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Type alias for match IDs
pub type MatchId = EntityId;

/// Type alias for tournament IDs
pub type TournamentId = EntityId;

/// Composite key joining several fields with `|`.
///
/// Used for head-to-head round grouping, where every record of the same
/// round must produce the same key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    /// Build a key from its component fields.
    pub fn compose(fields: &[&str]) -> Self {
        Self(fields.join("|"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupKey({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_serialization_is_transparent() {
        let id = EntityId::from("m-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"m-42\"");

        let deserialized: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_entity_id_display() {
        let id = EntityId::new("abc123".to_string());
        assert_eq!(format!("{}", id), "abc123");
    }

    #[test]
    fn test_entity_id_debug() {
        let id = EntityId::new("debug-test".to_string());
        let debug_str = format!("{:?}", id);
        assert!(debug_str.contains("debug-test"));
    }

    #[test]
    fn test_entity_id_blank() {
        assert!(EntityId::from("  ").is_blank());
        assert!(!EntityId::from("t1").is_blank());
    }

    #[test]
    fn test_group_key_deterministic() {
        let k1 = GroupKey::compose(&["t1", "bob", "judge", "2"]);
        let k2 = GroupKey::compose(&["t1", "bob", "judge", "2"]);
        assert_eq!(k1, k2);
        assert_eq!(k1.as_str(), "t1|bob|judge|2");
    }

    #[test]
    fn test_group_key_different_inputs() {
        let k1 = GroupKey::compose(&["t1", "bob", "judge", "2"]);
        let k2 = GroupKey::compose(&["t1", "bob", "judge", "3"]);
        assert_ne!(k1, k2);
    }
}
