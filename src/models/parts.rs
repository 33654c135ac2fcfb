//! Part definition tables used to decompose combination names.

use serde::{Deserialize, Serialize};

/// Blade product line; decides which slots a combination has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BladeLine {
    #[serde(alias = "basic", alias = "BX")]
    Basic,
    #[serde(alias = "unique", alias = "UX")]
    Unique,
    #[serde(rename = "X-Over", alias = "XOver", alias = "x-over")]
    XOver,
    #[serde(alias = "custom", alias = "CX")]
    Custom,
}

/// Slot a part occupies in a combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartSlot {
    Blade,
    Ratchet,
    Bit,
    Lockchip,
    AssistBlade,
}

impl std::str::FromStr for PartSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "blade" => Ok(PartSlot::Blade),
            "ratchet" => Ok(PartSlot::Ratchet),
            "bit" => Ok(PartSlot::Bit),
            "lockchip" | "lock_chip" => Ok(PartSlot::Lockchip),
            "assist_blade" | "assist" => Ok(PartSlot::AssistBlade),
            other => Err(format!("unknown part slot: {}", other)),
        }
    }
}

impl std::fmt::Display for PartSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartSlot::Blade => write!(f, "blade"),
            PartSlot::Ratchet => write!(f, "ratchet"),
            PartSlot::Bit => write!(f, "bit"),
            PartSlot::Lockchip => write!(f, "lockchip"),
            PartSlot::AssistBlade => write!(f, "assist_blade"),
        }
    }
}

/// Numeric performance ratings shared by every part table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartRatings {
    #[serde(default)]
    pub attack: f64,
    #[serde(default)]
    pub defense: f64,
    #[serde(default)]
    pub stamina: f64,
    #[serde(default)]
    pub dash: f64,
    #[serde(default)]
    pub burst_resistance: f64,
}

/// Common view over a part table row.
pub trait PartDefinition {
    /// Display name.
    fn name(&self) -> &str;

    /// Short forms that may appear in combination names.
    fn abbreviation(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blade {
    pub name: String,
    #[serde(default)]
    pub line: Option<BladeLine>,
    #[serde(flatten)]
    pub ratings: PartRatings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ratchet {
    pub name: String,
    #[serde(flatten)]
    pub ratings: PartRatings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bit {
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(flatten)]
    pub ratings: PartRatings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lockchip {
    pub name: String,
    #[serde(flatten)]
    pub ratings: PartRatings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistBlade {
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(flatten)]
    pub ratings: PartRatings,
}

impl PartDefinition for Blade {
    fn name(&self) -> &str {
        &self.name
    }
}

impl PartDefinition for Ratchet {
    fn name(&self) -> &str {
        &self.name
    }
}

impl PartDefinition for Bit {
    fn name(&self) -> &str {
        &self.name
    }

    fn abbreviation(&self) -> Option<&str> {
        self.abbreviation.as_deref()
    }
}

impl PartDefinition for Lockchip {
    fn name(&self) -> &str {
        &self.name
    }
}

impl PartDefinition for AssistBlade {
    fn name(&self) -> &str {
        &self.name
    }

    fn abbreviation(&self) -> Option<&str> {
        self.abbreviation.as_deref()
    }
}

/// All part tables, one per slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartTables {
    #[serde(default)]
    pub blades: Vec<Blade>,
    #[serde(default)]
    pub ratchets: Vec<Ratchet>,
    #[serde(default)]
    pub bits: Vec<Bit>,
    #[serde(default)]
    pub lockchips: Vec<Lockchip>,
    #[serde(default)]
    pub assist_blades: Vec<AssistBlade>,
}

impl PartTables {
    pub fn is_empty(&self) -> bool {
        self.blades.is_empty()
            && self.ratchets.is_empty()
            && self.bits.is_empty()
            && self.lockchips.is_empty()
            && self.assist_blades.is_empty()
    }
}

/// Part names a combination resolves to, by slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecomposedParts {
    pub blade: Option<String>,
    pub ratchet: Option<String>,
    pub bit: Option<String>,
    pub lockchip: Option<String>,
    pub assist_blade: Option<String>,
}

impl DecomposedParts {
    /// Resolved parts in slot order.
    pub fn slots(&self) -> Vec<(PartSlot, &str)> {
        [
            (PartSlot::Lockchip, &self.lockchip),
            (PartSlot::Blade, &self.blade),
            (PartSlot::AssistBlade, &self.assist_blade),
            (PartSlot::Ratchet, &self.ratchet),
            (PartSlot::Bit, &self.bit),
        ]
        .into_iter()
        .filter_map(|(slot, name)| name.as_deref().map(|n| (slot, n)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blade_line_serde_aliases() {
        let line: BladeLine = serde_json::from_str("\"X-Over\"").unwrap();
        assert_eq!(line, BladeLine::XOver);
        let line: BladeLine = serde_json::from_str("\"CX\"").unwrap();
        assert_eq!(line, BladeLine::Custom);
    }

    #[test]
    fn test_part_slot_from_str() {
        assert_eq!("Assist Blade".parse::<PartSlot>().unwrap(), PartSlot::AssistBlade);
        assert_eq!("lock-chip".parse::<PartSlot>().unwrap(), PartSlot::Lockchip);
        assert!("wheel".parse::<PartSlot>().is_err());
    }

    #[test]
    fn test_bit_row_with_flattened_ratings() {
        let json = r#"{"name":"Flat","abbreviation":"F","attack":80,"dash":30}"#;
        let bit: Bit = serde_json::from_str(json).unwrap();
        assert_eq!(bit.abbreviation(), Some("F"));
        assert_eq!(bit.ratings.attack, 80.0);
        assert_eq!(bit.ratings.stamina, 0.0);
    }

    #[test]
    fn test_decomposed_slots_skip_missing() {
        let parts = DecomposedParts {
            blade: Some("Dran Sword".to_string()),
            bit: Some("Flat".to_string()),
            ..Default::default()
        };
        assert_eq!(
            parts.slots(),
            vec![(PartSlot::Blade, "Dran Sword"), (PartSlot::Bit, "Flat")]
        );
    }
}
