//! Derived statistics models.
//!
//! Everything here is rebuilt from scratch on each aggregation run.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DecomposedParts, FinishType, PartSlot, StadiumSide, TournamentCategory};

/// Role of a combination, inferred from its bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ComboType {
    Attack,
    Defense,
    Stamina,
    Balance,
    #[default]
    Unknown,
}

impl ComboType {
    /// Infer the type from a bit name by case-insensitive substring match.
    pub fn from_bit_name(bit: Option<&str>) -> Self {
        let Some(bit) = bit else {
            return ComboType::Unknown;
        };
        let lower = bit.to_lowercase();
        if lower.contains("attack") {
            ComboType::Attack
        } else if lower.contains("defense") {
            ComboType::Defense
        } else if lower.contains("stamina") {
            ComboType::Stamina
        } else if lower.contains("balance") {
            ComboType::Balance
        } else {
            ComboType::Unknown
        }
    }
}

impl std::fmt::Display for ComboType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComboType::Attack => write!(f, "Attack"),
            ComboType::Defense => write!(f, "Defense"),
            ComboType::Stamina => write!(f, "Stamina"),
            ComboType::Balance => write!(f, "Balance"),
            ComboType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Finish counts, split by who scored them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishDistribution {
    /// Finishes the subject scored
    pub earned: BTreeMap<FinishType, u32>,

    /// Finishes scored against the subject
    pub conceded: BTreeMap<FinishType, u32>,
}

impl FinishDistribution {
    pub fn record(&mut self, finish: FinishType, won: bool) {
        let bucket = if won {
            &mut self.earned
        } else {
            &mut self.conceded
        };
        *bucket.entry(finish).or_insert(0) += 1;
    }

    pub fn earned_count(&self, finish: FinishType) -> u32 {
        self.earned.get(&finish).copied().unwrap_or(0)
    }

    pub fn conceded_count(&self, finish: FinishType) -> u32 {
        self.conceded.get(&finish).copied().unwrap_or(0)
    }
}

/// Win rate on one stadium side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SideStats {
    pub side: StadiumSide,
    pub matches: u32,
    pub wins: u32,
    /// Percentage (0 to 100)
    pub win_rate: f64,
}

/// Scalar summary over the full filtered match set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewStats {
    pub total_matches: u32,
    pub match_wins: u32,
    pub match_losses: u32,

    /// Percentage (0 to 100)
    pub win_percentage: f64,

    pub points_earned: u32,
    pub points_given: u32,
    pub points_per_match: f64,
    pub kd_ratio: f64,

    pub tournaments_played: u32,
    pub rounds_played: u32,
    pub round_wins: u32,
    pub round_losses: u32,
    pub round_win_rate: f64,

    /// Round-key groups of 4 or 5 matches, all won
    pub flawless_rounds: u32,

    /// Back-to-back Extreme Finish wins within one round
    pub overdrives: u32,

    pub x_side: SideStats,
    pub b_side: SideStats,

    pub finishes: FinishDistribution,

    pub most_used_combo: Option<String>,
    pub best_combo: Option<String>,
}

impl Default for OverviewStats {
    fn default() -> Self {
        Self {
            total_matches: 0,
            match_wins: 0,
            match_losses: 0,
            win_percentage: 0.0,
            points_earned: 0,
            points_given: 0,
            points_per_match: 0.0,
            kd_ratio: 0.0,
            tournaments_played: 0,
            rounds_played: 0,
            round_wins: 0,
            round_losses: 0,
            round_win_rate: 0.0,
            flawless_rounds: 0,
            overdrives: 0,
            x_side: SideStats {
                side: StadiumSide::X,
                matches: 0,
                wins: 0,
                win_rate: 0.0,
            },
            b_side: SideStats {
                side: StadiumSide::B,
                matches: 0,
                wins: 0,
                win_rate: 0.0,
            },
            finishes: FinishDistribution::default(),
            most_used_combo: None,
            best_combo: None,
        }
    }
}

/// Per-combination rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboStats {
    pub name: String,
    pub combo_type: ComboType,
    pub parts: DecomposedParts,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    /// Percentage (0 to 100)
    pub win_rate: f64,
    pub kd_ratio: f64,
    pub points_earned: u32,
    pub points_given: u32,
    /// (earned - given) / matches
    pub points_delta: f64,
    pub finishes: FinishDistribution,
}

/// Per-part rollup, independent of which combination the part was in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartStats {
    pub slot: PartSlot,
    pub name: String,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    /// Percentage (0 to 100)
    pub win_rate: f64,
    pub points_earned: u32,
    pub points_given: u32,
    /// Wilson score lower bound, as a percentage
    pub confidence: f64,
}

/// One round of one tournament under one judge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentRound {
    pub tournament_name: String,
    pub date: Option<NaiveDate>,
    pub round_number: u32,
    pub judge: Option<String>,
    pub opponent: String,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub kd_ratio: f64,
    pub points_earned: u32,
    pub points_given: u32,
    /// Combination with the most winning points in the round
    pub mvp_combo: Option<String>,
    /// Flawless opponent rounds (by round key) inside this group
    pub flawless_rounds: u32,
}

/// Rounds of one tournament.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub tournament_name: String,
    pub date: Option<NaiveDate>,
    pub category: Option<TournamentCategory>,
    pub wins: u32,
    pub losses: u32,
    pub points_earned: u32,
    pub points_given: u32,
    pub rounds: Vec<TournamentRound>,
}

/// Session-level derived percentages.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FunStats {
    /// Deciding-round win rate
    pub clutch_factor: f64,
    pub clutch_sessions: u32,

    pub comeback_rate: f64,
    pub comeback_sessions: u32,

    pub first_strike_advantage: f64,
    pub first_strike_sessions: u32,
}

/// Full aggregation output for one player.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DerivedStats {
    pub player: String,
    pub overview: OverviewStats,
    pub combos: Vec<ComboStats>,
    pub parts: Vec<PartStats>,
    pub rounds: Vec<TournamentRound>,
    pub tournaments: Vec<TournamentSummary>,
    pub fun: FunStats,
}

impl DerivedStats {
    /// Get a combination by name (case insensitive).
    pub fn get_combo(&self, name: &str) -> Option<&ComboStats> {
        self.combos.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Parts in one slot, keeping confidence order.
    pub fn parts_in_slot(&self, slot: PartSlot) -> Vec<&PartStats> {
        self.parts.iter().filter(|p| p.slot == slot).collect()
    }

    /// Part listing filtered by slot and a minimum match count.
    pub fn part_listing(&self, slot: Option<PartSlot>, min_matches: u32) -> Vec<&PartStats> {
        self.parts
            .iter()
            .filter(|p| slot.map_or(true, |s| p.slot == s))
            .filter(|p| p.matches >= min_matches)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.overview.total_matches == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_type_from_bit_name() {
        assert_eq!(ComboType::from_bit_name(Some("Low Attack")), ComboType::Attack);
        assert_eq!(ComboType::from_bit_name(Some("DEFENSE Ball")), ComboType::Defense);
        assert_eq!(ComboType::from_bit_name(Some("stamina point")), ComboType::Stamina);
        assert_eq!(ComboType::from_bit_name(Some("Balance")), ComboType::Balance);
        assert_eq!(ComboType::from_bit_name(Some("Flat")), ComboType::Unknown);
        assert_eq!(ComboType::from_bit_name(None), ComboType::Unknown);
    }

    #[test]
    fn test_finish_distribution_record() {
        let mut dist = FinishDistribution::default();
        dist.record(FinishType::Burst, true);
        dist.record(FinishType::Burst, true);
        dist.record(FinishType::Spin, false);

        assert_eq!(dist.earned_count(FinishType::Burst), 2);
        assert_eq!(dist.conceded_count(FinishType::Spin), 1);
        assert_eq!(dist.earned_count(FinishType::Extreme), 0);
    }

    #[test]
    fn test_finish_distribution_serializes_labels_as_keys() {
        let mut dist = FinishDistribution::default();
        dist.record(FinishType::Extreme, true);
        let json = serde_json::to_value(&dist).unwrap();
        assert_eq!(json["earned"]["Extreme"], 1);
    }

    #[test]
    fn test_default_derived_stats_is_empty() {
        let stats = DerivedStats::default();
        assert!(stats.is_empty());
        assert_eq!(stats.overview.win_percentage, 0.0);
        assert_eq!(stats.overview.x_side.side, StadiumSide::X);
        assert!(stats.get_combo("anything").is_none());
    }

    fn part(slot: PartSlot, name: &str, matches: u32) -> PartStats {
        PartStats {
            slot,
            name: name.to_string(),
            matches,
            wins: matches,
            losses: 0,
            win_rate: 100.0,
            points_earned: matches,
            points_given: 0,
            confidence: 50.0,
        }
    }

    #[test]
    fn test_part_listing_filters() {
        let stats = DerivedStats {
            parts: vec![
                part(PartSlot::Blade, "Dran Sword", 5),
                part(PartSlot::Bit, "Flat", 2),
                part(PartSlot::Blade, "Hells Scythe", 1),
            ],
            ..Default::default()
        };

        assert_eq!(stats.part_listing(None, 0).len(), 3);
        assert_eq!(stats.part_listing(Some(PartSlot::Blade), 0).len(), 2);

        let listed = stats.part_listing(Some(PartSlot::Blade), 2);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Dran Sword");
        assert_eq!(stats.parts_in_slot(PartSlot::Bit).len(), 1);
    }
}
