//! Match record model — one battle between two players as stored in the match table.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{BladeLine, MatchId, TournamentId};

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FinishType {
    Spin,
    Burst,
    Over,
    Extreme,
    /// Any label outside the scoring table
    Other,
}

impl FinishType {
    /// Classify a finish label. Parenthetical suffixes are ignored.
    pub fn parse(label: &str) -> Self {
        match strip_finish_detail(label).to_ascii_lowercase().as_str() {
            "spin finish" => FinishType::Spin,
            "burst finish" => FinishType::Burst,
            "over finish" => FinishType::Over,
            "extreme finish" => FinishType::Extreme,
            _ => FinishType::Other,
        }
    }

    /// Points awarded to the winner for this finish.
    pub fn points(&self) -> u32 {
        match self {
            FinishType::Spin => 1,
            FinishType::Burst | FinishType::Over => 2,
            FinishType::Extreme => 3,
            FinishType::Other => 0,
        }
    }
}

impl std::fmt::Display for FinishType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinishType::Spin => write!(f, "Spin Finish"),
            FinishType::Burst => write!(f, "Burst Finish"),
            FinishType::Over => write!(f, "Over Finish"),
            FinishType::Extreme => write!(f, "Extreme Finish"),
            FinishType::Other => write!(f, "Other"),
        }
    }
}

fn finish_detail_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\([^)]*\)\s*$").expect("valid finish detail regex"))
}

/// Remove a trailing parenthetical detail from a finish label,
/// e.g. `"Burst Finish (own ratchet)"` becomes `"Burst Finish"`.
pub fn strip_finish_detail(label: &str) -> String {
    finish_detail_regex().replace(label.trim(), "").trim().to_string()
}

/// Lower-cased, trimmed form of a player name used for matching.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Tournament classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentCategory {
    Practice,
    Casual,
    Ranked,
}

impl std::str::FromStr for TournamentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "practice" => Ok(TournamentCategory::Practice),
            "casual" => Ok(TournamentCategory::Casual),
            "ranked" => Ok(TournamentCategory::Ranked),
            other => Err(format!("unknown tournament category: {}", other)),
        }
    }
}

impl std::fmt::Display for TournamentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentCategory::Practice => write!(f, "practice"),
            TournamentCategory::Casual => write!(f, "casual"),
            TournamentCategory::Ranked => write!(f, "ranked"),
        }
    }
}

/// One of the two designated stadium sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StadiumSide {
    #[serde(rename = "X Side", alias = "X", alias = "x")]
    X,
    #[serde(rename = "B Side", alias = "B", alias = "b")]
    B,
}

/// Tournament metadata joined onto each match row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TournamentInfo {
    pub name: String,

    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub category: Option<TournamentCategory>,
}

/// A single recorded battle.
///
/// Most columns are nullable in the match table; required identity fields are
/// checked when the record is classified, not at deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(default)]
    pub id: Option<MatchId>,

    #[serde(default)]
    pub tournament_id: Option<TournamentId>,

    #[serde(default)]
    pub round_number: u32,

    #[serde(default)]
    pub match_number: u32,

    #[serde(default)]
    pub phase_number: u32,

    #[serde(default)]
    pub player1: Option<String>,

    #[serde(default)]
    pub player2: Option<String>,

    #[serde(default)]
    pub normalized_player1: Option<String>,

    #[serde(default)]
    pub normalized_player2: Option<String>,

    #[serde(default)]
    pub winner: Option<String>,

    #[serde(default)]
    pub normalized_winner: Option<String>,

    #[serde(default)]
    pub player1_beyblade: Option<String>,

    #[serde(default)]
    pub player2_beyblade: Option<String>,

    #[serde(default)]
    pub player1_blade_line: Option<BladeLine>,

    #[serde(default)]
    pub player2_blade_line: Option<BladeLine>,

    /// Finish label, possibly with a parenthetical detail
    #[serde(default)]
    pub outcome: Option<String>,

    /// Explicit points; overrides the finish table when present
    #[serde(default)]
    pub points_awarded: Option<u32>,

    #[serde(default)]
    pub tournament: Option<TournamentInfo>,

    #[serde(default)]
    pub player1_stadium_side: Option<StadiumSide>,

    #[serde(default)]
    pub player2_stadium_side: Option<StadiumSide>,

    /// Officiating identity
    #[serde(default)]
    pub judge: Option<String>,
}

impl MatchRecord {
    /// Normalized player 1 name, derived from `player1` when not stored.
    pub fn normalized_player1(&self) -> Option<String> {
        normalized_or_derived(&self.normalized_player1, &self.player1)
    }

    pub fn normalized_player2(&self) -> Option<String> {
        normalized_or_derived(&self.normalized_player2, &self.player2)
    }

    pub fn normalized_winner(&self) -> Option<String> {
        normalized_or_derived(&self.normalized_winner, &self.winner)
    }

    pub fn tournament_name(&self) -> &str {
        self.tournament.as_ref().map(|t| t.name.as_str()).unwrap_or("")
    }

    pub fn tournament_date(&self) -> Option<NaiveDate> {
        self.tournament.as_ref().and_then(|t| t.date)
    }

    pub fn tournament_category(&self) -> Option<TournamentCategory> {
        self.tournament.as_ref().and_then(|t| t.category)
    }
}

fn normalized_or_derived(stored: &Option<String>, raw: &Option<String>) -> Option<String> {
    match stored {
        Some(s) if !s.trim().is_empty() => Some(normalize_name(s)),
        _ => raw
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .map(normalize_name),
    }
}
