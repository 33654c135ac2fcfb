//! Per-record classification relative to the subject player.

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{
    normalize_name, strip_finish_detail, BladeLine, FinishType, GroupKey, MatchRecord,
    StadiumSide,
};

/// A match record seen from the subject player's side.
#[derive(Debug, Clone)]
pub struct ClassifiedMatch<'a> {
    pub record: &'a MatchRecord,
    pub is_winner: bool,
    /// Finish label without its parenthetical detail
    pub outcome: String,
    pub finish: FinishType,
    pub points: u32,
    /// Tournament | opponent | judge | round
    pub round_key: GroupKey,
    pub opponent: String,
    pub combo: Option<String>,
    pub blade_line: Option<BladeLine>,
    pub side: Option<StadiumSide>,
    pub subject_is_player1: bool,
}

impl ClassifiedMatch<'_> {
    pub fn tournament_date(&self) -> Option<NaiveDate> {
        self.record.tournament_date()
    }
}

/// Classify a record for `subject`.
///
/// Returns `None` when the record does not involve the subject exactly once
/// or is missing required identity fields.
pub fn classify<'a>(record: &'a MatchRecord, subject: &str) -> Option<ClassifiedMatch<'a>> {
    let subject_norm = normalize_name(subject);
    if subject_norm.is_empty() {
        return None;
    }

    let (Some(player1), Some(player2)) = (record.player1.as_deref(), record.player2.as_deref())
    else {
        debug!("Skipping match {:?}: missing participant", record.id);
        return None;
    };

    let norm_p1 = record.normalized_player1();
    let norm_p2 = record.normalized_player2();

    let is_p1 = player1 == subject || norm_p1.as_deref() == Some(subject_norm.as_str());
    let is_p2 = player2 == subject || norm_p2.as_deref() == Some(subject_norm.as_str());
    if is_p1 == is_p2 {
        return None;
    }

    let has_identity = record.id.as_ref().is_some_and(|id| !id.is_blank())
        && record.tournament_id.as_ref().is_some_and(|id| !id.is_blank());
    if !has_identity {
        debug!("Skipping match without id or tournament id: {} vs {}", player1, player2);
        return None;
    }

    let Some(winner_norm) = record.normalized_winner() else {
        debug!("Skipping match {:?}: missing winner", record.id);
        return None;
    };
    if Some(&winner_norm) != norm_p1.as_ref() && Some(&winner_norm) != norm_p2.as_ref() {
        debug!(
            "Skipping match {:?}: winner {} is not a participant",
            record.id, winner_norm
        );
        return None;
    }

    let outcome = strip_finish_detail(record.outcome.as_deref().unwrap_or(""));
    let finish = FinishType::parse(&outcome);
    let points = record.points_awarded.unwrap_or_else(|| finish.points());

    let (opponent, combo, blade_line, side) = if is_p1 {
        (
            player2,
            record.player1_beyblade.clone(),
            record.player1_blade_line,
            record.player1_stadium_side,
        )
    } else {
        (
            player1,
            record.player2_beyblade.clone(),
            record.player2_blade_line,
            record.player2_stadium_side,
        )
    };
    let combo = combo.filter(|c| !c.trim().is_empty());

    let tournament_id = record
        .tournament_id
        .as_ref()
        .map(|t| t.as_str())
        .unwrap_or_default();
    let round_key = GroupKey::compose(&[
        tournament_id,
        &normalize_name(opponent),
        record.judge.as_deref().unwrap_or(""),
        &record.round_number.to_string(),
    ]);

    Some(ClassifiedMatch {
        record,
        is_winner: winner_norm == subject_norm,
        outcome,
        finish,
        points,
        round_key,
        opponent: opponent.to_string(),
        combo,
        blade_line,
        side,
        subject_is_player1: is_p1,
    })
}
