//! Session-based fun stats.
//!
//! A session is every match between the same two players in one round of one
//! tournament. Tallies are running finish points.

use std::collections::HashMap;

use crate::models::{normalize_name, FunStats, GroupKey};

use super::{percentage, ClassifiedMatch};

const DECIDING_TALLY: u32 = 3;
const COMEBACK_DEFICIT: u32 = 3;
const FIRST_STRIKE_MIN_MATCHES: usize = 3;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct SessionResult {
    matches: usize,
    subject: u32,
    opponent: u32,
    struck_first: bool,
    trailed_zero_three: bool,
}

fn session_key(m: &ClassifiedMatch<'_>) -> GroupKey {
    let record = m.record;
    GroupKey::compose(&[
        &normalize_name(record.player1.as_deref().unwrap_or("")),
        &normalize_name(record.player2.as_deref().unwrap_or("")),
        record.tournament_id.as_ref().map(|t| t.as_str()).unwrap_or(""),
        &record.round_number.to_string(),
    ])
}

fn replay(session: &[&ClassifiedMatch<'_>]) -> SessionResult {
    let mut result = SessionResult {
        matches: session.len(),
        struck_first: session.first().is_some_and(|m| m.is_winner),
        ..Default::default()
    };

    for m in session {
        if m.is_winner {
            result.subject = result.subject.saturating_add(m.points);
        } else {
            result.opponent = result.opponent.saturating_add(m.points);
        }
        if result.subject == 0 && result.opponent == COMEBACK_DEFICIT {
            result.trailed_zero_three = true;
        }
    }

    result
}

/// Compute clutch factor, comeback rate and first-strike advantage.
pub fn compute_fun_stats(matches: &[ClassifiedMatch<'_>]) -> FunStats {
    let mut sessions: HashMap<GroupKey, Vec<&ClassifiedMatch<'_>>> = HashMap::new();
    for m in matches {
        sessions.entry(session_key(m)).or_default().push(m);
    }

    let (mut clutch_num, mut clutch_den) = (0, 0);
    let (mut comeback_num, mut comeback_den) = (0, 0);
    let (mut strike_num, mut strike_den) = (0, 0);

    for session in sessions.values_mut() {
        session.sort_by_key(|m| m.record.match_number);
        let result = replay(session);
        let subject_ahead = result.subject > result.opponent;

        if result.subject >= DECIDING_TALLY
            && result.opponent >= DECIDING_TALLY
            && result.subject.abs_diff(result.opponent) == 1
        {
            clutch_den += 1;
            if subject_ahead {
                clutch_num += 1;
            }
        }

        if result.trailed_zero_three {
            comeback_den += 1;
            if subject_ahead {
                comeback_num += 1;
            }
        }

        if result.matches >= FIRST_STRIKE_MIN_MATCHES {
            strike_den += 1;
            if result.struck_first && subject_ahead {
                strike_num += 1;
            }
        }
    }

    FunStats {
        clutch_factor: percentage(clutch_num, clutch_den),
        clutch_sessions: clutch_den,
        comeback_rate: percentage(comeback_num, comeback_den),
        comeback_sessions: comeback_den,
        first_strike_advantage: percentage(strike_num, strike_den),
        first_strike_sessions: strike_den,
    }
}
