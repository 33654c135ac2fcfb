//! Round and tournament groupings.

use std::collections::HashMap;

use crate::models::{GroupKey, TournamentCategory, TournamentRound, TournamentSummary};

use super::{count_flawless_rounds, ClassifiedMatch, Tally};

struct RoundAccumulator<'a> {
    first: &'a ClassifiedMatch<'a>,
    members: Vec<&'a ClassifiedMatch<'a>>,
    tally: Tally,
    /// Winning points per combo, in encounter order; only combos with a win appear
    combo_points: Vec<(String, u32)>,
}

impl RoundAccumulator<'_> {
    fn mvp(&self) -> Option<String> {
        let mut best: Option<&(String, u32)> = None;
        for entry in &self.combo_points {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(name, _)| name.clone())
    }
}

/// Group matches by (tournament name, round number, judge).
///
/// Output is sorted newest tournament first, then by tournament name and
/// round number.
pub fn aggregate_rounds<'a>(matches: &'a [ClassifiedMatch<'a>]) -> Vec<TournamentRound> {
    let mut order: Vec<GroupKey> = Vec::new();
    let mut groups: HashMap<GroupKey, RoundAccumulator<'a>> = HashMap::new();

    for m in matches {
        let record = m.record;
        let key = GroupKey::compose(&[
            record.tournament_name(),
            &record.round_number.to_string(),
            record.judge.as_deref().unwrap_or(""),
        ]);

        let acc = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            RoundAccumulator {
                first: m,
                members: Vec::new(),
                tally: Tally::default(),
                combo_points: Vec::new(),
            }
        });

        acc.members.push(m);
        acc.tally.record(m.is_winner, m.points);

        if m.is_winner {
            if let Some(combo) = &m.combo {
                match acc.combo_points.iter_mut().find(|(name, _)| name == combo) {
                    Some(entry) => entry.1 = entry.1.saturating_add(m.points),
                    None => acc.combo_points.push((combo.clone(), m.points)),
                }
            }
        }
    }

    let mut rounds: Vec<TournamentRound> = order
        .iter()
        .filter_map(|key| groups.get(key))
        .map(|acc| {
            let record = acc.first.record;
            TournamentRound {
                tournament_name: record.tournament_name().to_string(),
                date: record.tournament_date(),
                round_number: record.round_number,
                judge: record.judge.clone(),
                opponent: acc.first.opponent.clone(),
                matches: acc.tally.matches,
                wins: acc.tally.wins,
                losses: acc.tally.losses,
                kd_ratio: acc.tally.kd_ratio(),
                points_earned: acc.tally.points_earned,
                points_given: acc.tally.points_given,
                mvp_combo: acc.mvp(),
                flawless_rounds: count_flawless_rounds(acc.members.iter().copied()),
            }
        })
        .collect();

    rounds.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.tournament_name.cmp(&b.tournament_name))
            .then_with(|| a.round_number.cmp(&b.round_number))
            .then_with(|| a.judge.cmp(&b.judge))
    });
    rounds
}

/// Collect rounds under their tournament, keeping the round order.
pub fn group_tournaments(
    rounds: &[TournamentRound],
    categories: &HashMap<String, TournamentCategory>,
) -> Vec<TournamentSummary> {
    let mut tournaments: Vec<TournamentSummary> = Vec::new();

    for round in rounds {
        let position = tournaments
            .iter()
            .position(|t| t.tournament_name == round.tournament_name && t.date == round.date);

        let idx = match position {
            Some(idx) => idx,
            None => {
                tournaments.push(TournamentSummary {
                    tournament_name: round.tournament_name.clone(),
                    date: round.date,
                    category: categories.get(&round.tournament_name).copied(),
                    wins: 0,
                    losses: 0,
                    points_earned: 0,
                    points_given: 0,
                    rounds: Vec::new(),
                });
                tournaments.len() - 1
            }
        };

        let summary = &mut tournaments[idx];
        summary.wins = summary.wins.saturating_add(round.wins);
        summary.losses = summary.losses.saturating_add(round.losses);
        summary.points_earned = summary.points_earned.saturating_add(round.points_earned);
        summary.points_given = summary.points_given.saturating_add(round.points_given);
        summary.rounds.push(round.clone());
    }

    tournaments
}
