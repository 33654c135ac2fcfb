//! The match statistics aggregator.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{
    BladeLine, ComboStats, ComboType, DecomposedParts, DerivedStats, FinishDistribution,
    MatchRecord, OverviewStats, PartSlot, PartStats, PartTables, SideStats, StadiumSide,
    TournamentCategory,
};

use super::{
    aggregate_rounds, calculate_kd_ratio, calculate_points_delta, calculate_win_rate, classify,
    compute_fun_stats, count_flawless_rounds, count_overdrives, decompose, group_tournaments,
    percentage, wilson_lower_bound, ClassifiedMatch, Tally,
};

/// Stadium sides were not recorded before this date.
pub fn default_side_cutover() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default()
}

/// 95% two-sided normal quantile.
pub const DEFAULT_CONFIDENCE_Z: f64 = 1.96;

/// Minimum matches before a combo can be reported as the best combo.
const BEST_COMBO_MIN_MATCHES: u32 = 3;

/// Knobs for one aggregation run.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOptions {
    /// Only include tournaments of this category
    pub category: Option<TournamentCategory>,

    /// First date with recorded stadium sides
    pub side_cutover: NaiveDate,

    /// Normal quantile for the part confidence score
    pub confidence_z: f64,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            category: None,
            side_cutover: default_side_cutover(),
            confidence_z: DEFAULT_CONFIDENCE_Z,
        }
    }
}

impl AggregateOptions {
    pub fn with_category(mut self, category: Option<TournamentCategory>) -> Self {
        self.category = category;
        self
    }
}

struct ComboAccumulator {
    blade_line: Option<BladeLine>,
    tally: Tally,
    finishes: FinishDistribution,
}

/// Compute every derived statistic for `subject` from the full match list.
///
/// Records that do not involve the subject, or that are malformed, are
/// skipped; an empty input yields zeroed statistics.
pub fn aggregate(
    matches: &[MatchRecord],
    tables: &PartTables,
    subject: &str,
    options: &AggregateOptions,
) -> DerivedStats {
    let classified: Vec<ClassifiedMatch<'_>> = matches
        .iter()
        .filter_map(|record| classify(record, subject))
        .filter(|m| {
            options
                .category
                .map_or(true, |c| m.record.tournament_category() == Some(c))
        })
        .collect();

    debug!(
        "Aggregating {} of {} matches for {}",
        classified.len(),
        matches.len(),
        subject
    );

    let combos = combo_stats(&classified, tables);
    let parts = part_stats(&classified, &combos, options.confidence_z);
    let rounds = aggregate_rounds(&classified);

    let categories: HashMap<String, TournamentCategory> = classified
        .iter()
        .filter_map(|m| {
            m.record
                .tournament_category()
                .map(|c| (m.record.tournament_name().to_string(), c))
        })
        .collect();
    let tournaments = group_tournaments(&rounds, &categories);

    let overview = overview_stats(&classified, &combos, options);
    let fun = compute_fun_stats(&classified);

    DerivedStats {
        player: subject.to_string(),
        overview,
        combos,
        parts,
        rounds,
        tournaments,
        fun,
    }
}

fn overview_stats(
    matches: &[ClassifiedMatch<'_>],
    combos: &[ComboStats],
    options: &AggregateOptions,
) -> OverviewStats {
    let mut totals = Tally::default();
    let mut finishes = FinishDistribution::default();
    let mut sides: HashMap<StadiumSide, (u32, u32)> = HashMap::new();
    let mut round_points: HashMap<&str, (u32, u32)> = HashMap::new();
    let mut tournaments: HashSet<&str> = HashSet::new();

    for m in matches {
        totals.record(m.is_winner, m.points);
        finishes.record(m.finish, m.is_winner);

        let round = round_points.entry(m.round_key.as_str()).or_default();
        if m.is_winner {
            round.0 = round.0.saturating_add(m.points);
        } else {
            round.1 = round.1.saturating_add(m.points);
        }

        if let Some(id) = &m.record.tournament_id {
            tournaments.insert(id.as_str());
        }

        let tracked = m
            .tournament_date()
            .is_some_and(|date| date >= options.side_cutover);
        if let (true, Some(side)) = (tracked, m.side) {
            let entry = sides.entry(side).or_default();
            entry.0 += 1;
            if m.is_winner {
                entry.1 += 1;
            }
        }
    }

    let round_wins = round_points.values().filter(|(won, lost)| won > lost).count() as u32;
    let round_losses = round_points.values().filter(|(won, lost)| won < lost).count() as u32;
    let rounds_played = round_points.len() as u32;

    let side_stats = |side: StadiumSide| {
        let (played, won) = sides.get(&side).copied().unwrap_or_default();
        SideStats {
            side,
            matches: played,
            wins: won,
            win_rate: calculate_win_rate(won, played),
        }
    };

    let most_used_combo = combos
        .iter()
        .max_by(|a, b| a.matches.cmp(&b.matches).then_with(|| b.name.cmp(&a.name)))
        .map(|c| c.name.clone());
    let best_combo = combos
        .iter()
        .filter(|c| c.matches >= BEST_COMBO_MIN_MATCHES)
        .max_by(|a, b| {
            a.win_rate
                .total_cmp(&b.win_rate)
                .then_with(|| a.matches.cmp(&b.matches))
                .then_with(|| b.name.cmp(&a.name))
        })
        .map(|c| c.name.clone());

    OverviewStats {
        total_matches: totals.matches,
        match_wins: totals.wins,
        match_losses: totals.losses,
        win_percentage: totals.win_rate(),
        points_earned: totals.points_earned,
        points_given: totals.points_given,
        points_per_match: if totals.matches == 0 {
            0.0
        } else {
            totals.points_earned as f64 / totals.matches as f64
        },
        kd_ratio: totals.kd_ratio(),
        tournaments_played: tournaments.len() as u32,
        rounds_played,
        round_wins,
        round_losses,
        round_win_rate: percentage(round_wins, rounds_played),
        flawless_rounds: count_flawless_rounds(matches),
        overdrives: count_overdrives(matches),
        x_side: side_stats(StadiumSide::X),
        b_side: side_stats(StadiumSide::B),
        finishes,
        most_used_combo,
        best_combo,
    }
}

fn combo_stats(matches: &[ClassifiedMatch<'_>], tables: &PartTables) -> Vec<ComboStats> {
    let mut by_combo: HashMap<&str, ComboAccumulator> = HashMap::new();

    for m in matches {
        let Some(combo) = m.combo.as_deref() else {
            continue;
        };
        let acc = by_combo.entry(combo).or_insert_with(|| ComboAccumulator {
            blade_line: m.blade_line,
            tally: Tally::default(),
            finishes: FinishDistribution::default(),
        });
        if acc.blade_line.is_none() {
            acc.blade_line = m.blade_line;
        }
        acc.tally.record(m.is_winner, m.points);
        acc.finishes.record(m.finish, m.is_winner);
    }

    let mut combos: Vec<ComboStats> = by_combo
        .into_iter()
        .map(|(name, acc)| {
            let parts = decompose(name, acc.blade_line, tables);
            let tally = acc.tally;
            ComboStats {
                name: name.to_string(),
                combo_type: ComboType::from_bit_name(parts.bit.as_deref()),
                parts,
                matches: tally.matches,
                wins: tally.wins,
                losses: tally.losses,
                win_rate: tally.win_rate(),
                kd_ratio: calculate_kd_ratio(tally.wins, tally.losses),
                points_earned: tally.points_earned,
                points_given: tally.points_given,
                points_delta: calculate_points_delta(
                    tally.points_earned,
                    tally.points_given,
                    tally.matches,
                ),
                finishes: acc.finishes,
            }
        })
        .collect();

    combos.sort_by(|a, b| {
        b.matches
            .cmp(&a.matches)
            .then_with(|| b.win_rate.total_cmp(&a.win_rate))
            .then_with(|| a.name.cmp(&b.name))
    });
    combos
}

fn part_stats(
    matches: &[ClassifiedMatch<'_>],
    combos: &[ComboStats],
    confidence_z: f64,
) -> Vec<PartStats> {
    let decomposed: HashMap<&str, &DecomposedParts> =
        combos.iter().map(|c| (c.name.as_str(), &c.parts)).collect();

    let mut by_part: HashMap<(PartSlot, &str), Tally> = HashMap::new();
    for m in matches {
        let Some(parts) = m.combo.as_deref().and_then(|c| decomposed.get(c)) else {
            continue;
        };
        for (slot, name) in parts.slots() {
            by_part
                .entry((slot, name))
                .or_default()
                .record(m.is_winner, m.points);
        }
    }

    let mut parts: Vec<PartStats> = by_part
        .into_iter()
        .map(|((slot, name), tally)| PartStats {
            slot,
            name: name.to_string(),
            matches: tally.matches,
            wins: tally.wins,
            losses: tally.losses,
            win_rate: tally.win_rate(),
            points_earned: tally.points_earned,
            points_given: tally.points_given,
            confidence: wilson_lower_bound(tally.wins, tally.matches, confidence_z) * 100.0,
        })
        .collect();

    parts.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| b.win_rate.total_cmp(&a.win_rate))
            .then_with(|| b.matches.cmp(&a.matches))
            .then_with(|| a.slot.cmp(&b.slot))
            .then_with(|| a.name.cmp(&b.name))
    });
    parts
}
