//! Statistics calculation engine.
//!
//! Computes personal statistics from stored match records:
//! - Overview counters and stadium-side win rates
//! - Per-combination and per-part rollups
//! - Round and tournament groupings
//! - Session-based fun stats (clutch, comeback, first strike)

mod aggregate;
mod classify;
mod decompose;
mod fun;
mod rounds;
mod streaks;

pub use aggregate::{aggregate, default_side_cutover, AggregateOptions, DEFAULT_CONFIDENCE_Z};
pub use classify::{classify, ClassifiedMatch};
pub use decompose::decompose;
pub use fun::compute_fun_stats;
pub use rounds::{aggregate_rounds, group_tournaments};
pub use streaks::{count_flawless_rounds, count_overdrives, is_flawless};

/// Calculate win rate as a percentage.
pub fn calculate_win_rate(wins: u32, matches: u32) -> f64 {
    percentage(wins, matches)
}

/// `numerator / denominator * 100`, or 0 when the denominator is 0.
pub fn percentage(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

/// K/D ratio: wins / losses, or wins when there are no losses.
pub fn calculate_kd_ratio(wins: u32, losses: u32) -> f64 {
    if losses == 0 {
        wins as f64
    } else {
        wins as f64 / losses as f64
    }
}

/// Average point differential per match.
pub fn calculate_points_delta(earned: u32, given: u32, matches: u32) -> f64 {
    if matches == 0 {
        0.0
    } else {
        (earned as f64 - given as f64) / matches as f64
    }
}

/// Lower bound of the Wilson score interval for a binomial proportion.
///
/// Returns a fraction in `[0, 1]`; `z` is the standard normal quantile
/// (1.96 for 95%).
pub fn wilson_lower_bound(wins: u32, matches: u32, z: f64) -> f64 {
    if matches == 0 {
        return 0.0;
    }

    let n = matches as f64;
    let p = wins as f64 / n;
    let z2 = z * z;

    let centre = p + z2 / (2.0 * n);
    let margin = z * ((p * (1.0 - p) + z2 / (4.0 * n)) / n).sqrt();

    ((centre - margin) / (1.0 + z2 / n)).clamp(0.0, 1.0)
}

/// Running win/loss/points counter shared by the rollups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub points_earned: u32,
    pub points_given: u32,
}

impl Tally {
    pub fn record(&mut self, won: bool, points: u32) {
        self.matches += 1;
        if won {
            self.wins += 1;
            self.points_earned = self.points_earned.saturating_add(points);
        } else {
            self.losses += 1;
            self.points_given = self.points_given.saturating_add(points);
        }
    }

    pub fn win_rate(&self) -> f64 {
        calculate_win_rate(self.wins, self.matches)
    }

    pub fn kd_ratio(&self) -> f64 {
        calculate_kd_ratio(self.wins, self.losses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_win_rate() {
        assert!((calculate_win_rate(5, 6) - 83.333).abs() < 0.01);
        assert_eq!(calculate_win_rate(0, 0), 0.0);
        assert_eq!(calculate_win_rate(3, 6), 50.0);
    }

    #[test]
    fn test_calculate_kd_ratio() {
        assert_eq!(calculate_kd_ratio(6, 3), 2.0);
        assert_eq!(calculate_kd_ratio(4, 0), 4.0);
        assert_eq!(calculate_kd_ratio(0, 0), 0.0);
    }

    #[test]
    fn test_calculate_points_delta() {
        assert_eq!(calculate_points_delta(10, 4, 3), 2.0);
        assert_eq!(calculate_points_delta(2, 8, 2), -3.0);
        assert_eq!(calculate_points_delta(5, 5, 0), 0.0);
    }

    #[test]
    fn test_wilson_zero_matches() {
        assert_eq!(wilson_lower_bound(0, 0, 1.96), 0.0);
    }

    #[test]
    fn test_wilson_known_value() {
        // 8/10 at 95% has a lower bound of about 0.4902
        let lb = wilson_lower_bound(8, 10, 1.96);
        assert!((lb - 0.4902).abs() < 0.001, "got {}", lb);
    }

    #[test]
    fn test_wilson_monotonic_in_win_rate() {
        let mut previous = -1.0;
        for wins in 0..=20 {
            let lb = wilson_lower_bound(wins, 20, 1.96);
            assert!(lb >= previous, "wins={} lb={} prev={}", wins, lb, previous);
            previous = lb;
        }
    }

    #[test]
    fn test_wilson_more_matches_same_rate() {
        for (small, large) in [(4, 40), (10, 100), (2, 3)] {
            // same 75% win rate scaled
            let small_lb = wilson_lower_bound(small * 3, small * 4, 1.96);
            let large_lb = wilson_lower_bound(large * 3, large * 4, 1.96);
            assert!(large_lb >= small_lb);
        }
        assert!(wilson_lower_bound(0, 50, 1.96) >= wilson_lower_bound(0, 5, 1.96));
        assert!(wilson_lower_bound(50, 50, 1.96) >= wilson_lower_bound(5, 5, 1.96));
    }

    #[test]
    fn test_tally_record() {
        let mut tally = Tally::default();
        tally.record(true, 3);
        tally.record(false, 2);
        tally.record(true, 1);

        assert_eq!(tally.matches, 3);
        assert_eq!(tally.wins, 2);
        assert_eq!(tally.losses, 1);
        assert_eq!(tally.points_earned, 4);
        assert_eq!(tally.points_given, 2);
        assert_eq!(tally.kd_ratio(), 2.0);
    }

    #[test]
    fn test_tally_points_saturate() {
        let mut tally = Tally::default();
        tally.record(true, u32::MAX);
        tally.record(true, 3);
        tally.record(false, u32::MAX);
        tally.record(false, 1);

        assert_eq!(tally.points_earned, u32::MAX);
        assert_eq!(tally.points_given, u32::MAX);
        assert_eq!(tally.matches, 4);
    }
}
