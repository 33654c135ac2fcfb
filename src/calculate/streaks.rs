//! Order-sensitive detections: overdrives and flawless rounds.

use std::collections::HashMap;

use crate::models::{FinishType, GroupKey};

use super::ClassifiedMatch;

/// Round sizes that qualify for a flawless round.
const FLAWLESS_ROUND_SIZES: std::ops::RangeInclusive<u32> = 4..=5;

#[derive(Default)]
struct StreakState<'a> {
    last_round_key: Option<&'a GroupKey>,
    streak: u32,
    overdrives: u32,
}

/// Count back-to-back Extreme Finish wins within one round key.
///
/// Must be fed records in their original order. The counter moves only when a
/// streak reaches exactly two; longer streaks do not count again.
pub fn count_overdrives(matches: &[ClassifiedMatch<'_>]) -> u32 {
    matches
        .iter()
        .fold(StreakState::default(), |mut state, m| {
            let qualifies = m.is_winner && m.finish == FinishType::Extreme;
            let same_round = state.last_round_key == Some(&m.round_key);

            state.streak = match (qualifies, same_round) {
                (true, true) => state.streak + 1,
                (true, false) => 1,
                (false, _) => 0,
            };
            if state.streak == 2 {
                state.overdrives += 1;
            }
            state.last_round_key = Some(&m.round_key);
            state
        })
        .overdrives
}

/// A round is flawless when all of its 4 or 5 matches were won.
pub fn is_flawless(matches: u32, wins: u32) -> bool {
    FLAWLESS_ROUND_SIZES.contains(&matches) && wins == matches
}

/// Count flawless round-key groups.
pub fn count_flawless_rounds<'m, 'r: 'm, I>(matches: I) -> u32
where
    I: IntoIterator<Item = &'m ClassifiedMatch<'r>>,
{
    let mut groups: HashMap<&'m GroupKey, (u32, u32)> = HashMap::new();
    for m in matches {
        let entry = groups.entry(&m.round_key).or_default();
        entry.0 += 1;
        if m.is_winner {
            entry.1 += 1;
        }
    }

    groups
        .values()
        .filter(|(total, wins)| is_flawless(*total, *wins))
        .count() as u32
}
