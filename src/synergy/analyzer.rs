//! Synergy derivation from a player's match history
//!
//! Teammates come from whichever recorded roster contains the subject;
//! a match counts as a personal win iff the subject's rating delta for
//! that entry is positive. The delta sign is the single source of truth
//! for winning, so synergy can never disagree with the rating updates it
//! was derived from.

use crate::types::{HistoryEntry, Synergies, SynergyStat};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy)]
struct MateTally {
    matches_together: u32,
    wins_together: u32,
}

/// Derive the full synergy block for one player from their history.
///
/// A player with no history gets an empty block; that is not an error.
pub fn synergies_for(player_name: &str, history: &[HistoryEntry]) -> Synergies {
    let mut tallies: BTreeMap<&str, MateTally> = BTreeMap::new();

    for entry in history {
        let roster = if entry.team_a.iter().any(|n| n == player_name) {
            &entry.team_a
        } else if entry.team_b.iter().any(|n| n == player_name) {
            &entry.team_b
        } else {
            // History entries always carry their owner; skip rather than
            // poison the whole block if one ever does not
            continue;
        };

        let won = entry.is_personal_win();
        for mate in roster.iter().filter(|n| n.as_str() != player_name) {
            let tally = tallies.entry(mate).or_default();
            tally.matches_together += 1;
            if won {
                tally.wins_together += 1;
            }
        }
    }

    let mut mates: Vec<SynergyStat> = tallies
        .into_iter()
        .map(|(mate, tally)| SynergyStat {
            mate: mate.to_string(),
            wins_together: tally.wins_together,
            matches_together: tally.matches_together,
            win_rate: tally.wins_together as f64 / tally.matches_together as f64 * 100.0,
        })
        .collect();

    // Best mates first; unique names make the ordering total
    mates.sort_by(|a, b| rank_descending(a, b));

    let best_mate = mates.first().map(|stat| stat.mate.clone());
    let worst_mate = mates
        .iter()
        .min_by(|a, b| {
            compare_rate(a, b)
                .then_with(|| b.matches_together.cmp(&a.matches_together))
                .then_with(|| a.mate.cmp(&b.mate))
        })
        .map(|stat| stat.mate.clone());

    Synergies {
        best_mate,
        worst_mate,
        mates,
    }
}

fn compare_rate(a: &SynergyStat, b: &SynergyStat) -> Ordering {
    a.win_rate.partial_cmp(&b.win_rate).unwrap_or(Ordering::Equal)
}

/// Highest win rate first; ties prefer more shared matches, then the
/// lexicographically first name.
fn rank_descending(a: &SynergyStat, b: &SynergyStat) -> Ordering {
    compare_rate(b, a)
        .then_with(|| b.matches_together.cmp(&a.matches_together))
        .then_with(|| a.mate.cmp(&b.mate))
}
