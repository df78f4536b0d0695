//! Head-to-head pairing scores. For every unordered candidate pair the
//! ballots are restricted to the two contenders; the side ranked first on
//! strictly more of the expressing ballots gains one pairwise win.

use itertools::Itertools;

use super::Field;
use crate::trace::{TraceEvent, TraceSink};

/// Pairwise-win count per candidate, over the original ballot set. Ballots
/// expressing no preference between a pair sit that pairing out; an exact
/// tie credits neither side. Cost is O(C²·B).
pub(crate) fn pairwise_wins(field: &Field, trace: &mut dyn TraceSink) -> Vec<u32> {
    let mut wins = vec![0u32; field.len()];
    for (left, right) in (0..field.len()).tuple_combinations() {
        let mut left_votes = 0usize;
        let mut right_votes = 0usize;
        for ballot in &field.ballots {
            match ballot.iter().find(|&&choice| choice == left || choice == right) {
                Some(&choice) if choice == left => left_votes += 1,
                Some(_) => right_votes += 1,
                None => {}
            }
        }
        let winner = if left_votes > right_votes {
            wins[left] += 1;
            Some(left)
        } else if right_votes > left_votes {
            wins[right] += 1;
            Some(right)
        } else {
            None
        };
        trace.emit(TraceEvent::PairwiseResult {
            left: field.name(left).to_string(),
            left_votes,
            right: field.name(right).to_string(),
            right_votes,
            winner: winner.map(|index| field.name(index).to_string()),
        });
    }
    wins
}

/// The standalone rule: full ranking by descending pairwise-win count,
/// ties resolved by candidate-list order.
pub(crate) fn condorcet(field: &Field, trace: &mut dyn TraceSink) -> Vec<usize> {
    let wins = pairwise_wins(field, trace);
    let mut ranking: Vec<usize> = (0..field.len()).collect();
    ranking.sort_by(|&a, &b| wins[b].cmp(&wins[a]).then_with(|| a.cmp(&b)));
    ranking
}
