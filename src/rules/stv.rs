//! Single Transferable Vote. Rounds tally current first preferences
//! against a victory quota of `1 / num_seats` of the ballots still alive;
//! quota winners are seated and stripped from every ballot (transferring
//! each ballot to its next surviving preference), otherwise the weakest
//! standing candidate is eliminated. Ties are broken by pairwise wins and
//! then by average ballot position, both computed once over the original
//! ballot set before the first round.

use std::cmp::Ordering;

use super::condorcet::pairwise_wins;
use super::{Field, TallyError, TallyResult};
use crate::trace::{AverageIndex, CandidateStanding, TraceEvent, TraceSink};

/// Working state for one standing candidate.
struct Standing {
    index: usize,
    votes: usize,
    proportion: f64,
    pairwise_wins: u32,
    avg_index: f64,
}

impl Standing {
    fn snapshot(&self, field: &Field) -> CandidateStanding {
        CandidateStanding {
            candidate: field.name(self.index).to_string(),
            votes: self.votes,
            proportion: self.proportion,
            pairwise_wins: self.pairwise_wins,
            avg_index: self.avg_index,
        }
    }
}

/// Elimination order, weakest first: lower proportion of votes, then fewer
/// pairwise wins, then later average ballot position. Exact three-way ties
/// resolve by candidate-list position, earlier first, which makes the
/// order total.
fn weaker(a: &Standing, b: &Standing) -> Ordering {
    a.proportion
        .total_cmp(&b.proportion)
        .then_with(|| a.pairwise_wins.cmp(&b.pairwise_wins))
        .then_with(|| b.avg_index.total_cmp(&a.avg_index))
        .then_with(|| a.index.cmp(&b.index))
}

/// Winner order, strongest first: the same composite key descending, with
/// the same candidate-list fallback (earlier candidates rank ahead).
fn stronger(a: &Standing, b: &Standing) -> Ordering {
    b.proportion
        .total_cmp(&a.proportion)
        .then_with(|| b.pairwise_wins.cmp(&a.pairwise_wins))
        .then_with(|| a.avg_index.total_cmp(&b.avg_index))
        .then_with(|| a.index.cmp(&b.index))
}

/// Mean ballot position per candidate over all ballots. A ballot omitting
/// the candidate contributes the midpoint between the position just past
/// its last stated preference and the worst possible position,
/// `(len + (C - 1)) / 2`. With zero ballots every score is 0.
pub(crate) fn average_index(field: &Field) -> Vec<f64> {
    let count = field.len();
    let mut means = vec![0.0; count];
    if field.ballots.is_empty() {
        return means;
    }
    for (candidate, mean) in means.iter_mut().enumerate() {
        let total: f64 = field
            .ballots
            .iter()
            .map(|ballot| match ballot.iter().position(|&c| c == candidate) {
                Some(position) => position as f64,
                None => (ballot.len() + (count - 1)) as f64 / 2.0,
            })
            .sum();
        *mean = total / field.ballots.len() as f64;
    }
    means
}

fn strip(ballots: &mut [Vec<usize>], candidate: usize) {
    for ballot in ballots.iter_mut() {
        ballot.retain(|&choice| choice != candidate);
    }
}

pub(crate) fn stv(
    field: &Field,
    num_seats: usize,
    trace: &mut dyn TraceSink,
) -> TallyResult<Vec<usize>> {
    let quota = 1.0 / num_seats as f64;

    let avg_indexes = average_index(field);
    trace.emit(TraceEvent::AverageIndexes {
        scores: avg_indexes
            .iter()
            .enumerate()
            .map(|(index, &avg_index)| AverageIndex {
                candidate: field.name(index).to_string(),
                avg_index,
            })
            .collect(),
    });
    let wins = pairwise_wins(field, trace);

    let mut standing: Vec<Standing> = (0..field.len())
        .map(|index| Standing {
            index,
            votes: 0,
            proportion: 0.0,
            pairwise_wins: wins[index],
            avg_index: avg_indexes[index],
        })
        .collect();
    // Private working copy; ballots that are empty on input never tally.
    let mut ballots: Vec<Vec<usize>> = field
        .ballots
        .iter()
        .filter(|ballot| !ballot.is_empty())
        .cloned()
        .collect();
    let mut winners: Vec<usize> = Vec::with_capacity(num_seats);

    let mut round: u32 = 0;
    loop {
        if !ballots.is_empty() {
            round += 1;
            let mut counts = vec![0usize; field.len()];
            for ballot in &ballots {
                let first = *ballot
                    .first()
                    .ok_or(TallyError::Invariant("empty ballot reached the tally"))?;
                counts[first] += 1;
            }
            for s in &mut standing {
                s.votes = counts[s.index];
                s.proportion = s.votes as f64 / ballots.len() as f64;
            }
            let mut snapshot: Vec<&Standing> = standing.iter().collect();
            snapshot.sort_by(|a, b| stronger(a, b));
            trace.emit(TraceEvent::Round {
                round,
                ballots: ballots.len(),
                standings: snapshot.iter().map(|s| s.snapshot(field)).collect(),
            });
        }

        let seats_open = num_seats - winners.len();

        // Everyone still standing fits the open seats: seat them all.
        if standing.len() <= seats_open {
            standing.sort_by(stronger);
            if !standing.is_empty() {
                trace.emit(TraceEvent::RemainderFill {
                    round,
                    candidates: standing
                        .iter()
                        .map(|s| field.name(s.index).to_string())
                        .collect(),
                });
            }
            for s in standing.drain(..) {
                trace.emit(TraceEvent::Seated {
                    round,
                    standing: s.snapshot(field),
                });
                winners.push(s.index);
            }
            break;
        }

        if ballots.is_empty() {
            trace.emit(TraceEvent::BallotsExhausted {
                round,
                seats_unfilled: seats_open,
            });
            break;
        }

        let (mut qualified, rest): (Vec<Standing>, Vec<Standing>) = standing
            .into_iter()
            .partition(|s| s.proportion >= quota);
        standing = rest;

        if !qualified.is_empty() {
            trace.emit(TraceEvent::QuotaReached {
                round,
                quota,
                candidates: qualified
                    .iter()
                    .map(|s| field.name(s.index).to_string())
                    .collect(),
            });
            // More quota winners than open seats: set the weakest aside,
            // they stay standing for later rounds.
            while winners.len() + qualified.len() > num_seats {
                let worst = qualified
                    .iter()
                    .enumerate()
                    .min_by(|(_, a), (_, b)| weaker(a, b))
                    .map(|(position, _)| position)
                    .ok_or(TallyError::Invariant("set-aside on an empty winner set"))?;
                let s = qualified.remove(worst);
                trace.emit(TraceEvent::SetAside {
                    round,
                    candidate: field.name(s.index).to_string(),
                });
                standing.push(s);
            }
            qualified.sort_by(stronger);
            for s in qualified {
                trace.emit(TraceEvent::Seated {
                    round,
                    standing: s.snapshot(field),
                });
                strip(&mut ballots, s.index);
                winners.push(s.index);
            }
            if winners.len() == num_seats {
                break;
            }
        } else {
            let worst = standing
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| weaker(a, b))
                .map(|(position, _)| position)
                .ok_or(TallyError::Invariant("elimination with nobody standing"))?;
            let s = standing.remove(worst);
            trace.emit(TraceEvent::Eliminated {
                round,
                standing: s.snapshot(field),
            });
            strip(&mut ballots, s.index);
        }

        ballots.retain(|ballot| !ballot.is_empty());
    }

    Ok(winners)
}
