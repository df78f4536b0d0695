//! Single-pass positional rules: one sweep over the ballots accumulates a
//! per-candidate score, and the full field is returned by descending
//! score. No elimination, no transfers.

use super::{Field, RuleParams, TallyError, TallyResult};
use crate::trace::{ScoreStanding, TraceEvent, TraceSink};

/// Full ranking by descending points, ties by candidate-list order.
fn ranking_by_points(points: &[f64]) -> Vec<usize> {
    let mut ranking: Vec<usize> = (0..points.len()).collect();
    ranking.sort_by(|&a, &b| points[b].total_cmp(&points[a]).then_with(|| a.cmp(&b)));
    ranking
}

fn emit_standings(
    field: &Field,
    points: &[f64],
    ballots_counted: usize,
    trace: &mut dyn TraceSink,
) {
    trace.emit(TraceEvent::ScoreStandings {
        ballots_counted,
        standings: ranking_by_points(points)
            .into_iter()
            .map(|index| ScoreStanding {
                candidate: field.name(index).to_string(),
                points: points[index],
            })
            .collect(),
    });
}

/// The per-ballot point cap: `max_per_vote` when given, the candidate
/// count otherwise.
fn max_points(field: &Field, params: &RuleParams) -> TallyResult<usize> {
    match params.max_per_vote {
        Some(0) => Err(TallyError::InvalidParameter {
            param: "max_per_vote",
            reason: "must be at least 1",
        }),
        Some(max) => Ok(max),
        None => Ok(field.len()),
    }
}

/// Borda count: the first listed candidate earns the cap, each following
/// one earns one point fewer, down to zero. Unlisted candidates earn
/// nothing.
pub(crate) fn borda(
    field: &Field,
    params: &RuleParams,
    trace: &mut dyn TraceSink,
) -> TallyResult<Vec<usize>> {
    let max = max_points(field, params)?;
    let mut points = vec![0.0; field.len()];
    for (counted, ballot) in field.ballots.iter().enumerate() {
        let mut value = max;
        for &choice in ballot {
            if value == 0 {
                break;
            }
            points[choice] += value as f64;
            value -= 1;
        }
        emit_standings(field, &points, counted + 1, trace);
    }
    Ok(ranking_by_points(&points))
}

/// Borda count where each ballot spends the same total mass,
/// `max * (max + 1) / 2`: whatever the listed candidates did not take is
/// split evenly across the candidates the ballot omits.
pub(crate) fn borda_even(
    field: &Field,
    params: &RuleParams,
    trace: &mut dyn TraceSink,
) -> TallyResult<Vec<usize>> {
    let max = max_points(field, params)?;
    let total = max * (max + 1) / 2;
    let mut points = vec![0.0; field.len()];
    let mut listed = vec![false; field.len()];
    for (counted, ballot) in field.ballots.iter().enumerate() {
        for flag in listed.iter_mut() {
            *flag = false;
        }
        let mut value = max;
        let mut dealt = 0usize;
        for &choice in ballot {
            listed[choice] = true;
            if value > 0 {
                points[choice] += value as f64;
                dealt += value;
                value -= 1;
            }
        }
        let omitted: Vec<usize> = (0..field.len()).filter(|&i| !listed[i]).collect();
        if !omitted.is_empty() {
            let share = (total - dealt) as f64 / omitted.len() as f64;
            for &choice in &omitted {
                points[choice] += share;
            }
        }
        emit_standings(field, &points, counted + 1, trace);
    }
    Ok(ranking_by_points(&points))
}

/// Borda count with exponential position weights: the candidate listed at
/// 0-based position i earns `weight^i`.
pub(crate) fn borda_exp(
    field: &Field,
    params: &RuleParams,
    trace: &mut dyn TraceSink,
) -> TallyResult<Vec<usize>> {
    let weight = params.weight.ok_or(TallyError::MissingParameter {
        rule: "borda_exp",
        param: "weight",
    })?;
    if !weight.is_finite() || weight <= 0.0 {
        return Err(TallyError::InvalidParameter {
            param: "weight",
            reason: "must be a positive number",
        });
    }
    let mut points = vec![0.0; field.len()];
    for (counted, ballot) in field.ballots.iter().enumerate() {
        for (position, &choice) in ballot.iter().enumerate() {
            points[choice] += weight.powi(position as i32);
        }
        emit_standings(field, &points, counted + 1, trace);
    }
    Ok(ranking_by_points(&points))
}

/// Dowdall count: the candidate listed at 0-based position i earns
/// `1 / (i + 1)`.
pub(crate) fn dowdall(
    field: &Field,
    _params: &RuleParams,
    trace: &mut dyn TraceSink,
) -> TallyResult<Vec<usize>> {
    let mut points = vec![0.0; field.len()];
    for (counted, ballot) in field.ballots.iter().enumerate() {
        for (position, &choice) in ballot.iter().enumerate() {
            points[choice] += 1.0 / (position as f64 + 1.0);
        }
        emit_standings(field, &points, counted + 1, trace);
    }
    Ok(ranking_by_points(&points))
}
