//! Audit-trace side channel. Engines emit structured events through an
//! explicit sink parameter; the sink never affects the returned result.

use serde::Serialize;
use std::fmt;
use std::io;

/// One candidate's standing within an STV round.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStanding {
    pub candidate: String,
    pub votes: usize,
    pub proportion: f64,
    pub pairwise_wins: u32,
    pub avg_index: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageIndex {
    pub candidate: String,
    pub avg_index: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreStanding {
    pub candidate: String,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum TraceEvent {
    /// Mean ballot positions, computed once before the first STV round.
    AverageIndexes { scores: Vec<AverageIndex> },
    /// One head-to-head pairing; `winner` is `None` on an exact tie.
    #[serde(rename_all = "camelCase")]
    PairwiseResult {
        left: String,
        left_votes: usize,
        right: String,
        right_votes: usize,
        winner: Option<String>,
    },
    /// Standings at the top of an STV round, strongest first.
    Round {
        round: u32,
        ballots: usize,
        standings: Vec<CandidateStanding>,
    },
    /// Candidates whose proportion met the victory quota this round.
    QuotaReached {
        round: u32,
        quota: f64,
        candidates: Vec<String>,
    },
    /// A quota-meeting candidate set aside because more candidates met the
    /// quota than seats remain; it stays standing for later rounds.
    SetAside { round: u32, candidate: String },
    Seated {
        round: u32,
        standing: CandidateStanding,
    },
    Eliminated {
        round: u32,
        standing: CandidateStanding,
    },
    /// All standing candidates fit the open seats and are seated at once.
    RemainderFill { round: u32, candidates: Vec<String> },
    /// Ballots ran out with open seats and too many candidates standing.
    #[serde(rename_all = "camelCase")]
    BallotsExhausted { round: u32, seats_unfilled: usize },
    /// Positional-rule standings after one more ballot was counted.
    #[serde(rename_all = "camelCase")]
    ScoreStandings {
        ballots_counted: usize,
        standings: Vec<ScoreStanding>,
    },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::AverageIndexes { scores } => {
                write!(f, "Average ballot positions:")?;
                for score in scores {
                    write!(f, "\n\t{}\t{}", score.candidate, score.avg_index)?;
                }
                Ok(())
            }
            TraceEvent::PairwiseResult {
                left,
                left_votes,
                right,
                right_votes,
                winner,
            } => {
                let mark = |candidate: &str| {
                    if winner.as_deref() == Some(candidate) {
                        ", WIN"
                    } else {
                        ""
                    }
                };
                write!(
                    f,
                    "\t{} ({}{})\tvs\t{} ({}{}){}",
                    left,
                    left_votes,
                    mark(left),
                    right,
                    right_votes,
                    mark(right),
                    if winner.is_none() { "\tTIED" } else { "" },
                )
            }
            TraceEvent::Round {
                round,
                ballots,
                standings,
            } => {
                write!(
                    f,
                    "======== ROUND {} ({} ballots) ========\nStandings:",
                    round, ballots
                )?;
                for s in standings {
                    write!(f, "\n\t{}", s)?;
                }
                Ok(())
            }
            TraceEvent::QuotaReached {
                quota, candidates, ..
            } => write!(
                f,
                "{} candidate(s) meet the victory quota of {}: {}",
                candidates.len(),
                quota,
                candidates.join(", ")
            ),
            TraceEvent::SetAside { candidate, .. } => write!(
                f,
                "More quota winners than open seats; {} is set aside and stays standing",
                candidate
            ),
            TraceEvent::Seated { round, standing } => {
                write!(f, "Seated in round {}:\n\t{}", round, standing)
            }
            TraceEvent::Eliminated { standing, .. } => {
                write!(f, "No candidate meets the victory quota. Eliminating:\n\t{}", standing)
            }
            TraceEvent::RemainderFill { candidates, .. } => write!(
                f,
                "Remaining candidates fit the open seats; seating all of them: {}",
                candidates.join(", ")
            ),
            TraceEvent::BallotsExhausted { seats_unfilled, .. } => write!(
                f,
                "Ballots exhausted with {} seat(s) unfilled",
                seats_unfilled
            ),
            TraceEvent::ScoreStandings {
                ballots_counted,
                standings,
            } => {
                write!(f, "======== Standings after ballot {} ========", ballots_counted)?;
                for s in standings {
                    write!(f, "\n\t{}\tpoints={}", s.candidate, s.points)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for CandidateStanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\tvotes={}\tpairwise={}\tavg_index={}",
            self.candidate, self.proportion, self.pairwise_wins, self.avg_index
        )
    }
}

/// Receives trace events. Implementations must not affect tabulation:
/// the engine ignores sink failures and never reads back from the sink.
pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

/// Discards every event. The default sink for callers that do not want a
/// trace.
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn emit(&mut self, _event: TraceEvent) {}
}

/// Writes one human-readable line (possibly spanning multiple text lines)
/// per event.
pub struct TextTrace<W: io::Write> {
    out: W,
}

impl<W: io::Write> TextTrace<W> {
    pub fn new(out: W) -> TextTrace<W> {
        TextTrace { out }
    }
}

impl TextTrace<io::Stdout> {
    pub fn stdout() -> TextTrace<io::Stdout> {
        TextTrace::new(io::stdout())
    }
}

impl<W: io::Write> TraceSink for TextTrace<W> {
    fn emit(&mut self, event: TraceEvent) {
        let _ = writeln!(self.out, "{}", event);
    }
}

/// Writes one JSON object per line.
pub struct JsonTrace<W: io::Write> {
    out: W,
}

impl<W: io::Write> JsonTrace<W> {
    pub fn new(out: W) -> JsonTrace<W> {
        JsonTrace { out }
    }
}

impl<W: io::Write> TraceSink for JsonTrace<W> {
    fn emit(&mut self, event: TraceEvent) {
        if let Ok(line) = serde_json::to_string(&event) {
            let _ = writeln!(self.out, "{}", line);
        }
    }
}

/// Collects events in memory, for tests and embedders that inspect the
/// count afterwards.
#[derive(Default)]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn new() -> TraceLog {
        TraceLog::default()
    }
}

impl TraceSink for TraceLog {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_trace_writes_one_object_per_line() {
        let mut buf = Vec::new();
        {
            let mut sink = JsonTrace::new(&mut buf);
            sink.emit(TraceEvent::QuotaReached {
                round: 1,
                quota: 0.5,
                candidates: vec!["a".to_string()],
            });
            sink.emit(TraceEvent::BallotsExhausted {
                round: 2,
                seats_unfilled: 1,
            });
        }
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value.get("event").is_some());
        }
    }

    #[test]
    fn pairwise_display_marks_ties() {
        let event = TraceEvent::PairwiseResult {
            left: "a".to_string(),
            left_votes: 2,
            right: "b".to_string(),
            right_votes: 2,
            winner: None,
        };
        assert!(event.to_string().ends_with("TIED"));
    }
}
