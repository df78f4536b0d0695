//! Ranked-ballot election tabulation: a Single Transferable Vote engine
//! with pairwise-Condorcet and positional tie-breaking, four single-pass
//! positional counting rules (Borda, Borda-even, Borda-exponential,
//! Dowdall), and a standalone Condorcet ranking.
//!
//! Callers hand the engine a candidate list and validated ballots and get
//! back an ordered candidate list; an optional trace sink exposes how the
//! result was reached.

pub mod formats;
pub mod model;
pub mod rules;
pub mod trace;

pub use crate::model::election::{BallotError, Candidate, Election, Vote};
pub use crate::rules::{run, Rule, RuleParams, TallyError, TallyResult};
pub use crate::trace::{JsonTrace, NoTrace, TextTrace, TraceEvent, TraceLog, TraceSink};
