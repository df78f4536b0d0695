//! Counting rules and the dispatch over them. Every rule shares the same
//! entry point: `run(rule, num_seats, candidates, votes, params, trace)`.

use std::collections::HashMap;
use std::str::FromStr;

use crate::model::election::{BallotError, Candidate, Vote};
use crate::trace::TraceSink;

pub mod condorcet;
pub mod positional;
pub mod stv;

#[derive(Debug, thiserror::Error)]
pub enum TallyError {
    #[error("invalid ballot: {0}")]
    Ballot(#[from] BallotError),
    #[error("unknown counting rule \"{0}\"")]
    UnknownRule(String),
    #[error("number of seats must be at least 1")]
    NoSeats,
    #[error("ballot names \"{0}\", which is not in the candidate list")]
    UnknownCandidate(String),
    #[error("candidate \"{0}\" appears more than once in the candidate list")]
    DuplicateCandidate(String),
    #[error("the {rule} rule requires the {param} parameter")]
    MissingParameter {
        rule: &'static str,
        param: &'static str,
    },
    #[error("invalid value for {param}: {reason}")]
    InvalidParameter {
        param: &'static str,
        reason: &'static str,
    },
    #[error("internal count error: {0}")]
    Invariant(&'static str),
}

pub type TallyResult<T> = std::result::Result<T, TallyError>;

/// Rule-specific parameters, forwarded untouched by the adapter. Rules
/// ignore the parameters they do not use.
#[derive(Debug, Clone, Default)]
pub struct RuleParams {
    /// Cap on the number of listed candidates scored per ballot
    /// (Borda and Borda-even). Defaults to the candidate count.
    pub max_per_vote: Option<usize>,
    /// Positional decay factor (Borda-exponential). Required there.
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Stv,
    Borda,
    BordaEven,
    BordaExp,
    Dowdall,
    Condorcet,
}

impl Rule {
    pub const ALL: [Rule; 6] = [
        Rule::Stv,
        Rule::Borda,
        Rule::BordaEven,
        Rule::BordaExp,
        Rule::Dowdall,
        Rule::Condorcet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rule::Stv => "stv",
            Rule::Borda => "borda",
            Rule::BordaEven => "borda_even",
            Rule::BordaExp => "borda_exp",
            Rule::Dowdall => "dowdall",
            Rule::Condorcet => "condorcet",
        }
    }

    pub fn from_name(name: &str) -> Option<Rule> {
        Rule::ALL.iter().copied().find(|rule| rule.name() == name)
    }
}

impl FromStr for Rule {
    type Err = TallyError;

    fn from_str(s: &str) -> TallyResult<Rule> {
        Rule::from_name(s).ok_or_else(|| TallyError::UnknownRule(s.to_string()))
    }
}

/// The candidate field and the ballots, index-mapped for counting. Built
/// once per tabulation from the caller's collections, which stay untouched.
pub(crate) struct Field<'a> {
    names: Vec<&'a str>,
    pub(crate) ballots: Vec<Vec<usize>>,
}

impl<'a> Field<'a> {
    pub(crate) fn new(candidates: &'a [Candidate], votes: &[Vote]) -> TallyResult<Field<'a>> {
        let mut indexes: HashMap<&str, usize> = HashMap::with_capacity(candidates.len());
        for (index, candidate) in candidates.iter().enumerate() {
            if indexes.insert(candidate.id(), index).is_some() {
                return Err(TallyError::DuplicateCandidate(candidate.id().to_string()));
            }
        }
        let ballots = votes
            .iter()
            .map(|vote| {
                vote.choices()
                    .iter()
                    .map(|id| {
                        indexes
                            .get(id.as_str())
                            .copied()
                            .ok_or_else(|| TallyError::UnknownCandidate(id.clone()))
                    })
                    .collect()
            })
            .collect::<TallyResult<Vec<Vec<usize>>>>()?;
        Ok(Field {
            names: candidates.iter().map(Candidate::id).collect(),
            ballots,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }

    pub(crate) fn name(&self, index: usize) -> &str {
        self.names[index]
    }
}

/// Tabulate one election under the given rule. Returns the winners (STV) or
/// the full ranking (every other rule), best first.
pub fn run(
    rule: Rule,
    num_seats: usize,
    candidates: &[Candidate],
    votes: &[Vote],
    params: &RuleParams,
    trace: &mut dyn TraceSink,
) -> TallyResult<Vec<Candidate>> {
    if num_seats == 0 {
        return Err(TallyError::NoSeats);
    }
    let field = Field::new(candidates, votes)?;
    let ranking = match rule {
        Rule::Stv => stv::stv(&field, num_seats, trace)?,
        Rule::Borda => positional::borda(&field, params, trace)?,
        Rule::BordaEven => positional::borda_even(&field, params, trace)?,
        Rule::BordaExp => positional::borda_exp(&field, params, trace)?,
        Rule::Dowdall => positional::dowdall(&field, params, trace)?,
        Rule::Condorcet => condorcet::condorcet(&field, trace),
    };
    Ok(ranking.into_iter().map(|i| candidates[i].clone()).collect())
}


#[cfg(test)]
mod tests {
    use super::testutil::{candidates, votes};
    use super::*;
    use crate::trace::NoTrace;
    use pretty_assertions::assert_eq;

    #[test]
    fn rule_names_round_trip() {
        for rule in Rule::ALL {
            assert_eq!(Rule::from_name(rule.name()), Some(rule));
        }
        assert_eq!(Rule::from_name("approval"), None);
    }

    #[test]
    fn from_str_rejects_unknown_rule() {
        let err = "approval".parse::<Rule>().unwrap_err();
        assert!(matches!(err, TallyError::UnknownRule(ref name) if name == "approval"));
    }

    #[test]
    fn run_rejects_zero_seats() {
        let cands = candidates(&["0", "1"]);
        let ballots = votes(&[&["0"]]);
        let err = run(
            Rule::Borda,
            0,
            &cands,
            &ballots,
            &RuleParams::default(),
            &mut NoTrace,
        )
        .unwrap_err();
        assert!(matches!(err, TallyError::NoSeats));
    }

    #[test]
    fn run_rejects_ballot_with_unknown_candidate() {
        let cands = candidates(&["0", "1"]);
        let ballots = votes(&[&["0", "9"]]);
        let err = run(
            Rule::Stv,
            1,
            &cands,
            &ballots,
            &RuleParams::default(),
            &mut NoTrace,
        )
        .unwrap_err();
        assert!(matches!(err, TallyError::UnknownCandidate(ref id) if id == "9"));
    }

    #[test]
    fn run_rejects_duplicate_candidate_list() {
        let cands = candidates(&["0", "1", "0"]);
        let ballots = votes(&[&["0"]]);
        let err = run(
            Rule::Stv,
            1,
            &cands,
            &ballots,
            &RuleParams::default(),
            &mut NoTrace,
        )
        .unwrap_err();
        assert!(matches!(err, TallyError::DuplicateCandidate(ref id) if id == "0"));
    }
}
