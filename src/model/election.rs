use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, thiserror::Error)]
pub enum BallotError {
    #[error("candidate \"{0}\" appears more than once on a ballot")]
    RepeatedCandidate(String),
}

/// A candidate, identified by an opaque unique string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    id: String,
}

impl Candidate {
    pub fn new<S: Into<String>>(id: S) -> Candidate {
        Candidate { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// One voter's ranked ballot: candidate identifiers in preference order,
/// each at most once. The ballot may omit any candidates (truncation);
/// position 0 is the first preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    choices: Vec<String>,
}

impl Vote {
    /// Build a validated ballot. Fails if any identifier repeats.
    pub fn new<S: Into<String>>(choices: Vec<S>) -> Result<Vote, BallotError> {
        let choices: Vec<String> = choices.into_iter().map(Into::into).collect();
        let mut seen: HashSet<&str> = HashSet::with_capacity(choices.len());
        for choice in &choices {
            if !seen.insert(choice) {
                return Err(BallotError::RepeatedCandidate(choice.clone()));
            }
        }
        Ok(Vote { choices })
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

/// A full election: the candidate field plus the ballots cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    pub candidates: Vec<Candidate>,
    pub votes: Vec<Vote>,
}

impl Election {
    pub fn new(candidates: Vec<Candidate>, votes: Vec<Vote>) -> Election {
        Election { candidates, votes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_rejects_repeated_candidate() {
        let err = Vote::new(vec!["0", "1", "0"]).unwrap_err();
        assert!(matches!(err, BallotError::RepeatedCandidate(ref id) if id == "0"));
    }

    #[test]
    fn vote_accepts_truncated_ballot() {
        let vote = Vote::new(vec!["2"]).unwrap();
        assert_eq!(vote.choices(), ["2".to_string()]);
    }

    #[test]
    fn vote_accepts_empty_ballot() {
        let vote = Vote::new(Vec::<String>::new()).unwrap();
        assert!(vote.is_empty());
    }
}
