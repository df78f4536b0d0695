//! Plain-text election files. The first line lists the candidate
//! identifiers, whitespace-separated; every following non-blank line is
//! one ballot in preference order, optionally prefixed with a voter label
//! ending in a colon, which is ignored.

use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::model::election::{BallotError, Candidate, Election, Vote};

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("input file has no candidate line")]
    MissingCandidates,
    #[error("invalid ballot: {0}")]
    Ballot(#[from] BallotError),
}

pub fn read_election(path: &Path) -> Result<Election, FormatError> {
    let text = fs::read_to_string(path).map_err(|source| FormatError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_election(&text)
}

pub fn parse_election(text: &str) -> Result<Election, FormatError> {
    lazy_static! {
        static ref VOTER_LABEL: Regex = Regex::new(r"^.*:\s*").unwrap();
    }

    let mut lines = text.lines();
    let candidates: Vec<Candidate> = lines
        .next()
        .ok_or(FormatError::MissingCandidates)?
        .split_whitespace()
        .map(Candidate::new)
        .collect();

    let mut votes = Vec::new();
    for line in lines {
        let ballot = VOTER_LABEL.replace(line, "");
        let choices: Vec<&str> = ballot.split_whitespace().collect();
        if choices.is_empty() {
            continue;
        }
        votes.push(Vote::new(choices)?);
    }

    Ok(Election::new(candidates, votes))
}
