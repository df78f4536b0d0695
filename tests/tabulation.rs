use pretty_assertions::assert_eq;
use votecount::formats::plain::parse_election;
use votecount::{
    run, Candidate, JsonTrace, NoTrace, Rule, RuleParams, TallyError, TraceLog, Vote,
};

fn candidates(ids: &[&str]) -> Vec<Candidate> {
    ids.iter().map(|id| Candidate::new(*id)).collect()
}

fn votes(ballots: &[&[&str]]) -> Vec<Vote> {
    ballots
        .iter()
        .map(|ballot| Vote::new(ballot.to_vec()).unwrap())
        .collect()
}

fn ids(winners: &[Candidate]) -> Vec<&str> {
    winners.iter().map(Candidate::id).collect()
}

#[test]
fn every_rule_is_reachable_by_name() {
    let cands = candidates(&["0", "1", "2"]);
    let ballots = votes(&[&["0", "1"], &["1", "0"], &["0"]]);
    for name in &["stv", "borda", "borda_even", "borda_exp", "dowdall", "condorcet"] {
        let rule = Rule::from_name(name).unwrap();
        let params = RuleParams {
            weight: Some(0.5),
            ..RuleParams::default()
        };
        let result = run(rule, 1, &cands, &ballots, &params, &mut NoTrace).unwrap();
        assert!(!result.is_empty(), "{} returned nothing", name);
        assert_eq!(result[0].id(), "0", "{} winner", name);
    }
}

#[test]
fn ranking_rules_return_the_full_field() {
    let cands = candidates(&["0", "1", "2", "3"]);
    let ballots = votes(&[&["2", "0"], &["2", "1"]]);
    for rule in &[Rule::Borda, Rule::BordaEven, Rule::Dowdall, Rule::Condorcet] {
        let result = run(
            *rule,
            1,
            &cands,
            &ballots,
            &RuleParams::default(),
            &mut NoTrace,
        )
        .unwrap();
        assert_eq!(result.len(), cands.len());
        assert_eq!(result[0].id(), "2");
    }
}

#[test]
fn stv_returns_exactly_the_requested_seats() {
    let cands = candidates(&["0", "1", "2", "3", "4"]);
    let ballots = votes(&[
        &["2", "1", "0"],
        &["1", "0", "2"],
        &["0", "2", "1"],
        &["3", "2"],
    ]);
    for seats in 1..=5 {
        let winners = run(
            Rule::Stv,
            seats,
            &cands,
            &ballots,
            &RuleParams::default(),
            &mut NoTrace,
        )
        .unwrap();
        assert_eq!(winners.len(), seats, "num_seats = {}", seats);
    }
}

#[test]
fn identical_inputs_yield_identical_output() {
    let cands = candidates(&["0", "1", "2", "3"]);
    let ballots = votes(&[&["0", "3"], &["1", "0"], &["2"], &["3", "1", "2"]]);
    for rule in Rule::ALL {
        let params = RuleParams {
            weight: Some(0.5),
            ..RuleParams::default()
        };
        let first = run(rule, 2, &cands, &ballots, &params, &mut NoTrace).unwrap();
        let second = run(rule, 2, &cands, &ballots, &params, &mut NoTrace).unwrap();
        assert_eq!(ids(&first), ids(&second), "{}", rule.name());
    }
}

#[test]
fn tabulation_leaves_the_inputs_untouched() {
    let cands = candidates(&["0", "1", "2"]);
    let ballots = votes(&[&["0", "1", "2"], &["1", "0"], &["2"]]);
    let cands_before = cands.clone();
    let ballots_before = ballots.clone();
    for rule in Rule::ALL {
        let params = RuleParams {
            weight: Some(0.5),
            ..RuleParams::default()
        };
        run(rule, 2, &cands, &ballots, &params, &mut NoTrace).unwrap();
        assert_eq!(cands, cands_before);
        assert_eq!(ballots, ballots_before);
    }
}

#[test]
fn trace_does_not_change_the_result() {
    let cands = candidates(&["0", "1", "2"]);
    let ballots = votes(&[&["0"], &["1", "0"], &["2"]]);
    let quiet = run(
        Rule::Stv,
        1,
        &cands,
        &ballots,
        &RuleParams::default(),
        &mut NoTrace,
    )
    .unwrap();
    let mut log = TraceLog::new();
    let traced = run(
        Rule::Stv,
        1,
        &cands,
        &ballots,
        &RuleParams::default(),
        &mut log,
    )
    .unwrap();
    assert_eq!(ids(&quiet), ids(&traced));
    assert!(!log.events.is_empty());
}

#[test]
fn json_trace_lines_parse_back() {
    let cands = candidates(&["0", "1", "2"]);
    let ballots = votes(&[&["0"], &["1", "0"], &["2"]]);
    let mut buf = Vec::new();
    run(
        Rule::Stv,
        1,
        &cands,
        &ballots,
        &RuleParams::default(),
        &mut JsonTrace::new(&mut buf),
    )
    .unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.lines().count() > 0);
    for line in text.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value.get("event").is_some(), "untagged line: {}", line);
    }
}

#[test]
fn borda_exp_without_weight_is_a_configuration_error() {
    let cands = candidates(&["0", "1"]);
    let ballots = votes(&[&["0"]]);
    let err = run(
        Rule::BordaExp,
        1,
        &cands,
        &ballots,
        &RuleParams::default(),
        &mut NoTrace,
    )
    .unwrap_err();
    assert!(matches!(err, TallyError::MissingParameter { .. }));
}

#[test]
fn parsed_election_runs_end_to_end() {
    let election = parse_election("0 1 2\na: 0\nb: 1 0\nc: 2\n").unwrap();
    let winners = run(
        Rule::Stv,
        1,
        &election.candidates,
        &election.votes,
        &RuleParams::default(),
        &mut NoTrace,
    )
    .unwrap();
    assert_eq!(ids(&winners), ["0"]);
}
