use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process;

use votecount::formats::plain::read_election;
use votecount::{run, NoTrace, Rule, RuleParams, TextTrace, TraceSink};

/// Tabulate the results of a ranked-ballot election.
#[derive(Parser)]
#[clap(name = "votecount")]
struct Opts {
    /// Counting rule. One of stv, borda, borda_even, borda_exp, dowdall,
    /// condorcet.
    system: String,
    /// Number of seats to fill / winners to pick. Rules that produce a
    /// full ranking ignore it.
    num_seats: usize,
    /// Input file with candidates and ballots.
    input_file: PathBuf,
    /// Explain how the result was arrived at.
    #[clap(long)]
    explain: bool,
    /// Print the result as a JSON array instead of one line per winner.
    #[clap(long)]
    json: bool,
    /// Limit the number of listed candidates scored per ballot. Ignored by
    /// some counting rules.
    #[clap(long)]
    max_per_vote: Option<usize>,
    /// Weighting factor for counting rules such as borda_exp. Intended to
    /// be below 1.
    #[clap(long)]
    weight: Option<f64>,
}

fn main() {
    let opts = Opts::parse();
    if let Err(e) = tabulate(&opts) {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(1);
    }
}

fn tabulate(opts: &Opts) -> Result<(), Box<dyn std::error::Error>> {
    let rule: Rule = opts.system.parse()?;
    let election = read_election(&opts.input_file)?;
    let params = RuleParams {
        max_per_vote: opts.max_per_vote,
        weight: opts.weight,
    };

    let mut text_trace = TextTrace::stdout();
    let mut no_trace = NoTrace;
    let trace: &mut dyn TraceSink = if opts.explain {
        &mut text_trace
    } else {
        &mut no_trace
    };

    let winners = run(
        rule,
        opts.num_seats,
        &election.candidates,
        &election.votes,
        &params,
        trace,
    )?;

    if opts.json {
        let ids: Vec<&str> = winners.iter().map(|winner| winner.id()).collect();
        println!("{}", serde_json::to_string(&ids)?);
    } else {
        if opts.explain {
            println!("======== RESULTS ========");
        }
        for winner in &winners {
            println!("{}", winner.id().green());
        }
    }

    Ok(())
}
