use log::{debug, error, info, warn};

use majority_runoff::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;

use crate::election::config_reader::*;
use crate::election::io_common::{IngestReport, RowIssue};
use crate::election::fields::BallotRecord;

pub mod config_reader;
pub mod fields;
pub mod io_common;
pub mod io_csv;
pub mod io_sample;

#[derive(Debug, Snafu)]
pub enum ElectionError {
    #[snafu(display("Error opening ballot file {path}"))]
    OpeningCsv {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading ballot file {path}"))]
    ReadingCsv {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing ballot file {path}"))]
    CsvParse { source: csv::Error, path: String },
    #[snafu(display("Unknown column {name:?} in the header of {path}"))]
    UnknownFieldName { name: String, path: String },

    #[snafu(display("Error opening config file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing config file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Config file {path} has no parent directory"))]
    MissingParentDir { path: String },

    #[snafu(display("Error serializing the summary"))]
    SerializingSummary { source: serde_json::Error },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },

    #[snafu(display("Counting failed"))]
    Voting { source: VotingErrors },
}

pub type ElectionResult<T> = Result<T, ElectionError>;

/// Where the ballots come from.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum BallotSource {
    /// The built-in sample ballots. Meant for demonstrations and tests.
    Sample,
    Csv(PathBuf),
}

pub fn read_ballots(source: &BallotSource) -> ElectionResult<IngestReport> {
    match source {
        BallotSource::Sample => {
            info!("Using sample ballots");
            Ok(IngestReport::from_records(io_sample::sample_ballots()))
        }
        BallotSource::Csv(p) => {
            info!("Using csv data from {}", p.display());
            io_csv::read_csv_ballots(p)
        }
    }
}

/// Reads the ballots once at construction, then decides the election.
#[derive(Debug, Clone)]
pub struct WinnerCalculator {
    config: ElectionConfig,
    ingested: IngestReport,
}

impl WinnerCalculator {
    pub fn new(config: ElectionConfig) -> ElectionResult<WinnerCalculator> {
        let ingested = read_ballots(&config.source())?;
        if let Some(first) = ingested.issues.first() {
            warn!(
                "{} problems found while reading the ballots, the first one at line {}",
                ingested.issues.len(),
                first.lineno()
            );
        }
        Ok(WinnerCalculator { config, ingested })
    }

    pub fn config(&self) -> &ElectionConfig {
        &self.config
    }

    pub fn records(&self) -> &[BallotRecord] {
        &self.ingested.records
    }

    pub fn valid_votes(&self) -> u64 {
        self.ingested.valid_votes
    }

    pub fn issues(&self) -> &[RowIssue] {
        &self.ingested.issues
    }

    /// Counts the ballots without printing anything.
    pub fn count(&self) -> ElectionResult<VotingResult> {
        let votes: Vec<Vote> = self.ingested.records.iter().map(|r| r.to_vote()).collect();
        run_majority_runoff(&votes, self.ingested.valid_votes).context(VotingSnafu {})
    }

    /// Counts the ballots and prints the valid votes of every candidate.
    pub fn run_with_result(&self) -> ElectionResult<VotingResult> {
        let result = self.count()?;
        for line in tally_lines(&result) {
            println!("{}", line);
        }
        Ok(result)
    }

    /// The winner with no runner-up, or the two candidates of the runoff.
    pub fn run(&self) -> ElectionResult<(String, Option<String>)> {
        Ok(self.run_with_result()?.winner_and_runner_up())
    }
}

fn tally_lines(rv: &VotingResult) -> Vec<String> {
    rv.tally
        .iter()
        .map(|(name, count)| format!("candidate: {} valid votes: {}", name, count))
        .collect()
}

fn build_summary_js(config: &ElectionConfig, rv: &VotingResult) -> JSValue {
    let tally: Vec<JSValue> = rv
        .tally
        .iter()
        .map(|(name, count)| json!({"candidate": name, "validVotes": count}))
        .collect();
    let (winner, runoff) = match &rv.decision {
        Decision::Winner(name) => (json!(name), JSValue::Null),
        Decision::Runoff(first, second) => (JSValue::Null, json!([first, second])),
    };
    json!({
        "config": config,
        "results": {
            "totalValidVotes": rv.total_valid,
            "contested": rv.has_contest(),
            "tally": tally,
            "winner": winner,
            "runoff": runoff,
        }
    })
}

fn write_summary(dest: &str, summary: &JSValue) -> ElectionResult<()> {
    let pretty_js = serde_json::to_string_pretty(summary).context(SerializingSummarySnafu {})?;
    if dest == "stdout" {
        println!("{}", pretty_js);
    } else {
        info!("Writing summary to {}", dest);
        fs::write(dest, pretty_js).context(WritingSummarySnafu { path: dest })?;
    }
    Ok(())
}

/// Runs a full election.
///
/// `input` and `out` override the `sourcePath` and `outputPath` of the
/// configuration file, if any.
pub fn run_election(
    config_path: Option<String>,
    input: Option<String>,
    out: Option<String>,
) -> ElectionResult<VotingResult> {
    let mut config = match config_path {
        Some(p) => read_config(&p)?,
        None => ElectionConfig::default(),
    };
    if input.is_some() {
        config.source_path = input;
    }
    if out.is_some() {
        config.output_path = out;
    }
    info!("config: {:?}", config);

    let calculator = WinnerCalculator::new(config)?;
    info!(
        "{} ballots read, {} valid, {} with problems",
        calculator.records().len(),
        calculator.valid_votes(),
        calculator.issues().len()
    );
    let result = calculator.run_with_result()?;
    debug!("run_election: result {:?}", result);

    if let Some(dest) = &calculator.config().output_path {
        write_summary(dest, &build_summary_js(calculator.config(), &result))?;
    }
    Ok(result)
}
