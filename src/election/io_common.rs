use std::fmt::Display;

use crate::election::fields::{BallotField, BallotRecord, CoercionError};
use log::warn;

/// A data-quality problem found in one row. The row is still kept.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RowIssue {
    MissingField {
        lineno: usize,
        field: BallotField,
    },
    Coercion {
        lineno: usize,
        field: BallotField,
        error: CoercionError,
    },
}

impl RowIssue {
    pub fn lineno(&self) -> usize {
        match self {
            RowIssue::MissingField { lineno, .. } | RowIssue::Coercion { lineno, .. } => *lineno,
        }
    }
}

impl Display for RowIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowIssue::MissingField { lineno, field } => {
                write!(f, "Field {} not found at line {}", field, lineno)
            }
            RowIssue::Coercion {
                lineno,
                field,
                error,
            } => write!(
                f,
                "Field {} could not be converted at line {}: {}",
                field, lineno, error
            ),
        }
    }
}

/// Everything a reader produced for one input.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct IngestReport {
    /// The ballots, in input order.
    pub records: Vec<BallotRecord>,
    pub valid_votes: u64,
    pub issues: Vec<RowIssue>,
}

impl IngestReport {
    pub fn from_records(records: Vec<BallotRecord>) -> IngestReport {
        let mut report = IngestReport::default();
        for r in records {
            report.push(r, vec![]);
        }
        report
    }

    /// Appends a ballot. Ballots are never dropped, whatever their issues.
    pub fn push(&mut self, record: BallotRecord, mut issues: Vec<RowIssue>) {
        if record.valid_candidate().is_some() {
            self.valid_votes += 1;
        } else if record.valid.value() == Some(&true) {
            warn!("Ballot {:?} is flagged valid but names no candidate", record);
        }
        self.records.push(record);
        self.issues.append(&mut issues);
    }
}
