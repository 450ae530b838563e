// Primitives for reading ballot CSV files.
//
// Layout: a banner line, then the header row, then one row per ballot.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::StringRecord;

use crate::election::{
    fields::{BallotField, BallotRecord},
    io_common::{IngestReport, RowIssue},
    *,
};

// The banner is line 1 and the header line 2.
const HEADER_LINENO: usize = 2;

pub fn read_csv_ballots(path: &Path) -> ElectionResult<IngestReport> {
    let p = path.display().to_string();
    info!("Attempting to read ballot file {:?}", p);
    let file = File::open(path).context(OpeningCsvSnafu { path: p.clone() })?;
    read_ballot_rows(BufReader::new(file), &p)
}

/// Reads ballots from any buffered source. `origin` names the source in
/// errors and logs.
pub fn read_ballot_rows<R: BufRead>(mut input: R, origin: &str) -> ElectionResult<IngestReport> {
    let mut banner = String::new();
    let read = input
        .read_line(&mut banner)
        .context(ReadingCsvSnafu { path: origin })?;
    if read == 0 {
        warn!("read_ballot_rows: {} is empty", origin);
        return Ok(IngestReport::default());
    }
    debug!("read_ballot_rows: skipping banner {:?}", banner.trim_end());

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let header = rdr
        .headers()
        .context(CsvParseSnafu { path: origin })?
        .clone();
    let columns = header_columns(&header, origin)?;
    debug!("read_ballot_rows: columns {:?}", columns);

    let mut report = IngestReport::default();
    for (idx, row_r) in rdr.records().enumerate() {
        let row = row_r.context(CsvParseSnafu { path: origin })?;
        // Positions count lines from the header, the banner comes before.
        let lineno = row
            .position()
            .map(|p| p.line() as usize + 1)
            .unwrap_or(idx + HEADER_LINENO + 1);
        if row.len() > columns.len() {
            warn!(
                "read_ballot_rows: line {}: ignoring {} extra values",
                lineno,
                row.len() - columns.len()
            );
        }
        let (record, issues) = parse_row(&columns, &row, lineno);
        report.push(record, issues);
    }
    info!(
        "Read {} ballots from {} ({} valid, {} issues)",
        report.records.len(),
        origin,
        report.valid_votes,
        report.issues.len()
    );
    Ok(report)
}

/// Maps each header column to its field. An unknown column name means the
/// file does not follow the ballot schema.
fn header_columns(header: &StringRecord, origin: &str) -> ElectionResult<Vec<BallotField>> {
    let mut columns: Vec<BallotField> = Vec::new();
    for name in header.iter() {
        let name = name.trim();
        let field = BallotField::from_column(name).context(UnknownFieldNameSnafu {
            name,
            path: origin,
        })?;
        if columns.contains(&field) {
            warn!("header_columns: column {} appears more than once", field);
        }
        columns.push(field);
    }
    Ok(columns)
}

fn parse_row(
    columns: &[BallotField],
    row: &StringRecord,
    lineno: usize,
) -> (BallotRecord, Vec<RowIssue>) {
    let mut record = BallotRecord::default();
    let mut issues: Vec<RowIssue> = Vec::new();
    for field in BallotField::ALL {
        // The last column with this name wins.
        let raw = columns
            .iter()
            .rposition(|c| *c == field)
            .and_then(|idx| row.get(idx));
        let raw = match raw {
            Some(raw) => raw,
            None => {
                let issue = RowIssue::MissingField { lineno, field };
                error!("{}", issue);
                issues.push(issue);
                continue;
            }
        };
        match field.parser()(raw) {
            Ok(value) => record.store(field, value),
            Err(error) => {
                let issue = RowIssue::Coercion {
                    lineno,
                    field,
                    error,
                };
                error!("{}", issue);
                record.store_raw(field, raw);
                issues.push(issue);
            }
        }
    }
    (record, issues)
}
