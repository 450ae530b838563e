// Typed fields of a ballot row and the coercion table that fills them.

use std::fmt::Display;
use std::num::ParseIntError;

use log::warn;
use majority_runoff::Vote;
use snafu::{ResultExt, Snafu};

/// The columns a ballot file is allowed to contain.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum BallotField {
    Region,
    Province,
    District,
    VoterId,
    Candidate,
    Valid,
}

impl BallotField {
    pub const ALL: [BallotField; 6] = [
        BallotField::Region,
        BallotField::Province,
        BallotField::District,
        BallotField::VoterId,
        BallotField::Candidate,
        BallotField::Valid,
    ];

    /// Name of the column in the header row.
    pub fn column_name(self) -> &'static str {
        match self {
            BallotField::Region => "region",
            BallotField::Province => "provincia",
            BallotField::District => "distrito",
            BallotField::VoterId => "dni",
            BallotField::Candidate => "candidato",
            BallotField::Valid => "esvalido",
        }
    }

    pub fn from_column(name: &str) -> Option<BallotField> {
        BallotField::ALL
            .into_iter()
            .find(|f| f.column_name() == name)
    }

    /// The parser applied to every raw value of this column.
    pub fn parser(self) -> FieldParser {
        match self {
            BallotField::Region
            | BallotField::Province
            | BallotField::District
            | BallotField::Candidate => parse_text,
            BallotField::VoterId => parse_integer,
            BallotField::Valid => parse_flag,
        }
    }
}

impl Display for BallotField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[snafu(display("{raw:?} is not an integer"))]
    NotAnInteger { raw: String, source: ParseIntError },
    #[snafu(display("{raw:?} is not a boolean"))]
    NotABoolean { raw: String },
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Flag(bool),
}

impl FieldValue {
    fn expected_type(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) => "integer",
            FieldValue::Flag(_) => "boolean",
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

pub type FieldParser = fn(&str) -> Result<FieldValue, CoercionError>;

pub fn parse_text(raw: &str) -> Result<FieldValue, CoercionError> {
    Ok(FieldValue::Text(raw.to_string()))
}

pub fn parse_integer(raw: &str) -> Result<FieldValue, CoercionError> {
    let x = raw
        .trim()
        .parse::<i64>()
        .context(NotAnIntegerSnafu { raw })?;
    Ok(FieldValue::Integer(x))
}

pub fn parse_flag(raw: &str) -> Result<FieldValue, CoercionError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "si" | "sí" => Ok(FieldValue::Flag(true)),
        "false" | "0" | "no" => Ok(FieldValue::Flag(false)),
        _ => NotABooleanSnafu { raw }.fail(),
    }
}

/// The state of one field after coercion.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Field<T> {
    /// The column was not present for this row.
    Missing,
    /// The value could not be coerced and is kept as read.
    Raw(String),
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Missing
    }
}

impl<T> Field<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(x) => Some(x),
            _ => None,
        }
    }
}

/// One cast ballot.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct BallotRecord {
    pub region: Field<String>,
    pub province: Field<String>,
    pub district: Field<String>,
    pub voter_id: Field<i64>,
    pub candidate: Field<String>,
    pub valid: Field<bool>,
}

impl BallotRecord {
    pub fn new(
        region: &str,
        province: &str,
        district: &str,
        voter_id: i64,
        candidate: &str,
        valid: bool,
    ) -> BallotRecord {
        BallotRecord {
            region: Field::Value(region.to_string()),
            province: Field::Value(province.to_string()),
            district: Field::Value(district.to_string()),
            voter_id: Field::Value(voter_id),
            candidate: Field::Value(candidate.to_string()),
            valid: Field::Value(valid),
        }
    }

    /// Stores a coerced value in the matching slot.
    pub fn store(&mut self, field: BallotField, value: FieldValue) {
        match (field, value) {
            (BallotField::Region, FieldValue::Text(s)) => self.region = Field::Value(s),
            (BallotField::Province, FieldValue::Text(s)) => self.province = Field::Value(s),
            (BallotField::District, FieldValue::Text(s)) => self.district = Field::Value(s),
            (BallotField::Candidate, FieldValue::Text(s)) => self.candidate = Field::Value(s),
            (BallotField::VoterId, FieldValue::Integer(i)) => self.voter_id = Field::Value(i),
            (BallotField::Valid, FieldValue::Flag(b)) => self.valid = Field::Value(b),
            (field, other) => {
                warn!(
                    "store: column {} does not hold {} values, keeping {:?} as text",
                    field,
                    other.expected_type(),
                    other.to_string()
                );
                self.store_raw(field, &other.to_string());
            }
        }
    }

    /// Keeps the value as it was read.
    pub fn store_raw(&mut self, field: BallotField, raw: &str) {
        let raw = raw.to_string();
        match field {
            BallotField::Region => self.region = Field::Raw(raw),
            BallotField::Province => self.province = Field::Raw(raw),
            BallotField::District => self.district = Field::Raw(raw),
            BallotField::VoterId => self.voter_id = Field::Raw(raw),
            BallotField::Candidate => self.candidate = Field::Raw(raw),
            BallotField::Valid => self.valid = Field::Raw(raw),
        }
    }

    /// The candidate this ballot counts for, if it is a valid vote.
    ///
    /// A ballot counts only when its flag coerced to `true` and it names a
    /// candidate.
    pub fn valid_candidate(&self) -> Option<&str> {
        match (&self.valid, &self.candidate) {
            (Field::Value(true), Field::Value(name)) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn to_vote(&self) -> Vote {
        match self.valid_candidate() {
            Some(name) => Vote::valid(name),
            None => {
                let name = match &self.candidate {
                    Field::Value(s) | Field::Raw(s) => s.as_str(),
                    Field::Missing => "",
                };
                Vote::invalid(name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_column_maps_back_to_its_field() {
        for f in BallotField::ALL {
            assert_eq!(BallotField::from_column(f.column_name()), Some(f));
        }
        assert_eq!(BallotField::from_column("candidate"), None);
    }

    #[test]
    fn integer_parser() {
        assert_eq!(parse_integer("40810062"), Ok(FieldValue::Integer(40810062)));
        assert_eq!(parse_integer(" 7 "), Ok(FieldValue::Integer(7)));
        assert!(matches!(
            parse_integer("4O81"),
            Err(CoercionError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn flag_parser() {
        for s in ["True", "true", "1", "SI", "sí", " yes "] {
            assert_eq!(parse_flag(s), Ok(FieldValue::Flag(true)), "{}", s);
        }
        for s in ["False", "false", "0", "no"] {
            assert_eq!(parse_flag(s), Ok(FieldValue::Flag(false)), "{}", s);
        }
        assert_eq!(
            parse_flag("maybe"),
            Err(CoercionError::NotABoolean {
                raw: "maybe".to_string()
            })
        );
    }

    #[test]
    fn text_is_kept_as_is() {
        assert_eq!(
            parse_text(" Áncash"),
            Ok(FieldValue::Text(" Áncash".to_string()))
        );
    }

    #[test]
    fn mismatched_value_is_kept_raw() {
        let mut r = BallotRecord::default();
        r.store(BallotField::VoterId, FieldValue::Text("abc".to_string()));
        assert_eq!(r.voter_id, Field::Raw("abc".to_string()));
    }

    #[test]
    fn only_flagged_ballots_with_candidate_count() {
        let r = BallotRecord::new("R", "P", "D", 1, "Ann", true);
        assert_eq!(r.valid_candidate(), Some("Ann"));
        assert_eq!(r.to_vote(), Vote::valid("Ann"));

        let r = BallotRecord::new("R", "P", "D", 1, "Ann", false);
        assert_eq!(r.valid_candidate(), None);
        assert_eq!(r.to_vote(), Vote::invalid("Ann"));

        let mut r = BallotRecord::new("R", "P", "D", 1, "Ann", true);
        r.candidate = Field::Missing;
        assert_eq!(r.valid_candidate(), None);
        assert_eq!(r.to_vote(), Vote::invalid(""));

        let mut r = BallotRecord::new("R", "P", "D", 1, "Ann", true);
        r.store_raw(BallotField::Valid, "perhaps");
        assert_eq!(r.valid_candidate(), None);
    }
}
