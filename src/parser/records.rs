use crate::parser::validators::{
    date_year, valid_date, valid_name, valid_positive_float, valid_zip, zip_prefix,
};
use csv::ByteRecord;
use rust_decimal::prelude::{Decimal, FromPrimitive};
use std::str;
use thiserror::Error;

/// Donation amounts. Decimal, so the text of an amount is kept exactly,
/// sums of amounts are exact and amounts are totally ordered.
pub type Amount = Decimal;

/// positions of the fields we care about in a contribution line (0-indexed)
pub const CMTE_ID: usize = 0;
pub const NAME: usize = 7;
pub const ZIP_CODE: usize = 10;
pub const TRANSACTION_DT: usize = 13;
pub const TRANSACTION_AMT: usize = 14;
pub const OTHER_ID: usize = 15;
/// lines with fewer fields do not follow the contribution file layout
pub const MIN_FIELDS: usize = 21;

/// Reasons a single line is discarded. These never abort a run.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum RecordError {
    #[error("expected at least 21 fields, found {0}")]
    TooFewFields(usize),
    #[error("field {0} is not valid utf-8")]
    Encoding(usize),
    #[error("contribution from another committee")]
    OtherId,
    #[error("missing committee id")]
    MissingCommittee,
    #[error("invalid transaction amount")]
    InvalidAmount,
    #[error("invalid donor name")]
    InvalidName,
    #[error("invalid zip code")]
    InvalidZip,
    #[error("invalid transaction date")]
    InvalidDate,
}

impl RecordError {
    /// short name of the check that failed
    pub fn kind(&self) -> &'static str {
        match self {
            RecordError::TooFewFields(_) => "too_few_fields",
            RecordError::Encoding(_) => "encoding",
            RecordError::OtherId => "other_id",
            RecordError::MissingCommittee => "missing_committee",
            RecordError::InvalidAmount => "invalid_amount",
            RecordError::InvalidName => "invalid_name",
            RecordError::InvalidZip => "invalid_zip",
            RecordError::InvalidDate => "invalid_date",
        }
    }
}

/// One admitted contribution, reduced to the fields the aggregation uses.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DonationRecord {
    pub cmte_id: String,
    pub name: String,
    pub zip_code: String,
    pub year: i32,
    pub amount: Amount,
}

impl DonationRecord {
    /// Validates a raw contribution line.
    /// Checks run in a fixed order and the first failing one is reported:
    /// field count, other id, committee id, amount, name, zip, date.
    pub fn from_record(record: &ByteRecord) -> Result<Self, RecordError> {
        if record.len() < MIN_FIELDS {
            return Err(RecordError::TooFewFields(record.len()));
        }
        let field = |idx: usize| field_str(record, idx);

        // contributions from other committees are not individual donations
        if !field(OTHER_ID)?.is_empty() {
            return Err(RecordError::OtherId);
        }
        let cmte_id = field(CMTE_ID)?;
        if cmte_id.is_empty() {
            return Err(RecordError::MissingCommittee);
        }
        let amount_str = field(TRANSACTION_AMT)?;
        if !valid_positive_float(amount_str) {
            return Err(RecordError::InvalidAmount);
        }
        let amount = parse_amount(amount_str).ok_or(RecordError::InvalidAmount)?;
        let name = field(NAME)?;
        if !valid_name(name) {
            return Err(RecordError::InvalidName);
        }
        let zip_code = field(ZIP_CODE)?;
        if !valid_zip(zip_code) {
            return Err(RecordError::InvalidZip);
        }
        let transaction_dt = field(TRANSACTION_DT)?;
        if !valid_date(transaction_dt) {
            return Err(RecordError::InvalidDate);
        }
        let year = date_year(transaction_dt).ok_or(RecordError::InvalidDate)?;

        Ok(DonationRecord {
            cmte_id: cmte_id.to_string(),
            name: name.to_string(),
            zip_code: zip_prefix(zip_code).to_string(),
            year,
            amount,
        })
    }
}

/// `idx` must be below `record.len()`
fn field_str(record: &ByteRecord, idx: usize) -> Result<&str, RecordError> {
    str::from_utf8(&record[idx]).map_err(|_| RecordError::Encoding(idx))
}

/// Parses a decimal amount exactly. Scientific notation is accepted.
/// Anything else `f64` can read (more than 28 significant digits) goes through
/// `f64`. Values out of the decimal range, including infinities, are `None`.
pub fn parse_amount(s: &str) -> Option<Amount> {
    s.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(Decimal::from_f64))
}
