//! Row normalization
//!
//! Turns one raw record (a CSV row keyed by header, or an HTTP request body)
//! into the fixed-order tuple a table expects. Everything here is pure; the
//! caller decides what to do with a [`SkipReason`].

use crate::error::{CoreError, CoreResult};
use crate::models::{BillRow, ClientRow, NumericField, TransactionInput, TransactionRow};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use paydesk_config::MissingAmountPolicy;
use std::collections::HashMap;
use thiserror::Error;

/// Storage format of `transaction_datetime`
pub const STORAGE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of `transaction_datetime` in the CSV import files
pub const CSV_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// One source record, keyed by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.fields.insert(key.to_string(), value.to_string());
    }

    /// Value as read, `None` only when the column is absent
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Trimmed value, `None` when absent or blank
    pub fn non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Why a record was left out of an insert batch
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("empty {0}")]
    MissingField(&'static str),

    #[error("{field} is not a number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("transaction_datetime is not DD/MM/YYYY HH:MM: '{0}'")]
    InvalidDatetime(String),
}

// ==================== Field helpers ====================

fn optional_text(record: &RawRecord, field: &str) -> Option<String> {
    record.get(field).map(str::to_string)
}

fn optional_int(record: &RawRecord, field: &'static str) -> Result<Option<i64>, SkipReason> {
    match record.non_blank(field) {
        None => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| SkipReason::InvalidNumber {
                field,
                value: value.to_string(),
            }),
    }
}

fn amount_or(record: &RawRecord, field: &'static str, default: f64) -> Result<f64, SkipReason> {
    match record.non_blank(field) {
        None => Ok(default),
        Some(value) => parse_amount(field, value),
    }
}

fn parse_amount(field: &'static str, value: &str) -> Result<f64, SkipReason> {
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| SkipReason::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

// ==================== Dates ====================

/// Convert `DD/MM/YYYY HH:MM` into `YYYY-MM-DD HH:MM:SS`
///
/// Blank input is not an error and yields `None`. Anything that is not a
/// real calendar date and time in that layout is rejected.
pub fn normalize_csv_datetime(raw: Option<&str>) -> Result<Option<String>, SkipReason> {
    let value = match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => value,
        None => return Ok(None),
    };

    NaiveDateTime::parse_from_str(value, CSV_DATETIME_FORMAT)
        .map(|dt| Some(dt.format(STORAGE_DATETIME_FORMAT).to_string()))
        .map_err(|_| SkipReason::InvalidDatetime(value.to_string()))
}

/// Convert a datetime sent by an API client into the storage format
///
/// Accepts RFC 3339, the storage format itself, the `datetime-local` form
/// value (`YYYY-MM-DDTHH:MM[:SS]`) and a bare date (midnight).
pub fn normalize_api_datetime(raw: &str) -> Option<String> {
    let value = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc().format(STORAGE_DATETIME_FORMAT).to_string());
    }

    for format in [
        STORAGE_DATETIME_FORMAT,
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.format(STORAGE_DATETIME_FORMAT).to_string());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.format(STORAGE_DATETIME_FORMAT).to_string())
}

// ==================== CSV records ====================

/// `01_clients.csv` row → `clients` tuple
pub fn normalize_client(record: &RawRecord) -> Result<ClientRow, SkipReason> {
    let client_id = optional_int(record, "client_id")?.ok_or(SkipReason::MissingField("client_id"))?;
    let name_client = record
        .non_blank("name_client")
        .ok_or(SkipReason::MissingField("name_client"))?;

    Ok(ClientRow {
        client_id,
        name_client: name_client.to_string(),
        identification: optional_text(record, "identification"),
        address: optional_text(record, "address"),
        phone: optional_text(record, "phone"),
        email: optional_text(record, "email"),
    })
}

/// `02_transaction.csv` row → `transactions` tuple
pub fn normalize_transaction(
    record: &RawRecord,
    missing_amount: MissingAmountPolicy,
) -> Result<TransactionRow, SkipReason> {
    let transaction_amount = match (record.non_blank("transaction_amount"), missing_amount) {
        (Some(value), _) => parse_amount("transaction_amount", value)?,
        (None, MissingAmountPolicy::Zero) => 0.0,
        (None, MissingAmountPolicy::Reject) => {
            return Err(SkipReason::MissingField("transaction_amount"))
        }
    };

    Ok(TransactionRow {
        transaction_code: optional_text(record, "transaction_code"),
        transaction_datetime: normalize_csv_datetime(record.get("transaction_datetime"))?,
        transaction_amount,
        transaction_status: optional_text(record, "transaction_status"),
        transaction_type: optional_text(record, "transaction_type"),
        platform_used: optional_text(record, "platform_used"),
        client_id_fk: optional_int(record, "client_id_fk")?,
    })
}

/// `03_bills.csv` row → `bills` tuple; rows without a bill code are skipped
pub fn normalize_bill(record: &RawRecord) -> Result<BillRow, SkipReason> {
    let bill_code = record
        .non_blank("bill_code")
        .ok_or(SkipReason::MissingField("bill_code"))?;

    Ok(BillRow {
        bill_code: bill_code.to_string(),
        billing_period: record.non_blank("billing_period").map(str::to_string),
        invoiced_amount: amount_or(record, "invoiced_amount", 0.0)?,
        paid_amount: amount_or(record, "paid_amount", 0.0)?,
        transaction_id_fk: optional_int(record, "transaction_id_fk")?,
        client_id_fk: optional_int(record, "client_id_fk")?,
    })
}

// ==================== API bodies ====================

fn present_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn present_number(value: &Option<NumericField>) -> Option<&NumericField> {
    value.as_ref().filter(|v| !v.is_blank())
}

/// Check that every required field of a create/update body is present and
/// build the storage tuple
pub fn validate_transaction_input(input: &TransactionInput) -> CoreResult<TransactionRow> {
    let transaction_code = present_text(&input.transaction_code);
    let transaction_status = present_text(&input.transaction_status);
    let transaction_type = present_text(&input.transaction_type);
    let platform_used = present_text(&input.platform_used);
    let amount = present_number(&input.transaction_amount);
    let client = present_number(&input.client_id_fk);

    let mut missing = Vec::new();
    if client.is_none() {
        missing.push("client_id_fk");
    }
    if transaction_code.is_none() {
        missing.push("transaction_code");
    }
    if amount.is_none() {
        missing.push("transaction_amount");
    }
    if transaction_status.is_none() {
        missing.push("transaction_status");
    }
    if transaction_type.is_none() {
        missing.push("transaction_type");
    }
    if platform_used.is_none() {
        missing.push("platform_used");
    }
    if !missing.is_empty() {
        return Err(CoreError::bad_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let transaction_amount = match amount {
        Some(raw) => raw.as_f64().ok_or_else(|| {
            CoreError::bad_request(format!("transaction_amount is not a number: '{}'", raw))
        })?,
        None => 0.0,
    };
    let client_id_fk = match client {
        Some(raw) => Some(raw.as_i64().ok_or_else(|| {
            CoreError::bad_request(format!("client_id_fk is not an integer: '{}'", raw))
        })?),
        None => None,
    };

    let transaction_datetime = match present_text(&input.transaction_datetime) {
        None => None,
        Some(raw) => Some(normalize_api_datetime(&raw).ok_or_else(|| {
            CoreError::bad_request(format!("Invalid transaction_datetime: '{}'", raw))
        })?),
    };

    Ok(TransactionRow {
        transaction_code,
        transaction_datetime,
        transaction_amount,
        transaction_status,
        transaction_type,
        platform_used,
        client_id_fk,
    })
}
