//! Row types read from and written to the three tables

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Exact status counted by the total-paid report
pub const STATUS_COMPLETED: &str = "Completed";

// ==================== Read models ====================

/// `GET /clients` row
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ClientSummary {
    pub client_id: i64,
    pub name_client: String,
}

/// Full transaction row, as stored
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: i64,
    pub transaction_code: Option<String>,
    pub transaction_datetime: Option<String>,
    pub transaction_amount: f64,
    pub transaction_status: Option<String>,
    pub transaction_type: Option<String>,
    pub platform_used: Option<String>,
    pub client_id_fk: Option<i64>,
}

/// Transaction list row with the owning client's name
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct TransactionListRow {
    pub transaction_id: i64,
    pub name_client: Option<String>,
    pub transaction_code: Option<String>,
    pub transaction_datetime: Option<String>,
    pub transaction_amount: f64,
    pub transaction_status: Option<String>,
}

/// Transaction joined with the full client record, for name searches
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ClientTransactionRow {
    pub transaction_id: i64,
    pub transaction_code: Option<String>,
    pub transaction_datetime: Option<String>,
    pub transaction_amount: f64,
    pub transaction_status: Option<String>,
    pub transaction_type: Option<String>,
    pub platform_used: Option<String>,
    pub client_id: i64,
    pub name_client: String,
    pub identification: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<ClientTransactionRow> for TransactionListRow {
    fn from(row: ClientTransactionRow) -> Self {
        Self {
            transaction_id: row.transaction_id,
            name_client: Some(row.name_client),
            transaction_code: row.transaction_code,
            transaction_datetime: row.transaction_datetime,
            transaction_amount: row.transaction_amount,
            transaction_status: row.transaction_status,
        }
    }
}

/// Sum of completed transactions per client
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ClientTotalPaid {
    pub client_id: i64,
    pub name_client: String,
    pub identification: Option<String>,
    pub email: Option<String>,
    pub total_paid: f64,
}

/// Transaction on one platform, with its bill when there is one
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PlatformTransactionRow {
    pub transaction_id: i64,
    pub transaction_code: Option<String>,
    pub transaction_datetime: Option<String>,
    pub transaction_amount: f64,
    pub transaction_status: Option<String>,
    pub transaction_type: Option<String>,
    pub platform_used: Option<String>,
    pub name_client: String,
    pub identification: Option<String>,
    pub email: Option<String>,
    pub bill_code: Option<String>,
    pub invoiced_amount: Option<f64>,
    pub paid_amount: Option<f64>,
}

/// Bill with an outstanding balance
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PendingBillRow {
    pub bill_id: i64,
    pub bill_code: String,
    pub billing_period: Option<String>,
    pub invoiced_amount: f64,
    pub paid_amount: f64,
    pub pending_amount: f64,
    pub name_client: String,
    pub identification: Option<String>,
    pub email: Option<String>,
    pub transaction_code: Option<String>,
    pub transaction_datetime: Option<String>,
    pub transaction_amount: Option<f64>,
}

// ==================== Write models ====================

/// Insert tuple for `clients`, in column order
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRow {
    pub client_id: i64,
    pub name_client: String,
    pub identification: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Insert/update tuple for `transactions`, in column order
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub transaction_code: Option<String>,
    pub transaction_datetime: Option<String>,
    pub transaction_amount: f64,
    pub transaction_status: Option<String>,
    pub transaction_type: Option<String>,
    pub platform_used: Option<String>,
    pub client_id_fk: Option<i64>,
}

/// Insert tuple for `bills`, in column order
#[derive(Debug, Clone, PartialEq)]
pub struct BillRow {
    pub bill_code: String,
    pub billing_period: Option<String>,
    pub invoiced_amount: f64,
    pub paid_amount: f64,
    pub transaction_id_fk: Option<i64>,
    pub client_id_fk: Option<i64>,
}

impl BillRow {
    /// A bill is pending while less has been paid than invoiced
    pub fn is_pending(&self) -> bool {
        self.invoiced_amount > self.paid_amount
    }
}

/// A body field that may arrive as a JSON number or as a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(serde_json::Number),
    Text(String),
}

impl NumericField {
    /// Blank text counts as an absent field
    pub fn is_blank(&self) -> bool {
        matches!(self, NumericField::Text(text) if text.trim().is_empty())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumericField::Number(n) => n.as_f64(),
            NumericField::Text(text) => text.trim().parse::<f64>().ok(),
        }
        .filter(|v| v.is_finite())
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NumericField::Number(n) => n.as_i64(),
            NumericField::Text(text) => text.trim().parse::<i64>().ok(),
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericField::Number(n) => write!(f, "{}", n),
            NumericField::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<f64> for NumericField {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(NumericField::Number)
            .unwrap_or_else(|| NumericField::Text(value.to_string()))
    }
}

impl From<i64> for NumericField {
    fn from(value: i64) -> Self {
        NumericField::Number(value.into())
    }
}

impl From<&str> for NumericField {
    fn from(value: &str) -> Self {
        NumericField::Text(value.to_string())
    }
}

/// Body of `POST /transactions` and `PUT /transactions/:id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    #[serde(default)]
    pub transaction_code: Option<String>,
    #[serde(default)]
    pub transaction_datetime: Option<String>,
    #[serde(default)]
    pub transaction_amount: Option<NumericField>,
    #[serde(default)]
    pub transaction_status: Option<String>,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub platform_used: Option<String>,
    #[serde(default)]
    pub client_id_fk: Option<NumericField>,
}
