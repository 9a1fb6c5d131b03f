//! CSV batch loading
//!
//! Each load reads a whole CSV file into memory, normalizes every row and
//! hands the surviving tuples to the repository as one bulk insert. The
//! insert either lands completely or not at all.

use crate::error::{CoreError, CoreResult};
use crate::normalize::{normalize_bill, normalize_client, normalize_transaction, RawRecord, SkipReason};
use crate::repository::RepositoryRef;
use paydesk_config::{Config, MissingAmountPolicy};
use serde::Serialize;
use std::path::Path;

/// A row left out of a batch, with its CSV line number
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

/// Outcome of one load
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub inserted: u64,
    pub skipped: Vec<SkippedRow>,
    /// Bills paid below their invoiced amount; zero for other tables
    pub pending: u64,
}

/// Tables that can be seeded, in foreign-key order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeedStep {
    Clients,
    Transactions,
    Bills,
}

impl SeedStep {
    pub const ALL: [SeedStep; 3] = [SeedStep::Clients, SeedStep::Transactions, SeedStep::Bills];
}

impl std::str::FromStr for SeedStep {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clients" => Ok(SeedStep::Clients),
            "transactions" => Ok(SeedStep::Transactions),
            "bills" => Ok(SeedStep::Bills),
            _ => Err(format!("Invalid seed step: {} (expected clients, transactions or bills)", s)),
        }
    }
}

impl std::fmt::Display for SeedStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedStep::Clients => write!(f, "clients"),
            SeedStep::Transactions => write!(f, "transactions"),
            SeedStep::Bills => write!(f, "bills"),
        }
    }
}

/// Loads the CSV import files through a repository
pub struct BatchLoader {
    repo: RepositoryRef,
    missing_amount: MissingAmountPolicy,
}

impl BatchLoader {
    pub fn new(repo: RepositoryRef, missing_amount: MissingAmountPolicy) -> Self {
        Self { repo, missing_amount }
    }

    pub async fn load_clients(&self, path: &Path) -> CoreResult<LoadReport> {
        let (rows, skipped) = collect_rows(path, normalize_client).await?;
        let inserted = self.repo.insert_clients(&rows).await?;
        Ok(finish(path, "clients", inserted, skipped))
    }

    pub async fn load_transactions(&self, path: &Path) -> CoreResult<LoadReport> {
        let policy = self.missing_amount;
        let (rows, skipped) = collect_rows(path, |record| normalize_transaction(record, policy)).await?;
        let inserted = self.repo.insert_transactions(&rows).await?;
        Ok(finish(path, "transactions", inserted, skipped))
    }

    pub async fn load_bills(&self, path: &Path) -> CoreResult<LoadReport> {
        let (rows, skipped) = collect_rows(path, normalize_bill).await?;
        let inserted = self.repo.insert_bills(&rows).await?;
        let pending = rows.iter().filter(|bill| bill.is_pending()).count() as u64;
        if pending > 0 {
            log::info!("{} of the bills in {} are pending", pending, path.display());
        }
        Ok(LoadReport {
            pending,
            ..finish(path, "bills", inserted, skipped)
        })
    }

    /// Run the requested steps in foreign-key order, stopping at the first failure
    pub async fn seed(&self, config: &Config, steps: &[SeedStep]) -> CoreResult<Vec<(SeedStep, LoadReport)>> {
        let mut ordered = steps.to_vec();
        ordered.sort();
        ordered.dedup();

        let mut reports = Vec::with_capacity(ordered.len());
        for step in ordered {
            log::info!("Seeding {}", step);
            let report = match step {
                SeedStep::Clients => self.load_clients(&config.clients_path()).await,
                SeedStep::Transactions => self.load_transactions(&config.transactions_path()).await,
                SeedStep::Bills => self.load_bills(&config.bills_path()).await,
            }
            .map_err(|e| {
                log::error!("Seeding {} failed: {}", step, e);
                e
            })?;
            reports.push((step, report));
        }
        Ok(reports)
    }
}

fn finish(path: &Path, table: &str, inserted: u64, skipped: Vec<SkippedRow>) -> LoadReport {
    if inserted == 0 {
        log::warn!("No valid {} found in {}", table, path.display());
    } else {
        log::info!("Inserted {} {} from {}", inserted, table, path.display());
    }
    if !skipped.is_empty() {
        log::warn!("Skipped {} {} rows in {}", skipped.len(), table, path.display());
    }
    LoadReport {
        inserted,
        skipped,
        pending: 0,
    }
}

/// Read every record of `path` and keep the ones `normalize` accepts
async fn collect_rows<T, F>(path: &Path, normalize: F) -> CoreResult<(Vec<T>, Vec<SkippedRow>)>
where
    F: Fn(&RawRecord) -> Result<T, SkipReason>,
{
    let records = read_records(path).await?;

    let mut rows = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();
    for (line, record) in records {
        match normalize(&record) {
            Ok(row) => rows.push(row),
            Err(reason) => {
                log::warn!("Ignored row {} of {}: {}", line, path.display(), reason);
                skipped.push(SkippedRow {
                    line,
                    reason: reason.to_string(),
                });
            }
        }
    }
    Ok((rows, skipped))
}

/// Parse a CSV file with a header row into keyed records
pub async fn read_records(path: &Path) -> CoreResult<Vec<(u64, RawRecord)>> {
    let content = tokio::fs::read(path).await.map_err(|source| CoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_records(path, &content)
}

fn parse_records(path: &Path, content: &[u8]) -> CoreResult<Vec<(u64, RawRecord)>> {
    let csv_error = |e: csv::Error| CoreError::Csv {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content);
    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let raw: RawRecord = headers.iter().zip(record.iter()).collect();
        records.push((line, raw));
    }
    Ok(records)
}
