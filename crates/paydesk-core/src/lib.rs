//! Core payment-ledger storage and import logic
//!
//! Three tables (`clients`, `transactions`, `bills`) live in one SQLite
//! database. [`repository::SqlRepository`] answers every query the HTTP layer
//! needs, and [`loader::BatchLoader`] fills the tables from the CSV import
//! files after [`normalize`] has cleaned each row.

pub mod db;
pub mod error;
pub mod loader;
pub mod models;
pub mod normalize;
pub mod repository;

pub use db::Database;
pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
pub use loader::{BatchLoader, LoadReport, SeedStep, SkippedRow};
pub use models::*;
pub use repository::{Repository, RepositoryRef, SqlRepository};
