//! Transaction routes - CRUD, searches and the management page
//!
//! Structure:
//! - api.rs: JSON API endpoints
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    api_transaction_create,
    api_transaction_delete,
    api_transaction_detail,
    api_transaction_update,
    api_transactions,
    api_transactions_by_client,
    api_transactions_by_platform,
};

pub use page::page_transactions;
