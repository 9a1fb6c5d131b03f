//! Bill routes - pending balances

pub mod api;

pub use api::api_bills_pending;
