//! Client routes - client list and total paid per client

pub mod api;

pub use api::{api_clients, api_clients_total_paid};
