//! Clients API endpoints
//!
//! Endpoints:
//! - api_clients: All clients, id and name only
//! - api_clients_total_paid: Sum of completed transactions per client

use crate::error::{ApiError, Endpoint};
use crate::AppState;
use axum::extract::State;
use axum::Json;
use paydesk_core::{ClientSummary, ClientTotalPaid};

/// Get all clients (JSON API)
pub async fn api_clients(
    State(state): State<AppState>,
    endpoint: Endpoint,
) -> Result<Json<Vec<ClientSummary>>, ApiError> {
    let clients = state.repo.list_clients().await.map_err(|e| endpoint.fail(e))?;
    Ok(Json(clients))
}

/// Get total paid by each client, largest first (JSON API)
pub async fn api_clients_total_paid(
    State(state): State<AppState>,
    endpoint: Endpoint,
) -> Result<Json<Vec<ClientTotalPaid>>, ApiError> {
    let totals = state.repo.total_paid_by_client().await.map_err(|e| endpoint.fail(e))?;
    Ok(Json(totals))
}
