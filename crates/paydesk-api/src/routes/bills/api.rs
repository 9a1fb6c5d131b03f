use crate::error::{ApiError, Endpoint};
use crate::AppState;
use axum::extract::State;
use axum::Json;
use paydesk_core::PendingBillRow;

/// Bills with invoiced amount above paid amount, with client and transaction (JSON API)
pub async fn api_bills_pending(
    State(state): State<AppState>,
    endpoint: Endpoint,
) -> Result<Json<Vec<PendingBillRow>>, ApiError> {
    let bills = state.repo.pending_bills().await.map_err(|e| endpoint.fail(e))?;
    Ok(Json(bills))
}
