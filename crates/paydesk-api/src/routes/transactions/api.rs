//! Transactions API endpoints
//!
//! Endpoints:
//! - api_transactions: All transactions with client name (JSON)
//! - api_transaction_detail: Single transaction (JSON)
//! - api_transaction_create: Create transaction, 201 with its id
//! - api_transaction_update: Replace every field of a transaction
//! - api_transaction_delete: Delete transaction
//! - api_transactions_by_client: Client name substring search
//! - api_transactions_by_platform: Exact platform match, with bill amounts

use crate::error::{ApiError, Endpoint};
use crate::routes::{json_body, path_id};
use crate::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use paydesk_core::{ClientTransactionRow, PlatformTransactionRow, Transaction, TransactionInput, TransactionListRow};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub transaction_id: i64,
}

/// Get all transactions (JSON API)
pub async fn api_transactions(
    State(state): State<AppState>,
    endpoint: Endpoint,
) -> Result<Json<Vec<TransactionListRow>>, ApiError> {
    let transactions = state.repo.list_transactions().await.map_err(|e| endpoint.fail(e))?;
    Ok(Json(transactions))
}

/// Get single transaction (JSON API)
pub async fn api_transaction_detail(
    State(state): State<AppState>,
    endpoint: Endpoint,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Transaction>, ApiError> {
    let id = path_id(&endpoint, path)?;
    let transaction = state.repo.get_transaction(id).await.map_err(|e| endpoint.fail(e))?;
    Ok(Json(transaction))
}

/// Create a transaction (JSON API)
pub async fn api_transaction_create(
    State(state): State<AppState>,
    endpoint: Endpoint,
    body: Result<Json<TransactionInput>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let input = json_body(&endpoint, body)?;
    let transaction_id = state.repo.create_transaction(&input).await.map_err(|e| endpoint.fail(e))?;
    log::info!("Created transaction {}", transaction_id);

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Transaction created successfully",
            transaction_id,
        }),
    ))
}

/// Update a transaction (JSON API)
pub async fn api_transaction_update(
    State(state): State<AppState>,
    endpoint: Endpoint,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<TransactionInput>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = path_id(&endpoint, path)?;
    let input = json_body(&endpoint, body)?;
    state.repo.update_transaction(id, &input).await.map_err(|e| endpoint.fail(e))?;
    Ok(Json(MessageResponse {
        message: "Transaction updated",
    }))
}

/// Delete a transaction (JSON API)
pub async fn api_transaction_delete(
    State(state): State<AppState>,
    endpoint: Endpoint,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = path_id(&endpoint, path)?;
    state.repo.delete_transaction(id).await.map_err(|e| endpoint.fail(e))?;
    Ok(Json(MessageResponse {
        message: "Transaction deleted",
    }))
}

/// Transactions whose client name contains the path segment (JSON API)
pub async fn api_transactions_by_client(
    State(state): State<AppState>,
    endpoint: Endpoint,
    Path(name_client): Path<String>,
) -> Result<Json<Vec<ClientTransactionRow>>, ApiError> {
    let rows = state
        .repo
        .find_transactions_by_client_name(&name_client)
        .await
        .map_err(|e| endpoint.fail(e))?;
    Ok(Json(rows))
}

/// Transactions made on one platform (JSON API)
pub async fn api_transactions_by_platform(
    State(state): State<AppState>,
    endpoint: Endpoint,
    Path(platform_used): Path<String>,
) -> Result<Json<Vec<PlatformTransactionRow>>, ApiError> {
    let rows = state
        .repo
        .transactions_by_platform(&platform_used)
        .await
        .map_err(|e| endpoint.fail(e))?;
    Ok(Json(rows))
}
