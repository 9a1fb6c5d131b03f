//! Route modules for the API server
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints
//! - page.rs: Server-rendered page (transactions only)

pub mod bills;
pub mod clients;
pub mod transactions;

use crate::error::{ApiError, Endpoint};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::Json;
use paydesk_core::CoreError;

/// Unwrap a numeric path segment, reporting a malformed one as 400
pub(crate) fn path_id(endpoint: &Endpoint, path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| endpoint.fail(CoreError::bad_request(rejection.body_text())))
}

/// Unwrap a JSON body, reporting a malformed one as 400
pub(crate) fn json_body<T>(endpoint: &Endpoint, body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| endpoint.fail(CoreError::bad_request(rejection.body_text())))
}
