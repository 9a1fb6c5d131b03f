//! Error types for paydesk-api

use axum::async_trait;
use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use paydesk_core::{CoreError, ErrorCode};
use serde_json::json;
use std::convert::Infallible;
use thiserror::Error;

/// Path and method of the request being served
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub path: String,
    pub method: String,
}

impl Endpoint {
    /// Attach this endpoint to a failure
    pub fn fail(&self, source: CoreError) -> ApiError {
        ApiError {
            source,
            endpoint: self.path.clone(),
            method: self.method.clone(),
        }
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Endpoint {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Nested routers strip the prefix from `parts.uri`
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map(|uri| uri.0.path().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());
        Ok(Endpoint {
            path,
            method: parts.method.to_string(),
        })
    }
}

/// A core failure bound to the request that produced it
#[derive(Error, Debug)]
#[error("{method} {endpoint}: {source}")]
pub struct ApiError {
    pub source: CoreError,
    pub endpoint: String,
    pub method: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.source.code() {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.source.to_string();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("{} {} failed: {}", self.method, self.endpoint, self.source.to_details());
            let body = json!({
                "status": "error",
                "endpoint": self.endpoint,
                "method": self.method,
                "message": message,
            });
            return (status, Json(body)).into_response();
        }

        log::debug!("{} {} -> {}: {}", self.method, self.endpoint, status.as_u16(), message);
        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Endpoint {
        Endpoint {
            path: "/api/v1/transactions/9".to_string(),
            method: "PUT".to_string(),
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(endpoint().fail(CoreError::not_found("Transaction 9")).status(), StatusCode::NOT_FOUND);
        assert_eq!(endpoint().fail(CoreError::bad_request("Missing")).status(), StatusCode::BAD_REQUEST);

        let constraint = CoreError::ConstraintViolation {
            message: "FOREIGN KEY constraint failed".to_string(),
        };
        assert_eq!(endpoint().fail(constraint).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_display_names_the_endpoint() {
        let error = endpoint().fail(CoreError::not_found("Transaction 9"));
        assert_eq!(error.to_string(), "PUT /api/v1/transactions/9: Transaction 9 not found");
    }
}
