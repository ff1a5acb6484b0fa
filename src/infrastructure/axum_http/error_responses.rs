use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::application::usecases::invoices::InvoiceActionError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Internal(err) => {
                error!(error = ?err, "http: request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}

/// Invoice failures render as the form state the page shows next to the form.
impl IntoResponse for InvoiceActionError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_state())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn validation_failures_are_unprocessable() {
        let mut errors = BTreeMap::new();
        errors.insert(
            "amount".to_string(),
            vec!["Positive dollar amount".to_string()],
        );

        let response = InvoiceActionError::ValidationFailed {
            errors,
            message: "Missing Fields. Failed to Create Invoice.",
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn persistence_failures_are_server_errors() {
        let response =
            InvoiceActionError::PersistenceFailed("Database Error: Failed to create invoice")
                .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let response = AppError::Internal(anyhow::anyhow!("password=hunter2")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
