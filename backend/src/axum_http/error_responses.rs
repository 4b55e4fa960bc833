use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hometaste::domain::value_objects::subscriptions::FlowError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::usecases::{
    address_intake::AddressIntakeError, chef_profiles::ChefProfileError,
    subscription_builder::SubscriptionError,
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => AppError::Unauthorized,
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            StatusCode::CONFLICT => AppError::Conflict(message),
            StatusCode::UNPROCESSABLE_ENTITY => AppError::Unprocessable(message),
            _ => AppError::BadRequest(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Internal(err) => {
                error!(error = ?err, "http: internal error");
                // Don't leak internal error detail to client
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<AddressIntakeError> for AppError {
    fn from(err: AddressIntakeError) -> Self {
        match err {
            AddressIntakeError::Internal(err) => AppError::Internal(err),
            other => AppError::from_status(other.status_code(), other.to_string()),
        }
    }
}

impl From<SubscriptionError> for AppError {
    fn from(err: SubscriptionError) -> Self {
        match err {
            SubscriptionError::Internal(err) => AppError::Internal(err),
            other => AppError::from_status(other.status_code(), other.to_string()),
        }
    }
}

impl From<ChefProfileError> for AppError {
    fn from(err: ChefProfileError) -> Self {
        match err {
            ChefProfileError::Internal(err) => AppError::Internal(err),
            other => AppError::from_status(other.status_code(), other.to_string()),
        }
    }
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::InProgress => AppError::Conflict(err.to_string()),
            FlowError::AddressMissing | FlowError::PlanMissing => {
                AppError::Unprocessable(err.to_string())
            }
        }
    }
}
