use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::error::{Error, TransactionError, UserError, WalletError};

/// Error unificado de la capa HTTP: envuelve `domain::error::Error` y
/// decide el codigo de estado a devolver, siguiendo el patron
/// `ApiError`/`IntoResponse` del adaptador HTTP del teacher.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        let status = match &self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Money(_) => StatusCode::BAD_REQUEST,
            Error::Wallet(e) => match e {
                WalletError::NotFound(_) | WalletError::NotFoundById(_) => StatusCode::NOT_FOUND,
                WalletError::InvalidAmount => StatusCode::BAD_REQUEST,
                WalletError::InsufficientBalance
                | WalletError::NegativeBalance
                | WalletError::RepositoryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::User(e) => match e {
                UserError::NotFound(_) => StatusCode::NOT_FOUND,
                UserError::RepositoryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Transaction(e) => match e {
                TransactionError::NotFound(_) => StatusCode::NOT_FOUND,
                TransactionError::InvalidState(_) | TransactionError::RepositoryError(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Error::Storage(_) | Error::Messaging(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Timeout => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
        }));

        (status, body).into_response()
    }
}
