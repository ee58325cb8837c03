// src/errors.rs
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::error::{ErrorKind, WriteFailure};
use serde_json::json;
use thiserror::Error;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("MongoDB error: {0}")]
    MongoDB(mongodb::error::Error),

    #[error("Document encoding error: {0}")]
    Bson(String),

    #[error("Invalid ObjectId: {0}")]
    InvalidObjectId(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Duplicate key error: {0}")]
    DuplicateKey(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Option index {index} is out of range for a poll with {len} options")]
    OutOfRange { index: i64, len: usize },

    #[error("Authentication error")]
    AuthError,

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MongoDB(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Bson(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidObjectId(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateKey(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::OutOfRange { .. } => StatusCode::BAD_REQUEST,
            AppError::AuthError => StatusCode::UNAUTHORIZED,
            AppError::Unauthorized => StatusCode::FORBIDDEN,
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            AppError::MongoDB(_) => "Database error",
            AppError::Bson(_) => "Database error",
            AppError::InvalidObjectId(_) => "Invalid ID format",
            AppError::NotFound(_) => "Not found",
            AppError::DuplicateKey(_) => "Duplicate entry",
            AppError::ValidationError(_) => "Validation failed",
            AppError::OutOfRange { .. } => "Invalid option",
            AppError::AuthError => "Authentication failed",
            AppError::Unauthorized => "Unauthorized access",
            AppError::UpstreamUnavailable(_) => "Failed to fetch live match data",
            AppError::ConfigurationError(_) => "Configuration error",
            AppError::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }

        // Internal details stay in the log for 500s.
        let message = match &self {
            AppError::MongoDB(_) | AppError::Bson(_) | AppError::Internal(_) => {
                self.summary().to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": self.summary(),
            "message": message,
            "success": false,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            AppError::DuplicateKey(err.to_string())
        } else {
            AppError::MongoDB(err)
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::Bson(err.to_string())
    }
}

impl From<mongodb::bson::de::Error> for AppError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        AppError::Bson(err.to_string())
    }
}

impl From<mongodb::bson::oid::Error> for AppError {
    fn from(err: mongodb::bson::oid::Error) -> Self {
        AppError::InvalidObjectId(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::UpstreamUnavailable(format!("HTTP request failed: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("password hashing failed: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        AppError::AuthError
    }
}

impl AppError {
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        AppError::UpstreamUnavailable(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::ConfigurationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_distinct_statuses() {
        assert_eq!(
            AppError::invalid_data("missing id").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::OutOfRange { index: 2, len: 2 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound("Poll").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::upstream("503 from feed").status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_entity() {
        assert_eq!(AppError::NotFound("Match").to_string(), "Match not found");
    }
}
