use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("missing slug parameter")]
    MissingParameter,
    #[error("`{0}` is required")]
    MissingField(&'static str),
    #[error("invalid format: `{0}`")]
    InvalidFormat(String),
    #[error("invalid date: `{0}`")]
    InvalidDate(String),
    #[error("invalid time: `{0}`")]
    InvalidTime(String),
    #[error("invalid mode `{0}`, expected one of online, offline, hybrid")]
    InvalidEnum(String),
    #[error("`{0}` must contain at least one entry")]
    EmptyCollection(&'static str),
    #[error("invalid email address: `{0}`")]
    InvalidEmail(String),
    #[error("no event found for slug `{0}`")]
    NotFound(String),
    #[error("referenced event `{0}` does not exist")]
    DanglingReference(String),
    #[error("an event with slug `{0}` already exists")]
    DuplicateKey(String),
    #[error("document store unavailable: {0}")]
    DependencyFailure(#[from] mongodb::error::Error),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingParameter
            | Self::MissingField(_)
            | Self::InvalidFormat(_)
            | Self::InvalidDate(_)
            | Self::InvalidTime(_)
            | Self::InvalidEnum(_)
            | Self::EmptyCollection(_)
            | Self::InvalidEmail(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DanglingReference(_) | Self::DuplicateKey(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DependencyFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Event not found",
            Self::DanglingReference(_) | Self::DuplicateKey(_) => "Conflict",
            Self::DependencyFailure(_) => "Internal server error",
            _ => "Invalid request",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = json!({
            "message": self.message(),
            "error": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}
