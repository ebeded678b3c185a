use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::preferences::PrefError;

/// Everything that can end a single lookup request.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Please enter a domain name")]
    MissingDomain,

    #[error("Invalid domain format")]
    InvalidDomain,

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    UpstreamStatus(u16),

    #[error("Unreadable provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Provider(String),
}

impl LookupError {
    /// True for failures caught before any network call was made.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::MissingDomain | Self::InvalidDomain)
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingDomain => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Domain required" })),
            )
                .into_response(),
            Self::InvalidDomain => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
        }
    }
}

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] PrefError),

    #[error("Invalid listen address {0}")]
    ListenAddr(String),

    #[error("Unable to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}
