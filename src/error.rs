//! Errors raised by the backend client and by context assembly.

use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::storage::StorageError;

/// Result alias for backend API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Message used when a failed response carries no usable `message` field.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Failures surfaced by [`ApiClient`](crate::services::api_client::ApiClient).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    ///
    /// Displays as the server-provided message alone, or
    /// [`DEFAULT_ERROR_MESSAGE`].
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    /// The request never completed (connection refused, DNS failure, ...).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A successful response did not contain the expected JSON.
    #[error("failed to decode response from `{url}`")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    /// A request body could not be encoded as JSON.
    #[error("failed to encode request body")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
    /// A caller-supplied header name or value is not valid HTTP.
    #[error("invalid header `{name}`")]
    InvalidHeader { name: String },
}

impl ApiError {
    /// HTTP status of a rejected request, if the backend answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(source) => source.status(),
            _ => None,
        }
    }
}

/// Failures while assembling an [`AppState`](crate::state::AppState).
#[derive(Debug, Error)]
pub enum InitError {
    /// The persisted theme could not be read or applied.
    #[error("failed to initialize theme store")]
    Theme(#[from] StorageError),
    /// The API client could not be built.
    #[error("failed to initialize API client")]
    Api(#[from] ApiError),
}
