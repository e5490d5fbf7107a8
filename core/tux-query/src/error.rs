//! Error types for content queries.

use thiserror::Error;
use tux_overrides::OverrideError;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while fetching and resolving content.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("request for {context} failed: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("request for {context} returned HTTP {status}: {body}")]
    Status {
        context: String,
        status: u16,
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("malformed response for {context}: {reason}")]
    MalformedResponse { context: String, reason: String },

    /// The entry id cannot be addressed as a single path segment.
    #[error("invalid entry id: {0:?}")]
    InvalidId(String),

    #[error(transparent)]
    Override(#[from] OverrideError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl QueryError {
    /// Wraps a decode failure with the request it came from.
    pub(crate) fn malformed(context: impl Into<String>, err: tux_types::Error) -> Self {
        let reason = match err {
            tux_types::Error::Malformed { context, reason } => format!("{context}: {reason}"),
            other => other.to_string(),
        };
        QueryError::MalformedResponse {
            context: context.into(),
            reason,
        }
    }

    /// Returns true if the API reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, QueryError::Status { status: 404, .. })
    }

    /// The HTTP status, when the API answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            QueryError::Status { status, .. } => Some(*status),
            QueryError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
