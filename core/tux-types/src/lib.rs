//! Wire data model for Tux content.
//!
//! This crate defines the shapes exchanged with the content delivery API:
//! - [`Entry`] and its [`Sys`] metadata (assets share the same shape)
//! - [`FieldValue`], a tagged union of scalars, [`Link`] placeholders and sequences
//! - [`Envelope`], the collection response with its `includes` side-channel
//! - [`UpdatedAt`], the parsed timestamp used for override precedence
//!
//! Raw JSON is classified once, at decode time. Serialising any of these types
//! yields the API's original field naming (`sys.id`, `sys.updatedAt`,
//! `sys.type`, `fields`).

mod entry;
mod envelope;
mod timestamp;

pub use entry::{Entry, FieldValue, Fields, LINK_TYPE, Link, Sys};
pub use envelope::{Envelope, Includes};
pub use timestamp::UpdatedAt;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding content.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("malformed {context}: {reason}")]
    Malformed { context: String, reason: String },
}

impl Error {
    pub(crate) fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            context: context.into(),
            reason: reason.into(),
        }
    }
}
