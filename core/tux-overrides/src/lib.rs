//! Local overrides for Tux content.
//!
//! After an entry is edited locally, the content API may keep serving the old
//! version for a while. [`OverrideStore`] remembers the edited version and
//! hands it back in place of the server's copy for as long as the edit is
//! strictly newer (last write wins on `sys.updatedAt`).

mod store;

pub use store::{OverrideEvent, OverrideStore, supersedes};

/// Result type for override operations.
pub type OverrideResult<T> = Result<T, OverrideError>;

/// Errors that can occur when recording an override.
#[derive(Debug, thiserror::Error)]
pub enum OverrideError {
    #[error("override for {id} has no updatedAt")]
    MissingUpdatedAt { id: String },
}
