//! The override store.
//!
//! Holds the latest locally edited version of each entry. When an entry comes
//! back from the server, the stored override replaces it only if the override
//! was updated strictly later. Ties go to the server copy.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use tux_types::Entry;

use crate::{OverrideError, OverrideResult};

const EVENT_CAPACITY: usize = 64;

/// Change notifications emitted by [`OverrideStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideEvent {
    /// An override was inserted or replaced.
    Recorded { id: String },
    /// An override was removed.
    Removed { id: String },
    /// All overrides were dropped.
    Cleared,
}

/// Returns true if `local` must be served instead of `server`.
///
/// Both timestamps must parse and `local` must be strictly newer. A missing or
/// unparseable timestamp on either side keeps the server copy.
#[must_use]
pub fn supersedes(local: &Entry, server: &Entry) -> bool {
    match (local.updated_at(), server.updated_at()) {
        (Some(local_ts), Some(server_ts)) => local_ts.is_after(&server_ts),
        _ => false,
    }
}

/// Process-local map from entry id to its most recent local edit.
///
/// Constructed explicitly and shared via `Arc`; there is no global instance.
/// Reads run concurrently. Each write replaces a single map entry atomically,
/// with no guarantee across entries. Nothing expires on its own: an override
/// lives until the caller removes it, and a reload from the server leaves it
/// in place until the server's timestamp catches up.
#[derive(Debug)]
pub struct OverrideStore {
    entries: RwLock<HashMap<String, Entry>>,
    events: broadcast::Sender<OverrideEvent>,
}

impl OverrideStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            entries: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Inserts or replaces the override for `entry.sys.id`.
    ///
    /// The only requirement is an `updatedAt` key. An unparseable value is
    /// stored anyway but can never take precedence.
    pub fn record_override(&self, entry: Entry) -> OverrideResult<()> {
        if !entry.sys.has_updated_at() {
            return Err(OverrideError::MissingUpdatedAt {
                id: entry.sys.id.clone(),
            });
        }
        if entry.updated_at().is_none() {
            warn!(id = %entry.id(), "override has an unparseable updatedAt and will never win");
        }

        let id = entry.sys.id.clone();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), entry);

        debug!(%id, "recorded override");
        let _ = self.events.send(OverrideEvent::Recorded { id });
        Ok(())
    }

    /// Returns the authoritative version of `candidate`.
    ///
    /// This is the stored override when it [`supersedes`] the candidate,
    /// otherwise the candidate itself. The store is not modified.
    #[must_use]
    pub fn resolve(&self, candidate: &Entry) -> Entry {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        match entries.get(candidate.id()) {
            Some(local) if supersedes(local, candidate) => {
                info!(id = %candidate.id(), "local override supersedes server copy");
                local.clone()
            }
            _ => candidate.clone(),
        }
    }

    /// Returns the stored override for `id`, regardless of precedence.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Entry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Removes and returns the override for `id`.
    pub fn remove(&self, id: &str) -> Option<Entry> {
        let removed = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        if removed.is_some() {
            let _ = self.events.send(OverrideEvent::Removed { id: id.to_string() });
        }
        removed
    }

    /// Drops every override.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        let _ = self.events.send(OverrideEvent::Cleared);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of all stored overrides, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    /// Subscribes to change notifications.
    ///
    /// Lagging receivers lose the oldest events; callers that only need to
    /// know "something changed" can treat a lag as a change.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<OverrideEvent> {
        self.events.subscribe()
    }
}

impl Default for OverrideStore {
    fn default() -> Self {
        Self::new()
    }
}
