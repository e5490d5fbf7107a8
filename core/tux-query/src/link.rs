//! Link hydration.
//!
//! A collection response carries its linked entries and assets in `includes`.
//! Hydration builds a map from link target id to that target's fields and
//! attaches the fields to every matching placeholder in `items`.
//!
//! Hydration never mutates its input: it returns new entries and envelopes.

use std::collections::HashMap;

use tracing::{debug, warn};
use tux_overrides::OverrideStore;
use tux_types::{Entry, Envelope, FieldValue, Fields, Includes, Link};

/// Link target id to the target's override-resolved fields.
///
/// The map is filled by reading the override store once per included item,
/// without holding the store across the whole pass. An override recorded
/// while the map is being built may therefore be visible for some targets
/// and not for others.
#[derive(Debug, Clone, Default)]
pub struct LinkMap {
    targets: HashMap<String, Fields>,
}

impl LinkMap {
    /// Builds the map from every entry and asset under every `includes` key.
    #[must_use]
    pub fn from_includes(includes: &Includes, overrides: &OverrideStore) -> Self {
        let targets = includes
            .values()
            .flatten()
            .map(|linked| {
                let resolved = overrides.resolve(linked);
                (resolved.sys.id, resolved.fields)
            })
            .collect();
        Self { targets }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Fields> {
        self.targets.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Returns a copy of `entry` with every top-level link, and every link
    /// inside a sequence, carrying its target's fields.
    ///
    /// A link whose target is not in the map is left exactly as it was, so
    /// hydrating an already hydrated entry again changes nothing.
    #[must_use]
    pub fn hydrate_entry(&self, entry: &Entry) -> Entry {
        let fields = entry
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), self.hydrate_value(entry.id(), value)))
            .collect();
        Entry {
            sys: entry.sys.clone(),
            fields,
        }
    }

    fn hydrate_value(&self, owner: &str, value: &FieldValue) -> FieldValue {
        match value {
            FieldValue::Link(link) => FieldValue::Link(self.hydrate_link(owner, link)),
            FieldValue::Sequence(values) => FieldValue::Sequence(
                values
                    .iter()
                    .map(|v| self.hydrate_value(owner, v))
                    .collect(),
            ),
            FieldValue::Scalar(_) => value.clone(),
        }
    }

    fn hydrate_link(&self, owner: &str, link: &Link) -> Link {
        match self.targets.get(link.target_id()) {
            Some(fields) => Link {
                fields: Some(fields.clone()),
                ..link.clone()
            },
            None => {
                if !link.is_resolved() {
                    warn!(
                        entry = %owner,
                        target = %link.target_id(),
                        "link target missing from includes"
                    );
                }
                link.clone()
            }
        }
    }
}

/// Hydrates every item of `envelope` against its own `includes`.
///
/// `items` are taken as they are; callers apply overrides to them first.
/// Included targets are resolved through `overrides` while the map is built.
/// `includes` is carried over unchanged.
#[must_use]
pub fn hydrate(envelope: &Envelope, overrides: &OverrideStore) -> Envelope {
    let links = LinkMap::from_includes(&envelope.includes, overrides);
    debug!(
        items = envelope.items.len(),
        targets = links.len(),
        "hydrating links"
    );

    Envelope {
        items: envelope
            .items
            .iter()
            .map(|item| links.hydrate_entry(item))
            .collect(),
        includes: envelope.includes.clone(),
        total: envelope.total,
        skip: envelope.skip,
        limit: envelope.limit,
    }
}
