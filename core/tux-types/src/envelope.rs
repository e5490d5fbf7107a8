//! Collection response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::entry::Entry;
use crate::{Error, Result};

/// Linked entries and assets grouped by type name (`"Entry"`, `"Asset"`).
pub type Includes = BTreeMap<String, Vec<Entry>>;

/// A collection response: the requested `items` plus the `includes`
/// side-channel carrying everything they link to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub items: Vec<Entry>,
    pub includes: Includes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl Envelope {
    /// Creates an envelope without pagination counters.
    #[must_use]
    pub fn new(items: Vec<Entry>, includes: Includes) -> Self {
        Self {
            items,
            includes,
            total: None,
            skip: None,
            limit: None,
        }
    }

    /// Decodes a collection response.
    ///
    /// Fails with [`Error::Malformed`] naming `items` or `includes` when either
    /// is absent; a structurally invalid envelope is never partially decoded.
    pub fn from_json(value: Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(Error::malformed("envelope", "expected a JSON object"));
        };
        if !object.get("items").is_some_and(Value::is_array) {
            return Err(Error::malformed("envelope", "missing `items` array"));
        }
        if !object.get("includes").is_some_and(Value::is_object) {
            return Err(Error::malformed("envelope", "missing `includes` object"));
        }

        let items = object["items"]
            .as_array()
            .into_iter()
            .flatten()
            .cloned()
            .map(Entry::from_json)
            .collect::<Result<Vec<_>>>()?;

        let mut includes = Includes::new();
        for (kind, linked) in object["includes"].as_object().into_iter().flatten() {
            let Some(linked) = linked.as_array() else {
                return Err(Error::malformed(
                    "envelope",
                    format!("`includes.{kind}` is not an array"),
                ));
            };
            let linked = linked
                .iter()
                .cloned()
                .map(Entry::from_json)
                .collect::<Result<Vec<_>>>()?;
            includes.insert(kind.clone(), linked);
        }

        Ok(Self {
            items,
            includes,
            total: object.get("total").and_then(Value::as_u64),
            skip: object.get("skip").and_then(Value::as_u64),
            limit: object.get("limit").and_then(Value::as_u64),
        })
    }

    /// Returns true when more pages follow this one.
    #[must_use]
    pub fn has_more(&self) -> bool {
        match self.total {
            Some(total) => {
                !self.items.is_empty()
                    && self
                        .skip
                        .unwrap_or(0)
                        .saturating_add(self.items.len() as u64)
                        < total
            }
            None => false,
        }
    }

    /// Number of included entries and assets across all type keys.
    #[must_use]
    pub fn included_count(&self) -> usize {
        self.includes.values().map(Vec::len).sum()
    }
}
