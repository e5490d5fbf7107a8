//! Collection query parameters.

use serde::{Deserialize, Serialize};

/// Ordered query-string pairs, passed to the API verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing any earlier value.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key` in place, replacing any earlier value.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.0.push((key, value)),
        }
    }

    #[must_use]
    pub fn content_type(self, id: impl Into<String>) -> Self {
        self.param("content_type", id.into())
    }

    #[must_use]
    pub fn limit(self, limit: u64) -> Self {
        self.param("limit", limit)
    }

    #[must_use]
    pub fn skip(self, skip: u64) -> Self {
        self.param("skip", skip)
    }

    #[must_use]
    pub fn order(self, order: impl Into<String>) -> Self {
        self.param("order", order.into())
    }

    /// Link depth the API should expand into `includes` (0-10).
    #[must_use]
    pub fn include(self, depth: u8) -> Self {
        self.param("include", depth)
    }

    /// Filters on `fields.{field} == value`.
    #[must_use]
    pub fn field_equals(self, field: &str, value: impl ToString) -> Self {
        self.param(format!("fields.{field}"), value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            let value: String = v.into();
            params.set(k, value);
        }
        params
    }
}
