//! Entries, assets, links and their field values.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::timestamp::UpdatedAt;
use crate::{Error, Result};

/// The `sys.type` marker of a link placeholder.
pub const LINK_TYPE: &str = "Link";

/// Field name to value mapping of an entry.
pub type Fields = BTreeMap<String, FieldValue>;

/// System metadata attached to every entry, asset and link.
///
/// Keys this crate does not interpret (`space`, `contentType`, `revision`, ...)
/// are kept in `extra` so re-serialising preserves the API's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sys {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "linkType", default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    /// Raw `updatedAt`. Left as JSON so malformed values survive decoding and
    /// are only judged when precedence is decided.
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Sys {
    /// Creates metadata carrying only an id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: None,
            link_type: None,
            updated_at: None,
            extra: Map::new(),
        }
    }

    /// Creates the metadata of a link placeholder pointing at `id`.
    #[must_use]
    pub fn link(id: impl Into<String>, link_type: impl Into<String>) -> Self {
        Self {
            kind: Some(LINK_TYPE.to_string()),
            link_type: Some(link_type.into()),
            ..Self::new(id)
        }
    }

    /// Sets `type`.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Sets the raw `updatedAt` string.
    #[must_use]
    pub fn with_updated_at(mut self, raw: impl Into<String>) -> Self {
        self.updated_at = Some(Value::String(raw.into()));
        self
    }

    /// Returns true if `type` is `"Link"`.
    #[must_use]
    pub fn is_link(&self) -> bool {
        self.kind.as_deref() == Some(LINK_TYPE)
    }

    /// Returns true if an `updatedAt` key is present, whatever its value.
    #[must_use]
    pub fn has_updated_at(&self) -> bool {
        self.updated_at.as_ref().is_some_and(|v| !v.is_null())
    }

    /// Parses `updatedAt`.
    ///
    /// Strings are read as ISO-8601. Integers are read as milliseconds since
    /// the Unix epoch. Anything else, including an absent key, yields `None`.
    #[must_use]
    pub fn updated_at(&self) -> Option<UpdatedAt> {
        match self.updated_at.as_ref()? {
            Value::String(raw) => UpdatedAt::parse(raw).ok(),
            Value::Number(n) => n
                .as_i64()
                .and_then(chrono::DateTime::from_timestamp_millis)
                .map(UpdatedAt::from_datetime),
            _ => None,
        }
    }
}

/// A placeholder standing in for another entry or asset.
///
/// `fields` is filled in by hydration. An unresolved link has `fields: None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub sys: Sys,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Fields>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Link {
    /// Creates an unresolved link to `id`.
    #[must_use]
    pub fn new(id: impl Into<String>, link_type: impl Into<String>) -> Self {
        Self {
            sys: Sys::link(id, link_type),
            fields: None,
            extra: Map::new(),
        }
    }

    /// The id of the linked entry or asset.
    #[must_use]
    pub fn target_id(&self) -> &str {
        &self.sys.id
    }

    /// Returns true once hydration attached the target's fields.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.fields.is_some()
    }
}

/// A single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Any JSON that is neither an array nor a link placeholder.
    Scalar(Value),
    /// A link placeholder, possibly hydrated.
    Link(Link),
    /// An ordered sequence of values.
    Sequence(Vec<FieldValue>),
}

impl FieldValue {
    /// Classifies a raw JSON value.
    ///
    /// Arrays become sequences (recursively), objects whose `sys.type` is
    /// `"Link"` become links, everything else is kept as a scalar.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Array(values) => values
                .into_iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>>>()
                .map(Self::Sequence),
            value if is_link_object(&value) => Ok(Self::Link(serde_json::from_value(value)?)),
            value => Ok(Self::Scalar(value)),
        }
    }

    /// Converts back into plain JSON.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(v) => v.as_str(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Self::Link(link) => Some(link),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&[FieldValue]> {
        match self {
            Self::Sequence(values) => Some(values),
            _ => None,
        }
    }
}

impl From<Value> for FieldValue {
    /// Wraps JSON as a scalar without classifying it.
    fn from(value: Value) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Scalar(Value::String(value.to_string()))
    }
}

impl From<Link> for FieldValue {
    fn from(link: Link) -> Self {
        Self::Link(link)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(value) => value.serialize(serializer),
            Self::Link(link) => link.serialize(serializer),
            Self::Sequence(values) => values.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(value).map_err(serde::de::Error::custom)
    }
}

fn is_link_object(value: &Value) -> bool {
    value
        .get("sys")
        .and_then(|sys| sys.get("type"))
        .and_then(Value::as_str)
        == Some(LINK_TYPE)
}

/// A content entry. Assets share the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub sys: Sys,
    pub fields: Fields,
}

impl Entry {
    /// Creates an entry with no fields.
    #[must_use]
    pub fn new(sys: Sys) -> Self {
        Self {
            sys,
            fields: Fields::new(),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Decodes an entry, naming the missing key when `sys` or `fields` is absent.
    pub fn from_json(value: Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(Error::malformed("entry", "expected a JSON object"));
        };
        if !object.get("sys").is_some_and(Value::is_object) {
            return Err(Error::malformed("entry", "missing `sys`"));
        }
        if !object.get("fields").is_some_and(Value::is_object) {
            let id = object["sys"].get("id").and_then(Value::as_str).unwrap_or("?");
            return Err(Error::malformed(
                format!("entry {id}"),
                "missing `fields`",
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Converts back into API-shaped JSON.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.sys.id
    }

    #[must_use]
    pub fn updated_at(&self) -> Option<UpdatedAt> {
        self.sys.updated_at()
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Extracts a string from the JSON form of `fields` using a JSON pointer
    /// (e.g. `"/icon/fields/title"`).
    #[must_use]
    pub fn get_str(&self, pointer: &str) -> Option<String> {
        let fields = serde_json::to_value(&self.fields).ok()?;
        fields.pointer(pointer)?.as_str().map(str::to_string)
    }
}
