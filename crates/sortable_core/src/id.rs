use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::SortableError;

const CONTAINER_PREFIX: &str = "container-";
const ITEM_PREFIX: &str = "item-";

/// A caller supplied identifier, either numeric or textual.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    /// Read an identifier out of a JSON value. Only integers and strings qualify.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RawId::Number),
            Value::String(s) => Some(RawId::Text(s.clone())),
            _ => None,
        }
    }

    fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) => RawId::Number(n),
            Err(_) => RawId::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Number(n) => write!(f, "{n}"),
            RawId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RawId {
    fn from(value: i64) -> Self {
        RawId::Number(value)
    }
}

impl From<i32> for RawId {
    fn from(value: i32) -> Self {
        RawId::Number(value.into())
    }
}

impl From<u32> for RawId {
    fn from(value: u32) -> Self {
        RawId::Number(value.into())
    }
}

impl From<&str> for RawId {
    fn from(value: &str) -> Self {
        RawId::Text(value.to_string())
    }
}

impl From<String> for RawId {
    fn from(value: String) -> Self {
        RawId::Text(value)
    }
}

/// Identifier of a sortable node, tagged with the level it lives on.
///
/// Containers and items share the caller's identifier space, so the tag keeps
/// `container 1` and `item 1` apart during collision lookups. The string form
/// (`container-<id>` / `item-<id>`) is what commit payloads serialize to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SortableId {
    Container(RawId),
    Item(RawId),
}

impl SortableId {
    pub fn container(id: impl Into<RawId>) -> Self {
        SortableId::Container(id.into())
    }

    pub fn item(id: impl Into<RawId>) -> Self {
        SortableId::Item(id.into())
    }

    pub fn raw(&self) -> &RawId {
        match self {
            SortableId::Container(id) | SortableId::Item(id) => id,
        }
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, SortableId::Container(_))
    }

    #[inline]
    pub fn is_item(&self) -> bool {
        matches!(self, SortableId::Item(_))
    }
}

impl fmt::Display for SortableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortableId::Container(id) => write!(f, "{CONTAINER_PREFIX}{id}"),
            SortableId::Item(id) => write!(f, "{ITEM_PREFIX}{id}"),
        }
    }
}

impl FromStr for SortableId {
    type Err = SortableError;

    /// Parse the `container-<id>` / `item-<id>` form. Integer-looking raw parts
    /// come back as [`RawId::Number`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(raw) = s.strip_prefix(CONTAINER_PREFIX) {
            if !raw.is_empty() {
                return Ok(SortableId::Container(RawId::parse(raw)));
            }
        } else if let Some(raw) = s.strip_prefix(ITEM_PREFIX)
            && !raw.is_empty()
        {
            return Ok(SortableId::Item(RawId::parse(raw)));
        }
        Err(SortableError::InvalidId(s.to_string()))
    }
}

impl Serialize for SortableId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SortableId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
