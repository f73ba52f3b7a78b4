//! Set summary data model: raw service records and the aggregate handed to renderers.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

// ---------------------------------------------------------------
// Raw service records
// ---------------------------------------------------------------

/// Object info tuple as returned by the storage services.
///
/// Positions: 0 = object id, 1 = name, 2 = type string, 4 = version,
/// 6 = workspace id. Other positions are carried but not interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectInfo(pub Vec<Value>);

impl ObjectInfo {
    fn string_at(&self, index: usize, field: &str) -> Result<&str> {
        self.0.get(index).and_then(Value::as_str).ok_or_else(|| {
            Error::MalformedResponse(format!(
                "object info has no {} at position {}",
                field, index
            ))
        })
    }

    pub fn name(&self) -> Result<&str> {
        self.string_at(1, "name")
    }

    pub fn type_string(&self) -> Result<&str> {
        self.string_at(2, "type string")
    }

    /// `wsid/objid/version` when the numeric positions are present.
    pub fn canonical_ref(&self) -> Option<String> {
        let num = |i: usize| self.0.get(i).and_then(Value::as_u64);
        Some(format!("{}/{}/{}", num(6)?, num(0)?, num(4)?))
    }
}

/// One member entry of a resolved set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetItem {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<ObjectInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetData {
    #[serde(default)]
    pub description: String,
    pub items: Vec<SetItem>,
}

/// Set resolution response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSet {
    pub info: ObjectInfo,
    pub data: SetData,
}

/// Fetched data for one member: info tuple plus a sparse data payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberObject {
    pub info: ObjectInfo,
    #[serde(default)]
    pub data: Map<String, Value>,
}

// ---------------------------------------------------------------
// Aggregate model
// ---------------------------------------------------------------

/// A member reference with its reported composite type string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetItemRef {
    pub reference: String,
    pub type_string: String,
}

/// Type label derived from the member type strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemType {
    /// The set has no members.
    Empty,
    /// Members report more than one distinct type string.
    Mixed,
    /// All members share this type; holds its display name.
    Uniform(String),
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("No Reads"),
            Self::Mixed => f.write_str("Mixed Reads"),
            Self::Uniform(name) => f.write_str(name),
        }
    }
}

impl Serialize for ItemType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStats {
    pub read_count: u64,
    pub base_pair_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSummary {
    pub name: String,
    pub description: String,
    pub item_type: ItemType,
    pub item_count: usize,
    pub stats: SetStats,
    pub items: Vec<SetItem>,
}

/// One display row per fetched member.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub reference: String,
    pub name: String,
    /// `None` when the member type string is malformed.
    pub type_name: Option<String>,
    pub read_count: Option<u64>,
    pub read_size: Option<u64>,
    pub insert_size_mean: Option<f64>,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub set: SetSummary,
    pub rows: Vec<Row>,
}
