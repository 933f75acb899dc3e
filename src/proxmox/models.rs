//! Typed projections of the API responses consumed by the reports.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// The `{ "data": ... }` envelope of a successful API response.
#[derive(Deserialize, Debug, Clone)]
pub struct ApiData<T> {
    pub data: T,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct NodeSummary {
    pub node: String,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(from = "String")]
pub enum VmStatus {
    Running,
    Stopped,
    Paused,
    Unknown,
}

impl From<String> for VmStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "running" => VmStatus::Running,
            "stopped" => VmStatus::Stopped,
            "paused" => VmStatus::Paused,
            _ => VmStatus::Unknown,
        }
    }
}

impl fmt::Display for VmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VmStatus::Running => "running",
            VmStatus::Stopped => "stopped",
            VmStatus::Paused => "paused",
            VmStatus::Unknown => "unknown",
        })
    }
}

fn unknown_status() -> VmStatus {
    VmStatus::Unknown
}

/// A QEMU guest as listed by `nodes/{node}/qemu`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct VmSummary {
    pub vmid: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "unknown_status")]
    pub status: VmStatus,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct UserRecord {
    pub userid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "realm-type")]
    pub realm_type: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub enable: Option<bool>,
    #[serde(default)]
    pub expire: Option<i64>,
}

/// The API reports boolean flags as `0`/`1`; accept either form.
fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrInt {
        Bool(bool),
        Int(i64),
    }

    Ok(Option::<BoolOrInt>::deserialize(deserializer)?.map(|v| match v {
        BoolOrInt::Bool(b) => b,
        BoolOrInt::Int(i) => i != 0,
    }))
}

/// A single attribute value of a network interface.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<AttrValue>),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Null => Ok(()),
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Integer(i) => write!(f, "{}", i),
            AttrValue::Float(x) => write!(f, "{}", x),
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

/// Schema-less interface record; every reported attribute is kept in API order.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct NetworkInterface(pub IndexMap<String, AttrValue>);

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct IsoEntry {
    pub volid: String,
}
