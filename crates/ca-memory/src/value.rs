//! The tagged value stored under each status key.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One status attribute.
///
/// Deserializes from plain JSON (`untagged`), so agent profiles can be
/// written as ordinary JSON objects.  Integers are kept distinct from floats.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<StatusValue>),
    Map(BTreeMap<String, StatusValue>),
}

/// The semantic kind of a [`StatusValue`], used for drift detection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Text,
    List,
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Null  => "null",
            ValueKind::Bool  => "bool",
            ValueKind::Int   => "int",
            ValueKind::Float => "float",
            ValueKind::Text  => "text",
            ValueKind::List  => "list",
            ValueKind::Map   => "map",
        })
    }
}

impl StatusValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            StatusValue::Null     => ValueKind::Null,
            StatusValue::Bool(_)  => ValueKind::Bool,
            StatusValue::Int(_)   => ValueKind::Int,
            StatusValue::Float(_) => ValueKind::Float,
            StatusValue::Text(_)  => ValueKind::Text,
            StatusValue::List(_)  => ValueKind::List,
            StatusValue::Map(_)   => ValueKind::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, StatusValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StatusValue::Int(n) => Some(*n),
            StatusValue::Float(x) if x.fract() == 0.0 => Some(*x as i64),
            _ => None,
        }
    }

    /// Numeric value of either an `Int` or a `Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatusValue::Int(n) => Some(*n as f64),
            StatusValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StatusValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[StatusValue]> {
        match self {
            StatusValue::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, StatusValue>> {
        match self {
            StatusValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Human-readable rendering for prompts: text without quotes, `Null` as
    /// an empty string, everything else as compact JSON.
    pub fn render(&self) -> String {
        match self {
            StatusValue::Null => String::new(),
            StatusValue::Text(s) => s.clone(),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}

impl From<bool> for StatusValue {
    fn from(b: bool) -> Self {
        StatusValue::Bool(b)
    }
}

impl From<i64> for StatusValue {
    fn from(n: i64) -> Self {
        StatusValue::Int(n)
    }
}

impl From<f64> for StatusValue {
    fn from(x: f64) -> Self {
        StatusValue::Float(x)
    }
}

impl From<&str> for StatusValue {
    fn from(s: &str) -> Self {
        StatusValue::Text(s.to_owned())
    }
}

impl From<String> for StatusValue {
    fn from(s: String) -> Self {
        StatusValue::Text(s)
    }
}

impl From<Vec<StatusValue>> for StatusValue {
    fn from(v: Vec<StatusValue>) -> Self {
        StatusValue::List(v)
    }
}

impl From<BTreeMap<String, StatusValue>> for StatusValue {
    fn from(m: BTreeMap<String, StatusValue>) -> Self {
        StatusValue::Map(m)
    }
}

impl From<serde_json::Value> for StatusValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Null => StatusValue::Null,
            Value::Bool(b) => StatusValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => StatusValue::Int(i),
                None => StatusValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => StatusValue::Text(s),
            Value::Array(items) => StatusValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(obj) => {
                StatusValue::Map(obj.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}
