//! Custom node attributes
//!
//! Hosts let artists attach arbitrary key/value pairs to scene nodes. The
//! exporter only ever reads a fixed vocabulary of keys, so [`AttributeMap`]
//! exposes typed accessors instead of handing out raw values. A missing key
//! is `Ok(None)`; a present key of the wrong type is an [`AttributeError`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Deserialize};

/// A scalar or string attribute value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl AttrValue {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "bool",
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::Str(_) => "string",
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Int(i) => write!(f, "{}", i),
            AttrValue::Float(x) => write!(f, "{}", x),
            AttrValue::Str(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v.into())
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Float(v.into())
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Str(v)
    }
}

/// Error reading a typed attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeError {
    /// The key is present but holds a value of another type
    WrongType {
        key: String,
        expected: &'static str,
        found: AttrValue,
    },
    /// The key holds an integer that does not fit the target type
    OutOfRange {
        key: String,
        value: i64,
    },
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeError::WrongType { key, expected, found } => write!(
                f,
                "attribute '{}' must be a {}, found {} {}",
                key,
                expected,
                found.type_name(),
                found
            ),
            AttributeError::OutOfRange { key, value } => {
                write!(f, "attribute '{}' value {} is out of range", key, value)
            }
        }
    }
}

impl std::error::Error for AttributeError {}

/// String-keyed attribute bag attached to a scene node
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap {
    values: BTreeMap<String, AttrValue>,
}

impl AttributeMap {
    /// An empty map usable in `static` position
    pub const EMPTY: Self = Self { values: BTreeMap::new() };

    /// Create an empty attribute map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Check whether a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Raw value lookup
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read a string attribute
    pub fn string(&self, key: &str) -> Result<Option<&str>, AttributeError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(AttrValue::Str(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(wrong_type(key, "string", other)),
        }
    }

    /// Read a float attribute; integers are widened
    pub fn float(&self, key: &str) -> Result<Option<f32>, AttributeError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(AttrValue::Float(x)) => Ok(Some(*x as f32)),
            Some(AttrValue::Int(i)) => Ok(Some(*i as f32)),
            Some(other) => Err(wrong_type(key, "number", other)),
        }
    }

    /// Read an integer attribute; floats are truncated toward zero
    pub fn int(&self, key: &str) -> Result<Option<i64>, AttributeError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(AttrValue::Int(i)) => Ok(Some(*i)),
            Some(AttrValue::Float(x)) if x.is_finite() => Ok(Some(x.trunc() as i64)),
            Some(other) => Err(wrong_type(key, "integer", other)),
        }
    }

    /// Read an integer attribute that must fit in a `u16`
    pub fn u16(&self, key: &str) -> Result<Option<u16>, AttributeError> {
        match self.int(key)? {
            None => Ok(None),
            Some(value) => u16::try_from(value)
                .map(Some)
                .map_err(|_| AttributeError::OutOfRange { key: key.to_string(), value }),
        }
    }

    /// Read a boolean attribute; numbers count as true when non-zero
    pub fn flag(&self, key: &str) -> Result<Option<bool>, AttributeError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(AttrValue::Bool(b)) => Ok(Some(*b)),
            Some(AttrValue::Int(i)) => Ok(Some(*i != 0)),
            Some(AttrValue::Float(x)) => Ok(Some(*x != 0.0)),
            Some(other) => Err(wrong_type(key, "bool", other)),
        }
    }
}

fn wrong_type(key: &str, expected: &'static str, found: &AttrValue) -> AttributeError {
    AttributeError::WrongType {
        key: key.to_string(),
        expected,
        found: found.clone(),
    }
}
