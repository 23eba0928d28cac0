//! Typed per-entity tunables
//!
//! Entities differ in which tunables they use, so attributes are stored
//! sparsely. Every key carries a static default, which means a lookup can
//! never fail: an absent key falls back to that default (or to the caller's
//! default with the `*_or` accessors).

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;

/// Known attribute keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    /// Per-axis speed limit
    MaxSpeed,
    /// Per-axis acceleration limit
    MaxAcceleration,
    /// Force applied per movement key
    StepForce,
    /// Upward impulse for a jump
    JumpForce,
    /// Range within which an entity reacts to others
    AttractionDistance,
    /// Energy pool
    Energy,
    /// Accumulated score
    Score,
    /// Remaining lives
    Lives,
    /// Points granted when collected
    Value,
}

impl AttributeKey {
    /// All keys, in declaration order
    pub const ALL: [AttributeKey; 9] = [
        Self::MaxSpeed,
        Self::MaxAcceleration,
        Self::StepForce,
        Self::JumpForce,
        Self::AttractionDistance,
        Self::Energy,
        Self::Score,
        Self::Lives,
        Self::Value,
    ];

    /// Default value used when the key is absent
    pub fn default_value(self) -> AttributeValue {
        match self {
            Self::MaxSpeed => AttributeValue::Float(16.0),
            Self::MaxAcceleration => AttributeValue::Float(4.0),
            Self::StepForce => AttributeValue::Float(0.5),
            Self::JumpForce => AttributeValue::Float(4.0),
            Self::AttractionDistance => AttributeValue::Float(50.0),
            Self::Energy => AttributeValue::Float(100.0),
            Self::Score => AttributeValue::Int(0),
            Self::Lives => AttributeValue::Int(3),
            Self::Value => AttributeValue::Int(1),
        }
    }

    /// Canonical snake_case name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MaxSpeed => "max_speed",
            Self::MaxAcceleration => "max_acceleration",
            Self::StepForce => "step_force",
            Self::JumpForce => "jump_force",
            Self::AttractionDistance => "attraction_distance",
            Self::Energy => "energy",
            Self::Score => "score",
            Self::Lives => "lives",
            Self::Value => "value",
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown attribute name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAttribute(pub String);

impl fmt::Display for UnknownAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown attribute: {}", self.0)
    }
}

impl std::error::Error for UnknownAttribute {}

impl FromStr for AttributeKey {
    type Err = UnknownAttribute;

    /// Accepts snake_case (`max_speed`) and camelCase (`maxSpeed`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().replace('_', "") == normalized)
            .ok_or_else(|| UnknownAttribute(s.to_string()))
    }
}

/// A stored attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Floating point
    Float(f64),
    /// Integer
    Int(i64),
    /// Flag
    Bool(bool),
    /// Text
    Text(String),
}

impl AttributeValue {
    /// Numeric view (integers widen, flags are 0/1, text parses or is None)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            Self::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Integer view (floats truncate)
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Float(v) => Some(*v as i64),
            Self::Int(v) => Some(*v),
            Self::Bool(v) => Some(i64::from(*v)),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Flag view (non-zero numbers are true)
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Float(v) => Some(*v != 0.0),
            Self::Int(v) => Some(*v != 0),
            Self::Bool(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Sparse attribute storage
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    values: FxHashMap<AttributeKey, AttributeValue>,
}

impl Attributes {
    /// Create an empty attribute set
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value
    pub fn set(&mut self, key: AttributeKey, value: impl Into<AttributeValue>) {
        self.values.insert(key, value.into());
    }

    /// Remove a value, restoring the default
    pub fn remove(&mut self, key: AttributeKey) -> Option<AttributeValue> {
        self.values.remove(&key)
    }

    /// Check whether a value was explicitly stored
    pub fn contains(&self, key: AttributeKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Stored value or the key's default
    pub fn get(&self, key: AttributeKey) -> AttributeValue {
        self.values
            .get(&key)
            .cloned()
            .unwrap_or_else(|| key.default_value())
    }

    /// Float value or the key's default
    pub fn float(&self, key: AttributeKey) -> f64 {
        let fallback = key.default_value().as_f64().unwrap_or(0.0);
        self.float_or(key, fallback)
    }

    /// Float value or `default`
    pub fn float_or(&self, key: AttributeKey, default: f64) -> f64 {
        self.values
            .get(&key)
            .and_then(AttributeValue::as_f64)
            .unwrap_or(default)
    }

    /// Integer value or the key's default
    pub fn int(&self, key: AttributeKey) -> i64 {
        let fallback = key.default_value().as_i64().unwrap_or(0);
        self.int_or(key, fallback)
    }

    /// Integer value or `default`
    pub fn int_or(&self, key: AttributeKey, default: i64) -> i64 {
        self.values
            .get(&key)
            .and_then(AttributeValue::as_i64)
            .unwrap_or(default)
    }

    /// Flag value or `default`
    pub fn flag_or(&self, key: AttributeKey, default: bool) -> bool {
        self.values
            .get(&key)
            .and_then(AttributeValue::as_bool)
            .unwrap_or(default)
    }

    /// Number of explicitly stored values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no value is stored
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over stored values
    pub fn iter(&self) -> impl Iterator<Item = (&AttributeKey, &AttributeValue)> {
        self.values.iter()
    }
}
