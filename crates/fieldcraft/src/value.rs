//! Values on both sides of a schema: transport [Primitive]s and domain [Value]s.

use std::borrow::Cow;

use chrono::NaiveDateTime;
use indexmap::IndexMap;

/// Transport-safe representation read by `deserialize` and produced by `serialize`.
pub type Primitive = serde_json::Value;

/// Ordered string-keyed map of primitives; the serialized form of a record.
pub type PrimitiveMap = serde_json::Map<String, Primitive>;

/// Ordered map of deserialized values keyed by field source.
pub type ValueMap = IndexMap<String, Value>;

/// A domain value produced by deserializing a [Primitive].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Name of an enumeration member.
    Enum(String),
    DateTime(NaiveDateTime),
    List(Vec<Value>),
    /// A nested record, as produced by related fields.
    Record(ValueMap),
}

impl Value {
    /// Best-effort structural conversion of a primitive, without validation.
    pub fn from_primitive(primitive: &Primitive) -> Self {
        match primitive {
            Primitive::Null => Value::Null,
            Primitive::Bool(b) => Value::Bool(*b),
            Primitive::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            Primitive::String(s) => Value::Text(s.clone()),
            Primitive::Array(items) => Value::List(items.iter().map(Value::from_primitive).collect()),
            Primitive::Object(map) => Value::Record(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_primitive(v)))
                    .collect(),
            ),
        }
    }

    /// Renders the value as its natural primitive. Non-finite floats become null.
    pub fn to_primitive(&self) -> Primitive {
        match self {
            Value::Null => Primitive::Null,
            Value::Bool(b) => Primitive::Bool(*b),
            Value::Int(i) => Primitive::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f).map_or(Primitive::Null, Primitive::Number),
            Value::Text(s) | Value::Enum(s) => Primitive::String(s.clone()),
            Value::DateTime(dt) => Primitive::String(dt.to_string()),
            Value::List(items) => Primitive::Array(items.iter().map(Value::to_primitive).collect()),
            Value::Record(map) => Primitive::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_primitive()))
                    .collect(),
            ),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers are widened to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text and enum member names.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&ValueMap> {
        match self {
            Value::Record(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Record(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// A domain instance whose attributes can be read by name during serialization.
pub trait Record {
    /// Returns the attribute stored under `name`, or `None` if there is no such attribute.
    fn attribute(&self, name: &str) -> Option<Value>;
}

impl Record for ValueMap {
    fn attribute(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl Record for PrimitiveMap {
    fn attribute(&self, name: &str) -> Option<Value> {
        self.get(name).map(Value::from_primitive)
    }
}

/// Renders a primitive for use inside error messages: strings are shown without quotes.
pub(crate) fn display_primitive(value: &Primitive) -> Cow<'_, str> {
    match value {
        Primitive::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

/// Stringifies scalar primitives; containers and null have no token form.
pub(crate) fn primitive_token(value: &Primitive) -> Option<Cow<'_, str>> {
    match value {
        Primitive::String(s) => Some(Cow::Borrowed(s)),
        Primitive::Number(n) => Some(Cow::Owned(n.to_string())),
        Primitive::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}
