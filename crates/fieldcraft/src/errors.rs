//! Error types for schema compilation and deserialization.
//!
//! Deserialization failures form a small tree: a [DeserializationError] aggregates
//! [ValidationError]s, each either a [PlainError] or a [FieldError]. A field error's
//! [Reason] may itself hold a nested [DeserializationError] (from a related schema),
//! so the tree can be arbitrarily deep. Every node renders to a structured
//! [Primitive] through `serialized()`.

use std::fmt;

use serde_json::json;
use thiserror::Error;

use crate::value::Primitive;

/// A failure not tied to any field, e.g. a top-level input that is not a map.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{reason}")]
pub struct PlainError {
    reason: String,
}

impl PlainError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// `{"error": reason}`
    pub fn serialized(&self) -> Primitive {
        json!({ "error": self.reason })
    }
}

/// Why a field rejected its value.
#[derive(Debug, Clone, PartialEq)]
pub enum Reason {
    Message(String),
    /// The field delegates to another schema which failed on its own.
    Nested(DeserializationError),
}

impl Reason {
    pub fn serialized(&self) -> Primitive {
        match self {
            Reason::Message(message) => Primitive::String(message.clone()),
            Reason::Nested(error) => error.serialized(),
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Message(message) => f.write_str(message),
            Reason::Nested(error) => write!(f, "{{{error}}}"),
        }
    }
}

/// A single field's value failed conversion or a constraint.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {reason}")]
pub struct FieldError {
    field: String,
    reason: Reason,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: Reason::Message(reason.into()),
        }
    }

    /// Wraps the failure of a nested schema without flattening it.
    pub fn nested(field: impl Into<String>, error: DeserializationError) -> Self {
        Self {
            field: field.into(),
            reason: Reason::Nested(error),
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::new(field, format!("missing required value \"{field}\""))
    }

    /// Name of the field, as it appears in the serialized form.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn reason(&self) -> &Reason {
        &self.reason
    }

    /// `{"field": name, "error": reason}`
    pub fn serialized(&self) -> Primitive {
        json!({
            "field": self.field,
            "error": self.reason.serialized(),
        })
    }
}

/// One entry of a [DeserializationError].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Plain(#[from] PlainError),
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl ValidationError {
    pub fn serialized(&self) -> Primitive {
        match self {
            ValidationError::Plain(error) => error.serialized(),
            ValidationError::Field(error) => error.serialized(),
        }
    }

    pub fn as_field(&self) -> Option<&FieldError> {
        match self {
            ValidationError::Field(error) => Some(error),
            ValidationError::Plain(_) => None,
        }
    }
}

/// Every error collected during one deserialization, in field order.
///
/// This is the only error a schema returns from deserialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeserializationError {
    errors: Vec<ValidationError>,
}

impl DeserializationError {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Field errors only, in order.
    pub fn field_errors(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter_map(ValidationError::as_field)
    }

    /// First field error reported for `field`.
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.field_errors().find(|error| error.field() == field)
    }

    /// `{"errors": [...]}`
    pub fn serialized(&self) -> Primitive {
        json!({
            "errors": self.errors.iter().map(ValidationError::serialized).collect::<Vec<_>>(),
        })
    }
}

impl fmt::Display for DeserializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deserialization failed")?;
        for (i, error) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DeserializationError {}

impl From<PlainError> for DeserializationError {
    fn from(error: PlainError) -> Self {
        Self::new(vec![error.into()])
    }
}

impl From<FieldError> for DeserializationError {
    fn from(error: FieldError) -> Self {
        Self::new(vec![error.into()])
    }
}

impl From<Vec<ValidationError>> for DeserializationError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::new(errors)
    }
}

/// Errors produced when building a [crate::schema::Schema] from its field declarations.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Field name resolved to an empty string.
    #[error("field name must not be empty")]
    InvalidFieldName,
    /// Two deserializable fields write to the same source attribute.
    #[error("fields \"{first}\" and \"{second}\" share the source attribute \"{attribute}\"")]
    DuplicateSource {
        attribute: String,
        first: String,
        second: String,
    },
    /// `min` is greater than `max`.
    #[error("field \"{0}\" has an empty allowed range")]
    InvalidRange(String),
    /// A coalesce field was declared without any candidate fields.
    #[error("coalesce field \"{0}\" has no candidate fields")]
    EmptyCoalesce(String),
    /// A choice field was declared without any choices.
    #[error("field \"{0}\" has no choices")]
    EmptyChoices(String),
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("field \"{field}\" has an invalid datetime format \"{format}\"")]
    InvalidDatetimeFormat { field: String, format: String },
    /// A definition refers to a schema that has not been compiled.
    #[error("unknown schema \"{0}\"")]
    UnknownSchema(String),
    /// A definition document could not be parsed.
    #[error("malformed schema definition: {0}")]
    MalformedDefinition(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_serialized_forms() {
        assert_eq!(PlainError::new("bad").serialized(), json!({"error": "bad"}));
        assert_eq!(
            FieldError::new("age", "too old").serialized(),
            json!({"field": "age", "error": "too old"})
        );

        let nested = DeserializationError::from(FieldError::missing("city"));
        let error = DeserializationError::new(vec![
            PlainError::new("bad").into(),
            FieldError::nested("address", nested).into(),
        ]);
        assert_eq!(
            error.serialized(),
            json!({"errors": [
                {"error": "bad"},
                {"field": "address", "error": {"errors": [
                    {"field": "city", "error": "missing required value \"city\""}
                ]}}
            ]})
        );
    }

    #[test]
    fn test_lookup_and_display() {
        let error = DeserializationError::new(vec![
            FieldError::new("a", "first").into(),
            FieldError::new("b", "second").into(),
        ]);
        assert_eq!(error.len(), 2);
        assert_eq!(error.for_field("b").unwrap().reason(), &Reason::Message("second".into()));
        assert!(error.for_field("c").is_none());
        assert_eq!(error.to_string(), "deserialization failed: a: first; b: second");
    }
}
