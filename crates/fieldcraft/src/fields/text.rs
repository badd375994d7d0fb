//! Text field with length bounds and an optional full-match pattern.

use regex::Regex;

use crate::{
    errors::{CompileError, ValidationError},
    field::{Field, FieldMeta},
    schema::Schema,
    value::{Primitive, Value, primitive_token},
};

#[derive(Debug, Clone)]
struct Pattern {
    source: String,
    anchored: Regex,
}

/// Strings, coerced from numbers and booleans. `min`/`max` bound the length in characters.
#[derive(Debug, Clone, Default)]
pub struct Text {
    meta: FieldMeta,
    min: Option<usize>,
    max: Option<usize>,
    pattern: Option<Pattern>,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Values must match `pattern` in full, not just a prefix or substring of it.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, CompileError> {
        let anchored = Regex::new(&format!("^(?:{pattern})$"))?;
        self.pattern = Some(Pattern {
            source: pattern.to_owned(),
            anchored,
        });
        Ok(self)
    }

    fn coerce(&self, value: &Primitive) -> Result<String, ValidationError> {
        primitive_token(value)
            .map(|token| token.into_owned())
            .ok_or_else(|| self.meta.invalid(value))
    }
}

impl Field for Text {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn verify(&self) -> Result<(), CompileError> {
        super::number::check_range(&self.meta, self.min, self.max)
    }

    fn deserialize(&self, value: &Primitive, _schema: &Schema) -> Result<Value, ValidationError> {
        let text = self.coerce(value)?;

        let len = text.chars().count();
        super::number::check_bounds(&self.meta, len, self.min, self.max)?;

        if let Some(pattern) = &self.pattern {
            if !pattern.anchored.is_match(&text) {
                return Err(self.meta.error(format!(
                    "Value \"{text}\" does not match pattern \"{}\"",
                    pattern.source
                )));
            }
        }

        Ok(Value::Text(text))
    }

    fn deserialize_naive(&self, value: &Primitive, _schema: &Schema) -> Result<Value, ValidationError> {
        Ok(Value::from_primitive(value))
    }
}
