use crate::{
    errors::ValidationError,
    field::{Field, FieldMeta},
    schema::Schema,
    value::{Primitive, Value, primitive_token},
};

const TRUTHY: &[&str] = &["y", "yes", "t", "true", "on", "1"];
const FALSY: &[&str] = &["n", "no", "f", "false", "off", "0"];

/// Booleans from a case-insensitive set of true/false words.
#[derive(Debug, Clone, Default)]
pub struct Bool {
    meta: FieldMeta,
}

impl Bool {
    pub fn new() -> Self {
        Self::default()
    }
}

fn parse_bool(token: &str) -> Option<bool> {
    let token = token.to_lowercase();
    if TRUTHY.contains(&token.as_str()) {
        Some(true)
    } else if FALSY.contains(&token.as_str()) {
        Some(false)
    } else {
        None
    }
}

impl Field for Bool {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn deserialize(&self, value: &Primitive, _schema: &Schema) -> Result<Value, ValidationError> {
        primitive_token(value)
            .and_then(|token| parse_bool(&token))
            .map(Value::Bool)
            .ok_or_else(|| self.meta.invalid(value))
    }

    fn deserialize_naive(&self, value: &Primitive, _schema: &Schema) -> Result<Value, ValidationError> {
        Ok(Value::from_primitive(value))
    }
}
