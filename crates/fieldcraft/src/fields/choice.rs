//! Fields restricted to a fixed set of names: [Enum] and [MultiChoice].
//!
//! A token is looked up by exact, case-sensitive name first. If that fails and a
//! fallback [Matcher] is configured, the matcher may pick one of the names instead.

use std::sync::Arc;

use crate::{
    errors::{CompileError, ValidationError},
    field::{Field, FieldMeta},
    matcher::{Matcher, UniqueSubstring},
    schema::Schema,
    value::{Primitive, Record, Value, primitive_token},
};

#[derive(Debug, Clone)]
struct Choices {
    names: Vec<String>,
    fallback: Option<Arc<dyn Matcher>>,
}

impl Choices {
    fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            fallback: None,
        }
    }

    fn resolve(&self, token: &str) -> Option<&str> {
        if let Some(name) = self.names.iter().find(|name| *name == token) {
            return Some(name.as_str());
        }
        let fallback = self.fallback.as_ref()?;
        fallback
            .find(token, &self.names)
            .and_then(|i| self.names.get(i))
            .map(String::as_str)
    }

    fn lookup(&self, meta: &FieldMeta, value: &Primitive) -> Result<String, ValidationError> {
        primitive_token(value)
            .and_then(|token| self.resolve(&token).map(str::to_owned))
            .ok_or_else(|| meta.invalid(value))
    }

    fn verify(&self, meta: &FieldMeta) -> Result<(), CompileError> {
        if self.names.is_empty() {
            return Err(CompileError::EmptyChoices(meta.name().to_owned()));
        }
        Ok(())
    }
}

/// Members of an enumeration, identified by name. Deserializes to [Value::Enum].
#[derive(Debug, Clone)]
pub struct Enum {
    meta: FieldMeta,
    choices: Choices,
}

impl Enum {
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            meta: FieldMeta::default(),
            choices: Choices::new(members),
        }
    }

    /// Falls back to a unique case-insensitive substring match when enabled.
    pub fn soft_match(mut self, enabled: bool) -> Self {
        self.choices.fallback = enabled.then(|| Arc::new(UniqueSubstring) as Arc<dyn Matcher>);
        self
    }

    /// Installs a custom fallback strategy.
    pub fn matcher(mut self, matcher: impl Matcher + 'static) -> Self {
        self.choices.fallback = Some(Arc::new(matcher));
        self
    }

    pub fn members(&self) -> &[String] {
        &self.choices.names
    }
}

impl Field for Enum {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn verify(&self) -> Result<(), CompileError> {
        self.choices.verify(&self.meta)
    }

    fn serialize(&self, value: &Value, _instance: &dyn Record, _schema: &Schema) -> Primitive {
        match value.as_str() {
            Some(name) => Primitive::String(name.to_owned()),
            None => Primitive::Null,
        }
    }

    fn deserialize(&self, value: &Primitive, _schema: &Schema) -> Result<Value, ValidationError> {
        self.choices.lookup(&self.meta, value).map(Value::Enum)
    }
}

/// One of a set of plain strings. Unlike [Enum], the fallback is on by default.
#[derive(Debug, Clone)]
pub struct MultiChoice {
    meta: FieldMeta,
    choices: Choices,
}

impl MultiChoice {
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut choices = Choices::new(choices);
        choices.fallback = Some(Arc::new(UniqueSubstring));
        Self {
            meta: FieldMeta::default(),
            choices,
        }
    }

    pub fn matcher(mut self, matcher: impl Matcher + 'static) -> Self {
        self.choices.fallback = Some(Arc::new(matcher));
        self
    }

    /// Accept exact matches only.
    pub fn strict(mut self) -> Self {
        self.choices.fallback = None;
        self
    }

    pub fn choices(&self) -> &[String] {
        &self.choices.names
    }
}

impl Field for MultiChoice {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn verify(&self) -> Result<(), CompileError> {
        self.choices.verify(&self.meta)
    }

    fn deserialize(&self, value: &Primitive, _schema: &Schema) -> Result<Value, ValidationError> {
        self.choices.lookup(&self.meta, value).map(Value::Text)
    }
}
