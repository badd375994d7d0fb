use log::trace;

use crate::{
    errors::{CompileError, PlainError, ValidationError},
    field::{Field, FieldMeta},
    schema::Schema,
    value::{Primitive, Record, Value},
};

/// Tries a list of candidate fields in order and keeps the first that accepts the value.
///
/// Failures of all but the last candidate are discarded; the last candidate's result is
/// returned as is. Serialization always goes through the first candidate.
#[derive(Debug, Default)]
pub struct Coalesce {
    meta: FieldMeta,
    candidates: Vec<Box<dyn Field>>,
}

impl Coalesce {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(self, candidate: impl Field + 'static) -> Self {
        self.boxed_field(Box::new(candidate))
    }

    pub fn boxed_field(mut self, candidate: Box<dyn Field>) -> Self {
        self.candidates.push(candidate);
        self
    }

    pub fn candidates(&self) -> impl Iterator<Item = &dyn Field> {
        self.candidates.iter().map(|candidate| candidate.as_ref())
    }
}

impl Field for Coalesce {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn update_name(&mut self, name: &str) {
        self.meta.update_name(name);
        for candidate in &mut self.candidates {
            candidate.update_name(self.meta.name());
        }
    }

    fn verify(&self) -> Result<(), CompileError> {
        if self.candidates.is_empty() {
            return Err(CompileError::EmptyCoalesce(self.meta.name().to_owned()));
        }
        self.candidates.iter().try_for_each(|candidate| candidate.verify())
    }

    fn serialize(&self, value: &Value, instance: &dyn Record, schema: &Schema) -> Primitive {
        match self.candidates.first() {
            Some(first) => first.serialize(value, instance, schema),
            None => Primitive::Null,
        }
    }

    fn deserialize(&self, value: &Primitive, schema: &Schema) -> Result<Value, ValidationError> {
        let Some((last, rest)) = self.candidates.split_last() else {
            return Err(PlainError::new(format!("coalesce field \"{}\" has no candidates", self.meta.name())).into());
        };

        for candidate in rest {
            match candidate.deserialize(value, schema) {
                Ok(value) => return Ok(value),
                Err(error) => trace!("coalesce {}: candidate rejected value: {error}", self.meta.name()),
            }
        }

        last.deserialize(value, schema)
    }
}
