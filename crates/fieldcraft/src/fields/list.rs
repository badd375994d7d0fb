use crate::{
    errors::{CompileError, ValidationError},
    field::{Field, FieldMeta},
    schema::Schema,
    value::{Primitive, Record, Value},
};

/// A sequence whose elements are all handled by one item field.
///
/// Validation stops at the first bad element and reports that element's error.
#[derive(Debug)]
pub struct List {
    meta: FieldMeta,
    item: Box<dyn Field>,
}

impl List {
    pub fn new(item: impl Field + 'static) -> Self {
        Self::boxed(Box::new(item))
    }

    pub fn boxed(item: Box<dyn Field>) -> Self {
        Self {
            meta: FieldMeta::default(),
            item,
        }
    }

    pub fn item(&self) -> &dyn Field {
        self.item.as_ref()
    }

    fn elements<'a>(&self, value: &'a Primitive) -> Result<&'a [Primitive], ValidationError> {
        match value {
            Primitive::Array(items) => Ok(items.as_slice()),
            _ => Err(self.meta.error("Expected list")),
        }
    }
}

impl Field for List {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn update_name(&mut self, name: &str) {
        self.meta.update_name(name);
        self.item.update_name(self.meta.name());
    }

    fn verify(&self) -> Result<(), CompileError> {
        self.item.verify()
    }

    fn serialize(&self, value: &Value, instance: &dyn Record, schema: &Schema) -> Primitive {
        match value {
            Value::List(items) => Primitive::Array(
                items
                    .iter()
                    .map(|item| self.item.serialize(item, instance, schema))
                    .collect(),
            ),
            _ => Primitive::Null,
        }
    }

    fn deserialize(&self, value: &Primitive, schema: &Schema) -> Result<Value, ValidationError> {
        self.elements(value)?
            .iter()
            .map(|item| self.item.deserialize(item, schema))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }

    fn deserialize_naive(&self, value: &Primitive, schema: &Schema) -> Result<Value, ValidationError> {
        self.elements(value)?
            .iter()
            .map(|item| self.item.deserialize_naive(item, schema))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }
}
