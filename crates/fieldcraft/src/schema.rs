//! Schema: an ordered collection of named fields, with serialize/deserialize orchestration.

use std::{collections::HashMap, fmt, sync::Arc};

use indexmap::IndexMap;
use log::{debug, trace};

use crate::{
    errors::{CompileError, DeserializationError, FieldError, PlainError, ValidationError},
    field::Field,
    value::{Primitive, PrimitiveMap, Record, Value, ValueMap},
};

/// Resolved fields keyed by name, in declaration order.
pub type FieldMap = IndexMap<String, Arc<dyn Field>>;

/// A domain type that can be built from the values of a successful deserialization.
pub trait FromValues: Sized {
    fn from_values(values: ValueMap) -> Result<Self, DeserializationError>;
}

/// A compiled record shape. Use [SchemaBuilder] (or [Schema::builder]) to declare the
/// fields, then [Schema::serialize] and [Schema::deserialize_raw] to convert records.
///
/// Cloning is cheap: the field collection is shared and never mutated after `build`.
#[derive(Clone)]
pub struct Schema {
    name: Arc<str>,
    fields: Arc<FieldMap>,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in resolved order.
    pub fn fields(&self) -> impl Iterator<Item = &dyn Field> {
        self.fields.values().map(|field| field.as_ref())
    }

    pub fn field(&self, name: &str) -> Option<&dyn Field> {
        self.fields.get(name).map(|field| field.as_ref())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Starts a builder seeded with this schema's fields. Fields declared on it replace
    /// same-named fields in place; `build` leaves `self` untouched.
    pub fn with_overrides(&self) -> SchemaBuilder {
        SchemaBuilder::new(self.name()).extends(self)
    }

    /// Each field's configured default, `None` where the field has none.
    pub fn defaults(&self) -> IndexMap<String, Option<Primitive>> {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.meta().default.clone()))
            .collect()
    }

    /// Serializes every field that is not write-only, keyed by field name.
    pub fn serialize(&self, instance: &dyn Record) -> PrimitiveMap {
        self.fields
            .values()
            .filter(|field| !field.meta().write_only)
            .map(|field| (field.meta().name().to_owned(), field.extract(instance, self)))
            .collect()
    }

    /// Validates `input` field by field and returns the converted values keyed by source.
    ///
    /// All field failures are collected; the error lists them in field order.
    pub fn deserialize_raw(&self, input: &Primitive) -> Result<ValueMap, DeserializationError> {
        let Some(input) = input.as_object() else {
            return Err(PlainError::new("invalid input format").into());
        };

        let mut errors: Vec<ValidationError> = Vec::new();
        let mut values = ValueMap::with_capacity(self.fields.len());

        for field in self.fields.values() {
            let meta = field.meta();
            if meta.read_only {
                continue;
            }

            let given = match input.get(meta.name()) {
                Some(Primitive::Null) if !meta.deserialize_none => None,
                other => other,
            };

            let Some(value) = given.or(meta.default.as_ref()) else {
                if meta.required {
                    errors.push(FieldError::missing(meta.name()).into());
                }
                continue;
            };

            if value.is_null() && !meta.deserialize_none {
                values.insert(meta.source().to_owned(), Value::Null);
                continue;
            }

            match field.deserialize(value, self) {
                Ok(value) => {
                    values.insert(meta.source().to_owned(), value);
                }
                Err(error) => {
                    trace!("schema {}: {error}", self.name);
                    errors.push(error);
                }
            }
        }

        if !errors.is_empty() {
            debug!(
                "schema {}: deserialization failed with {} error(s)",
                self.name,
                errors.len()
            );
            return Err(DeserializationError::new(errors));
        }

        Ok(values)
    }

    /// Deserializes `input` and builds a `T` from the values.
    pub fn deserialize<T: FromValues>(&self, input: &Primitive) -> Result<T, DeserializationError> {
        self.deserialize_with(input, T::from_values)
    }

    /// Deserializes `input` and hands the values to `factory`.
    pub fn deserialize_with<T, F>(&self, input: &Primitive, factory: F) -> Result<T, DeserializationError>
    where
        F: FnOnce(ValueMap) -> Result<T, DeserializationError>,
    {
        factory(self.deserialize_raw(input)?)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects field declarations and resolves them into a [Schema].
///
/// Inherited fields are seeded first, in `extends` order, so a later parent replaces an
/// earlier parent's same-named field in its original position. Own fields follow in
/// declaration order: a known name is replaced in place, a new name is appended.
pub struct SchemaBuilder {
    name: String,
    parents: Vec<Schema>,
    fields: Vec<(String, Box<dyn Field>)>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parents: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn extends(mut self, parent: &Schema) -> Self {
        self.parents.push(parent.clone());
        self
    }

    /// Declares `field` under `key`, which becomes its name unless it has an explicit one.
    pub fn field(self, key: impl Into<String>, field: impl Field + 'static) -> Self {
        self.boxed_field(key, Box::new(field))
    }

    pub fn boxed_field(mut self, key: impl Into<String>, field: Box<dyn Field>) -> Self {
        self.fields.push((key.into(), field));
        self
    }

    /// Resolves names, verifies every declared field and freezes the ordering.
    pub fn build(self) -> Result<Schema, CompileError> {
        let mut fields = FieldMap::new();

        for parent in &self.parents {
            for (name, field) in parent.fields.iter() {
                fields.insert(name.clone(), Arc::clone(field));
            }
        }

        for (key, mut field) in self.fields {
            field.update_name(&key);
            let name = field.meta().name().to_owned();
            if name.is_empty() {
                return Err(CompileError::InvalidFieldName);
            }
            field.verify()?;

            if fields.insert(name.clone(), Arc::from(field)).is_some() {
                debug!("schema {}: field \"{name}\" replaces an earlier declaration", self.name);
            }
        }

        check_sources(&fields)?;

        debug!("compiled schema {} with {} fields", self.name, fields.len());

        Ok(Schema {
            name: self.name.into(),
            fields: Arc::new(fields),
        })
    }
}

/// Deserialized values are keyed by source, so two writable fields must not share one.
fn check_sources(fields: &FieldMap) -> Result<(), CompileError> {
    let mut seen: HashMap<&str, &str> = HashMap::with_capacity(fields.len());

    for field in fields.values() {
        let meta = field.meta();
        if meta.read_only {
            continue;
        }
        if let Some(first) = seen.insert(meta.source(), meta.name()) {
            return Err(CompileError::DuplicateSource {
                attribute: meta.source().to_owned(),
                first: first.to_owned(),
                second: meta.name().to_owned(),
            });
        }
    }

    Ok(())
}
