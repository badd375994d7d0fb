//! The contract every field type satisfies, and the options all fields share.

use std::fmt;

use crate::{
    errors::{CompileError, FieldError, ValidationError},
    schema::Schema,
    value::{Primitive, Record, Value, display_primitive},
};

/// Identity and behavior flags common to every field.
///
/// `name`, `display_name` and `source` stay unset until [FieldMeta::update_name]
/// resolves them from the key the field was declared under.
#[derive(Debug, Clone)]
pub struct FieldMeta {
    name: Option<String>,
    display_name: Option<String>,
    source: Option<String>,
    /// Absence with no default is an error.
    pub required: bool,
    /// Excluded from deserialization.
    pub read_only: bool,
    /// Excluded from serialization.
    pub write_only: bool,
    /// Serialization computes the value instead of reading the instance attribute.
    pub unbound: bool,
    /// An explicit null is passed to `deserialize` instead of being stored as null.
    pub deserialize_none: bool,
    /// Substituted when the key is absent. `None` means there is no default.
    pub default: Option<Primitive>,
}

impl Default for FieldMeta {
    fn default() -> Self {
        Self {
            name: None,
            display_name: None,
            source: None,
            required: true,
            read_only: false,
            write_only: false,
            unbound: false,
            deserialize_none: false,
            default: None,
        }
    }
}

impl FieldMeta {
    /// Options of a computed field: output-only and never read from the instance.
    pub(crate) fn computed() -> Self {
        Self {
            unbound: true,
            read_only: true,
            ..Self::default()
        }
    }

    /// Resolves the name from `name` unless one was given explicitly, then derives the
    /// display name and source from it when those are unset.
    pub fn update_name(&mut self, name: &str) {
        let name = self.name.get_or_insert_with(|| name.to_owned());
        if self.display_name.is_none() {
            self.display_name = Some(display_name_for(name));
        }
        if self.source.is_none() {
            self.source = Some(name.clone());
        }
    }

    /// Key of the field in serialized form; empty until resolved.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or_default()
    }

    /// Attribute read from and written to on the domain side.
    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or_else(|| self.name())
    }

    pub fn is_resolved(&self) -> bool {
        self.name.is_some()
    }

    /// Sets an explicit name, kept over the declaration key.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = Some(display_name.into());
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = Some(source.into());
    }

    pub fn error(&self, reason: impl Into<String>) -> ValidationError {
        FieldError::new(self.name(), reason).into()
    }

    /// The generic rejection used by scalar fields.
    pub fn invalid(&self, value: &Primitive) -> ValidationError {
        self.error(format!("invalid value \"{}\"", display_primitive(value)))
    }
}

/// `first_name` becomes `First Name`.
pub fn display_name_for(name: &str) -> String {
    name.split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// A named unit converting one attribute between its domain and primitive forms.
///
/// `deserialize` is the only required conversion; it validates as well as converts.
pub trait Field: fmt::Debug + Send + Sync {
    fn meta(&self) -> &FieldMeta;

    fn meta_mut(&mut self) -> &mut FieldMeta;

    /// Called once when the field is registered on a schema. Composite fields forward
    /// their resolved name to every child.
    fn update_name(&mut self, name: &str) {
        self.meta_mut().update_name(name);
    }

    /// Checks the field's own configuration when its schema is built.
    fn verify(&self) -> Result<(), CompileError> {
        Ok(())
    }

    /// Converts a domain value to its primitive form. Never fails.
    fn serialize(&self, value: &Value, _instance: &dyn Record, _schema: &Schema) -> Primitive {
        value.to_primitive()
    }

    fn deserialize(&self, value: &Primitive, schema: &Schema) -> Result<Value, ValidationError>;

    /// Conversion without constraint checks.
    fn deserialize_naive(&self, value: &Primitive, schema: &Schema) -> Result<Value, ValidationError> {
        self.deserialize(value, schema)
    }

    /// Reads this field's value off `instance` and serializes it.
    fn extract(&self, instance: &dyn Record, schema: &Schema) -> Primitive {
        if self.meta().unbound {
            return self.serialize(&Value::Null, instance, schema);
        }
        let value = instance.attribute(self.meta().source()).unwrap_or_default();
        self.serialize(&value, instance, schema)
    }
}

/// Builder-style options available on every field type.
pub trait FieldOptions: Field + Sized {
    /// Explicit name, kept instead of the declaration key.
    fn named(mut self, name: impl Into<String>) -> Self {
        self.meta_mut().set_name(name);
        self
    }

    fn source(mut self, source: impl Into<String>) -> Self {
        self.meta_mut().set_source(source);
        self
    }

    fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.meta_mut().set_display_name(display_name);
        self
    }

    fn required(mut self, required: bool) -> Self {
        self.meta_mut().required = required;
        self
    }

    fn optional(self) -> Self {
        self.required(false)
    }

    fn read_only(mut self) -> Self {
        self.meta_mut().read_only = true;
        self
    }

    fn write_only(mut self) -> Self {
        self.meta_mut().write_only = true;
        self
    }

    fn unbound(mut self) -> Self {
        self.meta_mut().unbound = true;
        self
    }

    fn deserialize_none(mut self) -> Self {
        self.meta_mut().deserialize_none = true;
        self
    }

    fn default_value(mut self, default: impl Into<Primitive>) -> Self {
        self.meta_mut().default = Some(default.into());
        self
    }
}

impl<F: Field + Sized> FieldOptions for F {}
