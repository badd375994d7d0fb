//! JSON-deserializable schema definitions.
//!
//! These types describe schemas as data, for example a definition file shipped with
//! your application, and a [SchemaCatalog] compiles them into [Schema]s. Definitions
//! refer to each other by schema name: `extends` lists parents and a `Related` field
//! names its target, both of which must already be in the catalog.
//!
//! ```json
//! {
//!   "name": "Person",
//!   "fields": [
//!     {"name": "name", "type": "Text", "max": 20},
//!     {"name": "age", "type": "Integer", "min": 0, "required": false},
//!     {"name": "tags", "type": "List", "item": {"type": "Text"}, "default": []}
//!   ]
//! }
//! ```

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    errors::CompileError,
    field::Field,
    fields::{Bool, Coalesce, Datetime, Enum, Float, Integer, List, MultiChoice, Related, SelfRelated, Text},
    schema::Schema,
    value::Primitive,
};

/// A named schema and its own field declarations.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchemaDef {
    /// Name other definitions use to refer to this schema.
    pub name: String,
    /// Names of parent schemas, merged in order before the own fields.
    #[serde(default)]
    pub extends: Vec<String>,
    /// Own fields, in declaration order.
    pub fields: Vec<FieldDef>,
}

/// One field declaration: the shared options plus its `type`-tagged kind.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldDef {
    /// Declaration key. Only optional for list items and coalesce candidates.
    #[serde(default)]
    pub name: Option<String>,
    /// Human-readable label; derived from the name when unset.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Attribute on the domain side; the name when unset.
    #[serde(default)]
    pub source: Option<String>,
    /// Absence with no default is an error. Defaults to `true`.
    #[serde(default = "required_by_default")]
    pub required: bool,
    /// Skipped when deserializing.
    #[serde(default)]
    pub read_only: bool,
    /// Skipped when serializing.
    #[serde(default)]
    pub write_only: bool,
    /// Pass an explicit `null` to the field instead of storing null.
    #[serde(default)]
    pub deserialize_none: bool,
    /// `null` is a real default. Leave the key out for no default.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub default: Option<Primitive>,
    /// Type-specific settings, tagged by `type`.
    #[serde(flatten)]
    pub kind: FieldKindDef,
}

fn required_by_default() -> bool {
    true
}

fn present<'de, D>(deserializer: D) -> Result<Option<Primitive>, D::Error>
where
    D: Deserializer<'de>,
{
    Primitive::deserialize(deserializer).map(Some)
}

/// Kind of field, selected by the `type` key.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type")]
pub enum FieldKindDef {
    /// Whole number.
    Integer {
        /// Inclusive lower bound.
        #[serde(default)]
        min: Option<i64>,
        /// Inclusive upper bound.
        #[serde(default)]
        max: Option<i64>,
    },
    /// Finite real number, serialized as a decimal string.
    Float {
        /// Inclusive lower bound.
        #[serde(default)]
        min: Option<f64>,
        /// Inclusive upper bound.
        #[serde(default)]
        max: Option<f64>,
        /// Decimal places kept when serializing; full precision when unset.
        #[serde(default)]
        max_precision: Option<usize>,
    },
    /// Boolean read from words such as `yes`, `off` or `1`.
    Bool,
    /// String, coerced from numbers and booleans.
    Text {
        /// Minimum length in characters.
        #[serde(default)]
        min: Option<usize>,
        /// Maximum length in characters.
        #[serde(default)]
        max: Option<usize>,
        /// Regular expression the whole value must match.
        #[serde(default)]
        pattern: Option<String>,
    },
    /// Enumeration member, matched by exact name.
    Enum {
        /// Member names.
        members: Vec<String>,
        /// Accept a unique case-insensitive substring of a member name.
        #[serde(default)]
        soft_match: bool,
    },
    /// One of a set of strings, with substring matching unless `strict`.
    MultiChoice {
        /// Accepted strings.
        choices: Vec<String>,
        /// Accept exact matches only.
        #[serde(default)]
        strict: bool,
    },
    /// Date-time in a strftime-style format.
    Datetime {
        /// Format string; `%d/%m/%Y %H:%M:%S` when unset.
        #[serde(default)]
        format: Option<String>,
    },
    /// Sequence of values described by one item field.
    List {
        /// Field applied to every element. Its name is taken from the list.
        item: Box<FieldDef>,
    },
    /// A nested record of a schema already in the catalog.
    Related {
        /// Name of the nested schema.
        schema: String,
    },
    /// A nested record of the schema being defined.
    SelfRelated,
    /// Candidate fields tried in order until one accepts the value.
    Coalesce {
        /// Candidates; the last one's error is reported when all fail.
        fields: Vec<FieldDef>,
    },
}

/// Compiled schemas by name.
#[derive(Debug, Default, Clone)]
pub struct SchemaCatalog {
    schemas: HashMap<String, Schema>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Makes a hand-built schema available to definitions.
    pub fn insert(&mut self, schema: Schema) {
        self.schemas.insert(schema.name().to_owned(), schema);
    }

    /// Compiles `def` and registers the result under its name, replacing any schema
    /// of the same name.
    pub fn compile(&mut self, def: SchemaDef) -> Result<Schema, CompileError> {
        let mut builder = Schema::builder(&def.name);
        for parent in &def.extends {
            builder = builder.extends(self.lookup(parent)?);
        }
        for field in def.fields {
            let key = field.name.clone().unwrap_or_default();
            builder = builder.boxed_field(key, self.build_field(field)?);
        }

        let schema = builder.build()?;
        debug!("catalog: registered schema {}", schema.name());
        self.insert(schema.clone());
        Ok(schema)
    }

    /// Parses a [SchemaDef] from JSON and compiles it.
    pub fn compile_json(&mut self, json: &str) -> Result<Schema, CompileError> {
        let def: SchemaDef = serde_json::from_str(json)?;
        self.compile(def)
    }

    fn lookup(&self, name: &str) -> Result<&Schema, CompileError> {
        self.schemas
            .get(name)
            .ok_or_else(|| CompileError::UnknownSchema(name.to_owned()))
    }

    fn build_field(&self, def: FieldDef) -> Result<Box<dyn Field>, CompileError> {
        let mut field: Box<dyn Field> = match def.kind {
            FieldKindDef::Integer { min, max } => {
                let mut field = Integer::new();
                if let Some(min) = min {
                    field = field.min(min);
                }
                if let Some(max) = max {
                    field = field.max(max);
                }
                Box::new(field)
            }
            FieldKindDef::Float { min, max, max_precision } => {
                let mut field = Float::new();
                if let Some(min) = min {
                    field = field.min(min);
                }
                if let Some(max) = max {
                    field = field.max(max);
                }
                if let Some(places) = max_precision {
                    field = field.max_precision(places);
                }
                Box::new(field)
            }
            FieldKindDef::Bool => Box::new(Bool::new()),
            FieldKindDef::Text { min, max, pattern } => {
                let mut field = Text::new();
                if let Some(min) = min {
                    field = field.min(min);
                }
                if let Some(max) = max {
                    field = field.max(max);
                }
                if let Some(pattern) = pattern {
                    field = field.pattern(&pattern)?;
                }
                Box::new(field)
            }
            FieldKindDef::Enum { members, soft_match } => Box::new(Enum::new(members).soft_match(soft_match)),
            FieldKindDef::MultiChoice { choices, strict } => {
                let field = MultiChoice::new(choices);
                Box::new(if strict { field.strict() } else { field })
            }
            FieldKindDef::Datetime { format } => match format {
                Some(format) => Box::new(Datetime::new().format(format)),
                None => Box::new(Datetime::new()),
            },
            FieldKindDef::List { item } => Box::new(List::boxed(self.build_field(*item)?)),
            FieldKindDef::Related { schema } => Box::new(Related::new(self.lookup(&schema)?)),
            FieldKindDef::SelfRelated => Box::new(SelfRelated::new()),
            FieldKindDef::Coalesce { fields } => {
                let mut field = Coalesce::new();
                for candidate in fields {
                    field = field.boxed_field(self.build_field(candidate)?);
                }
                Box::new(field)
            }
        };

        let meta = field.meta_mut();
        if let Some(name) = def.name {
            meta.set_name(name);
        }
        if let Some(display_name) = def.display_name {
            meta.set_display_name(display_name);
        }
        if let Some(source) = def.source {
            meta.set_source(source);
        }
        meta.required = def.required;
        meta.read_only = def.read_only;
        meta.write_only = def.write_only;
        meta.deserialize_none = def.deserialize_none;
        meta.default = def.default;

        Ok(field)
    }
}

/// Compiles a definition that does not refer to any other schema.
impl TryFrom<SchemaDef> for Schema {
    type Error = CompileError;

    fn try_from(value: SchemaDef) -> Result<Self, Self::Error> {
        SchemaCatalog::new().compile(value)
    }
}
