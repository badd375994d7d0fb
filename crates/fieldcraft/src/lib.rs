//! # fieldcraft
//!
//! Declarative schemas for converting records between a domain form and a
//! transport-safe primitive form, validating input along the way.
//!
//! Declare named fields on a schema, then serialize records to JSON-like maps or
//! deserialize untrusted maps into validated values. Deserialization collects every
//! field error instead of stopping at the first one, and nested schemas report their
//! errors under the field that holds them.
//!
//! ## Example
//!
//! ```
//! use fieldcraft::field::FieldOptions;
//! use fieldcraft::fields::{Integer, Text};
//! use fieldcraft::schema::Schema;
//! use fieldcraft::value::Value;
//! use serde_json::json;
//!
//! let schema = Schema::builder("Person")
//!     .field("name", Text::new().max(20))
//!     .field("age", Integer::new().min(0).optional())
//!     .build()
//!     .unwrap();
//!
//! let values = schema.deserialize_raw(&json!({"name": "Ann", "age": "42"})).unwrap();
//! assert_eq!(values["age"], Value::Int(42));
//!
//! let error = schema.deserialize_raw(&json!({"age": -1})).unwrap_err();
//! assert_eq!(error.len(), 2);
//! ```

pub mod errors;
pub mod field;
pub mod fields;
pub mod matcher;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
pub mod value;

pub use errors::{CompileError, DeserializationError, FieldError, PlainError, ValidationError};
pub use field::{Field, FieldMeta, FieldOptions};
pub use schema::{FromValues, Schema, SchemaBuilder};
pub use value::{Primitive, PrimitiveMap, Record, Value, ValueMap};
