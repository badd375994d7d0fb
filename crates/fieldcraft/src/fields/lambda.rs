use std::{fmt, sync::Arc};

use log::error;

use crate::{
    errors::{PlainError, ValidationError},
    field::{Field, FieldMeta},
    schema::Schema,
    value::{Primitive, Record, Value},
};

type Extractor = dyn Fn(&dyn Record) -> Primitive + Send + Sync;

/// A computed, output-only field. The closure receives the whole instance.
#[derive(Clone)]
pub struct Lambda {
    meta: FieldMeta,
    extractor: Arc<Extractor>,
}

impl Lambda {
    pub fn new<F>(extractor: F) -> Self
    where
        F: Fn(&dyn Record) -> Primitive + Send + Sync + 'static,
    {
        Self {
            meta: FieldMeta::computed(),
            extractor: Arc::new(extractor),
        }
    }
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lambda").field("meta", &self.meta).finish_non_exhaustive()
    }
}

impl Field for Lambda {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn serialize(&self, _value: &Value, instance: &dyn Record, _schema: &Schema) -> Primitive {
        (self.extractor)(instance)
    }

    /// Read-only, so a schema never gets here; called directly it always fails.
    fn deserialize(&self, _value: &Primitive, _schema: &Schema) -> Result<Value, ValidationError> {
        error!("computed field \"{}\" cannot be deserialized", self.meta.name());
        Err(PlainError::new(format!("computed field \"{}\" cannot be deserialized", self.meta.name())).into())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::value::ValueMap;

    use super::*;

    #[test]
    fn test_computes_from_instance() {
        let mut field = Lambda::new(|instance| {
            let a = instance.attribute("a").and_then(|v| v.as_int()).unwrap_or(0);
            let b = instance.attribute("b").and_then(|v| v.as_int()).unwrap_or(0);
            json!(a + b)
        });
        field.update_name("sum");

        let schema = Schema::builder("Sum").build().unwrap();
        let instance = ValueMap::from([("a".to_string(), Value::Int(2)), ("b".to_string(), Value::Int(3))]);
        assert_eq!(field.extract(&instance, &schema), json!(5));
        assert!(field.meta().read_only);
        assert!(field.meta().unbound);
    }

    #[test]
    fn test_deserialize_fails() {
        let mut field = Lambda::new(|_| Primitive::Null);
        field.update_name("computed");
        let schema = Schema::builder("Computed").build().unwrap();
        let error = field.deserialize(&json!(1), &schema).unwrap_err();
        assert!(error.as_field().is_none());
    }
}
