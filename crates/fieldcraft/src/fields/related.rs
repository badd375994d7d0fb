//! Fields holding a nested record described by another schema.

use crate::{
    errors::{FieldError, ValidationError},
    field::{Field, FieldMeta},
    schema::Schema,
    value::{Primitive, Record, Value},
};

fn serialize_with(schema: &Schema, value: &Value) -> Primitive {
    match value.as_record() {
        Some(record) => Primitive::Object(schema.serialize(record)),
        None => Primitive::Null,
    }
}

fn deserialize_with(meta: &FieldMeta, schema: &Schema, value: &Primitive) -> Result<Value, ValidationError> {
    schema
        .deserialize_raw(value)
        .map(Value::Record)
        .map_err(|error| FieldError::nested(meta.name(), error).into())
}

/// A nested record of a fixed schema. Errors from the nested schema are reported
/// under this field's name.
#[derive(Debug, Clone)]
pub struct Related {
    meta: FieldMeta,
    schema: Schema,
}

impl Related {
    pub fn new(schema: &Schema) -> Self {
        Self {
            meta: FieldMeta::default(),
            schema: schema.clone(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl Field for Related {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn serialize(&self, value: &Value, _instance: &dyn Record, _schema: &Schema) -> Primitive {
        serialize_with(&self.schema, value)
    }

    fn deserialize(&self, value: &Primitive, _schema: &Schema) -> Result<Value, ValidationError> {
        deserialize_with(&self.meta, &self.schema, value)
    }
}

/// A nested record of the schema that owns this field, for recursive shapes such as trees.
///
/// Usually declared optional, since every level would otherwise require another one.
#[derive(Debug, Clone, Default)]
pub struct SelfRelated {
    meta: FieldMeta,
}

impl SelfRelated {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Field for SelfRelated {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn serialize(&self, value: &Value, _instance: &dyn Record, schema: &Schema) -> Primitive {
        serialize_with(schema, value)
    }

    fn deserialize(&self, value: &Primitive, schema: &Schema) -> Result<Value, ValidationError> {
        deserialize_with(&self.meta, schema, value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        field::FieldOptions,
        fields::{Integer, List, Text},
        value::ValueMap,
    };

    use super::*;

    fn address() -> Schema {
        Schema::builder("Address")
            .field("city", Text::new())
            .field("zip", Integer::new().optional())
            .build()
            .unwrap()
    }

    #[test]
    fn test_related_roundtrip() {
        let schema = Schema::builder("Person")
            .field("name", Text::new())
            .field("home", Related::new(&address()))
            .build()
            .unwrap();

        let values = schema
            .deserialize_raw(&json!({"name": "Ann", "home": {"city": "Oslo", "zip": "150"}}))
            .unwrap();
        let home = values["home"].as_record().unwrap();
        assert_eq!(home["city"], Value::Text("Oslo".into()));
        assert_eq!(home["zip"], Value::Int(150));

        assert_eq!(
            Primitive::Object(schema.serialize(&values)),
            json!({"name": "Ann", "home": {"city": "Oslo", "zip": 150}})
        );
    }

    #[test]
    fn test_related_rejects_non_map() {
        let mut field = Related::new(&address());
        field.update_name("home");
        let error = field.deserialize(&json!("Oslo"), &address()).unwrap_err();
        assert_eq!(
            error.serialized(),
            json!({"field": "home", "error": {"errors": [{"error": "invalid input format"}]}})
        );
    }

    #[test]
    fn test_missing_record_serializes_null() {
        let field = Related::new(&address());
        let schema = address();
        assert_eq!(field.serialize(&Value::Null, &ValueMap::new(), &schema), Primitive::Null);
    }

    #[test]
    fn test_self_related_tree() {
        let node = Schema::builder("Node")
            .field("label", Text::new())
            .field("children", List::new(SelfRelated::new()).optional())
            .build()
            .unwrap();

        let input = json!({
            "label": "root",
            "children": [
                {"label": "a"},
                {"label": "b", "children": [{"label": "b1"}]}
            ]
        });
        let values = node.deserialize_raw(&input).unwrap();
        let children = values["children"].as_list().unwrap();
        assert_eq!(children.len(), 2);
        let grandchildren = children[1].as_record().unwrap()["children"].as_list().unwrap();
        assert_eq!(grandchildren[0].as_record().unwrap()["label"], Value::Text("b1".into()));

        let serialized = Primitive::Object(node.serialize(&values));
        assert_eq!(serialized["children"][1]["children"][0]["label"], json!("b1"));
        assert_eq!(serialized["children"][0]["children"], Primitive::Null);
    }

    #[test]
    fn test_self_related_nested_error() {
        let node = Schema::builder("Node")
            .field("label", Text::new())
            .field("parent", SelfRelated::new().optional())
            .build()
            .unwrap();

        let error = node
            .deserialize_raw(&json!({"label": "x", "parent": {"parent": {"label": "z"}}}))
            .unwrap_err();
        assert_eq!(
            error.serialized(),
            json!({"errors": [{"field": "parent", "error": {"errors": [
                {"field": "label", "error": "missing required value \"label\""}
            ]}}]})
        );
    }
}
