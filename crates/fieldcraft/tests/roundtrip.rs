use chrono::NaiveDate;
use fieldcraft::{
    field::{Field, FieldOptions},
    fields::{Bool, Coalesce, Datetime, Float, Integer, List, Related, Text},
    schema::Schema,
    value::{Primitive, Value, ValueMap},
};
use proptest::prelude::*;
use serde_json::json;

fn scratch() -> Schema {
    Schema::builder("Scratch").build().unwrap()
}

fn roundtrip(field: &dyn Field, value: Value) -> Value {
    let schema = scratch();
    let primitive = field.serialize(&value, &ValueMap::new(), &schema);
    field.deserialize(&primitive, &schema).unwrap()
}

fn person() -> Schema {
    let address = Schema::builder("Address")
        .field("city", Text::new().min(1).max(30))
        .field("zip", Integer::new().optional())
        .build()
        .unwrap();

    Schema::builder("Person")
        .field("name", Text::new().max(20))
        .field("age", Integer::new().min(0).max(150))
        .field("active", Bool::new().default_value(true))
        .field("scores", List::new(Integer::new()).optional())
        .field("address", Related::new(&address).optional())
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn integer_roundtrip(n in any::<i64>()) {
        prop_assert_eq!(roundtrip(&Integer::new(), Value::Int(n)), Value::Int(n));
    }

    #[test]
    fn integer_from_string(n in any::<i64>()) {
        let parsed = Integer::new().deserialize(&json!(n.to_string()), &scratch()).unwrap();
        prop_assert_eq!(parsed, Value::Int(n));
    }

    #[test]
    fn text_roundtrip(s in any::<String>()) {
        prop_assert_eq!(roundtrip(&Text::new(), Value::Text(s.clone())), Value::Text(s));
    }

    #[test]
    fn bool_roundtrip(b in any::<bool>()) {
        prop_assert_eq!(roundtrip(&Bool::new(), Value::Bool(b)), Value::Bool(b));
    }

    #[test]
    fn float_roundtrip_within_precision(f in -1.0e9f64..1.0e9) {
        let back = roundtrip(&Float::new().max_precision(3), Value::Float(f));
        let back = back.as_float().unwrap();
        prop_assert!((back - f).abs() <= 1.0e-3, "{} vs {}", back, f);
    }

    #[test]
    fn float_roundtrip_exact_without_precision(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        prop_assert_eq!(roundtrip(&Float::new(), Value::Float(f)), Value::Float(f));
    }

    #[test]
    fn datetime_roundtrip(
        year in 1970i32..2100,
        month in 1u32..=12,
        day in 1u32..=28,
        hour in 0u32..24,
        minute in 0u32..60,
        second in 0u32..60
    ) {
        let datetime = NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap();
        prop_assert_eq!(roundtrip(&Datetime::new(), Value::DateTime(datetime)), Value::DateTime(datetime));
    }

    #[test]
    fn list_roundtrip(items in proptest::collection::vec(any::<i64>(), 0..16)) {
        let value = Value::List(items.into_iter().map(Value::Int).collect());
        prop_assert_eq!(roundtrip(&List::new(Integer::new()), value.clone()), value);
    }

    #[test]
    fn coalesce_prefers_integer(n in any::<i64>(), word in "[a-z]{1,8}") {
        let field = Coalesce::new().field(Integer::new()).field(Text::new());
        let schema = scratch();
        prop_assert_eq!(field.deserialize(&json!(n.to_string()), &schema).unwrap(), Value::Int(n));
        prop_assert_eq!(field.deserialize(&json!(word.clone()), &schema).unwrap(), Value::Text(word));
    }

    #[test]
    fn record_roundtrip(
        name in "[A-Za-z ]{0,20}",
        age in 0i64..=150,
        active in any::<bool>(),
        scores in proptest::collection::vec(-1000i64..1000, 0..5),
        city in "[A-Za-z]{1,30}"
    ) {
        let schema = person();
        let input = json!({
            "name": name,
            "age": age,
            "active": active,
            "scores": scores,
            "address": {"city": city, "zip": null},
        });

        let values = schema.deserialize_raw(&input).unwrap();
        let serialized = Primitive::Object(schema.serialize(&values));
        prop_assert_eq!(&serialized, &input);
        prop_assert_eq!(schema.deserialize_raw(&serialized).unwrap(), values);
    }

    #[test]
    fn out_of_range_age_is_reported(age in prop_oneof![i64::MIN..0, 151i64..i64::MAX]) {
        let error = person()
            .deserialize_raw(&json!({"name": "Ann", "age": age}))
            .unwrap_err();
        prop_assert_eq!(error.len(), 1);
        prop_assert!(error.for_field("age").is_some());
    }
}

#[test]
fn list_fails_fast_on_first_bad_element() {
    let schema = Schema::builder("Numbers")
        .field("numbers", List::new(Integer::new()))
        .build()
        .unwrap();

    let error = schema
        .deserialize_raw(&json!({"numbers": ["1", "2", "x", "y"]}))
        .unwrap_err();
    assert_eq!(
        error.serialized(),
        json!({"errors": [{"field": "numbers", "error": "invalid value \"x\""}]})
    );

    let values = schema
        .deserialize_raw(&json!({"numbers": ["1", "2", "3"]}))
        .unwrap();
    assert_eq!(
        values["numbers"],
        Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn inherited_schema_keeps_parent_intact() {
    let base = person();
    let child = Schema::builder("Employee")
        .extends(&base)
        .field("age", Integer::new().min(18).max(70))
        .field("employee_id", Integer::new())
        .build()
        .unwrap();

    assert_eq!(
        child.field_names().collect::<Vec<_>>(),
        vec!["name", "age", "active", "scores", "address", "employee_id"]
    );

    let input = json!({"name": "Kid", "age": 12, "employee_id": 1});
    assert!(base.deserialize_raw(&input).is_ok());
    let error = child.deserialize_raw(&input).unwrap_err();
    assert!(error.for_field("age").is_some());
}
