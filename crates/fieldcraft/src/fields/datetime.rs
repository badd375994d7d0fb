use std::fmt::Write;

use chrono::{
    NaiveDate, NaiveDateTime,
    format::{Item, StrftimeItems},
};

use crate::{
    errors::{CompileError, ValidationError},
    field::{Field, FieldMeta},
    schema::Schema,
    value::{Primitive, Record, Value},
};

pub const DEFAULT_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Date-times parsed from and rendered to one strftime-style format.
#[derive(Debug, Clone)]
pub struct Datetime {
    meta: FieldMeta,
    format: String,
}

impl Default for Datetime {
    fn default() -> Self {
        Self {
            meta: FieldMeta::default(),
            format: DEFAULT_DATETIME_FORMAT.to_owned(),
        }
    }
}

impl Datetime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn time_format(&self) -> &str {
        &self.format
    }

    fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(text, &self.format).ok().or_else(|| {
            NaiveDate::parse_from_str(text, &self.format)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
    }
}

impl Field for Datetime {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn verify(&self) -> Result<(), CompileError> {
        if StrftimeItems::new(&self.format).any(|item| matches!(item, Item::Error)) {
            return Err(CompileError::InvalidDatetimeFormat {
                field: self.meta.name().to_owned(),
                format: self.format.clone(),
            });
        }
        Ok(())
    }

    /// Anything that is not a date-time, or cannot be rendered, serializes to null.
    fn serialize(&self, value: &Value, _instance: &dyn Record, _schema: &Schema) -> Primitive {
        let Some(datetime) = value.as_datetime() else {
            return Primitive::Null;
        };

        let mut rendered = String::new();
        match write!(rendered, "{}", datetime.format(&self.format)) {
            Ok(()) => Primitive::String(rendered),
            Err(_) => Primitive::Null,
        }
    }

    fn deserialize(&self, value: &Primitive, _schema: &Schema) -> Result<Value, ValidationError> {
        value
            .as_str()
            .and_then(|text| self.parse(text))
            .map(Value::DateTime)
            .ok_or_else(|| self.meta.invalid(value))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::value::ValueMap;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_default_format() {
        let field = Datetime::new();
        let schema = Schema::builder("Times").build().unwrap();

        let parsed = field.deserialize(&json!("24/12/2023 18:30:05"), &schema).unwrap();
        assert_eq!(parsed, Value::DateTime(at(2023, 12, 24, 18, 30, 5)));

        let instance = ValueMap::new();
        assert_eq!(field.serialize(&parsed, &instance, &schema), json!("24/12/2023 18:30:05"));
    }

    #[test]
    fn test_rejects_malformed() {
        let field = Datetime::new();
        let schema = Schema::builder("Times").build().unwrap();
        assert!(field.deserialize(&json!("2023-12-24 18:30:05"), &schema).is_err());
        assert!(field.deserialize(&json!(1700000000), &schema).is_err());
    }

    #[test]
    fn test_date_only_format_is_midnight() {
        let field = Datetime::new().format("%Y-%m-%d");
        let schema = Schema::builder("Times").build().unwrap();
        assert_eq!(
            field.deserialize(&json!("2020-02-29"), &schema),
            Ok(Value::DateTime(at(2020, 2, 29, 0, 0, 0)))
        );
    }

    #[test]
    fn test_serialize_is_lenient() {
        let field = Datetime::new();
        let schema = Schema::builder("Times").build().unwrap();
        let instance = ValueMap::new();
        assert_eq!(field.serialize(&Value::Null, &instance, &schema), Primitive::Null);
        assert_eq!(field.serialize(&Value::Text("x".into()), &instance, &schema), Primitive::Null);
    }

    #[test]
    fn test_verify_format() {
        assert!(Datetime::new().verify().is_ok());
        assert!(Datetime::new().format("%Q").verify().is_err());
    }
}
