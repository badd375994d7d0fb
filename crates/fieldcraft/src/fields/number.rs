//! Integer and Float fields.

use crate::{
    errors::{CompileError, ValidationError},
    field::{Field, FieldMeta},
    schema::Schema,
    value::{Primitive, Record, Value},
};

/// Whole numbers, with an optional inclusive range.
#[derive(Debug, Clone, Default)]
pub struct Integer {
    meta: FieldMeta,
    min: Option<i64>,
    max: Option<i64>,
}

impl Integer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn bounds(&self) -> (Option<i64>, Option<i64>) {
        (self.min, self.max)
    }

    fn parse(&self, value: &Primitive) -> Result<i64, ValidationError> {
        parse_integer(value).ok_or_else(|| self.meta.invalid(value))
    }
}

impl Field for Integer {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn verify(&self) -> Result<(), CompileError> {
        check_range(&self.meta, self.min, self.max)
    }

    fn deserialize(&self, value: &Primitive, _schema: &Schema) -> Result<Value, ValidationError> {
        let parsed = self.parse(value)?;
        check_bounds(&self.meta, parsed, self.min, self.max)?;
        Ok(Value::Int(parsed))
    }

    fn deserialize_naive(&self, value: &Primitive, _schema: &Schema) -> Result<Value, ValidationError> {
        self.parse(value).map(Value::Int)
    }
}

/// Real numbers, with an optional inclusive range. Serializes to a decimal string,
/// rounded to `max_precision` places when set.
#[derive(Debug, Clone, Default)]
pub struct Float {
    meta: FieldMeta,
    min: Option<f64>,
    max: Option<f64>,
    max_precision: Option<usize>,
}

impl Float {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn max_precision(mut self, places: usize) -> Self {
        self.max_precision = Some(places);
        self
    }

    fn parse(&self, value: &Primitive) -> Result<f64, ValidationError> {
        parse_float(value).ok_or_else(|| self.meta.invalid(value))
    }
}

impl Field for Float {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn verify(&self) -> Result<(), CompileError> {
        check_range(&self.meta, self.min, self.max)
    }

    fn serialize(&self, value: &Value, _instance: &dyn Record, _schema: &Schema) -> Primitive {
        let Some(number) = value.as_float() else {
            return Primitive::Null;
        };

        match self.max_precision {
            Some(places) => Primitive::String(format!("{number:.places$}")),
            None => Primitive::String(number.to_string()),
        }
    }

    fn deserialize(&self, value: &Primitive, _schema: &Schema) -> Result<Value, ValidationError> {
        let parsed = self.parse(value)?;
        check_bounds(&self.meta, parsed, self.min, self.max)?;
        Ok(Value::Float(parsed))
    }

    fn deserialize_naive(&self, value: &Primitive, _schema: &Schema) -> Result<Value, ValidationError> {
        self.parse(value).map(Value::Float)
    }
}

fn parse_integer(value: &Primitive) -> Option<i64> {
    match value {
        Primitive::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Primitive::String(s) => s.trim().parse().ok(),
        Primitive::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn parse_float(value: &Primitive) -> Option<f64> {
    match value {
        Primitive::Number(n) => n.as_f64(),
        Primitive::String(s) => s.trim().parse().ok().filter(|f: &f64| f.is_finite()),
        Primitive::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

pub(crate) fn check_range<T: PartialOrd>(meta: &FieldMeta, min: Option<T>, max: Option<T>) -> Result<(), CompileError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(CompileError::InvalidRange(meta.name().to_owned())),
        _ => Ok(()),
    }
}

pub(crate) fn check_bounds<T>(meta: &FieldMeta, value: T, min: Option<T>, max: Option<T>) -> Result<(), ValidationError>
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    let below = min.is_some_and(|min| value < min);
    let above = max.is_some_and(|max| value > max);
    if below || above {
        return Err(meta.error(format!(
            "invalid value \"{value}\": not in allowed range({} - {})",
            bound(min),
            bound(max)
        )));
    }
    Ok(())
}

fn bound<T: std::fmt::Display>(bound: Option<T>) -> String {
    bound.map_or_else(|| "None".to_owned(), |b| b.to_string())
}
