use criterion::{Criterion, criterion_group, criterion_main};
use fieldcraft::{
    fields::{Integer, Text},
    schema::Schema,
    value::Primitive,
};
use serde_json::json;

fn gen_schema(field_count: usize) -> Schema {
    let mut builder = Schema::builder("Bench");

    for i in 0..field_count {
        builder = if i % 2 == 0 {
            builder.field(format!("f{}", i), Integer::new().min(0))
        } else {
            builder.field(format!("f{}", i), Text::new().max(32))
        };
    }

    builder.build().unwrap()
}

fn gen_input(field_count: usize) -> Primitive {
    let mut input = serde_json::Map::with_capacity(field_count);

    // Integer fields alternate between numbers and numeric strings
    for i in 0..field_count {
        let value = match i % 4 {
            0 => json!(i * 7),
            2 => json!((i * 7).to_string()),
            _ => json!(format!("value-{}", i)),
        };
        input.insert(format!("f{}", i), value);
    }

    Primitive::Object(input)
}

fn bench_schema_roundtrip(c: &mut Criterion) {
    for &field_count in &[1usize, 10, 50, 100] {
        let schema = gen_schema(field_count);
        let input = gen_input(field_count);
        let values = schema.deserialize_raw(&input).unwrap();

        c.bench_function(&format!("deserialize_{}_fields", field_count), |b| {
            b.iter(|| {
                let _ = schema.deserialize_raw(&input).unwrap();
            })
        });

        c.bench_function(&format!("serialize_{}_fields", field_count), |b| {
            b.iter(|| {
                let _ = schema.serialize(&values);
            })
        });
    }
}

criterion_group!(benches, bench_schema_roundtrip);
criterion_main!(benches);
