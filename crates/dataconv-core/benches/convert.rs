use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dataconv_core::{Converter, Format};

/// A catalog of `n` records with nested objects and arrays, as JSON.
fn sample_json(n: usize) -> String {
    let records: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{"id":{i},"name":"item-{i}","price":{i}.25,"active":{},"tags":["a","b","c"],"stock":{{"warehouse":"w{w}","count":{c}}}}}"#,
                i % 2 == 0,
                w = i % 4,
                c = i * 3
            )
        })
        .collect();
    format!(r#"{{"catalog":{{"records":[{}]}}}}"#, records.join(","))
}

fn bench_convert(c: &mut Criterion) {
    let converter = Converter::default();
    let mut group = c.benchmark_group("convert_from_json");

    for n in [10usize, 100, 1000] {
        let json = sample_json(n);
        group.throughput(Throughput::Bytes(json.len() as u64));
        for target in Format::ALL {
            group.bench_with_input(BenchmarkId::new(target.name(), n), &json, |b, input| {
                b.iter(|| {
                    converter
                        .convert_formats(black_box(input), Format::Json, target)
                        .unwrap()
                })
            });
        }
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let converter = Converter::default();
    let json = sample_json(1000);
    let value = converter.parse(&json, Format::Json).unwrap().value;

    let mut group = c.benchmark_group("parse");
    for format in Format::ALL {
        let text = converter.serialize(&value, format).unwrap();
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(format), &text, |b, input| {
            b.iter(|| converter.parse(black_box(input), format).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_convert, bench_parse);
criterion_main!(benches);
