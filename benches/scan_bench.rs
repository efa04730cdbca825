/// Content sanitizer benchmarks
/// Measures scan cost for clean and hostile field maps of growing size
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use request_armor::guards::{escape_html, ContentSanitizer};
use request_armor::infrastructure::logging::MemorySecurityLog;
use request_armor::value_objects::RequestFieldMap;
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

fn field_map(fields: usize, value_len: usize) -> RequestFieldMap {
    let value: String = "lorem ipsum <b>dolor</b> sit amet & co "
        .chars()
        .cycle()
        .take(value_len)
        .collect();

    (0..fields)
        .map(|i| (format!("field_{}", i), value.clone()))
        .collect()
}

fn scan_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("content_scan");
    group.measurement_time(Duration::from_secs(5));

    for size in [64, 1024, 16 * 1024].iter() {
        let size = *size;
        group.throughput(Throughput::Bytes((size * 8) as u64));

        // Worst case for a clean request: every rule runs against every field
        group.bench_with_input(BenchmarkId::new("clean", size), &size, |b, &s| {
            let sanitizer = ContentSanitizer::new(Arc::new(MemorySecurityLog::new()));
            let fields = field_map(8, s);
            b.iter(|| black_box(sanitizer.scan(black_box(&fields))))
        });

        group.bench_with_input(BenchmarkId::new("hostile_last_field", size), &size, |b, &s| {
            let sanitizer = ContentSanitizer::new(Arc::new(MemorySecurityLog::new()));
            let fields = field_map(7, s).with_field("zz", "<script>alert(1)</script>");
            b.iter(|| black_box(sanitizer.detect(black_box(&fields))))
        });
    }

    group.finish();
}

fn escape_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("escape_html");

    for size in [64, 4096].iter() {
        let input: String = "<a href=\"x\">'&'</a>".chars().cycle().take(*size).collect();
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| escape_html(black_box(input)))
        });
    }

    group.finish();
}

criterion_group!(benches, scan_benchmarks, escape_benchmarks);
criterion_main!(benches);
