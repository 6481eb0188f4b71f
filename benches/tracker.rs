//! Capture-path benchmarks for the tracking pipeline.
//!
//! Benchmarks:
//! - Fresh reports (normalize + key + buffer + dedup entry)
//! - Duplicate absorption (the hot path under an error storm)
//! - Key derivation over stacked records
//!
//! Run with:
//! ```bash
//! cargo bench --bench tracker
//! ```
//!
//! For HTML reports:
//! ```bash
//! cargo bench --bench tracker -- --verbose
//! open target/criterion/report/index.html
//! ```

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use brace::config::TrackerConfig;
use brace::report::{EnvInfo, Fault, ReportContext, normalize, report_key};
use brace::tracker::ErrorTracker;
use brace::tracker::transport::MemoryTransport;

fn unlimited_tracker() -> ErrorTracker {
    let config = TrackerConfig {
        endpoint: url::Url::parse("https://logs.example.com/api/log-error")
            .expect("endpoint must parse"),
        max_reports_per_window: u32::MAX,
        ..Default::default()
    };
    ErrorTracker::builder(config)
        .transport(Arc::new(MemoryTransport::new()))
        .build()
        .expect("config must be valid")
}

fn tracker_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("tracker");
    group.measurement_time(Duration::from_secs(5));

    // Every report distinct: full normalize + key + buffer + count path.
    group.throughput(Throughput::Elements(1));
    group.bench_function("log_error_fresh", |b| {
        let tracker = unlimited_tracker();
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            tracker.log_error(black_box(format!("failure {i}")));
        })
    });

    // One key repeated: exercises the duplicate-absorption path.
    group.bench_function("log_error_duplicate", |b| {
        let tracker = unlimited_tracker();
        tracker.log_error("connection lost");
        b.iter(|| {
            tracker.log_error(black_box("connection lost"));
        })
    });

    // Key derivation alone, over a record with a synthesized stack.
    group.bench_function("report_key", |b| {
        let fault = Fault::Error {
            name: "Error".to_string(),
            message: "connection lost".to_string(),
            stack: Some("at src/api/client.rs:118:9\nat src/pages/dashboard.rs:42:5".to_string()),
        };
        let record = normalize(fault, ReportContext::new(), &EnvInfo::default());
        b.iter(|| {
            black_box(report_key(black_box(&record)));
        })
    });

    group.finish();
}

criterion_group!(benches, tracker_benchmarks);
criterion_main!(benches);
