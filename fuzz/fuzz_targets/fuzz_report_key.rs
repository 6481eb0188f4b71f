//! Fuzz target for report key derivation.
//!
//! This fuzzer tests that:
//! 1. No message/stack combination causes a panic
//! 2. Key derivation is deterministic
//! 3. Identical inputs group under one key
//!
//! Run with: `cargo +nightly fuzz run fuzz_report_key`

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use brace::report::{EnvInfo, Fault, ReportContext, normalize, report_key};

/// Structured input covering the fault shapes a capture site produces.
#[derive(Arbitrary, Debug)]
struct KeyInput {
    message: String,
    stack: Option<String>,
}

fuzz_target!(|input: KeyInput| {
    let fault = Fault::Error {
        name: "Error".to_string(),
        message: input.message.clone(),
        stack: input.stack.clone(),
    };

    let record = normalize(fault.clone(), ReportContext::new(), &EnvInfo::default());
    let key = report_key(&record);

    // Deterministic for the same record.
    assert_eq!(key, report_key(&record));

    // A second record from the same fault carries a different id and
    // timestamp but must land in the same group.
    let again = normalize(fault, ReportContext::new(), &EnvInfo::default());
    assert_eq!(key, report_key(&again));
});
