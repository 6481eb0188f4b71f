//! Fuzz target for shortcut combination normalization.
//!
//! This fuzzer tests that:
//! 1. No input causes a panic
//! 2. Normalization is idempotent
//! 3. The canonical form never contains uppercase ASCII
//!
//! Run with: `cargo +nightly fuzz run fuzz_shortcut_normalize`

#![no_main]

use libfuzzer_sys::fuzz_target;

use brace::a11y::normalize_shortcut;

fuzz_target!(|combo: String| {
    let once = normalize_shortcut(&combo);

    // Idempotence: normalizing a normalized combination is a fixpoint.
    let twice = normalize_shortcut(&once);
    assert_eq!(once, twice);

    assert!(!once.bytes().any(|b| b.is_ascii_uppercase()));
});
