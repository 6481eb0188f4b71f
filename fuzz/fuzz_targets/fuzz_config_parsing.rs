//! Fuzz target for brace.toml config parsing.
//!
//! This fuzzer tests that:
//! 1. No input causes a panic
//! 2. Malformed TOML is gracefully rejected
//! 3. Configs that deserialize survive validation without panicking
//!
//! Run with: `cargo +nightly fuzz run fuzz_config_parsing`

#![no_main]

use libfuzzer_sys::fuzz_target;

use brace::config::TrackerConfig;

fuzz_target!(|toml_string: String| {
    if let Ok(config) = toml::from_str::<TrackerConfig>(&toml_string) {
        // Validation may accept or reject, but never panic.
        let _ = config.validate();
        let _ = config.rate_window();
        let _ = config.dedup_window();
        let _ = config.request_timeout();
    }
});
