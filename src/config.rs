//! Configuration types for the tracking service.
//!
//! This module provides configuration structs for loading and validating
//! tracker settings from TOML files. It includes:
//!
//! - [`TrackerConfig`] - Root configuration struct
//! - [`Mode`] - Development/production switch
//! - [`ValidationResult`] - Non-fatal warnings from validation
//!
//! All configuration types support serde deserialization and provide
//! sensible defaults suitable for development use.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::constants;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Development/production switch.
///
/// Development mode enables the log-capture layer and keeps default panic
/// output visible; production mode suppresses both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    #[default]
    Production,
}

impl Mode {
    /// Read an override from the `BRACE_ENV` environment variable.
    ///
    /// Accepts `development`/`dev` and `production`/`prod`; anything else is
    /// ignored.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        match std::env::var(constants::MODE_ENV_VAR).ok()?.as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

/// brace.toml configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// Outbound log endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: Url,
    /// Reports accepted per rate window; excess is dropped hard.
    #[serde(default = "default_max_reports")]
    pub max_reports_per_window: u32,
    /// Rate-limit window length in seconds.
    #[serde(default = "default_rate_window")]
    pub rate_window_secs: u64,
    /// Per-key deduplication window in seconds.
    #[serde(default = "default_dedup_window")]
    pub dedup_window_secs: u64,
    /// Capacity of the introspection buffer.
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
    /// Records returned in the `recent` slice of a stats snapshot.
    #[serde(default = "default_recent_reports")]
    pub recent_reports: usize,
    /// Request timeout for report delivery in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Development/production switch; `BRACE_ENV` overrides it.
    #[serde(default)]
    pub mode: Mode,
}

fn default_endpoint() -> Url {
    // The constant is a vetted literal.
    Url::parse(constants::DEFAULT_ENDPOINT).expect("default endpoint must parse")
}

fn default_max_reports() -> u32 {
    constants::DEFAULT_MAX_REPORTS_PER_WINDOW
}

fn default_rate_window() -> u64 {
    constants::DEFAULT_RATE_WINDOW_SECS
}

fn default_dedup_window() -> u64 {
    constants::DEFAULT_DEDUP_WINDOW_SECS
}

fn default_buffer_capacity() -> usize {
    constants::DEFAULT_BUFFER_CAPACITY
}

fn default_recent_reports() -> usize {
    constants::DEFAULT_RECENT_REPORTS
}

fn default_request_timeout() -> u64 {
    constants::DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            max_reports_per_window: default_max_reports(),
            rate_window_secs: default_rate_window(),
            dedup_window_secs: default_dedup_window(),
            buffer_capacity: default_buffer_capacity(),
            recent_reports: default_recent_reports(),
            request_timeout_secs: default_request_timeout(),
            mode: Mode::default(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from brace.toml in the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if brace.toml cannot be read or contains invalid TOML.
    pub fn load() -> Result<Self> {
        Self::load_from("brace.toml")
    }

    /// Load configuration from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - Fields have invalid types or unknown names
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: TrackerConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration with comprehensive checks.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails with one or more errors:
    /// - Zero buffer capacity or zero rate ceiling
    /// - An endpoint that is not http(s)
    /// - A zero-length rate window
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        match self.endpoint.scheme() {
            "https" => {},
            "http" => warnings.push(format!(
                "endpoint '{}' is not https; reports travel in the clear",
                self.endpoint
            )),
            other => errors.push(format!(
                "endpoint must be http or https (got scheme '{other}')"
            )),
        }

        if self.max_reports_per_window == 0 {
            errors.push(
                "max_reports_per_window cannot be 0 (every report would be dropped)".to_string(),
            );
        }

        if self.rate_window_secs == 0 {
            errors.push("rate_window_secs cannot be 0".to_string());
        }

        if self.buffer_capacity == 0 {
            errors.push("buffer_capacity cannot be 0".to_string());
        }

        if self.dedup_window_secs == 0 {
            warnings.push("dedup_window_secs is 0; duplicate suppression is disabled".to_string());
        }

        if self.recent_reports > self.buffer_capacity {
            warnings.push(format!(
                "recent_reports ({}) exceeds buffer_capacity ({}); snapshots are capped at the buffer",
                self.recent_reports, self.buffer_capacity
            ));
        }

        if self.request_timeout_secs == 0 {
            warnings.push(
                "request_timeout_secs is 0; deliveries may hang on dead endpoints".to_string(),
            );
        }

        if !errors.is_empty() {
            bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }

        Ok(ValidationResult { warnings })
    }

    /// Effective mode after applying the environment override.
    #[must_use]
    pub fn resolved_mode(&self) -> Mode {
        Mode::from_env().unwrap_or(self.mode)
    }

    #[must_use]
    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window_secs)
    }

    #[must_use]
    pub fn dedup_window(&self) -> Duration {
        Duration::from_secs(self.dedup_window_secs)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
