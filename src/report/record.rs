//! Fault inputs and the normalized error record.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use uuid::Uuid;

/// Free-form key-value context supplied by a capture site.
pub type ReportContext = BTreeMap<String, String>;

/// Viewport dimensions of the surface the fault occurred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Environment details stamped onto every record.
///
/// Hosts describe their surface once when building the tracker; the tracker
/// merges these into each normalized record.
#[derive(Debug, Clone, Default)]
pub struct EnvInfo {
    /// Current page or route, if the host has one.
    pub page: Option<String>,
    /// User agent or client identification string.
    pub user_agent: Option<String>,
    /// Viewport dimensions.
    pub viewport: Option<Viewport>,
}

/// A fault as seen at a capture site, before normalization.
///
/// Capture sites produce very different shapes: a structured error with a
/// stack, a bare message, an arbitrary serialized value, or a panic with a
/// source location. All of them normalize into the same [`ErrorRecord`].
#[derive(Debug, Clone)]
pub enum Fault {
    /// A structured error with a category name and optional stack text.
    Error {
        name: String,
        message: String,
        stack: Option<String>,
    },
    /// A bare string message.
    Message(String),
    /// An arbitrary serialized value.
    Value(serde_json::Value),
    /// A panic payload with its source location.
    Panic {
        message: String,
        file: Option<String>,
        line: Option<u32>,
    },
}

impl Fault {
    /// Build a fault from a standard error, folding its `source()` chain
    /// into the stack text.
    pub fn from_error<E: StdError + ?Sized>(err: &E) -> Self {
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Fault::Error {
            name: "Error".to_string(),
            message: err.to_string(),
            stack: if chain.is_empty() {
                None
            } else {
                Some(chain.join("\n"))
            },
        }
    }
}

impl From<&str> for Fault {
    fn from(message: &str) -> Self {
        Fault::Message(message.to_string())
    }
}

impl From<String> for Fault {
    fn from(message: String) -> Self {
        Fault::Message(message)
    }
}

impl From<serde_json::Value> for Fault {
    fn from(value: serde_json::Value) -> Self {
        Fault::Value(value)
    }
}

/// Normalized representation of one captured fault.
///
/// Created once by [`normalize`] and never mutated afterwards; discarded
/// when evicted from the bounded report buffer.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    /// Unique report id.
    pub id: String,
    /// Creation instant, serialized as RFC 3339.
    pub timestamp: DateTime<Utc>,
    /// Fault category label (`Error`, `panic`, `task_failure`, `log.error`, `string`).
    pub name: String,
    /// Human-readable description.
    pub message: String,
    /// Call-stack or cause-chain text, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Page or route the fault occurred on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Client identification string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Viewport dimensions at capture time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    /// Caller-supplied context (severity, source, boundary name, ...).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub context: ReportContext,
}

/// Coerce a fault into an [`ErrorRecord`], stamping timestamp, id, and
/// environment details merged with the caller-supplied context.
pub fn normalize(fault: Fault, context: ReportContext, env: &EnvInfo) -> ErrorRecord {
    let (name, message, stack) = match fault {
        Fault::Error {
            name,
            message,
            stack,
        } => (name, message, stack),
        Fault::Message(message) => ("string".to_string(), message, None),
        Fault::Value(value) => {
            let message = match &value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            ("value".to_string(), message, None)
        },
        Fault::Panic {
            message,
            file,
            line,
        } => {
            let stack = file.map(|file| match line {
                Some(line) => format!("at {file}:{line}"),
                None => format!("at {file}"),
            });
            ("panic".to_string(), message, stack)
        },
    };

    ErrorRecord {
        id: Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        name,
        message,
        stack,
        page: env.page.clone(),
        user_agent: env.user_agent.clone(),
        viewport: env.viewport,
        context,
    }
}
