//! Process-wide capture hooks.
//!
//! Three capture sites feed the tracker beyond explicit `log_error` calls:
//!
//! - a chaining panic hook for otherwise-uncaught panics
//! - [`spawn_tracked`] for async tasks whose failure would otherwise vanish
//!   into a dropped join handle
//! - [`CaptureLayer`], a tracing layer that mirrors ERROR-level events into
//!   the tracker in development mode
//!
//! The hook state is the one process-global this crate owns; everything else
//! hangs off an explicitly constructed [`ErrorTracker`].

use std::cell::Cell;
use std::future::Future;
use std::panic::{AssertUnwindSafe, PanicHookInfo};
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use parking_lot::Mutex;
use tracing::warn;
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use crate::report::{Fault, ReportContext};
use crate::tracker::ErrorTracker;

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Send + Sync + 'static>;

static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);
static HOOK_TRACKER: Mutex<Option<ErrorTracker>> = Mutex::new(None);
static PREVIOUS_HOOK: Mutex<Option<PanicHook>> = Mutex::new(None);

thread_local! {
    // Reentrancy guard: a panic raised while reporting a panic must not
    // feed back into the hook.
    static IN_HOOK: Cell<bool> = const { Cell::new(false) };
}

/// Install the panic hook, chaining whatever hook was installed before.
///
/// In development mode the previous hook still runs (panics stay visible on
/// stderr); in production it is suppressed and the panic only reaches the
/// tracker.
pub(crate) fn install(tracker: &ErrorTracker) {
    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        warn!(target: "brace::capture", "capture hooks already installed, ignoring");
        return;
    }

    *HOOK_TRACKER.lock() = Some(tracker.clone());
    *PREVIOUS_HOOK.lock() = Some(std::panic::take_hook());

    std::panic::set_hook(Box::new(|info| {
        if IN_HOOK.with(|flag| flag.replace(true)) {
            return;
        }

        let tracker = HOOK_TRACKER.lock().clone();
        if let Some(tracker) = tracker {
            // The hook runs mid-panic; a second panic here would abort the
            // process, so the report itself is shielded.
            let fault = fault_from_panic(info);
            let mut context = ReportContext::new();
            context.insert("source".to_string(), "panic_hook".to_string());
            let _ = std::panic::catch_unwind(AssertUnwindSafe(|| {
                tracker.log_error_with(fault, context);
            }));

            if tracker.mode().is_development()
                && let Some(previous) = PREVIOUS_HOOK.lock().as_ref()
            {
                previous(info);
            }
        }

        IN_HOOK.with(|flag| flag.set(false));
    }));
}

/// Remove the panic hook and restore the previous one. No-op when nothing
/// is installed.
pub(crate) fn uninstall() {
    if !HOOK_INSTALLED.swap(false, Ordering::SeqCst) {
        return;
    }

    HOOK_TRACKER.lock().take();
    match PREVIOUS_HOOK.lock().take() {
        Some(previous) => std::panic::set_hook(previous),
        None => {
            let _ = std::panic::take_hook();
        },
    }
}

fn fault_from_panic(info: &PanicHookInfo<'_>) -> Fault {
    let message = info
        .payload()
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic with non-string payload".to_string());

    let (file, line) = match info.location() {
        Some(location) => (Some(location.file().to_string()), Some(location.line())),
        None => (None, None),
    };

    Fault::Panic {
        message,
        file,
        line,
    }
}

/// Spawn a task whose failure is reported instead of silently dropped.
///
/// The analogue of tracking unhandled rejections: a task that resolves to
/// `Err` or panics produces a `task_failure` report tagged with `label`,
/// then the handle resolves normally.
pub fn spawn_tracked<F, T, E>(
    tracker: &ErrorTracker,
    label: &str,
    future: F,
) -> tokio::task::JoinHandle<()>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let tracker = tracker.clone();
    let label = label.to_string();

    tokio::spawn(async move {
        let mut context = ReportContext::new();
        context.insert("source".to_string(), "task".to_string());
        context.insert("task".to_string(), label.clone());

        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(Ok(_)) => {},
            Ok(Err(err)) => {
                let mut fault = Fault::from_error(&err);
                if let Fault::Error { name, .. } = &mut fault {
                    *name = "task_failure".to_string();
                }
                tracker.log_error_with(fault, context);
            },
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "task panicked with non-string payload".to_string());
                let fault = Fault::Error {
                    name: "task_failure".to_string(),
                    message,
                    stack: None,
                };
                tracker.log_error_with(fault, context);
            },
        }
    })
}

/// Tracing layer that mirrors ERROR-level events into the tracker.
///
/// Events emitted by this crate are skipped so a swallowed transport
/// failure can never loop back into a new report.
pub struct CaptureLayer {
    tracker: ErrorTracker,
}

impl CaptureLayer {
    /// Build the layer unconditionally.
    pub fn new(tracker: ErrorTracker) -> Self {
        Self { tracker }
    }

    /// Build the layer only when the tracker runs in development mode,
    /// mirroring how verbose capture is gated.
    pub fn if_development(tracker: ErrorTracker) -> Option<Self> {
        tracker.mode().is_development().then(|| Self::new(tracker))
    }
}

impl<S: tracing::Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != tracing::Level::ERROR {
            return;
        }
        let target = event.metadata().target();
        if target.starts_with("brace") {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let message = visitor
            .message
            .unwrap_or_else(|| event.metadata().name().to_string());

        let mut context = ReportContext::new();
        context.insert("source".to_string(), "log.error".to_string());
        context.insert("target".to_string(), target.to_string());

        self.tracker.log_error_with(
            Fault::Error {
                name: "log.error".to_string(),
                message,
                stack: None,
            },
            context,
        );
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        }
    }
}
