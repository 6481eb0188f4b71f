//! The boundary supervisor and its state machine.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::report::{Fault, ReportContext};
use crate::tracker::ErrorTracker;

use super::fallback::{FallbackView, default_fallback};

/// What a boundary supervises: the whole tree or a single route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryScope {
    /// Full application tree; recovery can escalate to a reload.
    App,
    /// One route; recovery offers navigation since only part of the app is
    /// broken.
    Page { path: String },
}

impl BoundaryScope {
    fn label(&self) -> &'static str {
        match self {
            BoundaryScope::App => "full",
            BoundaryScope::Page { .. } => "page",
        }
    }
}

/// Captured fault details held while a boundary is faulted.
#[derive(Debug, Clone)]
pub struct FaultInfo {
    /// Fault message.
    pub message: String,
    /// Additional detail (component trace, cause chain) when available.
    pub info: Option<String>,
}

/// Boundary lifecycle state.
#[derive(Debug)]
pub enum BoundaryState {
    /// Children render normally.
    Healthy,
    /// A descendant failed; the fallback renders until an explicit reset.
    Faulted { fault: FaultInfo },
}

/// Result of one supervised render pass.
#[derive(Debug)]
pub enum BoundaryOutput<T> {
    /// The children rendered; here is their output.
    Content(T),
    /// The boundary is faulted; render this instead.
    Fallback(FallbackView),
}

impl<T> BoundaryOutput<T> {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, BoundaryOutput::Fallback(_))
    }
}

/// Outcome of activating a recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// The boundary reset; re-render the children.
    Recovered,
    /// The host should reload the whole application.
    Reload,
    /// The host should navigate to the previous page.
    GoBack,
    /// The host should navigate home.
    GoHome,
}

type FallbackBuilder = Box<dyn Fn(&FaultInfo, u32) -> FallbackView + Send + Sync>;

/// Supervisor for one subtree.
///
/// Wraps child rendering in a fallible call and converts failure into local
/// state instead of letting it propagate. One known constraint, shared with
/// every boundary design of this shape: a panic raised while building the
/// fallback itself is not caught by the same boundary.
pub struct Boundary {
    scope: BoundaryScope,
    tracker: ErrorTracker,
    state: BoundaryState,
    fault_count: u32,
    fallback: Option<FallbackBuilder>,
}

impl Boundary {
    /// Supervisor for the full application tree.
    pub fn app(tracker: ErrorTracker) -> Self {
        Self::new(tracker, BoundaryScope::App)
    }

    /// Supervisor scoped to one route.
    pub fn page(tracker: ErrorTracker, path: impl Into<String>) -> Self {
        Self::new(
            tracker,
            BoundaryScope::Page { path: path.into() },
        )
    }

    fn new(tracker: ErrorTracker, scope: BoundaryScope) -> Self {
        Self {
            scope,
            tracker,
            state: BoundaryState::Healthy,
            fault_count: 0,
            fallback: None,
        }
    }

    /// Replace the default fallback with a custom builder receiving the
    /// fault and the running fault count.
    #[must_use]
    pub fn with_fallback(
        mut self,
        builder: impl Fn(&FaultInfo, u32) -> FallbackView + Send + Sync + 'static,
    ) -> Self {
        self.fallback = Some(Box::new(builder));
        self
    }

    /// Run one render pass under supervision.
    ///
    /// While healthy, runs `child` and returns its output; a panic inside
    /// trips the boundary. While faulted, `child` is not run and the
    /// fallback is returned.
    pub fn render<T>(&mut self, child: impl FnOnce() -> T) -> BoundaryOutput<T> {
        if matches!(self.state, BoundaryState::Faulted { .. }) {
            return BoundaryOutput::Fallback(self.fallback_view());
        }

        match catch_unwind(AssertUnwindSafe(child)) {
            Ok(value) => BoundaryOutput::Content(value),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "render panicked with non-string payload".to_string());
                self.trip(message, None);
                BoundaryOutput::Fallback(self.fallback_view())
            },
        }
    }

    /// Trip the boundary with an error surfaced as a value rather than a
    /// panic. Returns the fallback to render.
    pub fn capture<E: std::error::Error>(&mut self, err: &E) -> FallbackView {
        let info = err.source().map(|cause| format!("caused by: {cause}"));
        self.trip(err.to_string(), info);
        self.fallback_view()
    }

    /// Explicit reset: faulted -> healthy. The fault count is preserved; it
    /// only starts over when the boundary value itself is rebuilt.
    pub fn reset(&mut self) {
        self.state = BoundaryState::Healthy;
    }

    /// Activate one of the fallback's recovery actions.
    ///
    /// `Retry` resets the boundary; the other actions reset it and tell the
    /// host what navigation to perform.
    pub fn activate(&mut self, action: super::RecoveryAction) -> RecoveryOutcome {
        use super::RecoveryAction;
        self.reset();
        match action {
            RecoveryAction::Retry => RecoveryOutcome::Recovered,
            RecoveryAction::Reload => RecoveryOutcome::Reload,
            RecoveryAction::GoBack => RecoveryOutcome::GoBack,
            RecoveryAction::GoHome => RecoveryOutcome::GoHome,
        }
    }

    /// Catches since this boundary was built; never reset by recovery.
    #[must_use]
    pub fn fault_count(&self) -> u32 {
        self.fault_count
    }

    #[must_use]
    pub fn is_faulted(&self) -> bool {
        matches!(self.state, BoundaryState::Faulted { .. })
    }

    #[must_use]
    pub fn state(&self) -> &BoundaryState {
        &self.state
    }

    #[must_use]
    pub fn scope(&self) -> &BoundaryScope {
        &self.scope
    }

    fn trip(&mut self, message: String, info: Option<String>) {
        self.fault_count = self.fault_count.saturating_add(1);

        let mut context = ReportContext::new();
        context.insert("source".to_string(), "boundary".to_string());
        context.insert("boundary_type".to_string(), self.scope.label().to_string());
        context.insert("fault_count".to_string(), self.fault_count.to_string());
        if let BoundaryScope::Page { path } = &self.scope {
            context.insert("page".to_string(), path.clone());
        }

        self.tracker.log_error_with(
            Fault::Error {
                name: "Error".to_string(),
                message: message.clone(),
                stack: info.clone(),
            },
            context,
        );

        self.state = BoundaryState::Faulted {
            fault: FaultInfo { message, info },
        };
    }

    fn fallback_view(&self) -> FallbackView {
        let BoundaryState::Faulted { fault } = &self.state else {
            // Only reachable from render() after a trip; keep a sane view
            // for defensive callers anyway.
            return default_fallback(
                &self.scope,
                &FaultInfo {
                    message: "unknown fault".to_string(),
                    info: None,
                },
                self.fault_count,
            );
        };

        match &self.fallback {
            Some(builder) => builder(fault, self.fault_count),
            None => default_fallback(&self.scope, fault, self.fault_count),
        }
    }
}
