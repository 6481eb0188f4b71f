//! Fallback views shown in place of a faulted subtree.

use crate::a11y::Politeness;

use super::supervisor::{BoundaryScope, FaultInfo};

/// Recovery actions a fallback offers, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Reset the boundary and re-render the children.
    Retry,
    /// Reload the whole application; stronger than a local reset.
    Reload,
    /// Navigate to the previous page.
    GoBack,
    /// Navigate to the home page.
    GoHome,
}

impl RecoveryAction {
    /// Button label for the action.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RecoveryAction::Retry => "Try Again",
            RecoveryAction::Reload => "Reload Page",
            RecoveryAction::GoBack => "Go Back",
            RecoveryAction::GoHome => "Go Home",
        }
    }
}

/// Accessible description of the fallback panel.
///
/// The host renders this however it likes; the fields carry the contract:
/// an alert role with assertive announcement, recovery actions with the
/// primary action first in focus order, and an escalation line once the
/// same boundary has faulted repeatedly.
#[derive(Debug, Clone)]
pub struct FallbackView {
    /// Landmark role; `alert` for the default fallback.
    pub role: &'static str,
    /// Announcement urgency for the region.
    pub live: Politeness,
    /// Panel heading.
    pub heading: String,
    /// Main user-facing message.
    pub message: String,
    /// The fault message, for supportability.
    pub detail: Option<String>,
    /// Present once the boundary has faulted more than once.
    pub repeated: Option<String>,
    /// Recovery actions; the first receives initial focus.
    pub actions: Vec<RecoveryAction>,
}

impl FallbackView {
    /// The action that should receive initial focus.
    #[must_use]
    pub fn primary_action(&self) -> Option<RecoveryAction> {
        self.actions.first().copied()
    }
}

/// Build the default fallback for a scope and fault.
#[must_use]
pub fn default_fallback(scope: &BoundaryScope, fault: &FaultInfo, fault_count: u32) -> FallbackView {
    let (heading, message, actions) = match scope {
        BoundaryScope::App => (
            "Something went wrong".to_string(),
            "An unexpected error occurred. You can try again, or reload the page.".to_string(),
            vec![RecoveryAction::Retry, RecoveryAction::Reload],
        ),
        BoundaryScope::Page { path } => (
            "This page ran into a problem".to_string(),
            format!("The page at {path} failed to load. The rest of the application is unaffected."),
            vec![
                RecoveryAction::Retry,
                RecoveryAction::GoBack,
                RecoveryAction::GoHome,
            ],
        ),
    };

    let repeated = (fault_count > 1).then(|| {
        format!("This problem has occurred {fault_count} times. Retrying may not help.")
    });

    FallbackView {
        role: "alert",
        live: Politeness::Assertive,
        heading,
        message,
        detail: Some(fault.message.clone()),
        repeated,
        actions,
    }
}
