//! Boundary supervision tests.
//!
//! Covers the supervisor state machine end to end:
//! - a failing subtree is isolated from its siblings
//! - reset restores the children while preserving the fault count
//! - the default fallback is an accessible alert with working recovery

use std::sync::Arc;

use brace::boundary::{Boundary, BoundaryOutput, RecoveryAction, RecoveryOutcome};
use brace::config::TrackerConfig;
use brace::tracker::ErrorTracker;
use brace::tracker::transport::MemoryTransport;

fn tracker() -> (ErrorTracker, MemoryTransport) {
    let transport = MemoryTransport::new();
    let config = TrackerConfig {
        endpoint: url::Url::parse("https://logs.example.com/api/log-error")
            .expect("endpoint must parse"),
        ..Default::default()
    };
    let tracker = ErrorTracker::builder(config)
        .transport(Arc::new(transport.clone()))
        .build()
        .expect("config must be valid");
    (tracker, transport)
}

// =============================================================================
// Isolation Tests
// =============================================================================

#[test]
fn test_faulted_subtree_does_not_take_down_siblings() {
    let (tracker, _transport) = tracker();
    let mut failing = Boundary::page(tracker.clone(), "/reports");
    let mut healthy = Boundary::page(tracker.clone(), "/settings");

    let failed = failing.render(|| -> &'static str { panic!("Test error") });
    let rendered = healthy.render(|| "settings content");

    assert!(failed.is_fallback());
    assert!(matches!(rendered, BoundaryOutput::Content("settings content")));
    assert!(failing.is_faulted());
    assert!(!healthy.is_faulted());
}

#[test]
fn test_each_catch_reports_once() {
    let (tracker, _transport) = tracker();
    let mut boundary = Boundary::app(tracker.clone());

    boundary.render(|| -> () { panic!("Test error") });
    assert_eq!(tracker.stats().buffered, 1);

    // Re-rendering while faulted does not report again.
    boundary.render(|| ());
    assert_eq!(tracker.stats().buffered, 1);
}

// =============================================================================
// Reset Tests
// =============================================================================

#[test]
fn test_reset_transitions_back_to_healthy() {
    let (tracker, _transport) = tracker();
    let mut boundary = Boundary::app(tracker);

    boundary.render(|| -> () { panic!("Test error") });
    assert!(boundary.is_faulted());

    boundary.reset();
    assert!(!boundary.is_faulted());

    let output = boundary.render(|| "recovered");
    assert!(matches!(output, BoundaryOutput::Content("recovered")));
}

#[test]
fn test_fault_count_survives_reset() {
    let (tracker, _transport) = tracker();
    let mut boundary = Boundary::app(tracker);

    boundary.render(|| -> () { panic!("first") });
    boundary.reset();
    boundary.render(|| -> () { panic!("second") });

    assert_eq!(boundary.fault_count(), 2);
}

#[test]
fn test_fresh_boundary_starts_counting_over() {
    let (tracker, _transport) = tracker();
    let mut boundary = Boundary::app(tracker.clone());
    boundary.render(|| -> () { panic!("Test error") });
    drop(boundary);

    let rebuilt = Boundary::app(tracker);
    assert_eq!(rebuilt.fault_count(), 0);
}

// =============================================================================
// Fallback Contract Tests
// =============================================================================

#[test]
fn test_default_fallback_alert_with_try_again() {
    let (tracker, _transport) = tracker();
    let mut boundary = Boundary::app(tracker);

    let BoundaryOutput::Fallback(view) =
        boundary.render(|| -> () { panic!("Test error") })
    else {
        panic!("expected fallback");
    };

    assert_eq!(view.role, "alert");
    assert_eq!(view.live, brace::a11y::Politeness::Assertive);
    assert_eq!(view.primary_action().map(|a| a.label()), Some("Try Again"));

    let outcome = boundary.activate(RecoveryAction::Retry);
    assert_eq!(outcome, RecoveryOutcome::Recovered);
    assert!(!boundary.is_faulted());
}

#[test]
fn test_app_and_page_scopes_offer_different_recovery() {
    let (tracker, _transport) = tracker();

    let mut app = Boundary::app(tracker.clone());
    let BoundaryOutput::Fallback(app_view) = app.render(|| -> () { panic!("boom") }) else {
        panic!("expected fallback");
    };
    assert!(app_view.actions.contains(&RecoveryAction::Reload));

    let mut page = Boundary::page(tracker, "/reports");
    let BoundaryOutput::Fallback(page_view) = page.render(|| -> () { panic!("boom") }) else {
        panic!("expected fallback");
    };
    assert!(page_view.actions.contains(&RecoveryAction::GoBack));
    assert!(page_view.actions.contains(&RecoveryAction::GoHome));
    assert!(!page_view.actions.contains(&RecoveryAction::Reload));
}

#[test]
fn test_navigation_actions_reset_and_instruct_host() {
    let (tracker, _transport) = tracker();
    let mut boundary = Boundary::page(tracker, "/reports");
    boundary.render(|| -> () { panic!("boom") });

    assert_eq!(boundary.activate(RecoveryAction::GoHome), RecoveryOutcome::GoHome);
    assert!(!boundary.is_faulted());
}

#[test]
fn test_repeat_faults_escalate_message() {
    let (tracker, _transport) = tracker();
    let mut boundary = Boundary::app(tracker);

    boundary.render(|| -> () { panic!("boom") });
    boundary.reset();
    let BoundaryOutput::Fallback(view) = boundary.render(|| -> () { panic!("boom") }) else {
        panic!("expected fallback");
    };

    assert!(
        view.repeated.is_some(),
        "second fault must surface the repeat warning"
    );
}

// =============================================================================
// Reporting Tests
// =============================================================================

#[test]
fn test_boundary_report_is_tagged_with_scope_and_path() {
    let (tracker, _transport) = tracker();
    let mut boundary = Boundary::page(tracker.clone(), "/reports");

    boundary.render(|| -> () { panic!("Test error") });

    let stats = tracker.stats();
    let record = &stats.recent[0];
    assert_eq!(
        record.context.get("boundary_type").map(String::as_str),
        Some("page")
    );
    assert_eq!(record.context.get("page").map(String::as_str), Some("/reports"));
    assert_eq!(record.message, "Test error");
}

#[test]
fn test_identical_faults_across_boundaries_dedupe() {
    let (tracker, _transport) = tracker();
    let mut first = Boundary::page(tracker.clone(), "/a");
    let mut second = Boundary::page(tracker.clone(), "/b");

    first.render(|| -> () { panic!("shared failure") });
    second.render(|| -> () { panic!("shared failure") });

    let stats = tracker.stats();
    assert_eq!(stats.buffered, 1, "same key from two boundaries dedupes");
    let count = stats.counts.values().next().map(|c| c.count);
    assert_eq!(count, Some(2));
}
