//! Subtree supervision: convert a failing render into a fallback view.
//!
//! A [`Boundary`] wraps child rendering in a fallible call. When the child
//! panics or surfaces an error, the boundary flips from `Healthy` to
//! `Faulted`, reports through its tracker, and hands the host an accessible
//! [`FallbackView`] with recovery actions. The rest of the application keeps
//! rendering; only the supervised subtree is replaced.

mod fallback;
mod supervisor;

pub use fallback::{FallbackView, RecoveryAction, default_fallback};
pub use supervisor::{
    Boundary, BoundaryOutput, BoundaryScope, BoundaryState, FaultInfo, RecoveryOutcome,
};
