//! Approval orchestration over the workflow engine.
//!
//! The engine owns every status transition; this crate owns the rules
//! around issuing one: decision preconditions, the remarks contract,
//! the single-flight guarantee per task, and the post-decision refresh
//! signal.

pub mod orchestrator;

pub use orchestrator::{
    ActionError, ApprovalOrchestrator, DecisionOutcome, PreconditionError, RefreshTarget,
};
