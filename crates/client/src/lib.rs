//! Typed client for the external workflow process engine.
//!
//! The engine owns all request state: it assigns `requestId`/`taskId`,
//! runs approver assignment, and applies decisions. This crate exposes
//! that surface as the [`WorkflowApi`] trait plus a reqwest-backed
//! implementation, decoding responses through a parse-don't-trust wire
//! layer so malformed records never leak into the typed model.

pub mod api;
pub mod http;
pub mod wire;

pub use api::{ClientError, CompletionCall, WorkflowApi};
pub use http::HttpWorkflowClient;
