//! Webhook module for validating admission requests.
//!
//! - Create: name grammar and provider ID guard, all diagnostics aggregated
//! - Update: spec immutability
//! - Delete: always allowed

pub mod admission;
mod decision;
pub mod dispatcher;
pub mod normalize;
pub mod policies;

pub use admission::{MUTATE_PATH, VALIDATE_PATH, review, review_admission};
pub use decision::{Decision, Diagnostic, DiagnosticKind, FieldPath, Subject};
pub use dispatcher::{Defaulter, RequestDispatcher, RequestState, TemplateRequest, Validator};
pub use policies::ValidationContext;

// Re-export kube-rs admission types for contract testing
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
