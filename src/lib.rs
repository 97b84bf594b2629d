//! machine-template-webhook library crate
//!
//! Admission validation for `YandexMachineTemplate` resources: the CRD
//! definition, the validation policies and the request dispatcher that
//! turns an admission request into a [`Decision`](webhooks::Decision).

pub mod crd;
pub mod error;
pub mod webhooks;

pub use crd::{YandexMachineTemplate, YandexMachineTemplateSpec};
pub use error::{Error, Result};
pub use webhooks::{
    Decision, Diagnostic, DiagnosticKind, FieldPath, RequestDispatcher, TemplateRequest,
    review_admission,
};
