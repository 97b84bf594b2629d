//! Provider ID guard.
//!
//! Enforced on CREATE only. `providerID` identifies one compute instance;
//! a template stamps out many machines, so it must never carry one.

use super::ValidationContext;
use crate::webhooks::{Diagnostic, FieldPath};

/// Reject templates that set `spec.template.spec.providerID`
pub fn validate(ctx: &ValidationContext<'_>) -> Option<Diagnostic> {
    ctx.resource.spec.template.spec.provider_id.as_ref()?;

    Some(Diagnostic::forbidden(
        FieldPath::new(["spec", "template", "spec", "providerID"]),
        "cannot be set in templates",
    ))
}
