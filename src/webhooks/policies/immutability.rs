//! Immutability validation policy.
//!
//! Enforced on UPDATE only: `spec` cannot change after creation. Only the
//! spec is compared; metadata, labels and annotations may change freely.
//!
//! Both specs are normalized before comparison, so the check does not
//! depend on field order. When they differ, one diagnostic is reported
//! for the whole `spec`; the changed leaf is only logged.

use kube::Resource;
use serde::Serialize;
use tracing::{debug, warn};

use super::ValidationContext;
use crate::crd::YandexMachineTemplate;
use crate::error::{Error, Result};
use crate::webhooks::normalize::{first_difference, normalize};
use crate::webhooks::{Diagnostic, FieldPath};

/// Compare two specs, returning the path of the first difference.
///
/// `kind` names the resource in conversion errors. The new spec is
/// converted first.
pub fn compare_specs<T: Serialize + ?Sized>(
    kind: &str,
    old: &T,
    new: &T,
) -> Result<Option<FieldPath>> {
    let new = normalize(new).map_err(|source| Error::ConvertNew {
        kind: kind.to_string(),
        source,
    })?;
    let old = normalize(old).map_err(|source| Error::ConvertOld {
        kind: kind.to_string(),
        source,
    })?;

    Ok(first_difference(&old, &new, &FieldPath::new(["spec"])))
}

/// Turn the outcome of [`compare_specs`] into at most one diagnostic.
pub fn check_specs<T: Serialize + ?Sized>(kind: &str, old: &T, new: &T) -> Option<Diagnostic> {
    match compare_specs(kind, old, new) {
        Ok(None) => None,
        Ok(Some(changed)) => {
            debug!(changed = %changed, "Spec modified");
            Some(Diagnostic::forbidden(
                FieldPath::new(["spec"]),
                "cannot be modified",
            ))
        }
        Err(e) => {
            warn!(error = %e, "Could not compare specs");
            Some(e.into_diagnostic())
        }
    }
}

/// Validate that the spec is unchanged on UPDATE operations
pub fn validate(ctx: &ValidationContext<'_>) -> Option<Diagnostic> {
    // Not an UPDATE
    let old = ctx.old_resource?;

    check_specs(
        &YandexMachineTemplate::kind(&()),
        &old.spec,
        &ctx.resource.spec,
    )
}
