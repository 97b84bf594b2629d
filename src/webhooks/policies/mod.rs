//! Validation policies for YandexMachineTemplate admission.
//!
//! Policies are organized by operation:
//! - Create: provider ID guard, name grammar
//! - Update: spec immutability
//!
//! Every policy of an operation runs; diagnostics are aggregated, never
//! short-circuited.

pub mod immutability;
pub mod name;
pub mod provider_id;

use crate::crd::YandexMachineTemplate;
use crate::webhooks::Diagnostic;

/// Context for validation
#[derive(Clone, Copy, Debug)]
pub struct ValidationContext<'a> {
    /// The resource being validated
    pub resource: &'a YandexMachineTemplate,
    /// The old resource (for UPDATE operations)
    pub old_resource: Option<&'a YandexMachineTemplate>,
}

impl<'a> ValidationContext<'a> {
    /// Context for a CREATE operation
    pub fn create(resource: &'a YandexMachineTemplate) -> Self {
        Self {
            resource,
            old_resource: None,
        }
    }

    /// Context for an UPDATE operation
    pub fn update(resource: &'a YandexMachineTemplate, old: &'a YandexMachineTemplate) -> Self {
        Self {
            resource,
            old_resource: Some(old),
        }
    }

    /// Check if this is an UPDATE operation
    pub fn is_update(&self) -> bool {
        self.old_resource.is_some()
    }
}

/// Run all CREATE policies
pub fn validate_create(ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
    [provider_id::validate(ctx), name::validate(ctx)]
        .into_iter()
        .flatten()
        .collect()
}

/// Run all UPDATE policies
pub fn validate_update(ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
    immutability::validate(ctx).into_iter().collect()
}
