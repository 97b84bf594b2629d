//! Template name validation policy.
//!
//! Enforced on CREATE only; names are immutable once stored.
//!
//! A YandexMachine generated from a template is named
//! `<template-name>-<5 random chars>`, and generated names may not exceed
//! 63 characters, which leaves 57 for the template name.
//!
//! Grammar:
//! - starts with a lowercase letter
//! - continues with up to 55 lowercase letters, digits or hyphens
//! - when longer than one character, ends with a lowercase letter or digit

use std::sync::LazyLock;

use regex::Regex;

use super::ValidationContext;
use crate::webhooks::{Diagnostic, FieldPath};

/// Platform ceiling on generated object names
pub const MAX_GENERATED_NAME_LENGTH: usize = 63;

/// Length of the `-xxxxx` suffix appended to generated machine names
pub const GENERATED_NAME_SUFFIX_LENGTH: usize = 6;

/// Longest template name whose generated machines still fit the ceiling
pub const MAX_TEMPLATE_NAME_LENGTH: usize = MAX_GENERATED_NAME_LENGTH - GENERATED_NAME_SUFFIX_LENGTH;

// First char + {0,55} middle + last char
const _: () = assert!(MAX_TEMPLATE_NAME_LENGTH == 1 + 55 + 1);

static NAME_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z]([-a-z0-9]{0,55}[a-z0-9])?$").ok());

/// Check a name against the template naming grammar
pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.as_ref().is_some_and(|re| re.is_match(name))
}

/// Validate a candidate template name
pub fn validate_name(name: &str) -> Option<Diagnostic> {
    if is_valid_name(name) {
        return None;
    }

    Some(Diagnostic::invalid(
        FieldPath::new(["metadata", "name"]),
        name,
        format!(
            "may contain lowercase Latin letters, digits, and hyphens. The first character must be a letter, \
             and the hyphen cannot be the last character, max {} symbols",
            MAX_TEMPLATE_NAME_LENGTH
        ),
    ))
}

/// Validate the name of the resource under admission
pub fn validate(ctx: &ValidationContext<'_>) -> Option<Diagnostic> {
    let name = ctx.resource.metadata.name.as_deref().unwrap_or_default();
    validate_name(name)
}
