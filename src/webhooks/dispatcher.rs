//! Request dispatcher for admission operations.
//!
//! Routes create, update and delete requests to the validation policies of
//! the resource type and renders a single [`Decision`].
//!
//! Per-request lifecycle:
//!
//! ```text
//! Received -> Validating -> Accepted
//!                        -> Rejected
//! ```
//!
//! A rejection is final for that attempt; resubmission is up to the caller.
//! The dispatcher holds no state and can be shared freely across threads.

use std::fmt;

use kube::core::admission::Operation;
use kube::{Resource, ResourceExt};
use tracing::{debug, info};

use crate::crd::YandexMachineTemplate;
use crate::webhooks::policies::{self, ValidationContext};
use crate::webhooks::{Decision, Subject};

/// A resource that can be defaulted before validation
pub trait Defaulter {
    /// Fill in unset fields in place
    fn apply_defaults(&mut self);
}

/// A resource that can validate its own admission requests
pub trait Validator {
    fn validate_create(&self) -> Decision;

    fn validate_update(&self, old: &Self) -> Decision;

    fn validate_delete(&self) -> Decision;
}

/// Per-request state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestState {
    Received,
    Validating,
    Accepted,
    Rejected,
}

impl RequestState {
    /// Terminal state for a rendered decision
    pub fn settled(decision: &Decision) -> Self {
        if decision.is_accepted() {
            RequestState::Accepted
        } else {
            RequestState::Rejected
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestState::Received => write!(f, "Received"),
            RequestState::Validating => write!(f, "Validating"),
            RequestState::Accepted => write!(f, "Accepted"),
            RequestState::Rejected => write!(f, "Rejected"),
        }
    }
}

/// An admission request for a typed resource
#[derive(Clone, Debug)]
pub enum TemplateRequest<T> {
    Create { object: T },
    Update { old: T, new: T },
    Delete { object: T },
}

impl<T> TemplateRequest<T> {
    pub fn operation(&self) -> Operation {
        match self {
            TemplateRequest::Create { .. } => Operation::Create,
            TemplateRequest::Update { .. } => Operation::Update,
            TemplateRequest::Delete { .. } => Operation::Delete,
        }
    }
}

/// Stateless router from admission operations to validation policies
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestDispatcher;

impl RequestDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Route a request to the matching handler
    pub fn dispatch<T>(&self, request: TemplateRequest<T>) -> Decision
    where
        T: Defaulter + Validator,
    {
        let operation = request.operation();
        debug!(operation = ?operation, state = %RequestState::Received, "Admission request");

        let decision = match request {
            TemplateRequest::Create { object } => self.on_create(object),
            TemplateRequest::Update { old, new } => self.on_update(&old, new),
            TemplateRequest::Delete { object } => self.on_delete(&object),
        };

        debug!(
            operation = ?operation,
            state = %RequestState::settled(&decision),
            diagnostics = decision.diagnostics.len(),
            "Admission request settled"
        );
        decision
    }

    /// Default step preceding validation; performs no mutation for templates
    pub fn on_default<T: Defaulter>(&self, mut object: T) -> T {
        object.apply_defaults();
        object
    }

    pub fn on_create<T>(&self, object: T) -> Decision
    where
        T: Defaulter + Validator,
    {
        let object = self.on_default(object);
        debug!(state = %RequestState::Validating, "Validating create");
        object.validate_create()
    }

    pub fn on_update<T>(&self, old: &T, new: T) -> Decision
    where
        T: Defaulter + Validator,
    {
        let new = self.on_default(new);
        debug!(state = %RequestState::Validating, "Validating update");
        new.validate_update(old)
    }

    pub fn on_delete<T: Validator>(&self, object: &T) -> Decision {
        object.validate_delete()
    }
}

impl YandexMachineTemplate {
    /// Attribution for decisions about this template
    pub fn subject(&self) -> Subject {
        Subject {
            kind: Self::kind(&()).into_owned(),
            group: Self::group(&()).into_owned(),
            name: self.metadata.name.clone().unwrap_or_default(),
        }
    }
}

impl Defaulter for YandexMachineTemplate {
    fn apply_defaults(&mut self) {
        info!(name = %self.name_any(), "default");
    }
}

impl Validator for YandexMachineTemplate {
    fn validate_create(&self) -> Decision {
        info!(name = %self.name_any(), namespace = ?self.namespace(), "validate create");
        let diagnostics = policies::validate_create(&ValidationContext::create(self));
        Decision::from_diagnostics(self.subject(), diagnostics)
    }

    fn validate_update(&self, old: &Self) -> Decision {
        info!(name = %self.name_any(), namespace = ?self.namespace(), "validate update");
        let diagnostics = policies::validate_update(&ValidationContext::update(self, old));
        Decision::from_diagnostics(self.subject(), diagnostics)
    }

    fn validate_delete(&self) -> Decision {
        info!(name = %self.name_any(), namespace = ?self.namespace(), "validate delete");
        Decision::from_diagnostics(self.subject(), Vec::new())
    }
}
