//! Adapter between kube-rs admission types and the request dispatcher.
//!
//! The HTTP transport, TLS and webhook registration are provided by the
//! embedding process. It hands each `AdmissionReview` to
//! [`review_admission`] and returns the result verbatim.

use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use kube::Resource;
use tracing::{debug, error, info, warn};

use crate::crd::YandexMachineTemplate;
use crate::error::{Error, Result};
use crate::webhooks::dispatcher::{RequestDispatcher, TemplateRequest};
use crate::webhooks::{Decision, Subject};

/// Path the validating webhook is served on
pub const VALIDATE_PATH: &str =
    "/validate-infrastructure-cluster-x-k8s-io-v1alpha1-yandexmachinetemplate";

/// Path the defaulting webhook is served on
pub const MUTATE_PATH: &str =
    "/mutate-infrastructure-cluster-x-k8s-io-v1alpha1-yandexmachinetemplate";

/// Decode a dynamic admission object into a typed template
pub fn decode(object: &DynamicObject) -> Result<YandexMachineTemplate> {
    let kind = YandexMachineTemplate::kind(&()).into_owned();
    let value = serde_json::to_value(object).map_err(|source| Error::Decode {
        kind: kind.clone(),
        source,
    })?;
    serde_json::from_value(value).map_err(|source| Error::Decode { kind, source })
}

fn required<'a>(object: Option<&'a DynamicObject>, what: &'static str) -> Result<&'a DynamicObject> {
    object.ok_or(Error::MissingObject(what))
}

/// Attribution taken from the request envelope, for objects that failed to decode
fn request_subject(request: &AdmissionRequest<DynamicObject>) -> Subject {
    Subject {
        kind: request.kind.kind.clone(),
        group: request.kind.group.clone(),
        name: request.name.clone(),
    }
}

fn typed_request(request: &AdmissionRequest<DynamicObject>) -> Result<TemplateRequest<YandexMachineTemplate>> {
    match request.operation {
        Operation::Update => Ok(TemplateRequest::Update {
            new: decode(required(request.object.as_ref(), "object")?)?,
            old: decode(required(request.old_object.as_ref(), "oldObject")?)?,
        }),
        _ => Ok(TemplateRequest::Create {
            object: decode(required(request.object.as_ref(), "object")?)?,
        }),
    }
}

/// Decide an admission request
pub fn decide(request: &AdmissionRequest<DynamicObject>) -> Decision {
    let dispatcher = RequestDispatcher::new();

    match request.operation {
        // Deletion is never gated, whatever the stored object looks like
        Operation::Delete => match request.old_object.as_ref().map(decode) {
            Some(Ok(object)) => dispatcher.dispatch(TemplateRequest::Delete { object }),
            _ => Decision::accepted(),
        },
        Operation::Connect => Decision::accepted(),
        Operation::Create | Operation::Update => match typed_request(request) {
            Ok(typed) => dispatcher.dispatch(typed),
            Err(e) => {
                error!(uid = %request.uid, error = %e, "Could not evaluate admission request");
                Decision::from_diagnostics(request_subject(request), vec![e.into_diagnostic()])
            }
        },
    }
}

/// Build the admission response for a request
pub fn review(request: &AdmissionRequest<DynamicObject>) -> AdmissionResponse {
    let uid = &request.uid;
    debug!(
        uid = %uid,
        operation = ?request.operation,
        namespace = ?request.namespace,
        name = %request.name,
        "Processing admission request"
    );

    let decision = decide(request);

    let mut response = AdmissionResponse::from(request);
    if !decision.warnings.is_empty() {
        response.warnings = Some(decision.warnings.clone());
    }

    match decision.rejection_message() {
        None => {
            info!(uid = %uid, "Admission request allowed");
            response
        }
        Some(message) => {
            warn!(
                uid = %uid,
                diagnostics = decision.diagnostics.len(),
                message = %message,
                "Admission request denied"
            );
            response.deny(message)
        }
    }
}

/// Answer a full `AdmissionReview`
pub fn review_admission(review: AdmissionReview<DynamicObject>) -> AdmissionReview<DynamicObject> {
    let request: AdmissionRequest<DynamicObject> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
            return AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e))
                .into_review();
        }
    };

    self::review(&request).into_review()
}
