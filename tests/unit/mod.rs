// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Unit tests for machine-template-webhook.
//!
//! These tests run without a Kubernetes cluster and exercise the public
//! admission API end to end.

#[path = "../common/mod.rs"]
mod common;

use common::fixtures::{MachineTemplateBuilder, minimal_template};

mod name_tests {
    use machine_template_webhook::webhooks::policies::name::{
        MAX_TEMPLATE_NAME_LENGTH, is_valid_name, validate_name,
    };
    use machine_template_webhook::{DiagnosticKind, RequestDispatcher};

    use super::MachineTemplateBuilder;

    #[test]
    fn test_accepted_names() {
        for name in ["a", "ab-3", "my-template-9"] {
            assert!(is_valid_name(name), "{} should be accepted", name);
        }
    }

    #[test]
    fn test_rejected_names() {
        let too_long = "a".repeat(58);
        for name in ["Ab", "-abc", "abc-", "1abc", too_long.as_str()] {
            let diagnostic = validate_name(name).expect("name should be rejected");
            assert_eq!(diagnostic.kind, DiagnosticKind::Invalid);
            assert_eq!(diagnostic.path.to_string(), "metadata.name");
            assert_eq!(diagnostic.value, Some(serde_json::json!(name)));
        }
    }

    #[test]
    fn test_limit_constant() {
        assert_eq!(MAX_TEMPLATE_NAME_LENGTH, 57);
        assert!(is_valid_name(&"a".repeat(57)));
    }

    #[test]
    fn test_missing_name_rejected() {
        let template = MachineTemplateBuilder::new("ignored").without_name().build();
        let decision = RequestDispatcher::new().on_create(template);
        assert!(!decision.is_accepted());
        assert_eq!(decision.diagnostics[0].path.to_string(), "metadata.name");
    }
}

mod create_tests {
    use machine_template_webhook::{DiagnosticKind, RequestDispatcher};

    use super::{MachineTemplateBuilder, minimal_template};

    #[test]
    fn test_valid_template_accepted() {
        let decision = RequestDispatcher::new().on_create(minimal_template("workers"));
        assert!(decision.is_accepted());
        assert!(decision.diagnostics.is_empty());
        assert!(decision.warnings.is_empty());
    }

    #[test]
    fn test_provider_id_forbidden() {
        let template = MachineTemplateBuilder::new("workers")
            .provider_id("yandex://fhm1b2c3d4e5f6g7h8i9")
            .build();
        let decision = RequestDispatcher::new().on_create(template);

        assert!(!decision.is_accepted());
        assert_eq!(decision.diagnostics.len(), 1);
        assert_eq!(decision.diagnostics[0].kind, DiagnosticKind::Forbidden);
        assert_eq!(
            decision.diagnostics[0].path.to_string(),
            "spec.template.spec.providerID"
        );
    }

    #[test]
    fn test_bad_name_and_provider_id_both_reported() {
        let template = MachineTemplateBuilder::new("Workers")
            .provider_id("yandex://fhm1b2c3d4e5f6g7h8i9")
            .build();
        let decision = RequestDispatcher::new().on_create(template);

        assert!(!decision.is_accepted());
        assert_eq!(decision.diagnostics.len(), 2);
        let kinds: Vec<_> = decision.diagnostics.iter().map(|d| d.kind).collect();
        assert!(kinds.contains(&DiagnosticKind::Invalid));
        assert!(kinds.contains(&DiagnosticKind::Forbidden));
    }

    #[test]
    fn test_rejection_attributed_to_template() {
        let decision = RequestDispatcher::new().on_create(minimal_template("Workers"));
        let subject = decision.subject().unwrap();
        assert_eq!(subject.kind, "YandexMachineTemplate");
        assert_eq!(subject.name, "Workers");
        assert!(
            decision
                .rejection_message()
                .unwrap()
                .contains("\"Workers\" is invalid")
        );
    }
}

mod update_tests {
    use machine_template_webhook::webhooks::normalize::{Node, structurally_equal};
    use machine_template_webhook::{DiagnosticKind, RequestDispatcher, TemplateRequest};
    use serde_json::json;

    use super::MachineTemplateBuilder;

    fn assert_spec_frozen(old: MachineTemplateBuilder, new: MachineTemplateBuilder) {
        let decision = RequestDispatcher::new().on_update(&old.build(), new.build());
        assert!(!decision.is_accepted());
        assert_eq!(decision.diagnostics.len(), 1);
        assert_eq!(decision.diagnostics[0].kind, DiagnosticKind::Forbidden);
        assert_eq!(decision.diagnostics[0].path.to_string(), "spec");
        assert_eq!(decision.diagnostics[0].message, "cannot be modified");
    }

    #[test]
    fn test_identical_spec_accepted() {
        let builder = MachineTemplateBuilder::new("workers").subnet("e2lrucutusnd1h2b0s8r");
        let decision = RequestDispatcher::new().on_update(&builder.clone().build(), builder.build());
        assert!(decision.is_accepted());
    }

    #[test]
    fn test_map_insertion_order_irrelevant() {
        let old = json!({
            "template": { "spec": { "metadata": { "user-data": "#cloud-config", "ssh-keys": "ubuntu" } } }
        });
        let new = json!({
            "template": { "spec": { "metadata": { "ssh-keys": "ubuntu", "user-data": "#cloud-config" } } }
        });
        assert_ne!(old.to_string(), new.to_string());
        assert!(structurally_equal(&Node::from(old), &Node::from(new)));
    }

    #[test]
    fn test_object_label_change_accepted() {
        let old = MachineTemplateBuilder::new("workers").build();
        let new = MachineTemplateBuilder::new("workers").label("team", "compute").build();
        assert!(RequestDispatcher::new().on_update(&old, new).is_accepted());
    }

    #[test]
    fn test_leaf_change_rejected() {
        assert_spec_frozen(
            MachineTemplateBuilder::new("workers").memory("4Gi"),
            MachineTemplateBuilder::new("workers").memory("8Gi"),
        );
    }

    #[test]
    fn test_instance_metadata_change_rejected() {
        assert_spec_frozen(
            MachineTemplateBuilder::new("workers").instance_metadata("user-data", "#cloud-config"),
            MachineTemplateBuilder::new("workers").instance_metadata("user-data", "#cloud-config\n"),
        );
    }

    #[test]
    fn test_added_field_rejected() {
        assert_spec_frozen(
            MachineTemplateBuilder::new("workers"),
            MachineTemplateBuilder::new("workers").gpus(1),
        );
    }

    #[test]
    fn test_removed_field_rejected() {
        assert_spec_frozen(
            MachineTemplateBuilder::new("workers").gpus(1),
            MachineTemplateBuilder::new("workers"),
        );
    }

    #[test]
    fn test_added_platform_rejected() {
        let mut old = MachineTemplateBuilder::new("workers").build();
        old.spec.template.spec.platform_id = None;
        let new = MachineTemplateBuilder::new("workers").build();

        let decision = RequestDispatcher::new().on_update(&old, new);
        assert!(!decision.is_accepted());
        assert_eq!(decision.diagnostics[0].kind, DiagnosticKind::Forbidden);
        assert_eq!(decision.diagnostics[0].path.to_string(), "spec");
    }

    #[test]
    fn test_added_interface_rejected() {
        assert_spec_frozen(
            MachineTemplateBuilder::new("workers").subnet("b"),
            MachineTemplateBuilder::new("workers").subnet("b").subnet("c"),
        );
    }

    #[test]
    fn test_sequence_reorder_rejected() {
        let old = MachineTemplateBuilder::new("workers").subnet("b").build();
        let mut new = old.clone();
        new.spec.template.spec.network_interfaces.reverse();
        let decision = RequestDispatcher::new().dispatch(TemplateRequest::Update { old, new });
        assert!(!decision.is_accepted());
    }

    #[test]
    fn test_update_is_idempotent() {
        let dispatcher = RequestDispatcher::new();
        let old = MachineTemplateBuilder::new("workers").cores(2).build();
        let new = MachineTemplateBuilder::new("workers").cores(4).build();

        let first = dispatcher.on_update(&old, new.clone());
        let second = dispatcher.on_update(&old, new);
        assert_eq!(first, second);
    }
}

mod delete_tests {
    use machine_template_webhook::{RequestDispatcher, TemplateRequest};

    use super::MachineTemplateBuilder;

    #[test]
    fn test_delete_always_accepted() {
        let template = MachineTemplateBuilder::new("Bad-Name-")
            .provider_id("yandex://fhm1b2c3d4e5f6g7h8i9")
            .build();
        let decision = RequestDispatcher::new().dispatch(TemplateRequest::Delete { object: template });
        assert!(decision.is_accepted());
        assert!(decision.diagnostics.is_empty());
    }
}

mod serialization_tests {
    use machine_template_webhook::RequestDispatcher;

    use super::MachineTemplateBuilder;

    #[test]
    fn test_decision_shape() {
        let template = MachineTemplateBuilder::new("-bad").build();
        let decision = RequestDispatcher::new().on_create(template);
        let value = serde_json::to_value(&decision).unwrap();

        assert_eq!(value["accepted"], false);
        assert_eq!(value["warnings"], serde_json::json!([]));
        assert_eq!(value["diagnostics"][0]["path"], "metadata.name");
        assert_eq!(value["diagnostics"][0]["kind"], "Invalid");
        assert_eq!(value["diagnostics"][0]["value"], "-bad");
        assert!(value.get("subject").is_none());
    }
}

mod error_tests {
    use machine_template_webhook::{DiagnosticKind, Error};

    #[test]
    fn test_missing_object_becomes_internal_error() {
        let diagnostic = Error::MissingObject("oldObject").into_diagnostic();
        assert_eq!(diagnostic.kind, DiagnosticKind::InternalError);
        assert!(diagnostic.path.is_root());
        assert_eq!(diagnostic.path.to_string(), "");
    }
}
