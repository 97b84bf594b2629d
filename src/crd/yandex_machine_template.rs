//! YandexMachineTemplate Custom Resource Definition.
//!
//! A template is the blueprint a MachineDeployment or control plane stamps
//! YandexMachines out of. Generated machines are named after the template
//! with a short random suffix, so the template name is length-limited
//! (see [`crate::webhooks::policies::name`]) and instance-specific fields
//! such as `providerID` must stay unset.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// YandexMachineTemplate is the Schema for the yandexmachinetemplates API.
///
/// Example:
/// ```yaml
/// apiVersion: infrastructure.cluster.x-k8s.io/v1alpha1
/// kind: YandexMachineTemplate
/// metadata:
///   name: workers-ru-central1-a
/// spec:
///   template:
///     spec:
///       zoneID: ru-central1-a
///       platformID: standard-v3
///       resources:
///         cores: 2
///         memory: 4Gi
///       bootDisk:
///         size: 20Gi
///         imageID: fd8kdq6d0p8sij7h5qe3
///       networkInterfaces:
///         - subnetID: e9b0mhq2l9v2jqq1h5mk
/// ```
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1alpha1",
    kind = "YandexMachineTemplate",
    plural = "yandexmachinetemplates",
    namespaced,
    printcolumn = r#"{"name":"Zone", "type":"string", "jsonPath":".spec.template.spec.zoneID"}"#,
    printcolumn = r#"{"name":"Platform", "type":"string", "jsonPath":".spec.template.spec.platformID"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct YandexMachineTemplateSpec {
    /// Template the generated YandexMachines are built from.
    pub template: YandexMachineTemplateResource,
}

/// Metadata and spec stamped onto every generated YandexMachine.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct YandexMachineTemplateResource {
    /// Labels and annotations copied to generated machines.
    #[serde(default, skip_serializing_if = "TemplateObjectMeta::is_empty")]
    pub metadata: TemplateObjectMeta,

    /// Spec of the generated machines.
    pub spec: YandexMachineSpec,
}

/// Subset of object metadata that can be templated.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateObjectMeta {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl TemplateObjectMeta {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.annotations.is_empty()
    }
}

/// Desired state of a YandexMachine.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct YandexMachineSpec {
    /// Compute instance identifier, `yandex://<instance-id>`.
    /// Filled in by the machine controller; never valid in a template.
    #[serde(rename = "providerID", default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,

    /// Availability zone (e.g. ru-central1-a).
    #[serde(rename = "zoneID", default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,

    /// Hardware platform (e.g. standard-v3). Left to the cloud when unset.
    #[serde(rename = "platformID", default, skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,

    /// CPU, memory and GPU allocation.
    pub resources: MachineResources,

    /// Boot disk of the instance.
    pub boot_disk: Disk,

    /// Network interfaces, in attachment order.
    #[serde(default)]
    pub network_interfaces: Vec<NetworkInterface>,

    /// Labels set on the compute instance.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Instance metadata (user-data, ssh-keys, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,

    /// Service account the instance runs as.
    #[serde(rename = "serviceAccountID", default, skip_serializing_if = "Option::is_none")]
    pub service_account_id: Option<String>,

    /// Run on preemptible capacity.
    #[serde(default)]
    pub preemptible: bool,
}

/// Compute resources of an instance.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineResources {
    /// Number of vCPUs.
    pub cores: i64,

    /// Memory size (e.g. 4Gi).
    pub memory: String,

    /// Guaranteed vCPU share in percent (5, 20, 50 or 100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_fraction: Option<i64>,

    /// Number of GPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpus: Option<i64>,
}

/// Boot disk specification.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Disk {
    /// Disk type (e.g. network-ssd). Left to the cloud when unset.
    #[serde(rename = "typeID", default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,

    /// Disk size (e.g. 20Gi).
    pub size: String,

    /// Image the disk is created from.
    #[serde(rename = "imageID")]
    pub image_id: String,
}

/// Network interface attached to an instance.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    /// Subnet the interface is attached to.
    #[serde(rename = "subnetID")]
    pub subnet_id: String,

    /// Assign a public IPv4 address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_public_ip: Option<bool>,
}
