//! Pod-level settings.

use crate::keyed_list::{Keyed, KeyedList};
use crate::merge::impl_strategic_merge;
use crate::shapes::SecurityPosture;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Settings applied to every pod of the proxy workload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodShape {
    /// Pod-wide security settings. Container settings take precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_context: Option<SecurityPosture>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,

    /// Taints the pods tolerate. Replaced wholesale by an overlay since
    /// tolerations have no identifying key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerations: Option<Vec<Toleration>>,

    /// Volumes, merged by volume name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumes: Option<KeyedList<Volume>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_pull_secrets: Option<KeyedList<LocalObjectReference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_class_name: Option<String>,
}

impl_strategic_merge!(PodShape {
    security_context => "securityContext",
    annotations => "annotations",
    labels => "labels",
    node_selector => "nodeSelector",
    tolerations => "tolerations",
    volumes => "volumes",
    image_pull_secrets => "imagePullSecrets",
    priority_class_name => "priorityClassName",
});

/// Toleration of a node taint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toleration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub toleration_seconds: Option<i64>,
}

/// Named volume made available to the pod's containers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_map: Option<ConfigMapVolumeSource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<SecretVolumeSource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_dir: Option<EmptyDirVolumeSource>,
}

impl Keyed for Volume {
    fn key(&self) -> &str {
        &self.name
    }
}

impl_strategic_merge!(Volume {
    name => "name",
    config_map => "configMap",
    secret => "secret",
    empty_dir => "emptyDir",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapVolumeSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<i32>,
}

impl_strategic_merge!(ConfigMapVolumeSource {
    name => "name",
    default_mode => "defaultMode",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretVolumeSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<i32>,
}

impl_strategic_merge!(SecretVolumeSource {
    secret_name => "secretName",
    default_mode => "defaultMode",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyDirVolumeSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_limit: Option<String>,
}

impl_strategic_merge!(EmptyDirVolumeSource {
    medium => "medium",
    size_limit => "sizeLimit",
});

/// Reference to an object in the workload's namespace, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalObjectReference {
    pub name: String,
}

impl Keyed for LocalObjectReference {
    fn key(&self) -> &str {
        &self.name
    }
}

impl_strategic_merge!(LocalObjectReference {
    name => "name",
});
