//! Container-level settings.

use crate::keyed_list::{Keyed, KeyedList};
use crate::merge::impl_strategic_merge;
use crate::shapes::SecurityPosture;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(test)]
#[path = "container_tests.rs"]
mod tests;

/// Resource name to quantity, e.g. `cpu` to `100m`.
pub type ResourceList = BTreeMap<String, String>;

/// Settings for a single container of the proxy workload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerShape {
    /// Image reference. Unset means the baseline image for the container role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_context: Option<SecurityPosture>,

    /// Environment variables, merged by variable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<KeyedList<EnvVar>>,

    /// Volume mounts, merged by mount path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_mounts: Option<KeyedList<VolumeMount>>,

    /// Extra command-line arguments. Replaced wholesale by an overlay.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
}

impl_strategic_merge!(ContainerShape {
    image => "image",
    resources => "resources",
    security_context => "securityContext",
    env => "env",
    volume_mounts => "volumeMounts",
    args => "args",
});

/// Compute resources requested by and allowed to a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequirements {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests: Option<ResourceList>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<ResourceList>,
}

impl ResourceRequirements {
    /// Resource requirements with only requests set.
    pub fn with_requests<I, K, V>(requests: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            requests: Some(
                requests
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            limits: None,
        }
    }
}

impl_strategic_merge!(ResourceRequirements {
    requests => "requests",
    limits => "limits",
});

/// A container override identified by container name.
///
/// The container settings are flattened, so on the wire this is a
/// [`ContainerShape`] with an extra `name` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedContainer {
    pub name: String,

    #[serde(flatten)]
    pub container: ContainerShape,
}

impl NamedContainer {
    pub fn new(name: impl Into<String>, container: ContainerShape) -> Self {
        Self {
            name: name.into(),
            container,
        }
    }
}

impl Keyed for NamedContainer {
    fn key(&self) -> &str {
        &self.name
    }
}

impl_strategic_merge!(NamedContainer {
    name => "name",
    container => "",
});

/// Environment variable of a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

impl Keyed for EnvVar {
    fn key(&self) -> &str {
        &self.name
    }
}

impl_strategic_merge!(EnvVar {
    name => "name",
    value => "value",
});

/// Where a volume is mounted inside a container.
///
/// Keyed by `mountPath`: two mounts at the same path are the same mount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub name: String,

    pub mount_path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_path: Option<String>,
}

impl Keyed for VolumeMount {
    fn key(&self) -> &str {
        &self.mount_path
    }
}

impl_strategic_merge!(VolumeMount {
    name => "name",
    mount_path => "mountPath",
    read_only => "readOnly",
    sub_path => "subPath",
});
