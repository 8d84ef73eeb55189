//! Scaled deployment shape of the proxy workload.

use crate::keyed_list::KeyedList;
use crate::merge::{impl_scalar_merge, impl_strategic_merge};
use crate::shapes::{ContainerShape, NamedContainer, PatchSpec, PodShape};
use serde::{Deserialize, Serialize};

/// Settings for running the proxy as a replicated deployment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentShape {
    /// Desired replica count. Unset leaves the choice to the orchestrator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<DeploymentStrategy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod: Option<PodShape>,

    /// Settings of the proxy data-plane container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerShape>,

    /// Name of the generated deployment object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Per-container overrides, merged by container name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub containers: Option<KeyedList<NamedContainer>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_containers: Option<KeyedList<NamedContainer>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<PatchSpec>,
}

impl_strategic_merge!(DeploymentShape {
    replicas => "replicas",
    strategy => "strategy",
    pod => "pod",
    container => "container",
    name => "name",
    containers => "containers",
    init_containers => "initContainers",
    patch => "patch",
});

/// How existing pods are replaced by new ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStrategy {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub strategy_type: Option<DeploymentStrategyType>,

    /// Only meaningful for [`DeploymentStrategyType::RollingUpdate`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rolling_update: Option<RollingUpdateParams>,
}

impl DeploymentStrategy {
    pub fn rolling_update() -> Self {
        Self {
            strategy_type: Some(DeploymentStrategyType::RollingUpdate),
            rolling_update: None,
        }
    }
}

impl_strategic_merge!(DeploymentStrategy {
    strategy_type => "type",
    rolling_update => "rollingUpdate",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeploymentStrategyType {
    RollingUpdate,
    Recreate,
}

impl_scalar_merge!(DeploymentStrategyType);

/// Rolling update limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_unavailable: Option<IntOrPercent>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_surge: Option<IntOrPercent>,
}

impl_strategic_merge!(RollingUpdateParams {
    max_unavailable => "maxUnavailable",
    max_surge => "maxSurge",
});

/// An absolute count or a percentage such as `"25%"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntOrPercent {
    Int(i32),
    Percent(String),
}

impl_scalar_merge!(IntOrPercent);
