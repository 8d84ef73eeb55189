//! Per-node daemon shape of the proxy workload.

use crate::keyed_list::KeyedList;
use crate::merge::{impl_scalar_merge, impl_strategic_merge};
use crate::shapes::{ContainerShape, NamedContainer, PatchSpec, PodShape, RollingUpdateParams};
use serde::{Deserialize, Serialize};

/// Settings for running one proxy instance on every eligible node.
///
/// There is no replica count: the number of instances follows the nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonShape {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<DaemonSetStrategy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod: Option<PodShape>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerShape>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub containers: Option<KeyedList<NamedContainer>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<PatchSpec>,
}

impl_strategic_merge!(DaemonShape {
    strategy => "strategy",
    pod => "pod",
    container => "container",
    name => "name",
    containers => "containers",
    patch => "patch",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonSetStrategy {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub strategy_type: Option<DaemonSetStrategyType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rolling_update: Option<RollingUpdateParams>,
}

impl_strategic_merge!(DaemonSetStrategy {
    strategy_type => "type",
    rolling_update => "rollingUpdate",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DaemonSetStrategyType {
    RollingUpdate,
    OnDelete,
}

impl_scalar_merge!(DaemonSetStrategyType);
