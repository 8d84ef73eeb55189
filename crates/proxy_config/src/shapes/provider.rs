//! Deployment provider selection.

use crate::errors::{ConfigurationError, ConfigurationResult, MergeResult};
use crate::merge::{impl_strategic_merge, FieldKind, StrategicMerge};
use crate::shapes::{DaemonShape, DeploymentShape};
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;

/// Wire value of the only provider currently supported.
pub const KUBERNETES_PROVIDER: &str = "Kubernetes";

/// Tag selecting the mechanism used to deploy the proxy.
///
/// Tags this crate does not know survive decoding as
/// [`ProviderType::Unrecognized`], so that accessors can reject them
/// explicitly instead of silently falling back to a default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderType {
    Kubernetes,
    Unrecognized(String),
}

impl From<String> for ProviderType {
    fn from(value: String) -> Self {
        if value == KUBERNETES_PROVIDER {
            ProviderType::Kubernetes
        } else {
            ProviderType::Unrecognized(value)
        }
    }
}

impl From<ProviderType> for String {
    fn from(value: ProviderType) -> Self {
        match value {
            ProviderType::Kubernetes => KUBERNETES_PROVIDER.to_string(),
            ProviderType::Unrecognized(tag) => tag,
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::Kubernetes => f.write_str(KUBERNETES_PROVIDER),
            ProviderType::Unrecognized(tag) => f.write_str(tag),
        }
    }
}

// Provider payloads of different types describe unrelated schemas, so two
// differing tags cannot be merged.
impl StrategicMerge for ProviderType {
    const KIND: FieldKind = FieldKind::Scalar;

    fn merge(&self, overlay: &Self) -> MergeResult<Self> {
        if self != overlay {
            return Err(ConfigurationError::schema_mismatch(format!(
                "cannot merge provider '{overlay}' into provider '{self}'"
            )));
        }
        Ok(overlay.clone())
    }
}

/// The provider used to deploy the proxy, with its provider-specific settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyProvider {
    #[serde(rename = "type")]
    pub provider_type: ProviderType,

    /// Only valid when `provider_type` is [`ProviderType::Kubernetes`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubernetes: Option<KubernetesProvider>,
}

impl ProxyProvider {
    /// A Kubernetes provider with the given settings.
    pub fn kubernetes_provider(kubernetes: Option<KubernetesProvider>) -> Self {
        Self {
            provider_type: ProviderType::Kubernetes,
            kubernetes,
        }
    }

    /// The Kubernetes settings of this provider.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnsupportedProvider`] when the provider
    /// is of any other type.
    pub fn kubernetes(&self) -> ConfigurationResult<Option<&KubernetesProvider>> {
        match &self.provider_type {
            ProviderType::Kubernetes => Ok(self.kubernetes.as_ref()),
            ProviderType::Unrecognized(tag) => Err(ConfigurationError::UnsupportedProvider {
                provider_type: tag.clone(),
            }),
        }
    }
}

impl_strategic_merge!(ProxyProvider {
    provider_type => "type",
    kubernetes => "kubernetes",
});

/// Kubernetes-specific settings: the workload shapes to run the proxy as.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesProvider {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub envoy_deployment: Option<DeploymentShape>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub envoy_daemon_set: Option<DaemonShape>,
}

impl_strategic_merge!(KubernetesProvider {
    envoy_deployment => "envoyDeployment",
    envoy_daemon_set => "envoyDaemonSet",
});
