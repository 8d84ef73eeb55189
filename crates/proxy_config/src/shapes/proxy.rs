//! Root proxy configuration documents.

use crate::errors::ConfigurationResult;
use crate::merge::{impl_scalar_merge, impl_strategic_merge};
use crate::shapes::{KubernetesProvider, ProxyProvider};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(test)]
#[path = "proxy_tests.rs"]
mod tests;

/// How to run a proxy data-plane workload.
///
/// This is the document every configuration source provides, possibly only
/// partially. Fields left unset fall through to lower-precedence sources and,
/// after resolution, to the baseline defaults.
///
/// # Examples
///
/// ```rust
/// use proxy_config::ProxyWorkloadSpec;
///
/// let spec: ProxyWorkloadSpec = serde_json::from_str(r#"{
///     "provider": {
///         "type": "Kubernetes",
///         "kubernetes": { "envoyDeployment": { "replicas": 3 } }
///     }
/// }"#)?;
///
/// let deployment = spec.kubernetes_provider()?.and_then(|k| k.envoy_deployment.as_ref());
/// assert_eq!(deployment.and_then(|d| d.replicas), Some(3));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyWorkloadSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProxyProvider>,

    /// Number of worker threads of each proxy instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<ProxyLogging>,

    /// Extra arguments passed to the proxy process, replaced wholesale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_args: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutdown: Option<ShutdownConfig>,

    /// Serve all gateways of a class from a single proxy fleet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_gateways: Option<bool>,
}

impl ProxyWorkloadSpec {
    /// The Kubernetes settings of the configured provider, if any.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigurationError::UnsupportedProvider`] when a
    /// provider of another type is configured.
    pub fn kubernetes_provider(&self) -> ConfigurationResult<Option<&KubernetesProvider>> {
        match &self.provider {
            Some(provider) => provider.kubernetes(),
            None => Ok(None),
        }
    }
}

impl_strategic_merge!(ProxyWorkloadSpec {
    provider => "provider",
    concurrency => "concurrency",
    logging => "logging",
    extra_args => "extraArgs",
    shutdown => "shutdown",
    merge_gateways => "mergeGateways",
});

/// Log levels of the proxy, per component.
///
/// The `default` component applies to everything not listed explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyLogging {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<BTreeMap<String, LogLevel>>,
}

impl_strategic_merge!(ProxyLogging {
    level => "level",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl_scalar_merge!(LogLevel);

/// Graceful shutdown settings, durations in orchestrator notation (`"60s"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutdownConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drain_timeout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_drain_duration: Option<String>,
}

impl_strategic_merge!(ShutdownConfig {
    drain_timeout => "drainTimeout",
    min_drain_duration => "minDrainDuration",
});

/// Identity of a configuration object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

impl_strategic_merge!(ObjectMeta {
    name => "name",
    namespace => "namespace",
    labels => "labels",
    annotations => "annotations",
});

/// A named proxy configuration document, as attached to a gateway class or
/// a gateway, and as produced by resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfig {
    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: ProxyWorkloadSpec,
}

impl ProxyConfig {
    /// Wraps a bare spec, such as a template, in an anonymous document.
    pub fn from_spec(spec: ProxyWorkloadSpec) -> Self {
        Self {
            metadata: ObjectMeta::default(),
            spec,
        }
    }

    /// Sets the object name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.metadata.name = Some(name.into());
        self
    }
}

impl_strategic_merge!(ProxyConfig {
    metadata => "metadata",
    spec => "spec",
});
