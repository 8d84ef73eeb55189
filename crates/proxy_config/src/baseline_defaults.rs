//! Baseline defaults for the proxy workload.
//!
//! The baseline is a complete, secure-by-default configuration. It never
//! takes part in precedence resolution. Once the configuration sources have
//! been resolved, [`BaselineDefaults::fill_unset`] gives every setting the
//! resolved document still leaves unset its baseline value. Explicit
//! settings are never replaced.
//!
//! The root filesystem of both containers is deliberately left writable: the
//! proxy writes local sockets and log files, and the lifecycle manager
//! creates files during shutdown.
//!
//! # TOML Format
//!
//! Every value can be replaced by an operator. Omitted keys keep their
//! built-in value:
//!
//! ```toml
//! replicas = 2
//! proxy_image = "registry.example.com/envoy:v1.31.0"
//! proxy_memory_request = "1Gi"
//! ```

use crate::{
    errors::{ConfigurationError, ConfigurationResult},
    keyed_list::KeyedList,
    shapes::{
        Capabilities, ContainerShape, DaemonShape, DeploymentShape, DeploymentStrategy,
        KubernetesProvider, NamedContainer, PodShape, ProviderType, ProxyProvider,
        ProxyWorkloadSpec, ResourceRequirements, SeccompProfile, SeccompProfileType,
        SecurityPosture,
    },
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

#[cfg(test)]
#[path = "baseline_defaults_tests.rs"]
mod tests;

pub const DEFAULT_DEPLOYMENT_REPLICAS: u32 = 1;

/// Non-root user and group identity both containers run as.
pub const DEFAULT_RUN_AS_ID: i64 = 65532;

pub const DEFAULT_PROXY_IMAGE: &str = "docker.io/envoyproxy/envoy:distroless-dev";
pub const DEFAULT_PROXY_CPU_REQUEST: &str = "100m";
pub const DEFAULT_PROXY_MEMORY_REQUEST: &str = "512Mi";

pub const DEFAULT_LIFECYCLE_MANAGER_IMAGE: &str = "docker.io/envoyproxy/gateway-dev:latest";
pub const DEFAULT_LIFECYCLE_MANAGER_CPU_REQUEST: &str = "10m";
pub const DEFAULT_LIFECYCLE_MANAGER_MEMORY_REQUEST: &str = "32Mi";

pub const PROXY_CONTAINER_NAME: &str = "envoy";
pub const LIFECYCLE_MANAGER_CONTAINER_NAME: &str = "shutdown-manager";

/// The containers making up a proxy pod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerRole {
    /// The proxy serving traffic.
    ProxyDataPlane,
    /// The helper draining connections before the proxy is stopped.
    LifecycleManager,
}

impl ContainerRole {
    /// Name of the container playing this role in the rendered pod.
    pub fn container_name(&self) -> &'static str {
        match self {
            ContainerRole::ProxyDataPlane => PROXY_CONTAINER_NAME,
            ContainerRole::LifecycleManager => LIFECYCLE_MANAGER_CONTAINER_NAME,
        }
    }

    /// The role of the container with the given name, if it has one.
    pub fn from_container_name(name: &str) -> Option<Self> {
        match name {
            PROXY_CONTAINER_NAME => Some(ContainerRole::ProxyDataPlane),
            LIFECYCLE_MANAGER_CONTAINER_NAME => Some(ContainerRole::LifecycleManager),
            _ => None,
        }
    }
}

impl fmt::Display for ContainerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.container_name())
    }
}

/// Values the baseline shapes are built from.
///
/// `Default` yields the built-in values. Deserializing fills omitted keys
/// from the built-in values too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BaselineDefaults {
    pub replicas: u32,
    pub run_as_user: i64,
    pub run_as_group: i64,
    pub proxy_image: String,
    pub proxy_cpu_request: String,
    pub proxy_memory_request: String,
    pub lifecycle_manager_image: String,
    pub lifecycle_manager_cpu_request: String,
    pub lifecycle_manager_memory_request: String,
}

impl Default for BaselineDefaults {
    fn default() -> Self {
        Self {
            replicas: DEFAULT_DEPLOYMENT_REPLICAS,
            run_as_user: DEFAULT_RUN_AS_ID,
            run_as_group: DEFAULT_RUN_AS_ID,
            proxy_image: DEFAULT_PROXY_IMAGE.to_string(),
            proxy_cpu_request: DEFAULT_PROXY_CPU_REQUEST.to_string(),
            proxy_memory_request: DEFAULT_PROXY_MEMORY_REQUEST.to_string(),
            lifecycle_manager_image: DEFAULT_LIFECYCLE_MANAGER_IMAGE.to_string(),
            lifecycle_manager_cpu_request: DEFAULT_LIFECYCLE_MANAGER_CPU_REQUEST.to_string(),
            lifecycle_manager_memory_request: DEFAULT_LIFECYCLE_MANAGER_MEMORY_REQUEST
                .to_string(),
        }
    }
}

impl BaselineDefaults {
    /// Parses baseline values from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::ParseError`] for malformed TOML, values of
    /// the wrong type, or unknown keys.
    pub fn from_toml_str(content: &str) -> ConfigurationResult<Self> {
        toml::from_str(content).map_err(|e| ConfigurationError::ParseError {
            reason: e.to_string(),
        })
    }

    /// The complete baseline spec, with both workload shapes populated.
    pub fn proxy_spec(&self) -> ProxyWorkloadSpec {
        ProxyWorkloadSpec {
            provider: Some(ProxyProvider::kubernetes_provider(Some(
                KubernetesProvider {
                    envoy_deployment: Some(self.deployment_shape()),
                    envoy_daemon_set: Some(self.daemon_shape()),
                },
            ))),
            ..Default::default()
        }
    }

    pub fn deployment_shape(&self) -> DeploymentShape {
        DeploymentShape {
            replicas: Some(self.replicas),
            strategy: Some(DeploymentStrategy::rolling_update()),
            pod: Some(self.pod_shape()),
            container: Some(self.container_shape(ContainerRole::ProxyDataPlane)),
            ..Default::default()
        }
    }

    pub fn daemon_shape(&self) -> DaemonShape {
        DaemonShape {
            pod: Some(self.pod_shape()),
            container: Some(self.container_shape(ContainerRole::ProxyDataPlane)),
            ..Default::default()
        }
    }

    /// Pod shape with an empty security context; the container posture
    /// carries the actual restrictions.
    pub fn pod_shape(&self) -> PodShape {
        PodShape {
            security_context: Some(SecurityPosture::default()),
            ..Default::default()
        }
    }

    pub fn container_shape(&self, role: ContainerRole) -> ContainerShape {
        let (image, cpu, memory) = match role {
            ContainerRole::ProxyDataPlane => (
                &self.proxy_image,
                &self.proxy_cpu_request,
                &self.proxy_memory_request,
            ),
            ContainerRole::LifecycleManager => (
                &self.lifecycle_manager_image,
                &self.lifecycle_manager_cpu_request,
                &self.lifecycle_manager_memory_request,
            ),
        };

        ContainerShape {
            image: Some(image.clone()),
            resources: Some(ResourceRequirements::with_requests([
                ("cpu", cpu.as_str()),
                ("memory", memory.as_str()),
            ])),
            security_context: Some(self.security_posture()),
            ..Default::default()
        }
    }

    /// Container security posture shared by every role.
    ///
    /// `read_only_root_filesystem` stays unset on purpose.
    pub fn security_posture(&self) -> SecurityPosture {
        SecurityPosture {
            run_as_user: Some(self.run_as_user),
            run_as_group: Some(self.run_as_group),
            run_as_non_root: Some(true),
            capabilities: Some(Capabilities {
                add: None,
                drop: Some(vec!["ALL".to_string()]),
            }),
            allow_privilege_escalation: Some(false),
            privileged: Some(false),
            read_only_root_filesystem: None,
            seccomp_profile: Some(SeccompProfile {
                profile_type: Some(SeccompProfileType::RuntimeDefault),
                localhost_profile: None,
            }),
        }
    }

    /// Returns a copy of `spec` where every setting still unset takes its
    /// baseline value.
    ///
    /// - A missing provider becomes a Kubernetes provider.
    /// - Without a deployment or a daemon set, the baseline deployment is used.
    /// - A present deployment or daemon set gets its unset replica count,
    ///   strategy, pod and container filled.
    /// - A present container gets its unset image, resources and security
    ///   context filled, including overrides of the `envoy` and
    ///   `shutdown-manager` containers in `containers`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnsupportedProvider`] when `spec`
    /// configures a provider other than Kubernetes.
    #[instrument(skip_all)]
    pub fn fill_unset(&self, spec: &ProxyWorkloadSpec) -> ConfigurationResult<ProxyWorkloadSpec> {
        let mut filled = spec.clone();

        let provider = filled.provider.get_or_insert_with(|| {
            debug!("No provider configured, using Kubernetes");
            ProxyProvider::kubernetes_provider(None)
        });
        if let ProviderType::Unrecognized(tag) = &provider.provider_type {
            return Err(ConfigurationError::UnsupportedProvider {
                provider_type: tag.clone(),
            });
        }

        let kubernetes = provider
            .kubernetes
            .get_or_insert_with(KubernetesProvider::default);
        if kubernetes.envoy_deployment.is_none() && kubernetes.envoy_daemon_set.is_none() {
            debug!("No workload shape configured, using baseline deployment");
            kubernetes.envoy_deployment = Some(self.deployment_shape());
        }

        if let Some(deployment) = kubernetes.envoy_deployment.as_mut() {
            self.fill_deployment(deployment);
        }
        if let Some(daemon_set) = kubernetes.envoy_daemon_set.as_mut() {
            self.fill_daemon_set(daemon_set);
        }

        Ok(filled)
    }

    fn fill_deployment(&self, deployment: &mut DeploymentShape) {
        deployment.replicas.get_or_insert(self.replicas);
        deployment
            .strategy
            .get_or_insert_with(DeploymentStrategy::rolling_update);
        deployment.pod.get_or_insert_with(|| self.pod_shape());
        self.fill_container(&mut deployment.container, ContainerRole::ProxyDataPlane);

        if let Some(containers) = deployment.containers.as_mut() {
            self.fill_named_containers(containers);
        }
    }

    fn fill_daemon_set(&self, daemon_set: &mut DaemonShape) {
        daemon_set.pod.get_or_insert_with(|| self.pod_shape());
        self.fill_container(&mut daemon_set.container, ContainerRole::ProxyDataPlane);

        if let Some(containers) = daemon_set.containers.as_mut() {
            self.fill_named_containers(containers);
        }
    }

    fn fill_named_containers(&self, containers: &mut KeyedList<NamedContainer>) {
        for named in containers.iter_mut() {
            if let Some(role) = ContainerRole::from_container_name(&named.name) {
                self.fill_container_fields(&mut named.container, role);
            }
        }
    }

    fn fill_container(&self, container: &mut Option<ContainerShape>, role: ContainerRole) {
        match container.as_mut() {
            Some(container) => self.fill_container_fields(container, role),
            None => {
                debug!("No {} container configured, using baseline", role);
                *container = Some(self.container_shape(role));
            }
        }
    }

    fn fill_container_fields(&self, container: &mut ContainerShape, role: ContainerRole) {
        let baseline = self.container_shape(role);
        if container.image.is_none() {
            container.image = baseline.image;
        }
        if container.resources.is_none() {
            container.resources = baseline.resources;
        }
        if container.security_context.is_none() {
            container.security_context = baseline.security_context;
        }
    }
}

/// Baseline deployment shape for the proxy.
pub fn default_deployment_shape() -> DeploymentShape {
    BaselineDefaults::default().deployment_shape()
}

/// Baseline daemon shape for the proxy.
pub fn default_daemon_shape() -> DaemonShape {
    BaselineDefaults::default().daemon_shape()
}

/// Baseline pod shape for the proxy.
pub fn default_pod_shape() -> PodShape {
    BaselineDefaults::default().pod_shape()
}

/// Baseline container shape for the given role.
pub fn default_container_shape(role: ContainerRole) -> ContainerShape {
    BaselineDefaults::default().container_shape(role)
}

/// The complete baseline spec.
pub fn default_proxy_spec() -> ProxyWorkloadSpec {
    BaselineDefaults::default().proxy_spec()
}
