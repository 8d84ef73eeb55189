//! Document shapes describing a proxy workload.
//!
//! Every type here implements [`crate::StrategicMerge`], so any two
//! documents of the same shape can be combined by the merge engine.

pub mod container;
pub mod daemon_set;
pub mod deployment;
pub mod patch;
pub mod pod;
pub mod provider;
pub mod proxy;
pub mod security;

// Re-export all types for convenient access
pub use container::{
    ContainerShape, EnvVar, NamedContainer, ResourceList, ResourceRequirements, VolumeMount,
};
pub use daemon_set::{DaemonSetStrategy, DaemonSetStrategyType, DaemonShape};
pub use deployment::{
    DeploymentShape, DeploymentStrategy, DeploymentStrategyType, IntOrPercent,
    RollingUpdateParams,
};
pub use patch::{PatchSpec, PatchType};
pub use pod::{
    ConfigMapVolumeSource, EmptyDirVolumeSource, LocalObjectReference, PodShape,
    SecretVolumeSource, Toleration, Volume,
};
pub use provider::{KubernetesProvider, ProviderType, ProxyProvider, KUBERNETES_PROVIDER};
pub use proxy::{LogLevel, ObjectMeta, ProxyConfig, ProxyLogging, ProxyWorkloadSpec, ShutdownConfig};
pub use security::{Capabilities, SeccompProfile, SeccompProfileType, SecurityPosture};
