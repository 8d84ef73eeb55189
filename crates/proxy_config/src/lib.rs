//! Proxy workload configuration overlay.
//!
//! Up to three partial documents describe how a proxy data-plane workload
//! should run: a template, an override attached to the gateway class and an
//! override attached to the gateway itself. This crate combines them into one
//! resolved document and, as a separate step, fills whatever is still unset
//! with secure baseline defaults.
//!
//! - [`merge`] - the structural merge engine and its field kinds
//! - [`resolver`] - precedence resolution across the three sources
//! - [`baseline_defaults`] - baseline shapes and gap filling
//! - [`shapes`] - the document types
//!
//! Everything here is pure: no I/O, no shared state. Decoding documents and
//! turning the result into orchestration objects is left to the caller.
//!
//! # Examples
//!
//! ```rust
//! use proxy_config::{resolve, BaselineDefaults, ProxyConfig, ProxyWorkloadSpec};
//!
//! let class_override: ProxyConfig = serde_json::from_str(r#"{
//!     "metadata": { "name": "class-proxy" },
//!     "spec": {
//!         "provider": {
//!             "type": "Kubernetes",
//!             "kubernetes": { "envoyDeployment": { "replicas": 3 } }
//!         }
//!     }
//! }"#)?;
//!
//! let resolved = resolve(None, Some(class_override), None)?.unwrap_or_default();
//! let filled = BaselineDefaults::default().fill_unset(&resolved.spec)?;
//!
//! let deployment = filled
//!     .kubernetes_provider()?
//!     .and_then(|k| k.envoy_deployment.as_ref())
//!     .cloned()
//!     .unwrap_or_default();
//! assert_eq!(deployment.replicas, Some(3));
//! assert!(deployment.container.and_then(|c| c.image).is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod baseline_defaults;
pub mod errors;
pub mod keyed_list;
pub mod merge;
pub mod resolver;
pub mod shapes;


// Re-export for convenient access
pub use baseline_defaults::{
    default_container_shape, default_daemon_shape, default_deployment_shape, default_pod_shape,
    default_proxy_spec, BaselineDefaults, ContainerRole,
};
pub use errors::{ConfigurationError, ConfigurationResult, MergeResult};
pub use keyed_list::{Keyed, KeyedList};
pub use merge::{FieldKind, StrategicMerge};
pub use resolver::{resolve, ProxyConfigResolver, ResolutionSource};
pub use shapes::{
    ContainerShape, DaemonShape, DeploymentShape, PodShape, ProxyConfig, ProxyWorkloadSpec,
    SecurityPosture,
};
