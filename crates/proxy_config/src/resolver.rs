//! Precedence resolution across configuration sources.
//!
//! Up to three documents describe how a proxy workload should run. From
//! lowest to highest precedence:
//!
//! 1. **Template** - a bare spec configured on the controller itself
//! 2. **Class override** - the document attached to the gateway class
//! 3. **Instance override** - the document attached to the gateway
//!
//! They are folded left to right through the structural merge engine.
//! Settings none of them provide stay unset here; baseline defaults are
//! applied later by [`crate::BaselineDefaults::fill_unset`].
//!
//! # Examples
//!
//! ```rust
//! use proxy_config::{resolve, ProxyConfig, ProxyWorkloadSpec};
//!
//! let template = ProxyWorkloadSpec {
//!     concurrency: Some(2),
//!     ..Default::default()
//! };
//! let instance = ProxyConfig::from_spec(ProxyWorkloadSpec {
//!     concurrency: Some(4),
//!     ..Default::default()
//! });
//!
//! let resolved = resolve(Some(template), None, Some(instance))?;
//! assert_eq!(resolved.and_then(|c| c.spec.concurrency), Some(4));
//! # Ok::<(), proxy_config::ConfigurationError>(())
//! ```

use crate::{
    errors::ConfigurationResult,
    merge::StrategicMerge,
    shapes::{ProxyConfig, ProxyWorkloadSpec},
};
use std::fmt;
use tracing::{debug, instrument, warn};

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// The configuration source a layer of the resolution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionSource {
    Template,
    ClassOverride,
    InstanceOverride,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolutionSource::Template => "template",
            ResolutionSource::ClassOverride => "class override",
            ResolutionSource::InstanceOverride => "instance override",
        };
        f.write_str(name)
    }
}

/// Resolves the effective proxy configuration from its sources.
///
/// This is a stateless component. Concurrent resolutions need no
/// coordination since each call only reads its own inputs.
#[derive(Debug, Clone, Default)]
pub struct ProxyConfigResolver {}

impl ProxyConfigResolver {
    /// Creates a new resolver.
    pub fn new() -> Self {
        Self {}
    }

    /// Resolves the template, class override and instance override into a
    /// single document.
    ///
    /// Absent inputs are skipped. The first present input seeds the result
    /// and is returned as is when no other input is present. Every input is
    /// checked for duplicate keys in its keyed lists, including a lone one. The template
    /// becomes an anonymous document without metadata.
    ///
    /// Returns `None` only when all three inputs are absent.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigurationError::SchemaMismatch`] unchanged from
    /// the merge engine when two layers have incompatible shapes or a layer
    /// repeats a key in a keyed list.
    #[instrument(
        skip_all,
        fields(
            template = template.is_some(),
            class_override = class_override.is_some(),
            instance_override = instance_override.is_some()
        )
    )]
    pub fn resolve(
        &self,
        template: Option<ProxyWorkloadSpec>,
        class_override: Option<ProxyConfig>,
        instance_override: Option<ProxyConfig>,
    ) -> ConfigurationResult<Option<ProxyConfig>> {
        let layers = [
            (
                ResolutionSource::Template,
                template.map(ProxyConfig::from_spec),
            ),
            (ResolutionSource::ClassOverride, class_override),
            (ResolutionSource::InstanceOverride, instance_override),
        ];

        let mut result: Option<ProxyConfig> = None;
        for (source, layer) in layers {
            let Some(layer) = layer else {
                debug!("No {} configuration provided", source);
                continue;
            };

            result = Some(match result {
                None => {
                    debug!("Seeding resolution with {} configuration", source);
                    layer.validate().map_err(|e| {
                        warn!("Invalid {} configuration: {}", source, e);
                        e
                    })?;
                    layer
                }
                Some(current) => {
                    debug!("Merging {} configuration", source);
                    current.merge(&layer).map_err(|e| {
                        warn!("Failed to merge {} configuration: {}", source, e);
                        e
                    })?
                }
            });
        }

        if result.is_none() {
            debug!("No proxy configuration sources present");
        }

        Ok(result)
    }
}

/// Resolves the three configuration sources with a default resolver.
///
/// See [`ProxyConfigResolver::resolve`].
///
/// # Errors
///
/// Returns [`crate::ConfigurationError::SchemaMismatch`] when two layers have
/// incompatible shapes.
pub fn resolve(
    template: Option<ProxyWorkloadSpec>,
    class_override: Option<ProxyConfig>,
    instance_override: Option<ProxyConfig>,
) -> ConfigurationResult<Option<ProxyConfig>> {
    ProxyConfigResolver::new().resolve(template, class_override, instance_override)
}
