//! Tests for root proxy documents.

use super::*;
use crate::errors::ConfigurationError;
use crate::merge::StrategicMerge;
use crate::shapes::{ProviderType, ProxyProvider};

#[test]
fn test_deserialize_full_document() {
    let json = r#"{
        "metadata": { "name": "edge-proxy", "namespace": "gateway-system" },
        "spec": {
            "concurrency": 4,
            "logging": { "level": { "default": "warn", "upstream": "debug" } },
            "extraArgs": ["--disable-hot-restart"],
            "shutdown": { "drainTimeout": "60s" },
            "provider": {
                "type": "Kubernetes",
                "kubernetes": {
                    "envoyDeployment": {
                        "replicas": 0,
                        "strategy": { "type": "RollingUpdate", "rollingUpdate": { "maxSurge": "25%", "maxUnavailable": 1 } },
                        "pod": { "annotations": { "prometheus.io/scrape": "true" } },
                        "container": { "image": "envoy:v1.31" }
                    }
                }
            }
        }
    }"#;

    let config: ProxyConfig = serde_json::from_str(json).expect("Failed to deserialize");

    assert_eq!(config.metadata.name.as_deref(), Some("edge-proxy"));
    assert_eq!(config.spec.concurrency, Some(4));
    assert_eq!(
        config
            .spec
            .logging
            .as_ref()
            .and_then(|l| l.level.as_ref())
            .and_then(|l| l.get("upstream")),
        Some(&LogLevel::Debug)
    );
    let deployment = config
        .spec
        .kubernetes_provider()
        .unwrap()
        .and_then(|k| k.envoy_deployment.as_ref())
        .unwrap();
    assert_eq!(deployment.replicas, Some(0), "Explicit zero must survive decoding");
    let rolling_update = deployment
        .strategy
        .as_ref()
        .and_then(|s| s.rolling_update.as_ref())
        .unwrap();
    assert_eq!(
        rolling_update.max_surge,
        Some(crate::shapes::IntOrPercent::Percent("25%".to_string()))
    );
    assert_eq!(
        rolling_update.max_unavailable,
        Some(crate::shapes::IntOrPercent::Int(1))
    );
}

#[test]
fn test_missing_metadata_and_spec_default_to_empty() {
    let config: ProxyConfig = serde_json::from_str("{}").expect("Failed to deserialize");

    assert_eq!(config, ProxyConfig::default());
}

#[test]
fn test_kubernetes_provider_without_provider() {
    let spec = ProxyWorkloadSpec::default();

    assert_eq!(spec.kubernetes_provider(), Ok(None));
}

#[test]
fn test_kubernetes_provider_with_unrecognized_provider() {
    let spec = ProxyWorkloadSpec {
        provider: Some(ProxyProvider {
            provider_type: ProviderType::Unrecognized("Custom".to_string()),
            kubernetes: None,
        }),
        ..Default::default()
    };

    assert!(matches!(
        spec.kubernetes_provider(),
        Err(ConfigurationError::UnsupportedProvider { .. })
    ));
}

#[test]
fn test_log_levels_merge_per_component() {
    let base = ProxyWorkloadSpec {
        logging: Some(ProxyLogging {
            level: Some([("default".to_string(), LogLevel::Warn)].into()),
        }),
        ..Default::default()
    };
    let overlay = ProxyWorkloadSpec {
        logging: Some(ProxyLogging {
            level: Some([("upstream".to_string(), LogLevel::Debug)].into()),
        }),
        ..Default::default()
    };

    let merged = base.merge(&overlay).unwrap();
    let levels = merged.logging.and_then(|l| l.level).unwrap();

    assert_eq!(levels.get("default"), Some(&LogLevel::Warn));
    assert_eq!(levels.get("upstream"), Some(&LogLevel::Debug));
}

#[test]
fn test_metadata_merges_like_any_other_field() {
    let base = ProxyConfig::from_spec(ProxyWorkloadSpec::default()).with_name("class-proxy");
    let mut overlay = ProxyConfig::default().with_name("gateway-proxy");
    overlay.metadata.namespace = Some("edge".to_string());

    let merged = base.merge(&overlay).unwrap();

    assert_eq!(merged.metadata.name.as_deref(), Some("gateway-proxy"));
    assert_eq!(merged.metadata.namespace.as_deref(), Some("edge"));
}

#[test]
fn test_mismatch_path_starts_at_document_root() {
    let base: ProxyConfig = serde_json::from_value(serde_json::json!({
        "spec": { "provider": { "type": "Kubernetes", "kubernetes": {
            "envoyDeployment": { "patch": { "value": { "spec": { "replicas": 1 } } } }
        } } }
    }))
    .unwrap();
    let overlay: ProxyConfig = serde_json::from_value(serde_json::json!({
        "spec": { "provider": { "type": "Kubernetes", "kubernetes": {
            "envoyDeployment": { "patch": { "value": { "spec": "none" } } }
        } } }
    }))
    .unwrap();

    match base.merge(&overlay) {
        Err(ConfigurationError::SchemaMismatch { path, .. }) => assert_eq!(
            path,
            "spec.provider.kubernetes.envoyDeployment.patch.value.spec"
        ),
        other => panic!("Expected SchemaMismatch, got {:?}", other),
    }
}
