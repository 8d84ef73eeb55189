//! Tests for the structural merge engine.

use super::*;
use crate::shapes::{
    Capabilities, ContainerShape, ResourceRequirements, SeccompProfile, SeccompProfileType,
    SecurityPosture,
};
use serde_json::json;

// ============================================================================
// Test Helpers
// ============================================================================

fn resource_list(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn hardened_posture() -> SecurityPosture {
    SecurityPosture {
        run_as_user: Some(65532),
        run_as_non_root: Some(true),
        capabilities: Some(Capabilities {
            add: None,
            drop: Some(vec!["ALL".to_string()]),
        }),
        seccomp_profile: Some(SeccompProfile {
            profile_type: Some(SeccompProfileType::RuntimeDefault),
            localhost_profile: None,
        }),
        ..Default::default()
    }
}

// ============================================================================
// Field Kind Tests
// ============================================================================

#[test]
fn test_field_kinds_reported_per_type() {
    assert_eq!(<String as StrategicMerge>::KIND, FieldKind::Scalar);
    assert_eq!(<bool as StrategicMerge>::KIND, FieldKind::Scalar);
    assert_eq!(<Vec<String> as StrategicMerge>::KIND, FieldKind::UnkeyedList);
    assert_eq!(
        <BTreeMap<String, String> as StrategicMerge>::KIND,
        FieldKind::Mapping
    );
    assert_eq!(<Value as StrategicMerge>::KIND, FieldKind::Dynamic);
    assert_eq!(<SecurityPosture as StrategicMerge>::KIND, FieldKind::Composite);
}

#[test]
fn test_optional_field_reports_inner_kind() {
    assert_eq!(<Option<u32> as StrategicMerge>::KIND, FieldKind::Scalar);
    assert_eq!(
        <Option<SecurityPosture> as StrategicMerge>::KIND,
        FieldKind::Composite
    );
}

#[test]
fn test_field_kind_display() {
    assert_eq!(FieldKind::KeyedList.to_string(), "keyed list");
    assert_eq!(FieldKind::Mapping.to_string(), "mapping");
}

// ============================================================================
// Scalar and Optional Tests
// ============================================================================

#[test]
fn test_scalar_overlay_wins() {
    let merged = merge(&"base".to_string(), &"overlay".to_string()).unwrap();
    assert_eq!(merged, "overlay");
}

#[test]
fn test_optional_absent_overlay_keeps_base() {
    let merged = merge(&Some(3u32), &None).unwrap();
    assert_eq!(merged, Some(3), "Absent overlay must not clear the base");
}

#[test]
fn test_optional_absent_base_takes_overlay() {
    let merged = merge(&None, &Some(false)).unwrap();
    assert_eq!(merged, Some(false));
}

#[test]
fn test_optional_explicit_zero_overrides() {
    let merged = merge(&Some(2u32), &Some(0)).unwrap();
    assert_eq!(
        merged,
        Some(0),
        "An explicit zero is a setting, not an absence"
    );
}

#[test]
fn test_optional_both_absent_stays_absent() {
    let merged: Option<u32> = merge(&None, &None).unwrap();
    assert_eq!(merged, None);
}

// ============================================================================
// Mapping Tests
// ============================================================================

#[test]
fn test_mapping_union() {
    let base = resource_list(&[("cpu", "100m")]);
    let overlay = resource_list(&[("memory", "64Mi")]);

    let merged = merge(&base, &overlay).unwrap();

    assert_eq!(merged, resource_list(&[("cpu", "100m"), ("memory", "64Mi")]));
}

#[test]
fn test_mapping_shared_key_takes_overlay() {
    let base = resource_list(&[("cpu", "100m"), ("memory", "512Mi")]);
    let overlay = resource_list(&[("cpu", "250m")]);

    let merged = merge(&base, &overlay).unwrap();

    assert_eq!(merged.get("cpu").map(String::as_str), Some("250m"));
    assert_eq!(merged.get("memory").map(String::as_str), Some("512Mi"));
}

#[test]
fn test_mapping_values_merge_structurally() {
    let base: BTreeMap<String, SecurityPosture> =
        [("envoy".to_string(), hardened_posture())].into();
    let overlay: BTreeMap<String, SecurityPosture> = [(
        "envoy".to_string(),
        SecurityPosture {
            run_as_user: Some(1000),
            ..Default::default()
        },
    )]
    .into();

    let merged = merge(&base, &overlay).unwrap();
    let posture = &merged["envoy"];

    assert_eq!(posture.run_as_user, Some(1000));
    assert_eq!(
        posture.run_as_non_root,
        Some(true),
        "Unrelated base fields must survive"
    );
}

// ============================================================================
// Unkeyed List Tests
// ============================================================================

#[test]
fn test_unkeyed_list_replaced_wholesale() {
    let base = vec!["--log-format=json".to_string(), "--drain".to_string()];
    let overlay = vec!["--component-log-level=upstream:debug".to_string()];

    let merged = merge(&base, &overlay).unwrap();

    assert_eq!(merged, overlay, "Unkeyed lists must not be concatenated");
}

#[test]
fn test_unkeyed_list_absent_overlay_keeps_base() {
    let base = Some(vec!["ALL".to_string()]);

    let merged = merge(&base, &None).unwrap();

    assert_eq!(merged, base);
}

// ============================================================================
// Composite Tests
// ============================================================================

#[test]
fn test_composite_recurses_field_by_field() {
    let overlay = SecurityPosture {
        read_only_root_filesystem: Some(true),
        capabilities: Some(Capabilities {
            add: Some(vec!["NET_BIND_SERVICE".to_string()]),
            drop: None,
        }),
        ..Default::default()
    };

    let merged = merge(&hardened_posture(), &overlay).unwrap();

    assert_eq!(merged.read_only_root_filesystem, Some(true));
    assert_eq!(merged.run_as_user, Some(65532));
    let capabilities = merged.capabilities.unwrap();
    assert_eq!(capabilities.add, Some(vec!["NET_BIND_SERVICE".to_string()]));
    assert_eq!(
        capabilities.drop,
        Some(vec!["ALL".to_string()]),
        "Capabilities must merge per field, not be replaced"
    );
}

#[test]
fn test_composite_absent_on_one_side_taken_verbatim() {
    let base = ContainerShape {
        security_context: None,
        ..Default::default()
    };
    let overlay = ContainerShape {
        security_context: Some(hardened_posture()),
        ..Default::default()
    };

    let merged = merge(&base, &overlay).unwrap();

    assert_eq!(merged.security_context, Some(hardened_posture()));
}

#[test]
fn test_merge_with_empty_overlay_is_identity() {
    let base = ContainerShape {
        image: Some("envoy:v1".to_string()),
        resources: Some(ResourceRequirements::with_requests([("cpu", "100m")])),
        security_context: Some(hardened_posture()),
        args: Some(vec!["--concurrency=2".to_string()]),
        ..Default::default()
    };

    let merged = merge(&base, &ContainerShape::default()).unwrap();

    assert_eq!(merged, base);
}

#[test]
fn test_merge_is_idempotent_for_repeated_overlay() {
    let base = ContainerShape {
        image: Some("envoy:v1".to_string()),
        resources: Some(ResourceRequirements::with_requests([("cpu", "100m")])),
        ..Default::default()
    };
    let overlay = ContainerShape {
        image: Some("envoy:v2".to_string()),
        resources: Some(ResourceRequirements::with_requests([("memory", "64Mi")])),
        ..Default::default()
    };

    let once = merge(&base, &overlay).unwrap();
    let twice = merge(&once, &overlay).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_merge_leaves_inputs_untouched() {
    let base = hardened_posture();
    let overlay = SecurityPosture {
        run_as_user: Some(1000),
        ..Default::default()
    };
    let base_before = base.clone();
    let overlay_before = overlay.clone();

    let _ = merge(&base, &overlay).unwrap();

    assert_eq!(base, base_before);
    assert_eq!(overlay, overlay_before);
}

// ============================================================================
// Dynamic Value Tests
// ============================================================================

#[test]
fn test_dynamic_objects_deep_merge() {
    let base = json!({
        "spec": { "template": { "spec": { "hostNetwork": false, "dnsPolicy": "ClusterFirst" } } }
    });
    let overlay = json!({
        "spec": { "template": { "spec": { "hostNetwork": true } } }
    });

    let merged = merge(&base, &overlay).unwrap();

    assert_eq!(
        merged,
        json!({
            "spec": { "template": { "spec": { "hostNetwork": true, "dnsPolicy": "ClusterFirst" } } }
        })
    );
}

#[test]
fn test_dynamic_null_overlay_keeps_base() {
    let base = json!({ "replicas": 2 });

    assert_eq!(merge(&base, &Value::Null).unwrap(), base);
    assert_eq!(
        merge(&base, &json!({ "replicas": null })).unwrap(),
        base,
        "A null member must not erase the base member"
    );
}

#[test]
fn test_dynamic_null_member_not_added() {
    let merged = merge(&json!({ "a": 1 }), &json!({ "b": null })).unwrap();
    assert_eq!(merged, json!({ "a": 1 }));
}

#[test]
fn test_dynamic_arrays_replaced() {
    let merged = merge(&json!({ "args": ["a", "b"] }), &json!({ "args": ["c"] })).unwrap();
    assert_eq!(merged, json!({ "args": ["c"] }));
}

#[test]
fn test_dynamic_scalars_replaced() {
    let merged = merge(&json!("RollingUpdate"), &json!(3)).unwrap();
    assert_eq!(merged, json!(3));
}

#[test]
fn test_dynamic_mapping_vs_scalar_is_schema_mismatch() {
    let base = json!({ "spec": { "strategy": { "type": "Recreate" } } });
    let overlay = json!({ "spec": { "strategy": "Recreate" } });

    let result = merge(&base, &overlay);

    assert_eq!(
        result,
        Err(ConfigurationError::SchemaMismatch {
            path: "spec.strategy".to_string(),
            reason: "cannot merge mapping with scalar".to_string(),
        })
    );
}

#[test]
fn test_dynamic_list_vs_mapping_is_schema_mismatch() {
    let result = merge(&json!(["a"]), &json!({ "a": 1 }));

    match result {
        Err(ConfigurationError::SchemaMismatch { path, reason }) => {
            assert!(path.is_empty(), "Top-level mismatch has no path");
            assert_eq!(reason, "cannot merge unkeyed list with mapping");
        }
        other => panic!("Expected SchemaMismatch, got {:?}", other),
    }
}

#[test]
fn test_dynamic_list_and_scalar_replace_each_other() {
    // Only a mapping on one side is a shape conflict
    assert_eq!(
        merge(&json!({ "args": ["a", "b"] }), &json!({ "args": "a" })).unwrap(),
        json!({ "args": "a" })
    );
    assert_eq!(
        merge(&json!({ "args": "a" }), &json!({ "args": ["a", "b"] })).unwrap(),
        json!({ "args": ["a", "b"] })
    );
}

#[test]
fn test_mapping_value_taken_from_overlay_is_validated() {
    use crate::shapes::EnvVar;
    use crate::KeyedList;

    let base: BTreeMap<String, KeyedList<EnvVar>> = BTreeMap::new();
    let overlay: BTreeMap<String, KeyedList<EnvVar>> = [(
        "envoy".to_string(),
        KeyedList::from(vec![EnvVar::new("A", "1"), EnvVar::new("A", "2")]),
    )]
    .into();

    match merge(&base, &overlay) {
        Err(ConfigurationError::SchemaMismatch { path, .. }) => assert_eq!(path, "[envoy]"),
        other => panic!("Expected SchemaMismatch, got {:?}", other),
    }
}

#[test]
fn test_composite_field_taken_as_is_is_validated() {
    use crate::shapes::EnvVar;
    use crate::KeyedList;

    let overlay = ContainerShape {
        env: Some(KeyedList::from(vec![EnvVar::new("A", "1"), EnvVar::new("A", "2")])),
        ..Default::default()
    };

    match merge(&Some(ContainerShape::default()), &Some(overlay.clone())) {
        Err(ConfigurationError::SchemaMismatch { path, .. }) => assert_eq!(path, "env"),
        other => panic!("Expected SchemaMismatch, got {:?}", other),
    }
    assert!(
        merge(&None, &Some(overlay)).is_err(),
        "An absent base must not let duplicates through"
    );
}

// ============================================================================
// Error Path Tests
// ============================================================================

#[test]
fn test_mismatch_path_uses_wire_names() {
    use crate::shapes::{PatchSpec, PatchType};

    let base = PatchSpec {
        patch_type: Some(PatchType::StrategicMerge),
        value: Some(json!({ "metadata": { "labels": { "tier": "edge" } } })),
    };
    let overlay = PatchSpec {
        patch_type: None,
        value: Some(json!({ "metadata": { "labels": "edge" } })),
    };

    match merge(&base, &overlay) {
        Err(ConfigurationError::SchemaMismatch { path, .. }) => {
            assert_eq!(path, "value.metadata.labels");
        }
        other => panic!("Expected SchemaMismatch, got {:?}", other),
    }
}
