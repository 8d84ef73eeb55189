//! Security posture applied to pods and containers.

use crate::merge::{impl_scalar_merge, impl_strategic_merge};
use serde::{Deserialize, Serialize};

/// Privilege and isolation settings for a pod or a container.
///
/// Mirrors the orchestrator's security context. Every field is optional so an
/// overlay can change one aspect of the posture without restating the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityPosture {
    /// Numeric user identity the process runs as.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_as_user: Option<i64>,

    /// Numeric group identity the process runs as.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_as_group: Option<i64>,

    /// Refuse to start the process as root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_as_non_root: Option<bool>,

    /// Linux capabilities to add or drop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Capabilities>,

    /// Whether a child process may gain more privileges than its parent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_privilege_escalation: Option<bool>,

    /// Run in privileged mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,

    /// Mount the root filesystem read-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only_root_filesystem: Option<bool>,

    /// Seccomp profile applied to the process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seccomp_profile: Option<SeccompProfile>,
}

impl_strategic_merge!(SecurityPosture {
    run_as_user => "runAsUser",
    run_as_group => "runAsGroup",
    run_as_non_root => "runAsNonRoot",
    capabilities => "capabilities",
    allow_privilege_escalation => "allowPrivilegeEscalation",
    privileged => "privileged",
    read_only_root_filesystem => "readOnlyRootFilesystem",
    seccomp_profile => "seccompProfile",
});

/// Linux capabilities added to or dropped from the default set.
///
/// Both lists are unkeyed: an overlay that sets `drop` replaces the whole
/// base list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop: Option<Vec<String>>,
}

impl_strategic_merge!(Capabilities {
    add => "add",
    drop => "drop",
});

/// Seccomp profile selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeccompProfile {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub profile_type: Option<SeccompProfileType>,

    /// Path of a node-local profile, only meaningful for `Localhost`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localhost_profile: Option<String>,
}

impl_strategic_merge!(SeccompProfile {
    profile_type => "type",
    localhost_profile => "localhostProfile",
});

/// Kind of seccomp profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeccompProfileType {
    RuntimeDefault,
    Localhost,
    Unconfined,
}

impl_scalar_merge!(SeccompProfileType);
