//! Free-form patches applied to the rendered workload object.

use crate::merge::{impl_scalar_merge, impl_strategic_merge};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A patch document applied on top of the generated deployment or daemon set.
///
/// The patch value has no schema known to this crate, so it is merged as a
/// dynamic JSON document: objects are merged key by key, everything else is
/// replaced, and an object meeting a non-object is a schema mismatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchSpec {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub patch_type: Option<PatchType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl_strategic_merge!(PatchSpec {
    patch_type => "type",
    value => "value",
});

/// How a [`PatchSpec`] value is applied to the rendered object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatchType {
    StrategicMerge,
    #[serde(rename = "JSONMerge")]
    JsonMerge,
}

impl_scalar_merge!(PatchType);
