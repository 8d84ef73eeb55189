//! Structural merge engine.
//!
//! Two values of the same document type are combined field by field. What
//! happens at each field is decided by the field's [`FieldKind`]:
//!
//! | Kind          | Rule                                                        |
//! |---------------|-------------------------------------------------------------|
//! | Scalar        | an explicitly set overlay value replaces the base value     |
//! | Composite     | recurse field by field                                      |
//! | Mapping       | union of keys, shared keys merged recursively               |
//! | Keyed list    | entries matched by key, overlay-only entries appended       |
//! | Unkeyed list  | overlay replaces base wholesale                             |
//! | Dynamic       | JSON objects deep-merged, anything else replaced            |
//!
//! Optional fields (`Option<T>`) sit on top of every kind: an absent overlay
//! keeps the base, an absent base takes the overlay, and only when both are
//! present does the rule of `T` apply. Absence is therefore never turned into
//! a zero value.
//!
//! Document structs don't hand-write their merge. They list their fields in
//! [`impl_strategic_merge!`] and the macro generates the traversal, so the
//! compiler rejects any struct whose field list falls out of date.
//!
//! # Examples
//!
//! ```rust
//! use proxy_config::merge::{merge, StrategicMerge};
//! use std::collections::BTreeMap;
//!
//! let base: BTreeMap<String, String> = [("cpu".to_string(), "100m".to_string())].into();
//! let overlay: BTreeMap<String, String> = [("memory".to_string(), "64Mi".to_string())].into();
//!
//! let merged = merge(&base, &overlay)?;
//! assert_eq!(merged.len(), 2);
//! # Ok::<(), proxy_config::ConfigurationError>(())
//! ```

use crate::errors::{ConfigurationError, MergeResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;

/// The merge behaviour a type exhibits when it appears as a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Strings, numbers, booleans and enums.
    Scalar,
    /// Structs merged field by field.
    Composite,
    /// Key to value maps.
    Mapping,
    /// Sequences of named items.
    KeyedList,
    /// Sequences without an identifying key.
    UnkeyedList,
    /// Free-form JSON documents.
    Dynamic,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Scalar => "scalar",
            FieldKind::Composite => "composite",
            FieldKind::Mapping => "mapping",
            FieldKind::KeyedList => "keyed list",
            FieldKind::UnkeyedList => "unkeyed list",
            FieldKind::Dynamic => "dynamic",
        };
        f.write_str(name)
    }
}

/// Types that can be structurally merged with another value of the same type.
///
/// `merge` never mutates either input. The result is a fresh value in which
/// the overlay takes precedence over the base wherever the overlay says
/// something.
pub trait StrategicMerge: Sized {
    /// How this type behaves when merged as a field.
    const KIND: FieldKind;

    /// Merges `overlay` on top of `self`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::SchemaMismatch`] when the two values have
    /// incompatible shapes at some position.
    fn merge(&self, overlay: &Self) -> MergeResult<Self>;

    /// Checks the structure a merge relies on, such as unique keys in keyed
    /// lists, without merging anything.
    ///
    /// A merge runs this on any value it takes over without merging, so a
    /// malformed value is rejected whether or not the other side has it set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::SchemaMismatch`] at the offending path.
    fn validate(&self) -> MergeResult<()> {
        Ok(())
    }
}

/// Merges `overlay` on top of `base`.
///
/// Convenience wrapper around [`StrategicMerge::merge`].
///
/// # Errors
///
/// Returns [`ConfigurationError::SchemaMismatch`] when `base` and `overlay`
/// are not of compatible shape.
pub fn merge<T: StrategicMerge>(base: &T, overlay: &T) -> MergeResult<T> {
    base.merge(overlay)
}

/// Implements [`StrategicMerge`] for leaf types where the overlay always wins.
macro_rules! impl_scalar_merge {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::merge::StrategicMerge for $ty {
                const KIND: $crate::merge::FieldKind = $crate::merge::FieldKind::Scalar;

                fn merge(&self, overlay: &Self) -> $crate::errors::MergeResult<Self> {
                    Ok(::std::clone::Clone::clone(overlay))
                }
            }
        )+
    };
}
pub(crate) use impl_scalar_merge;

/// Implements [`StrategicMerge`] for a document struct.
///
/// Every field is listed with its wire name, which is used to build the path
/// reported in schema mismatch errors. The generated code constructs `Self`
/// with a struct literal, so a missing or extra field is a compile error.
macro_rules! impl_strategic_merge {
    ($ty:ty { $($field:ident => $wire:literal),+ $(,)? }) => {
        impl $crate::merge::StrategicMerge for $ty {
            const KIND: $crate::merge::FieldKind = $crate::merge::FieldKind::Composite;

            fn merge(&self, overlay: &Self) -> $crate::errors::MergeResult<Self> {
                Ok(Self {
                    $(
                        $field: $crate::merge::StrategicMerge::merge(&self.$field, &overlay.$field)
                            .map_err(|e| e.within($wire))?,
                    )+
                })
            }

            fn validate(&self) -> $crate::errors::MergeResult<()> {
                $(
                    $crate::merge::StrategicMerge::validate(&self.$field)
                        .map_err(|e| e.within($wire))?;
                )+
                Ok(())
            }
        }
    };
}
pub(crate) use impl_strategic_merge;

impl_scalar_merge!(String, bool, i32, i64, u32);

impl<T: StrategicMerge + Clone> StrategicMerge for Option<T> {
    const KIND: FieldKind = T::KIND;

    fn merge(&self, overlay: &Self) -> MergeResult<Self> {
        match (self, overlay) {
            (None, None) => Ok(None),
            (Some(base), None) => {
                base.validate()?;
                Ok(self.clone())
            }
            (None, Some(value)) => {
                value.validate()?;
                Ok(overlay.clone())
            }
            (Some(base), Some(overlay)) => base.merge(overlay).map(Some),
        }
    }

    fn validate(&self) -> MergeResult<()> {
        match self {
            Some(value) => value.validate(),
            None => Ok(()),
        }
    }
}

impl<T: Clone> StrategicMerge for Vec<T> {
    const KIND: FieldKind = FieldKind::UnkeyedList;

    fn merge(&self, overlay: &Self) -> MergeResult<Self> {
        Ok(overlay.clone())
    }
}

impl<V: StrategicMerge + Clone> StrategicMerge for BTreeMap<String, V> {
    const KIND: FieldKind = FieldKind::Mapping;

    fn merge(&self, overlay: &Self) -> MergeResult<Self> {
        let mut merged = BTreeMap::new();
        for (key, base_value) in self {
            let value = match overlay.get(key) {
                Some(overlay_value) => base_value.merge(overlay_value),
                None => base_value.validate().map(|_| base_value.clone()),
            };
            merged.insert(key.clone(), value.map_err(|e| e.within(&format!("[{key}]")))?);
        }
        for (key, overlay_value) in overlay {
            if self.contains_key(key) {
                continue;
            }
            overlay_value
                .validate()
                .map_err(|e| e.within(&format!("[{key}]")))?;
            merged.insert(key.clone(), overlay_value.clone());
        }
        Ok(merged)
    }

    fn validate(&self) -> MergeResult<()> {
        for (key, value) in self {
            value
                .validate()
                .map_err(|e| e.within(&format!("[{key}]")))?;
        }
        Ok(())
    }
}

impl StrategicMerge for Value {
    const KIND: FieldKind = FieldKind::Dynamic;

    fn merge(&self, overlay: &Self) -> MergeResult<Self> {
        match (self, overlay) {
            (_, Value::Null) => Ok(self.clone()),
            (Value::Null, _) => Ok(overlay.clone()),
            (Value::Object(base), Value::Object(overlay)) => {
                let mut merged = base.clone();
                for (key, overlay_value) in overlay {
                    match base.get(key) {
                        Some(base_value) => {
                            let value = base_value
                                .merge(overlay_value)
                                .map_err(|e| e.within(key))?;
                            merged.insert(key.clone(), value);
                        }
                        None if overlay_value.is_null() => {}
                        None => {
                            merged.insert(key.clone(), overlay_value.clone());
                        }
                    }
                }
                Ok(Value::Object(merged))
            }
            (Value::Object(_), _) | (_, Value::Object(_)) => {
                Err(ConfigurationError::schema_mismatch(format!(
                    "cannot merge {} with {}",
                    value_kind(self),
                    value_kind(overlay)
                )))
            }
            _ => Ok(overlay.clone()),
        }
    }
}

/// Classifies a JSON value by the field kind it would have in a typed schema.
fn value_kind(value: &Value) -> FieldKind {
    match value {
        Value::Object(_) => FieldKind::Mapping,
        Value::Array(_) => FieldKind::UnkeyedList,
        _ => FieldKind::Scalar,
    }
}
