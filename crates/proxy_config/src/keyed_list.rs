//! Sequences of named items merged by key.
//!
//! A [`KeyedList`] serializes as a plain array, but when merged its entries
//! are matched by [`Keyed::key`] rather than by position. Base entries keep
//! their position, overlay entries sharing a key are merged into them, and
//! overlay-only entries are appended in overlay order.

use crate::errors::{ConfigurationError, MergeResult};
use crate::merge::{FieldKind, StrategicMerge};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[cfg(test)]
#[path = "keyed_list_tests.rs"]
mod tests;

/// An item that carries a semantic identifier used to match it across
/// versions of a list.
pub trait Keyed {
    /// The identifier of this item, unique within its list.
    fn key(&self) -> &str;
}

/// A list of [`Keyed`] items.
///
/// # Examples
///
/// ```rust
/// use proxy_config::shapes::EnvVar;
/// use proxy_config::{KeyedList, StrategicMerge};
///
/// let base = KeyedList::from(vec![EnvVar::new("LOG_LEVEL", "info")]);
/// let overlay = KeyedList::from(vec![
///     EnvVar::new("LOG_LEVEL", "debug"),
///     EnvVar::new("REGION", "eu-west-1"),
/// ]);
///
/// let merged = base.merge(&overlay)?;
/// assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["LOG_LEVEL", "REGION"]);
/// assert_eq!(merged.get("LOG_LEVEL").and_then(|v| v.value.as_deref()), Some("debug"));
/// # Ok::<(), proxy_config::ConfigurationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyedList<T>(Vec<T>);

impl<T> KeyedList<T> {
    /// Creates a keyed list from its items, in order.
    pub fn new(items: Vec<T>) -> Self {
        Self(items)
    }

    /// Number of items in the list.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the items in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Iterates mutably over the items in order.
    ///
    /// Changing an item's key can break key uniqueness, which the next merge
    /// reports as a schema mismatch.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.0.iter_mut()
    }

    /// The items as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Consumes the list and returns its items.
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T: Keyed> KeyedList<T> {
    /// Finds the item with the given key.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.iter().find(|item| item.key() == key)
    }

    /// Iterates over the keys in list order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|item| item.key())
    }

    fn ensure_unique_keys(&self) -> MergeResult<()> {
        let mut seen = HashSet::with_capacity(self.0.len());
        for key in self.keys() {
            if !seen.insert(key) {
                return Err(ConfigurationError::schema_mismatch(format!(
                    "duplicate key '{key}' in {}",
                    FieldKind::KeyedList
                )));
            }
        }
        Ok(())
    }
}

impl<T> Default for KeyedList<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> From<Vec<T>> for KeyedList<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T> FromIterator<T> for KeyedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a KeyedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T> IntoIterator for KeyedList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T: Keyed + StrategicMerge + Clone> StrategicMerge for KeyedList<T> {
    const KIND: FieldKind = FieldKind::KeyedList;

    fn merge(&self, overlay: &Self) -> MergeResult<Self> {
        self.ensure_unique_keys()?;
        overlay.ensure_unique_keys()?;

        let mut merged = Vec::with_capacity(self.len() + overlay.len());
        for item in &self.0 {
            let entry = match overlay.get(item.key()) {
                Some(overlay_item) => item.merge(overlay_item),
                None => item.validate().map(|_| item.clone()),
            };
            merged.push(entry.map_err(|e| e.within(&format!("[{}]", item.key())))?);
        }
        for item in overlay.iter().filter(|item| self.get(item.key()).is_none()) {
            item.validate()
                .map_err(|e| e.within(&format!("[{}]", item.key())))?;
            merged.push(item.clone());
        }

        Ok(Self(merged))
    }

    fn validate(&self) -> MergeResult<()> {
        self.ensure_unique_keys()?;
        for item in &self.0 {
            item.validate()
                .map_err(|e| e.within(&format!("[{}]", item.key())))?;
        }
        Ok(())
    }
}
