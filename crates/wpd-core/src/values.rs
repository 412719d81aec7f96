//! Ordered property mappings exchanged with a device

use std::collections::HashMap;

use crate::collection::{Decode, VariantCollection};
use crate::hresult::HResult;
use crate::key::PropertyKey;
use crate::variant::{FromVariant, Variant};

/// What a missing key reads as: the "no value" sentinel
static ABSENT: Variant = Variant::Error(HResult::S_OK);

static NO_ITEMS: VariantCollection = VariantCollection::new();

/// A mapping from [`PropertyKey`] to [`Variant`].
///
/// Keys are unique and the last write wins. Entries keep their first
/// insertion order, which is the order they are encoded and dumped in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyValues {
    entries: Vec<(PropertyKey, Variant)>,
    /// Position of each key in `entries`
    index: HashMap<PropertyKey, usize>,
}

impl PropertyValues {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite, returning the replaced value
    pub fn set(&mut self, key: PropertyKey, value: impl Into<Variant>) -> Option<Variant> {
        let value = value.into();
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// The entry at `key`, if present
    pub fn get(&self, key: &PropertyKey) -> Option<&Variant> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    /// Remove an entry, keeping the order of the rest
    pub fn remove(&mut self, key: &PropertyKey) -> Option<Variant> {
        let pos = self.index.remove(key)?;
        let (_, value) = self.entries.remove(pos);
        for (k, _) in &self.entries[pos..] {
            if let Some(slot) = self.index.get_mut(k) {
                *slot -= 1;
            }
        }
        Some(value)
    }

    pub fn contains_key(&self, key: &PropertyKey) -> bool {
        self.get(key).is_some()
    }

    /// True if `key` is present and not the "no value" sentinel
    pub fn has(&self, key: &PropertyKey) -> bool {
        self.get(key).is_some_and(|v| !v.is_sentinel())
    }

    /// The entry at `key`, or the sentinel when absent
    pub fn value_or_absent(&self, key: &PropertyKey) -> &Variant {
        self.get(key).unwrap_or(&ABSENT)
    }

    /// Decode the entry at `key`. A missing key reads like the sentinel:
    /// the default value, without a diagnostic.
    pub fn read<T: FromVariant>(&self, key: &PropertyKey) -> T {
        T::from_variant(self.value_or_absent(key))
    }

    /// Lazily decode the vector entry at `key`. A missing or non-vector
    /// entry yields an empty sequence.
    pub fn decode<T: FromVariant>(&self, key: &PropertyKey) -> Decode<'_, T> {
        self.value_or_absent(key)
            .get_collection()
            .unwrap_or(&NO_ITEMS)
            .decode()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKey, &Variant)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &PropertyKey> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl<V: Into<Variant>> FromIterator<(PropertyKey, V)> for PropertyValues {
    fn from_iter<I: IntoIterator<Item = (PropertyKey, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (key, value) in iter {
            values.set(key, value);
        }
        values
    }
}

impl IntoIterator for PropertyValues {
    type Item = (PropertyKey, Variant);
    type IntoIter = std::vec::IntoIter<(PropertyKey, Variant)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
