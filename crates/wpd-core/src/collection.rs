//! Ordered collections of variants carried inside a VT_VECTOR value

use std::marker::PhantomData;

use crate::variant::{FromVariant, Variant};
use crate::vartype::{Tag, VarType};

/// An ordered run of variants.
///
/// Built with `push` or `collect()`, then wrapped in [`Variant::Vector`].
/// Decoding borrows the collection and never mutates it, so a decode can be
/// restarted any number of times.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariantCollection {
    items: Vec<Variant>,
}

impl VariantCollection {
    /// Create an empty collection
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create an empty collection with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Append an element; the collection owns it from here on
    pub fn push(&mut self, value: impl Into<Variant>) {
        self.items.push(value.into());
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<&Variant> {
        self.items.get(index)
    }

    /// Iterate elements in order
    pub fn iter(&self) -> std::slice::Iter<'_, Variant> {
        self.items.iter()
    }

    /// The shared scalar tag of every element, if there is one
    pub fn element_type(&self) -> Option<VarType> {
        let mut tags = self.items.iter().map(Variant::tag);
        let first = match tags.next()? {
            Tag::Scalar(vt) => vt,
            _ => return None,
        };
        tags.all(|tag| tag == Tag::Scalar(first)).then_some(first)
    }

    /// Lazily decode every element as `T`
    pub fn decode<T: FromVariant>(&self) -> Decode<'_, T> {
        Decode {
            items: &self.items,
            index: 0,
            _marker: PhantomData,
        }
    }

    /// Decode every element as text
    pub fn strings(&self) -> Decode<'_, Option<String>> {
        self.decode()
    }

    /// Decode every element as a 32-bit id
    pub fn u32s(&self) -> Decode<'_, u32> {
        self.decode()
    }
}

impl FromIterator<Variant> for VariantCollection {
    fn from_iter<I: IntoIterator<Item = Variant>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a VariantCollection {
    type Item = &'a Variant;
    type IntoIter = std::slice::Iter<'a, Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Index-driven decoder over a borrowed collection.
///
/// Yields exactly `len()` elements, each decoded with the same tag
/// matching and coercion rules as the [`Variant`] accessors.
#[derive(Debug)]
pub struct Decode<'a, T> {
    items: &'a [Variant],
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Decode<'_, T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items,
            index: self.index,
            _marker: PhantomData,
        }
    }
}

impl<T: FromVariant> Iterator for Decode<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let value = self.items.get(self.index)?;
        self.index += 1;
        Some(T::from_variant(value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<T: FromVariant> ExactSizeIterator for Decode<'_, T> {}

impl<T: FromVariant> std::iter::FusedIterator for Decode<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;

    fn words() -> VariantCollection {
        ["alpha", "beta", "gamma"].into_iter().map(Variant::from).collect()
    }

    #[test]
    fn test_decode_strings() {
        let items = words();
        let decoded: Vec<Option<String>> = items.strings().collect();
        assert_eq!(
            decoded,
            vec![
                Some("alpha".to_string()),
                Some("beta".to_string()),
                Some("gamma".to_string())
            ]
        );
    }

    #[test]
    fn test_decode_is_restartable() {
        let items: VariantCollection = (1..=5u32).map(Variant::from).collect();
        let first: Vec<u32> = items.u32s().collect();
        let second: Vec<u32> = items.u32s().collect();
        assert_eq!(first, vec![1, 2, 3, 4, 5]);
        assert_eq!(first, second);
        assert_eq!(items.len(), 5);
    }

    #[test]
    fn test_decode_reports_exact_size() {
        let items = words();
        let mut decode = items.strings();
        assert_eq!(decode.len(), 3);
        decode.next();
        assert_eq!(decode.len(), 2);
    }

    #[test]
    fn test_decode_coerces_elements() {
        let items: VariantCollection = [Variant::UI1(9), Variant::I8(-1)].into_iter().collect();
        let (decoded, logs) = capture_logs(|| items.u32s().collect::<Vec<_>>());
        assert_eq!(decoded, vec![9, u32::MAX]);
        assert!(logs.contains("Unexpected variant type"));
    }

    #[test]
    fn test_element_type() {
        assert_eq!(words().element_type(), Some(VarType::LpWStr));
        assert_eq!(VariantCollection::new().element_type(), None);

        let mut mixed = VariantCollection::new();
        mixed.push(1u32);
        mixed.push("two");
        assert_eq!(mixed.element_type(), None);
    }
}
