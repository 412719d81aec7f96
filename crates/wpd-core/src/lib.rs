//! WPD Core - Tagged variant values and property mappings
//!
//! This crate provides the value model shared by every WPD command:
//! - Property keys addressing commands and properties
//! - Tagged variants with typed, coercing accessors
//! - Variant collections with lazy typed decoding
//! - Ordered property mappings with last-write-wins semantics

pub mod coerce;
pub mod collection;
pub mod date;
pub mod hresult;
pub mod key;
pub mod values;
pub mod variant;
pub mod vartype;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use collection::{Decode, VariantCollection};
pub use hresult::HResult;
pub use key::{KeyParseError, PropertyKey};
pub use values::PropertyValues;
pub use variant::{FromVariant, Variant};
pub use vartype::{Tag, VarType, VT_VECTOR};
