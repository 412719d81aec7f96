//! Best-effort numeric coercion between mismatched variant tags
//!
//! Every integer accessor funnels through [`to_i64`] and narrows the result
//! with `as`, so truncation and sign extension follow Rust's integer cast
//! rules. Float payloads convert numerically (saturating) rather than by bits.

use crate::variant::Variant;

/// Common signed 64-bit intermediate of any numeric payload.
/// Non-numeric payloads (strings, GUIDs, sentinel, ...) yield 0.
pub fn to_i64(value: &Variant) -> i64 {
    match value {
        Variant::I1(v) => *v as i64,
        Variant::UI1(v) => *v as i64,
        Variant::I2(v) => *v as i64,
        Variant::UI2(v) => *v as i64,
        Variant::I4(v) | Variant::Int(v) => *v as i64,
        Variant::UI4(v) | Variant::UInt(v) => *v as i64,
        Variant::I8(v) => *v,
        Variant::UI8(v) => *v as i64,
        Variant::R4(v) => *v as i64,
        Variant::R8(v) => *v as i64,
        Variant::Bool(v) => *v as i64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_extension_and_truncation() {
        assert_eq!(to_i64(&Variant::I1(-1)), -1);
        assert_eq!(to_i64(&Variant::UI1(255)), 255);
        assert_eq!(to_i64(&Variant::UI8(u64::MAX)), -1);
        assert_eq!(to_i64(&Variant::UI4(0x1_0000u32 + 7)) as u16, 7);
    }

    #[test]
    fn test_floats_convert_numerically() {
        assert_eq!(to_i64(&Variant::R8(-2.9)), -2);
        assert_eq!(to_i64(&Variant::R4(1e20)), i64::MAX);
        assert_eq!(to_i64(&Variant::R8(f64::NAN)), 0);
    }

    #[test]
    fn test_non_numeric_is_zero() {
        assert_eq!(to_i64(&Variant::from("42")), 0);
        assert_eq!(to_i64(&Variant::Empty), 0);
        assert_eq!(to_i64(&Variant::Bool(true)), 1);
    }
}
