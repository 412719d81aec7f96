//! Tagged variant values and their typed accessors
//!
//! A [`Variant`] holds exactly one payload whose shape always matches its
//! tag. Accessors never fail: an exact tag match returns the stored value, a
//! numeric mismatch is coerced through [`coerce::to_i64`], and anything else
//! falls back to the requested type's default. Mismatches log a warning,
//! except on ERROR-tagged values, which stand for "no value" and stay quiet.

use chrono::NaiveDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::coerce;
use crate::collection::VariantCollection;
use crate::date;
use crate::hresult::HResult;
use crate::vartype::{Tag, VarType};

/// Number of bytes shown by the debug rendering of a byte sequence
const DEBUG_BYTES: usize = 16;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    #[default]
    Empty,
    Null,
    I1(i8),
    UI1(u8),
    I2(i16),
    UI2(u16),
    I4(i32),
    UI4(u32),
    Int(i32),
    UInt(u32),
    I8(i64),
    UI8(u64),
    R4(f32),
    R8(f64),
    Bool(bool),
    /// OLE automation date, see [`crate::date`]
    Date(f64),
    Clsid(Uuid),
    /// NUL-terminated 8-bit string
    LpStr(Vec<u8>),
    /// NUL-terminated UTF-16 string
    LpWStr(Vec<u16>),
    /// Length-prefixed UTF-16 string, may contain NULs
    Bstr(Vec<u16>),
    /// Status code. Doubles as the "no value" sentinel.
    Error(HResult),
    /// VT_VECTOR | VT_UI1
    Bytes(Vec<u8>),
    Vector(VariantCollection),
    /// A tag this crate does not model; the payload is not kept
    Unsupported(u16),
}

impl Variant {
    /// Build an LPSTR value from raw 8-bit text
    pub fn lpstr(text: &str) -> Self {
        let mut bytes = Vec::with_capacity(text.len() + 1);
        bytes.extend_from_slice(text.as_bytes());
        bytes.push(0);
        Self::LpStr(bytes)
    }

    /// Build an LPWSTR value; this is what `From<&str>` produces
    pub fn lpwstr(text: &str) -> Self {
        let mut wide: Vec<u16> = text.encode_utf16().collect();
        wide.push(0);
        Self::LpWStr(wide)
    }

    /// Build a BSTR value, which keeps embedded NULs
    pub fn bstr(text: &str) -> Self {
        Self::Bstr(text.encode_utf16().collect())
    }

    /// Build a DATE value from a calendar date and time
    pub fn date(value: NaiveDateTime) -> Self {
        Self::Date(date::to_oa_date(value))
    }

    /// Discriminant of the stored payload
    pub fn tag(&self) -> Tag {
        let vt = match self {
            Self::Empty => VarType::Empty,
            Self::Null => VarType::Null,
            Self::I1(_) => VarType::I1,
            Self::UI1(_) => VarType::UI1,
            Self::I2(_) => VarType::I2,
            Self::UI2(_) => VarType::UI2,
            Self::I4(_) => VarType::I4,
            Self::UI4(_) => VarType::UI4,
            Self::Int(_) => VarType::Int,
            Self::UInt(_) => VarType::UInt,
            Self::I8(_) => VarType::I8,
            Self::UI8(_) => VarType::UI8,
            Self::R4(_) => VarType::R4,
            Self::R8(_) => VarType::R8,
            Self::Bool(_) => VarType::Bool,
            Self::Date(_) => VarType::Date,
            Self::Clsid(_) => VarType::Clsid,
            Self::LpStr(_) => VarType::LpStr,
            Self::LpWStr(_) => VarType::LpWStr,
            Self::Bstr(_) => VarType::Bstr,
            Self::Error(_) => VarType::Error,
            Self::Bytes(_) => return Tag::Vector(VarType::UI1),
            Self::Vector(items) => {
                return Tag::Vector(items.element_type().unwrap_or(VarType::Variant))
            }
            Self::Unsupported(raw) => return Tag::Unknown(*raw),
        };
        Tag::Scalar(vt)
    }

    /// True for the ERROR tag, which reads as "intentionally absent"
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Release any owned payload and reset to EMPTY
    pub fn clear(&mut self) {
        *self = Self::Empty;
    }

    /// Take the value out, leaving EMPTY behind
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    fn warn_mismatch(&self, expected: &[Tag]) {
        if self.is_sentinel() {
            return;
        }
        let expected = expected
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        warn!(expected = %expected, actual = %self.tag(), "Unexpected variant type");
    }

    fn coerced(&self, expected: &[VarType]) -> i64 {
        let expected: Vec<Tag> = expected.iter().copied().map(Tag::Scalar).collect();
        self.warn_mismatch(&expected);
        coerce::to_i64(self)
    }

    /// Read as VT_I1
    pub fn get_i8(&self) -> i8 {
        match self {
            Self::I1(v) => *v,
            _ => self.coerced(&[VarType::I1]) as i8,
        }
    }

    /// Read as VT_UI1
    pub fn get_u8(&self) -> u8 {
        match self {
            Self::UI1(v) => *v,
            _ => self.coerced(&[VarType::UI1]) as u8,
        }
    }

    /// Read as VT_I2
    pub fn get_i16(&self) -> i16 {
        match self {
            Self::I2(v) => *v,
            _ => self.coerced(&[VarType::I2]) as i16,
        }
    }

    /// Read as VT_UI2
    pub fn get_u16(&self) -> u16 {
        match self {
            Self::UI2(v) => *v,
            _ => self.coerced(&[VarType::UI2]) as u16,
        }
    }

    /// Accepts both VT_I4 and VT_INT
    pub fn get_i32(&self) -> i32 {
        match self {
            Self::I4(v) | Self::Int(v) => *v,
            _ => self.coerced(&[VarType::I4, VarType::Int]) as i32,
        }
    }

    /// Accepts both VT_UI4 and VT_UINT
    pub fn get_u32(&self) -> u32 {
        match self {
            Self::UI4(v) | Self::UInt(v) => *v,
            _ => self.coerced(&[VarType::UI4, VarType::UInt]) as u32,
        }
    }

    /// Read as VT_I8
    pub fn get_i64(&self) -> i64 {
        match self {
            Self::I8(v) => *v,
            _ => self.coerced(&[VarType::I8]),
        }
    }

    /// Read as VT_UI8
    pub fn get_u64(&self) -> u64 {
        match self {
            Self::UI8(v) => *v,
            _ => self.coerced(&[VarType::UI8]) as u64,
        }
    }

    /// Read as VT_R4; VT_R8 is narrowed with a warning
    pub fn get_f32(&self) -> f32 {
        match self {
            Self::R4(v) => *v,
            Self::R8(v) => {
                self.warn_mismatch(&[Tag::Scalar(VarType::R4)]);
                *v as f32
            }
            _ => self.coerced(&[VarType::R4]) as f32,
        }
    }

    /// Read as VT_R8; VT_R4 is widened with a warning
    pub fn get_f64(&self) -> f64 {
        match self {
            Self::R8(v) => *v,
            Self::R4(v) => {
                self.warn_mismatch(&[Tag::Scalar(VarType::R8)]);
                *v as f64
            }
            _ => self.coerced(&[VarType::R8]) as f64,
        }
    }

    /// Read as VT_BOOL; other numbers read true when non-zero
    pub fn get_bool(&self) -> bool {
        match self {
            Self::Bool(v) => *v,
            _ => self.coerced(&[VarType::Bool]) != 0,
        }
    }

    /// Status code of an ERROR-tagged value; any other tag reads as `S_OK`
    pub fn get_status_code(&self) -> HResult {
        match self {
            Self::Error(code) => *code,
            _ => HResult::S_OK,
        }
    }

    /// Date of a DATE-tagged value. Never coerced.
    pub fn get_date(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Date(v) => date::from_oa_date(*v),
            _ => {
                self.warn_mismatch(&[Tag::Scalar(VarType::Date)]);
                None
            }
        }
    }

    /// GUID of a CLSID-tagged value, or the nil GUID
    pub fn get_guid(&self) -> Uuid {
        match self {
            Self::Clsid(v) => *v,
            _ => {
                self.warn_mismatch(&[Tag::Scalar(VarType::Clsid)]);
                Uuid::nil()
            }
        }
    }

    /// Text of any of the three string forms
    pub fn get_string(&self) -> Option<String> {
        match self {
            Self::LpStr(bytes) => {
                let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
                Some(String::from_utf8_lossy(&bytes[..end]).into_owned())
            }
            Self::LpWStr(wide) => {
                let end = wide.iter().position(|c| *c == 0).unwrap_or(wide.len());
                Some(String::from_utf16_lossy(&wide[..end]))
            }
            Self::Bstr(wide) => {
                debug!(len = wide.len(), "Reading BSTR value");
                Some(String::from_utf16_lossy(wide))
            }
            Self::Error(_) => None,
            _ => {
                warn!(actual = %self.tag(), "Unknown or non-string variant type");
                None
            }
        }
    }

    /// Bytes of a VT_VECTOR|VT_UI1 value. Never coerced.
    pub fn get_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes.as_slice()),
            _ => {
                self.warn_mismatch(&[Tag::Vector(VarType::UI1)]);
                None
            }
        }
    }

    /// Elements of a vector value other than a byte sequence
    pub fn get_collection(&self) -> Option<&VariantCollection> {
        match self {
            Self::Vector(items) => Some(items),
            _ => {
                self.warn_mismatch(&[Tag::Vector(VarType::Variant)]);
                None
            }
        }
    }

    /// Human-readable rendering for every tag. Never fails.
    pub fn to_debug_string(&self) -> String {
        match self {
            Self::Empty => "<empty>".to_string(),
            Self::Null => "<null>".to_string(),
            Self::I1(v) => v.to_string(),
            Self::UI1(v) => v.to_string(),
            Self::I2(v) => v.to_string(),
            Self::UI2(v) => v.to_string(),
            Self::I4(v) | Self::Int(v) => v.to_string(),
            Self::UI4(v) | Self::UInt(v) => v.to_string(),
            Self::I8(v) => v.to_string(),
            Self::UI8(v) => v.to_string(),
            Self::R4(v) => v.to_string(),
            Self::R8(v) => v.to_string(),
            Self::Bool(v) => v.to_string(),
            Self::Error(code) => format!("Error: {}", code),
            Self::Date(v) => match date::from_oa_date(*v) {
                Some(dt) => dt.to_string(),
                None => format!("<invalid date {}>", v),
            },
            Self::Clsid(v) => v.hyphenated().to_string(),
            Self::LpStr(_) | Self::LpWStr(_) | Self::Bstr(_) => {
                format!("\"{}\"", self.get_string().unwrap_or_default())
            }
            Self::Bytes(bytes) => {
                let mut out = format!("<{} bytes>", bytes.len());
                for b in bytes.iter().take(DEBUG_BYTES) {
                    out.push_str(&format!(" {:02x}", b));
                }
                if bytes.len() > DEBUG_BYTES {
                    out.push_str(" ...");
                }
                out
            }
            Self::Vector(items) => {
                let parts: Vec<String> = items.iter().map(Variant::to_debug_string).collect();
                format!("[{}]", parts.join(", "))
            }
            Self::Unsupported(raw) => format!("Unknown type {}", Tag::Unknown(*raw)),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_debug_string())
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Variant {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

impl_from_scalar! {
    i8 => I1,
    u8 => UI1,
    i16 => I2,
    u16 => UI2,
    i32 => I4,
    u32 => UI4,
    i64 => I8,
    u64 => UI8,
    f32 => R4,
    f64 => R8,
    bool => Bool,
    Uuid => Clsid,
    HResult => Error,
    Vec<u8> => Bytes,
}

/// An all-UI1 collection becomes [`Variant::Bytes`], the single payload
/// form of VT_VECTOR|VT_UI1
impl From<VariantCollection> for Variant {
    fn from(items: VariantCollection) -> Self {
        if items.element_type() == Some(VarType::UI1) {
            return Self::Bytes(items.iter().map(Variant::get_u8).collect());
        }
        Self::Vector(items)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Self::lpwstr(value)
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Self::lpwstr(&value)
    }
}

impl From<&[u8]> for Variant {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<NaiveDateTime> for Variant {
    fn from(value: NaiveDateTime) -> Self {
        Self::date(value)
    }
}

/// Decode a value into a concrete type using the accessor rules above
pub trait FromVariant: Sized {
    fn from_variant(value: &Variant) -> Self;
}

macro_rules! impl_from_variant {
    ($($ty:ty => $getter:ident),+ $(,)?) => {
        $(
            impl FromVariant for $ty {
                fn from_variant(value: &Variant) -> Self {
                    value.$getter()
                }
            }
        )+
    };
}

impl_from_variant! {
    i8 => get_i8,
    u8 => get_u8,
    i16 => get_i16,
    u16 => get_u16,
    i32 => get_i32,
    u32 => get_u32,
    i64 => get_i64,
    u64 => get_u64,
    f32 => get_f32,
    f64 => get_f64,
    bool => get_bool,
    Uuid => get_guid,
    HResult => get_status_code,
    Option<String> => get_string,
    Option<NaiveDateTime> => get_date,
}

impl FromVariant for Option<Vec<u8>> {
    fn from_variant(value: &Variant) -> Self {
        value.get_bytes().map(<[u8]>::to_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;
    use chrono::NaiveDate;

    #[test]
    fn test_exact_round_trip() {
        assert_eq!(Variant::from(-5i8).get_i8(), -5);
        assert_eq!(Variant::from(200u8).get_u8(), 200);
        assert_eq!(Variant::from(-300i16).get_i16(), -300);
        assert_eq!(Variant::from(60000u16).get_u16(), 60000);
        assert_eq!(Variant::from(i32::MIN).get_i32(), i32::MIN);
        assert_eq!(Variant::from(u32::MAX).get_u32(), u32::MAX);
        assert_eq!(Variant::from(i64::MIN).get_i64(), i64::MIN);
        assert_eq!(Variant::from(u64::MAX).get_u64(), u64::MAX);
        assert_eq!(Variant::from(1.5f32).get_f32(), 1.5);
        assert_eq!(Variant::from(-2.25f64).get_f64(), -2.25);
        assert!(Variant::from(true).get_bool());
        assert_eq!(
            Variant::from(HResult::E_FAIL).get_status_code(),
            HResult::E_FAIL
        );

        let guid = Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
        assert_eq!(Variant::from(guid).get_guid(), guid);
        assert_eq!(Variant::from("hello").get_string().as_deref(), Some("hello"));
        assert_eq!(
            Variant::from(vec![1u8, 2, 3]).get_bytes(),
            Some(&[1u8, 2, 3][..])
        );

        let dt = NaiveDate::from_ymd_opt(2021, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();
        assert_eq!(Variant::from(dt).get_date(), Some(dt));
    }

    #[test]
    fn test_exact_match_is_silent() {
        let (value, logs) = capture_logs(|| Variant::UI4(7).get_u32());
        assert_eq!(value, 7);
        assert!(logs.is_empty(), "{logs}");
    }

    #[test]
    fn test_int_aliases() {
        let (values, logs) = capture_logs(|| (Variant::Int(-4).get_i32(), Variant::UInt(4).get_u32()));
        assert_eq!(values, (-4, 4));
        assert!(logs.is_empty());
    }

    #[test]
    fn test_numeric_coercion_warns() {
        let (value, logs) = capture_logs(|| Variant::I8(300).get_u8());
        assert_eq!(value, 44);
        assert!(logs.contains("Unexpected variant type"));
        assert!(logs.contains("VT_UI1"));
        assert!(logs.contains("VT_I8"));

        let (value, _) = capture_logs(|| Variant::I1(-1).get_u32());
        assert_eq!(value, u32::MAX);
        let (value, _) = capture_logs(|| Variant::UI2(65535).get_i16());
        assert_eq!(value, -1);
        let (value, _) = capture_logs(|| Variant::UI4(123).get_i64());
        assert_eq!(value, 123);
        let (value, _) = capture_logs(|| Variant::Bool(true).get_i32());
        assert_eq!(value, 1);
        let (value, _) = capture_logs(|| Variant::I4(0).get_bool());
        assert!(!value);
    }

    #[test]
    fn test_float_cross_conversion() {
        let (value, logs) = capture_logs(|| Variant::R8(2.5).get_f32());
        assert_eq!(value, 2.5f32);
        assert!(logs.contains("VT_R4"));

        let (value, _) = capture_logs(|| Variant::R4(0.5).get_f64());
        assert_eq!(value, 0.5);
        let (value, _) = capture_logs(|| Variant::I4(-3).get_f64());
        assert_eq!(value, -3.0);
        let (value, _) = capture_logs(|| Variant::R8(7.9).get_u16());
        assert_eq!(value, 7);
    }

    #[test]
    fn test_non_numeric_reads_zero() {
        let (value, logs) = capture_logs(|| Variant::from("12").get_u32());
        assert_eq!(value, 0);
        assert!(logs.contains("VT_LPWSTR"));
        let (value, _) = capture_logs(|| Variant::Clsid(Uuid::nil()).get_f64());
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_no_coercion_types() {
        let (guid, logs) = capture_logs(|| Variant::UI4(1).get_guid());
        assert!(guid.is_nil());
        assert!(logs.contains("VT_CLSID"));

        let (text, logs) = capture_logs(|| Variant::UI4(1).get_string());
        assert_eq!(text, None);
        assert!(logs.contains("non-string"));

        let (bytes, _) = capture_logs(|| Variant::UI1(1).get_bytes().map(<[u8]>::to_vec));
        assert_eq!(bytes, None);

        let (date, _) = capture_logs(|| Variant::R8(36526.5).get_date());
        assert_eq!(date, None);
    }

    #[test]
    fn test_sentinel_suppresses_diagnostics() {
        let sentinel = Variant::Error(HResult::E_FAIL);
        let (_, logs) = capture_logs(|| {
            assert_eq!(sentinel.get_i8(), 0);
            assert_eq!(sentinel.get_u64(), 0);
            assert_eq!(sentinel.get_f32(), 0.0);
            assert!(!sentinel.get_bool());
            assert!(sentinel.get_guid().is_nil());
            assert_eq!(sentinel.get_string(), None);
            assert_eq!(sentinel.get_bytes(), None);
            assert_eq!(sentinel.get_date(), None);
            assert!(sentinel.get_collection().is_none());
        });
        assert!(logs.is_empty(), "{logs}");
    }

    #[test]
    fn test_empty_is_an_ordinary_mismatch() {
        let (value, logs) = capture_logs(|| Variant::Empty.get_u32());
        assert_eq!(value, 0);
        assert!(logs.contains("VT_EMPTY"));
    }

    #[test]
    fn test_three_string_forms() {
        assert_eq!(Variant::lpstr("ansi").get_string().as_deref(), Some("ansi"));
        assert_eq!(Variant::lpwstr("wide").get_string().as_deref(), Some("wide"));
        assert_eq!(Variant::bstr("b\0str").get_string().as_deref(), Some("b\0str"));
        assert_eq!(
            Variant::LpWStr(vec![b'a' as u16, 0, b'b' as u16]).get_string().as_deref(),
            Some("a")
        );
    }

    #[test]
    fn test_status_code_default() {
        let (code, logs) = capture_logs(|| Variant::I4(5).get_status_code());
        assert_eq!(code, HResult::S_OK);
        assert!(logs.is_empty());
    }

    #[test]
    fn test_clear_releases_payload() {
        let mut value = Variant::from("owned");
        let taken = value.take();
        assert_eq!(value, Variant::Empty);
        assert_eq!(taken.get_string().as_deref(), Some("owned"));

        let mut value = Variant::from(vec![0u8; 8]);
        value.clear();
        value.clear();
        assert_eq!(value.tag(), Tag::Scalar(VarType::Empty));
    }

    #[test]
    fn test_debug_rendering() {
        assert_eq!(Variant::Empty.to_debug_string(), "<empty>");
        assert_eq!(Variant::Null.to_debug_string(), "<null>");
        assert_eq!(Variant::I4(-7).to_debug_string(), "-7");
        assert_eq!(Variant::from("x").to_debug_string(), "\"x\"");
        assert_eq!(
            Variant::Error(HResult::E_ACCESSDENIED).to_debug_string(),
            "Error: E_ACCESSDENIED"
        );
        assert_eq!(
            Variant::Error(HResult::from_bits(0x8004_2001)).to_debug_string(),
            "Error: 0x80042001"
        );
        assert_eq!(Variant::Unsupported(6).to_debug_string(), "Unknown type 0x0006");
        assert_eq!(
            Variant::from(vec![0xde_u8, 0xad]).to_debug_string(),
            "<2 bytes> de ad"
        );
        let items: VariantCollection = [Variant::UI4(1), Variant::UI4(2)].into_iter().collect();
        assert_eq!(Variant::from(items).to_debug_string(), "[1, 2]");
        assert_eq!(Variant::Date(f64::NAN).to_debug_string(), "<invalid date NaN>");
    }

    #[test]
    fn test_byte_collection_becomes_bytes() {
        let items: VariantCollection = [1u8, 2].into_iter().map(Variant::from).collect();
        let value = Variant::from(items);
        assert_eq!(value, Variant::Bytes(vec![1, 2]));

        let (bytes, logs) = capture_logs(|| value.get_bytes().map(<[u8]>::to_vec));
        assert_eq!(bytes, Some(vec![1, 2]));
        assert!(logs.is_empty(), "{logs}");

        let empty = Variant::from(VariantCollection::new());
        assert_eq!(empty.tag(), Tag::Vector(VarType::Variant));
    }

    #[test]
    fn test_tags() {
        assert_eq!(Variant::from("s").tag(), Tag::Scalar(VarType::LpWStr));
        assert_eq!(Variant::from(vec![1u8]).tag(), Tag::Vector(VarType::UI1));
        let items: VariantCollection = [Variant::UI4(1)].into_iter().collect();
        assert_eq!(Variant::from(items).tag(), Tag::Vector(VarType::UI4));
        assert_eq!(Variant::Unsupported(0x4006).tag(), Tag::Unknown(0x4006));
    }
}
