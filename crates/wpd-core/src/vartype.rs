//! Variant discriminants, numbered as in the COM VARENUM

/// Flag combined with an element tag to mark a counted vector
pub const VT_VECTOR: u16 = 0x1000;

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Empty = 0,
    Null = 1,
    I2 = 2,
    I4 = 3,
    R4 = 4,
    R8 = 5,
    Date = 7,
    Bstr = 8,
    /// Status code; also the "no value" sentinel
    Error = 10,
    Bool = 11,
    /// Element tag of a vector whose entries carry their own tags
    Variant = 12,
    I1 = 16,
    UI1 = 17,
    UI2 = 18,
    UI4 = 19,
    I8 = 20,
    UI8 = 21,
    Int = 22,
    UInt = 23,
    LpStr = 30,
    LpWStr = 31,
    Clsid = 72,
}

impl VarType {
    pub const fn raw(self) -> u16 {
        self as u16
    }

    pub fn from_raw(raw: u16) -> Option<Self> {
        let vt = match raw {
            0 => Self::Empty,
            1 => Self::Null,
            2 => Self::I2,
            3 => Self::I4,
            4 => Self::R4,
            5 => Self::R8,
            7 => Self::Date,
            8 => Self::Bstr,
            10 => Self::Error,
            11 => Self::Bool,
            12 => Self::Variant,
            16 => Self::I1,
            17 => Self::UI1,
            18 => Self::UI2,
            19 => Self::UI4,
            20 => Self::I8,
            21 => Self::UI8,
            22 => Self::Int,
            23 => Self::UInt,
            30 => Self::LpStr,
            31 => Self::LpWStr,
            72 => Self::Clsid,
            _ => return None,
        };
        Some(vt)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Empty => "VT_EMPTY",
            Self::Null => "VT_NULL",
            Self::I2 => "VT_I2",
            Self::I4 => "VT_I4",
            Self::R4 => "VT_R4",
            Self::R8 => "VT_R8",
            Self::Date => "VT_DATE",
            Self::Bstr => "VT_BSTR",
            Self::Error => "VT_ERROR",
            Self::Bool => "VT_BOOL",
            Self::Variant => "VT_VARIANT",
            Self::I1 => "VT_I1",
            Self::UI1 => "VT_UI1",
            Self::UI2 => "VT_UI2",
            Self::UI4 => "VT_UI4",
            Self::I8 => "VT_I8",
            Self::UI8 => "VT_UI8",
            Self::Int => "VT_INT",
            Self::UInt => "VT_UINT",
            Self::LpStr => "VT_LPSTR",
            Self::LpWStr => "VT_LPWSTR",
            Self::Clsid => "VT_CLSID",
        }
    }

    /// Integer tags, the only ones a status entry may carry besides ERROR
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::I1
                | Self::UI1
                | Self::I2
                | Self::UI2
                | Self::I4
                | Self::UI4
                | Self::Int
                | Self::UInt
                | Self::I8
                | Self::UI8
        )
    }

    /// Tags whose payload can take part in integer coercion
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::I1
                | Self::UI1
                | Self::I2
                | Self::UI2
                | Self::I4
                | Self::UI4
                | Self::Int
                | Self::UInt
                | Self::I8
                | Self::UI8
                | Self::R4
                | Self::R8
                | Self::Bool
        )
    }
}

/// The full discriminant of a value: a scalar tag, a vector of a tag, or a
/// raw tag this crate does not model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Scalar(VarType),
    Vector(VarType),
    Unknown(u16),
}

impl Tag {
    pub fn raw(self) -> u16 {
        match self {
            Self::Scalar(vt) => vt.raw(),
            Self::Vector(vt) => VT_VECTOR | vt.raw(),
            Self::Unknown(raw) => raw,
        }
    }

    pub fn from_raw(raw: u16) -> Self {
        let (vector, base) = (raw & VT_VECTOR != 0, raw & !VT_VECTOR);
        match (vector, VarType::from_raw(base)) {
            (false, Some(vt)) => Self::Scalar(vt),
            (true, Some(vt)) => Self::Vector(vt),
            _ => Self::Unknown(raw),
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar(vt) => f.write_str(vt.name()),
            Self::Vector(vt) => write!(f, "VT_VECTOR|{}", vt.name()),
            Self::Unknown(raw) => write!(f, "0x{:04X}", raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_round_trip() {
        for raw in 0u16..=80 {
            if let Some(vt) = VarType::from_raw(raw) {
                assert_eq!(vt.raw(), raw);
            }
        }
    }

    #[test]
    fn test_tag_from_raw() {
        assert_eq!(Tag::from_raw(19), Tag::Scalar(VarType::UI4));
        assert_eq!(Tag::from_raw(0x1011), Tag::Vector(VarType::UI1));
        assert_eq!(Tag::from_raw(6), Tag::Unknown(6));
        assert_eq!(Tag::from_raw(0x1011).to_string(), "VT_VECTOR|VT_UI1");
    }
}
