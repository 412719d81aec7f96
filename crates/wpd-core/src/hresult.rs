//! HRESULT status codes carried by ERROR-tagged values and command results

use serde::{Deserialize, Serialize};

/// A raw COM status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HResult(pub i32);

impl HResult {
    pub const S_OK: HResult = HResult(0);
    pub const S_FALSE: HResult = HResult(1);
    pub const E_NOTIMPL: HResult = HResult::from_bits(0x8000_4001);
    pub const E_NOINTERFACE: HResult = HResult::from_bits(0x8000_4002);
    pub const E_POINTER: HResult = HResult::from_bits(0x8000_4003);
    pub const E_ABORT: HResult = HResult::from_bits(0x8000_4004);
    pub const E_FAIL: HResult = HResult::from_bits(0x8000_4005);
    pub const E_UNEXPECTED: HResult = HResult::from_bits(0x8000_FFFF);
    pub const E_ACCESSDENIED: HResult = HResult::from_bits(0x8007_0005);
    pub const E_HANDLE: HResult = HResult::from_bits(0x8007_0006);
    pub const E_OUTOFMEMORY: HResult = HResult::from_bits(0x8007_000E);
    pub const E_INVALIDARG: HResult = HResult::from_bits(0x8007_0057);

    // Win32 errors wrapped as HRESULT_FROM_WIN32
    pub const E_FILE_NOT_FOUND: HResult = HResult::from_bits(0x8007_0002);
    pub const E_PATH_NOT_FOUND: HResult = HResult::from_bits(0x8007_0003);
    pub const E_INVALID_DATA: HResult = HResult::from_bits(0x8007_000D);
    pub const E_NOT_SUPPORTED: HResult = HResult::from_bits(0x8007_0032);
    pub const E_BUSY: HResult = HResult::from_bits(0x8007_00AA);
    pub const E_CANCELLED: HResult = HResult::from_bits(0x8007_04C7);
    pub const E_TIMEOUT: HResult = HResult::from_bits(0x8007_05B4);
    pub const E_NOT_FOUND: HResult = HResult::from_bits(0x8007_0490);

    /// Reinterpret the unsigned hex form used in headers and documentation
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits as i32)
    }

    pub const fn bits(self) -> u32 {
        self.0 as u32
    }

    pub const fn is_success(self) -> bool {
        self.0 >= 0
    }

    pub const fn is_failure(self) -> bool {
        self.0 < 0
    }

    /// Symbolic name, if the code is one we know
    pub fn name(self) -> Option<&'static str> {
        NAMES
            .iter()
            .find(|(code, _)| *code == self)
            .map(|(_, name)| *name)
    }
}

const NAMES: &[(HResult, &str)] = &[
    (HResult::S_OK, "S_OK"),
    (HResult::S_FALSE, "S_FALSE"),
    (HResult::E_NOTIMPL, "E_NOTIMPL"),
    (HResult::E_NOINTERFACE, "E_NOINTERFACE"),
    (HResult::E_POINTER, "E_POINTER"),
    (HResult::E_ABORT, "E_ABORT"),
    (HResult::E_FAIL, "E_FAIL"),
    (HResult::E_UNEXPECTED, "E_UNEXPECTED"),
    (HResult::E_ACCESSDENIED, "E_ACCESSDENIED"),
    (HResult::E_HANDLE, "E_HANDLE"),
    (HResult::E_OUTOFMEMORY, "E_OUTOFMEMORY"),
    (HResult::E_INVALIDARG, "E_INVALIDARG"),
    (HResult::E_FILE_NOT_FOUND, "E_FILE_NOT_FOUND"),
    (HResult::E_PATH_NOT_FOUND, "E_PATH_NOT_FOUND"),
    (HResult::E_INVALID_DATA, "E_INVALID_DATA"),
    (HResult::E_NOT_SUPPORTED, "E_NOT_SUPPORTED"),
    (HResult::E_BUSY, "E_BUSY"),
    (HResult::E_CANCELLED, "E_CANCELLED"),
    (HResult::E_TIMEOUT, "E_TIMEOUT"),
    (HResult::E_NOT_FOUND, "E_NOT_FOUND"),
];

impl std::fmt::Display for HResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "0x{:08X}", self.bits()),
        }
    }
}

impl From<i32> for HResult {
    fn from(code: i32) -> Self {
        Self(code)
    }
}
