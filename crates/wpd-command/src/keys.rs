//! Well-known property keys of the WPD common category
//!
//! Every command request carries the category and id of the command being
//! invoked; every result carries the status under [`HRESULT`].

use uuid::Uuid;
use wpd_core::PropertyKey;

/// WPD_CATEGORY_COMMON
pub const CATEGORY_COMMON: Uuid = Uuid::from_u128(0xF0422A9C_5DC8_4440_B5BD_5DF28835658A);

/// Category GUID of the command being invoked (VT_CLSID)
pub const COMMAND_CATEGORY: PropertyKey = PropertyKey::new(CATEGORY_COMMON, 1001);

/// Id of the command being invoked (VT_UI4)
pub const COMMAND_ID: PropertyKey = PropertyKey::new(CATEGORY_COMMON, 1002);

/// Status of the command (VT_ERROR)
pub const HRESULT: PropertyKey = PropertyKey::new(CATEGORY_COMMON, 1003);

/// Driver-specific error code accompanying a failure (VT_UI4)
pub const DRIVER_ERROR_CODE: PropertyKey = PropertyKey::new(CATEGORY_COMMON, 1004);
