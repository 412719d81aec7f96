//! Property keys addressing commands and individual properties

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("Missing property id in key: {0}")]
    MissingPid(String),
    #[error("Invalid format id: {0}")]
    InvalidFmtid(#[from] uuid::Error),
    #[error("Invalid property id: {0}")]
    InvalidPid(#[from] std::num::ParseIntError),
}

/// A (category, id) pair.
///
/// The same shape names both the command being invoked and the individual
/// properties carried by a request or result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyKey {
    /// Category identifier
    pub fmtid: Uuid,
    /// Numeric id within the category
    pub pid: u32,
}

impl PropertyKey {
    pub const fn new(fmtid: Uuid, pid: u32) -> Self {
        Self { fmtid, pid }
    }

    /// Build a key from the 128-bit category value, handy for constants
    pub const fn from_u128(fmtid: u128, pid: u32) -> Self {
        Self {
            fmtid: Uuid::from_u128(fmtid),
            pid,
        }
    }
}

impl std::fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}} {}", self.fmtid.hyphenated(), self.pid)
    }
}

/// Parses the `{fmtid} pid` notation produced by `Display`. Braces are optional.
impl FromStr for PropertyKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (fmtid, pid) = s
            .rsplit_once(char::is_whitespace)
            .ok_or_else(|| KeyParseError::MissingPid(s.to_string()))?;
        let fmtid = fmtid.trim().trim_start_matches('{').trim_end_matches('}');
        Ok(Self {
            fmtid: Uuid::parse_str(fmtid)?,
            pid: pid.parse()?,
        })
    }
}
