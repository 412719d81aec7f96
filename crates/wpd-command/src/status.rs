//! Status extraction and classification of command results

use thiserror::Error;
use wpd_core::{coerce, HResult, PropertyKey, PropertyValues, Tag, Variant};

use crate::keys;
use crate::transport::TransportError;

/// Fatal outcome of a command
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command {command} failed with status {code}")]
    Status { command: PropertyKey, code: HResult },
    #[error("Command {command} response has no status entry")]
    MissingStatus { command: PropertyKey },
    #[error("Command {command} response status has type {tag}, expected an integer")]
    MalformedStatus { command: PropertyKey, tag: Tag },
    #[error("Command {command} transport failed: {source}")]
    Transport {
        command: PropertyKey,
        #[source]
        source: TransportError,
    },
}

impl CommandError {
    /// The command that failed
    pub fn command(&self) -> PropertyKey {
        match self {
            Self::Status { command, .. }
            | Self::MissingStatus { command }
            | Self::MalformedStatus { command, .. }
            | Self::Transport { command, .. } => *command,
        }
    }

    /// The raw status reported by the device, if it got that far
    pub fn code(&self) -> Option<HResult> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// How a command ended, judged by its status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    /// The device does not implement the command. Not an error.
    NotSupported,
    Failed(HResult),
}

pub fn classify(code: HResult) -> Status {
    match code {
        HResult::S_OK => Status::Ok,
        HResult::E_NOTIMPL => Status::NotSupported,
        other => Status::Failed(other),
    }
}

/// Read the mandatory status entry of a response.
///
/// The device normally reports VT_ERROR; integer tags are accepted and
/// read as a signed 32-bit code.
pub fn read_status(command: PropertyKey, response: &PropertyValues) -> Result<HResult, CommandError> {
    match response.get(&keys::HRESULT) {
        None => Err(CommandError::MissingStatus { command }),
        Some(Variant::Error(code)) => Ok(*code),
        Some(value) => match value.tag() {
            Tag::Scalar(vt) if vt.is_integer() => Ok(HResult(coerce::to_i64(value) as i32)),
            tag => Err(CommandError::MalformedStatus { command, tag }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wpd_core::test_support::capture_logs;
    use wpd_core::VarType;

    fn command() -> PropertyKey {
        PropertyKey::new(keys::CATEGORY_COMMON, 2)
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(HResult::S_OK), Status::Ok);
        assert_eq!(classify(HResult::E_NOTIMPL), Status::NotSupported);
        assert_eq!(
            classify(HResult::E_ACCESSDENIED),
            Status::Failed(HResult::E_ACCESSDENIED)
        );
        assert_eq!(classify(HResult::S_FALSE), Status::Failed(HResult::S_FALSE));
    }

    #[test]
    fn test_read_error_status() {
        let mut response = PropertyValues::new();
        response.set(keys::HRESULT, HResult::E_BUSY);
        assert_eq!(read_status(command(), &response).unwrap(), HResult::E_BUSY);
    }

    #[test]
    fn test_read_integer_status() {
        let mut response = PropertyValues::new();
        response.set(keys::HRESULT, HResult::E_FAIL.0);
        assert_eq!(read_status(command(), &response).unwrap(), HResult::E_FAIL);

        response.set(keys::HRESULT, HResult::E_FAIL.bits());
        assert_eq!(read_status(command(), &response).unwrap(), HResult::E_FAIL);
    }

    #[test]
    fn test_integer_status_reads_silently() {
        for status in [Variant::UI4(0x8000_4005), Variant::UI8(0x8000_4005), Variant::I2(0)] {
            let mut response = PropertyValues::new();
            response.set(keys::HRESULT, status);
            let (code, logs) = capture_logs(|| read_status(command(), &response));
            assert!(code.is_ok());
            assert!(logs.is_empty(), "{logs}");
        }
    }

    #[test]
    fn test_missing_status() {
        let err = read_status(command(), &PropertyValues::new()).unwrap_err();
        assert!(matches!(err, CommandError::MissingStatus { .. }));
        assert_eq!(err.command(), command());
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_malformed_status() {
        let mut response = PropertyValues::new();
        response.set(keys::HRESULT, "S_OK");
        match read_status(command(), &response) {
            Err(CommandError::MalformedStatus { tag, .. }) => {
                assert_eq!(tag, Tag::Scalar(VarType::LpWStr))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_error_message_carries_code() {
        let err = CommandError::Status {
            command: command(),
            code: HResult::from_bits(0x8004_2001),
        };
        assert!(err.to_string().ends_with("failed with status 0x80042001"));
    }
}
