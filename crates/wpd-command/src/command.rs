//! Command requests, the send protocol, and read-only results
//!
//! A [`CommandRequest`] is built, then consumed by [`CommandRequest::send`].
//! Sending yields an [`Outcome`] holding the [`CommandResult`], so result
//! accessors cannot be reached before the command went out.

use chrono::NaiveDateTime;
use tracing::{debug, info};
use uuid::Uuid;
use wpd_core::{Decode, FromVariant, HResult, PropertyKey, PropertyValues, Variant, VariantCollection};

use crate::dump;
use crate::keys;
use crate::status::{self, CommandError, Status};
use crate::transport::Transport;

/// A command under construction
#[derive(Debug, Clone)]
pub struct CommandRequest {
    command: PropertyKey,
    values: PropertyValues,
}

impl CommandRequest {
    /// Start a request for `command`, seeded with its category and id
    pub fn create(command: PropertyKey) -> Self {
        let mut values = PropertyValues::new();
        values.set(keys::COMMAND_CATEGORY, Variant::Clsid(command.fmtid));
        values.set(keys::COMMAND_ID, Variant::UI4(command.pid));
        Self { command, values }
    }

    pub fn command(&self) -> PropertyKey {
        self.command
    }

    /// Set a property. Accepts GUIDs, signed and unsigned integers, strings,
    /// collections, and anything else convertible into a [`Variant`].
    /// A later add for the same key replaces the earlier one.
    pub fn add(&mut self, key: PropertyKey, value: impl Into<Variant>) -> &mut Self {
        self.values.set(key, value);
        self
    }

    /// Set a VT_VECTOR|VT_UI4 property from a sequence of ids
    pub fn add_u32s(&mut self, key: PropertyKey, values: impl IntoIterator<Item = u32>) -> &mut Self {
        let items: VariantCollection = values.into_iter().map(Variant::UI4).collect();
        self.add(key, items)
    }

    /// Set a VT_VECTOR|VT_UI1 property
    pub fn add_bytes(&mut self, key: PropertyKey, bytes: &[u8]) -> &mut Self {
        self.add(key, bytes)
    }

    /// The mapping that will be sent
    pub fn values(&self) -> &PropertyValues {
        &self.values
    }

    /// Send the request and classify the device's status.
    ///
    /// `S_OK` yields [`Outcome::Succeeded`], `E_NOTIMPL` yields
    /// [`Outcome::NotSupported`]. Any other status, a missing or malformed
    /// status entry, or a transport fault is a [`CommandError`].
    pub fn send<T: Transport + ?Sized>(self, device: &mut T) -> Result<Outcome, CommandError> {
        let command = self.command;
        debug!(command = %command, entries = self.values.len(), "Sending command");

        let response = device
            .send_command(&self.values)
            .map_err(|source| CommandError::Transport { command, source })?;

        let code = status::read_status(command, &response)?;
        let result = CommandResult {
            command,
            values: response,
        };

        match status::classify(code) {
            Status::Ok => {
                debug!(command = %command, entries = result.len(), "Command succeeded");
                Ok(Outcome::Succeeded(result))
            }
            Status::NotSupported => {
                info!(command = %command, "Command not implemented by device");
                Ok(Outcome::NotSupported(result))
            }
            Status::Failed(code) => Err(CommandError::Status { command, code }),
        }
    }
}

/// A sent command that did not fail
#[derive(Debug, Clone)]
pub enum Outcome {
    Succeeded(CommandResult),
    /// The device answered `E_NOTIMPL`
    NotSupported(CommandResult),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    pub fn result(&self) -> &CommandResult {
        match self {
            Self::Succeeded(result) | Self::NotSupported(result) => result,
        }
    }

    pub fn into_result(self) -> CommandResult {
        match self {
            Self::Succeeded(result) | Self::NotSupported(result) => result,
        }
    }

    /// The result if the command succeeded
    pub fn supported(self) -> Option<CommandResult> {
        match self {
            Self::Succeeded(result) => Some(result),
            Self::NotSupported(_) => None,
        }
    }
}

/// Read-only response of a sent command.
///
/// Getters follow the [`Variant`] accessor rules. A missing key reads like
/// the "no value" sentinel: default value, no diagnostic. Use
/// [`has`](Self::has) when the difference matters.
#[derive(Debug, Clone)]
pub struct CommandResult {
    command: PropertyKey,
    values: PropertyValues,
}

macro_rules! result_getters {
    ($($name:ident -> $ty:ty),+ $(,)?) => {
        $(
            pub fn $name(&self, key: &PropertyKey) -> $ty {
                self.values.value_or_absent(key).$name()
            }
        )+
    };
}

impl CommandResult {
    pub fn command(&self) -> PropertyKey {
        self.command
    }

    /// True if `key` is present and not the "no value" sentinel
    pub fn has(&self, key: &PropertyKey) -> bool {
        self.values.has(key)
    }

    pub fn get(&self, key: &PropertyKey) -> Option<&Variant> {
        self.values.get(key)
    }

    result_getters! {
        get_i8 -> i8,
        get_u8 -> u8,
        get_i16 -> i16,
        get_u16 -> u16,
        get_i32 -> i32,
        get_u32 -> u32,
        get_i64 -> i64,
        get_u64 -> u64,
        get_f32 -> f32,
        get_f64 -> f64,
        get_bool -> bool,
        get_date -> Option<NaiveDateTime>,
        get_guid -> Uuid,
        get_string -> Option<String>,
        get_bytes -> Option<&[u8]>,
        get_status_code -> HResult,
    }

    /// Lazily decode the vector entry at `key` as `T`
    pub fn decode<T: FromVariant>(&self, key: &PropertyKey) -> Decode<'_, T> {
        self.values.decode(key)
    }

    pub fn get_strings(&self, key: &PropertyKey) -> Decode<'_, Option<String>> {
        self.decode(key)
    }

    pub fn get_u32s(&self, key: &PropertyKey) -> Decode<'_, u32> {
        self.decode(key)
    }

    /// The status the device reported
    pub fn status(&self) -> HResult {
        self.values.value_or_absent(&keys::HRESULT).get_status_code()
    }

    /// Driver-specific error code, when the device supplied one
    pub fn driver_error_code(&self) -> Option<u32> {
        self.has(&keys::DRIVER_ERROR_CODE)
            .then(|| self.get_u32(&keys::DRIVER_ERROR_CODE))
    }

    pub fn values(&self) -> &PropertyValues {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKey, &Variant)> {
        self.values.iter()
    }

    /// Dump every entry at debug level when built with `comtrace`
    pub fn write_results(&self) {
        dump::trace_values(&self.command.to_string(), &self.values);
    }
}
