//! WPD Command - Request/response command protocol
//!
//! This crate sends strongly-typed property mappings to a device:
//! - Command requests seeded with the command's category and id
//! - A single blocking send through a [`Transport`]
//! - Status classification into success, "not supported", or a fatal error
//! - A CBOR wire codec for byte-level links

pub mod command;
pub mod dump;
pub mod keys;
pub mod status;
pub mod transport;
pub mod wire;

pub use command::{CommandRequest, CommandResult, Outcome};
pub use dump::{render_values, render_values_with};
pub use status::{classify, CommandError, Status};
pub use transport::{CborTransport, Link, ScriptedTransport, Transport, TransportError};
pub use wire::WireError;
