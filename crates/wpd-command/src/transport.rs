//! Device transports that carry a command mapping to the device and back

use std::collections::VecDeque;

use thiserror::Error;
use tracing::{debug, trace};
use wpd_core::PropertyValues;

use crate::wire::{self, WireError};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Wire format error: {0}")]
    Wire(#[from] WireError),
    #[error("Device disconnected")]
    Disconnected,
    #[error("No response available")]
    NoResponse,
    #[error("Transport failed: {0}")]
    Other(String),
}

/// One blocking request/response round trip against a device handle.
///
/// `&mut self` keeps a single command in flight per handle; sharing a handle
/// across threads needs an outer lock.
pub trait Transport {
    fn send_command(&mut self, request: &PropertyValues) -> Result<PropertyValues, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send_command(&mut self, request: &PropertyValues) -> Result<PropertyValues, TransportError> {
        (**self).send_command(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send_command(&mut self, request: &PropertyValues) -> Result<PropertyValues, TransportError> {
        (**self).send_command(request)
    }
}

/// A byte-level channel to a device
pub trait Link {
    fn transceive(&mut self, request: &[u8]) -> std::io::Result<Vec<u8>>;
}

/// Transport that speaks the CBOR wire format over a [`Link`]
pub struct CborTransport<L> {
    link: L,
}

impl<L: Link> CborTransport<L> {
    pub fn new(link: L) -> Self {
        Self { link }
    }

    pub fn into_inner(self) -> L {
        self.link
    }
}

impl<L: Link> Transport for CborTransport<L> {
    fn send_command(&mut self, request: &PropertyValues) -> Result<PropertyValues, TransportError> {
        let body = wire::encode_values(request)?;
        trace!(entries = request.len(), body_len = body.len(), "Sending command mapping");

        let response = self.link.transceive(&body)?;
        let values = wire::decode_values(&response)?;

        debug!(
            body_len = response.len(),
            entries = values.len(),
            "Received command mapping"
        );
        Ok(values)
    }
}

/// Replays queued responses in order and records every request it sees
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: VecDeque<Result<PropertyValues, TransportError>>,
    requests: Vec<PropertyValues>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response mapping
    pub fn respond(&mut self, response: PropertyValues) -> &mut Self {
        self.responses.push_back(Ok(response));
        self
    }

    /// Queue a transport fault
    pub fn fail(&mut self, error: TransportError) -> &mut Self {
        self.responses.push_back(Err(error));
        self
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> &[PropertyValues] {
        &self.requests
    }

    pub fn pending(&self) -> usize {
        self.responses.len()
    }
}

impl Transport for ScriptedTransport {
    fn send_command(&mut self, request: &PropertyValues) -> Result<PropertyValues, TransportError> {
        self.requests.push(request.clone());
        self.responses
            .pop_front()
            .unwrap_or(Err(TransportError::NoResponse))
    }
}
