//! UDP control gate.
//!
//! Plain ASCII datagrams switch the TCP service: a payload starting with `ON`
//! starts it, one starting with `OFF` stops it for good. There is no
//! acknowledgement or authentication; anything else is dropped silently.

use std::io;
use std::net::SocketAddr;

use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::error::ServerError;

/// Datagrams are read into a buffer this size; longer ones are truncated.
pub const CONTROL_DATAGRAM_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    AwaitingOn,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    Continue,
    Stop,
}

pub fn is_start_command(payload: &[u8]) -> bool {
    payload.starts_with(b"ON")
}

pub fn is_stop_command(payload: &[u8]) -> bool {
    payload.starts_with(b"OFF")
}

#[derive(Debug)]
pub struct ControlGate {
    socket: UdpSocket,
    state: GateState,
}

impl ControlGate {
    pub fn new(socket: UdpSocket) -> Self {
        Self {
            socket,
            state: GateState::AwaitingOn,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Blocks until a datagram starting with `ON` arrives.
    ///
    /// Every other datagram, including empty ones, is ignored. A receive
    /// error is fatal.
    pub async fn await_start(&mut self) -> Result<(), ServerError> {
        let mut buf = [0u8; CONTROL_DATAGRAM_LEN];

        loop {
            let len = self.recv(&mut buf).await?;
            if is_start_command(&buf[..len]) {
                break;
            }
            debug!("ignoring {} byte control datagram while waiting for ON", len);
        }

        info!("Received ON");
        self.state = GateState::Running;
        Ok(())
    }

    /// Reads exactly one datagram and reports whether it asked to stop.
    ///
    /// Cancel safe: if the future is dropped before a datagram arrives,
    /// nothing has been consumed.
    pub async fn check_stop(&mut self) -> Result<ControlSignal, ServerError> {
        let mut buf = [0u8; CONTROL_DATAGRAM_LEN];
        let len = self.recv(&mut buf).await?;

        if is_stop_command(&buf[..len]) {
            info!("Received OFF");
            self.state = GateState::Stopped;
            return Ok(ControlSignal::Stop);
        }

        debug!("ignoring {} byte control datagram", len);
        Ok(ControlSignal::Continue)
    }

    async fn recv(&self, buf: &mut [u8]) -> Result<usize, ServerError> {
        self.socket
            .recv(buf)
            .await
            .map_err(|source| ServerError::Communication {
                context: "udp recv",
                source,
            })
    }
}
