//! Service lifecycle.
//!
//! ```text
//! STARTUP ──► AWAITING_ON ──► SERVING ──► DRAINING ──► TERMINATED
//!    │        (control port       │  OFF        join every
//!    │         configured)        │             admitted worker
//!    └────────────────────────────┘
//!          (no control port)
//! ```
//!
//! - **`control`**: the UDP ON/OFF gate
//! - **`listener`**: the admission loop multiplexing TCP accepts and control datagrams
//! - **`workers`**: bounded, append-only bookkeeping of worker sessions

pub mod control;
pub mod listener;
pub mod workers;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, UdpSocket};
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::http::handler::RequestHandler;
use control::ControlGate;
use listener::AdmissionLoop;

/// Totals reported once the service has shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub workers_spawned: usize,
}

pub struct Server {
    listener: TcpListener,
    gate: Option<ControlGate>,
    config: Arc<ServerConfig>,
    handler: Arc<RequestHandler>,
}

impl Server {
    /// STARTUP: binds the TCP endpoint and, when configured, the control endpoint.
    ///
    /// `config.root` is served as-is, so it should already be validated.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let tcp_endpoint = config.tcp_endpoint();
        let tcp_addr = resolve(&tcp_endpoint).await?;
        let listener = TcpListener::bind(tcp_addr)
            .await
            .map_err(|source| ServerError::Socket {
                endpoint: tcp_endpoint.clone(),
                source,
            })?;
        info!("Listening on {}", listener.local_addr().unwrap_or(tcp_addr));

        let gate = match config.udp_endpoint() {
            Some(udp_endpoint) => {
                let udp_addr = resolve(&udp_endpoint).await?;
                // The listener is dropped, and so closed, if this fails.
                let socket = UdpSocket::bind(udp_addr)
                    .await
                    .map_err(|source| ServerError::Socket {
                        endpoint: udp_endpoint.clone(),
                        source,
                    })?;
                info!("Control channel on {}", socket.local_addr().unwrap_or(udp_addr));
                Some(ControlGate::new(socket))
            }
            None => None,
        };

        let handler = Arc::new(RequestHandler::new(config.root.clone(), config.spool_dir()));

        Ok(Self {
            listener,
            gate,
            config: Arc::new(config),
            handler,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn control_addr(&self) -> Option<SocketAddr> {
        self.gate.as_ref().and_then(|gate| gate.local_addr().ok())
    }

    /// Runs the remaining phases and returns once every worker has finished.
    pub async fn run(self) -> Result<RunSummary, ServerError> {
        let Server {
            listener,
            mut gate,
            config,
            handler,
        } = self;

        if let Some(gate) = gate.as_mut() {
            info!("Waiting for ON");
            gate.await_start().await?;
        }

        let mut admission = AdmissionLoop::new(
            listener,
            gate,
            config.max_workers,
            handler,
            config.idle_timeout(),
        );
        admission.serve().await?;

        let workers_spawned = admission.drain().await;
        Ok(RunSummary { workers_spawned })
    }
}

async fn resolve(endpoint: &str) -> Result<SocketAddr, ServerError> {
    tokio::net::lookup_host(endpoint)
        .await
        .ok()
        .and_then(|mut addrs| addrs.find(SocketAddr::is_ipv4))
        .ok_or_else(|| ServerError::Address(endpoint.to_string()))
}
