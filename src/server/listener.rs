use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use crate::error::ServerError;
use crate::http::connection::Connection;
use crate::http::handler::RequestHandler;
use crate::server::control::{ControlGate, ControlSignal};
use crate::server::workers::WorkerSlots;

/// Multiplexes the TCP listener and the control socket while serving.
///
/// Once every worker slot has been used the listener is closed and dropped
/// from the wait set for the rest of the run.
pub struct AdmissionLoop {
    listener: Option<TcpListener>,
    gate: Option<ControlGate>,
    slots: WorkerSlots,
    handler: Arc<RequestHandler>,
    idle_timeout: Duration,
}

impl AdmissionLoop {
    pub fn new(
        listener: TcpListener,
        gate: Option<ControlGate>,
        max_workers: usize,
        handler: Arc<RequestHandler>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            listener: Some(listener),
            gate,
            slots: WorkerSlots::new(max_workers),
            handler,
            idle_timeout,
        }
    }

    /// Serves until the control gate reports `OFF`.
    ///
    /// Without a control socket this only returns on an accept failure.
    pub async fn serve(&mut self) -> Result<(), ServerError> {
        loop {
            tokio::select! {
                signal = next_control_signal(&mut self.gate) => {
                    if signal? == ControlSignal::Stop {
                        return Ok(());
                    }
                }

                accepted = next_connection(&self.listener) => {
                    let (stream, peer) = accepted.map_err(|source| ServerError::Communication {
                        context: "accept",
                        source,
                    })?;
                    self.admit(stream, peer);
                }
            }
        }
    }

    fn admit(&mut self, stream: TcpStream, peer: SocketAddr) {
        info!("New client: {}", peer);

        let handler = Arc::clone(&self.handler);
        let idle_timeout = self.idle_timeout;
        let admitted = self.slots.spawn(async move {
            let mut conn = Connection::new(stream, peer.to_string(), idle_timeout, handler);
            if let Err(e) = conn.run().await {
                warn!("Connection error from {}: {}", peer, e);
            }
        });

        if !admitted {
            warn!("no worker slot left for {}, dropping connection", peer);
        }

        if self.slots.is_full() && self.listener.take().is_some() {
            warn!(
                "worker limit of {} reached, no longer accepting connections",
                self.slots.capacity()
            );
        }
    }

    /// Closes the listener if still open and waits for every worker.
    pub async fn drain(mut self) -> usize {
        self.listener = None;
        info!("Waiting for workers to finish");
        let joined = self.slots.drain().await;
        info!("Workers done, exiting");
        joined
    }
}

async fn next_control_signal(gate: &mut Option<ControlGate>) -> Result<ControlSignal, ServerError> {
    match gate {
        Some(gate) => gate.check_stop().await,
        None => std::future::pending().await,
    }
}

async fn next_connection(listener: &Option<TcpListener>) -> io::Result<(TcpStream, SocketAddr)> {
    match listener {
        Some(listener) => listener.accept().await,
        None => std::future::pending().await,
    }
}
