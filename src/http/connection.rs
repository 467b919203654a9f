use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::http::handler::RequestHandler;
use crate::http::parser::{ParseError, parse_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// Bytes read per receive call; one call is one request.
pub const REQUEST_BUFFER_LEN: usize = 8096;

/// Worker session for one accepted connection.
///
/// Serves requests until the peer closes, the idle timeout elapses, a read
/// fails, or a response asks for the connection to close.
pub struct Connection<S> {
    stream: S,
    peer: String,
    buffer: BytesMut,
    idle_timeout: Duration,
    handler: Arc<RequestHandler>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Result<Request, ParseError>),
    Writing(Response),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(
        stream: S,
        peer: impl Into<String>,
        idle_timeout: Duration,
        handler: Arc<RequestHandler>,
    ) -> Self {
        Self {
            stream,
            peer: peer.into(),
            buffer: BytesMut::with_capacity(REQUEST_BUFFER_LEN),
            idle_timeout,
            handler,
            state: ConnectionState::Reading,
        }
    }

    /// Runs the session to completion. An error means a response could not
    /// be written; the connection is dropped either way.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            // Each arm takes ownership of the state and hands back the next one.
            self.state = match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => match self.read_request().await {
                    Some(parsed) => ConnectionState::Processing(parsed),
                    None => ConnectionState::Closed,
                },

                ConnectionState::Processing(parsed) => {
                    let response = match parsed {
                        Ok(request) => {
                            info!(
                                "{} -> {} {}",
                                self.peer,
                                request.method.as_str(),
                                request.display_path()
                            );
                            self.handler.respond(&request).await
                        }
                        Err(e) => {
                            info!("{} -> rejected: {}", self.peer, e);
                            Response::error(e.status())
                        }
                    };
                    ConnectionState::Writing(response)
                }

                ConnectionState::Writing(response) => {
                    let status = response.status();
                    let close = response.head.closes_connection();

                    ResponseWriter::new(response)
                        .write_to_stream(&mut self.stream)
                        .await?;
                    info!(
                        "{} <- [{} {}]",
                        self.peer,
                        status.as_u16(),
                        status.reason_phrase()
                    );

                    if close {
                        ConnectionState::Closed
                    } else {
                        ConnectionState::Reading // wait for the next request
                    }
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    /// Waits for one receive call worth of request bytes.
    ///
    /// Returns `None` when the session should end: idle timeout, read error
    /// or peer close.
    async fn read_request(&mut self) -> Option<Result<Request, ParseError>> {
        self.buffer.clear();

        match timeout(self.idle_timeout, self.stream.read_buf(&mut self.buffer)).await {
            Err(_) => {
                info!(
                    "No requests from {} for {} seconds, closing session",
                    self.peer,
                    self.idle_timeout.as_secs()
                );
                None
            }
            Ok(Err(e)) => {
                warn!("recv from {}: {}", self.peer, e);
                None
            }
            Ok(Ok(0)) => None,
            Ok(Ok(n)) => Some(parse_request(&self.buffer[..n])),
        }
    }
}
