//! Fatal error taxonomy.
//!
//! Anything in here terminates the whole process. Per-request failures are
//! answered with an HTTP error page instead and never become a `ServerError`.

use std::io;

use thiserror::Error;

/// One-line usage summary printed on parameter errors.
pub const USAGE: &str = "switchd [-d] [-r root_dir] [tcp_port [udp_port]]";

#[derive(Debug, Error)]
pub enum ServerError {
    /// Bad command line usage or an unsafe serving root.
    #[error("{0}")]
    Parameter(String),

    /// A host or port could not be resolved to a socket address.
    #[error("cannot resolve {0}")]
    Address(String),

    /// Creating or binding a listening socket failed.
    #[error("socket error on {endpoint}: {source}")]
    Socket {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    /// Accepting a connection or reading the control channel failed.
    #[error("{context}: {source}")]
    Communication {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    /// Any other unexpected system failure.
    #[error("{0}")]
    Runtime(String),
}

impl ServerError {
    /// Process exit status for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            ServerError::Parameter(_) => 1,
            ServerError::Address(_) => 2,
            ServerError::Socket { .. } => 3,
            ServerError::Communication { .. } => 4,
            ServerError::Runtime(_) => 5,
        }
    }
}
