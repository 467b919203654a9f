//! Background process support.

use std::io;

use crate::error::ServerError;

/// Detaches from the controlling terminal.
///
/// The working directory is kept and the standard streams are redirected to
/// `/dev/null`. Must run before the async runtime starts any threads.
pub fn daemonize() -> Result<(), ServerError> {
    // SAFETY: called from the single-threaded start of `main`.
    let rc = unsafe { libc::daemon(1, 0) };
    if rc == -1 {
        return Err(ServerError::Runtime(format!(
            "daemon: {}",
            io::Error::last_os_error()
        )));
    }
    Ok(())
}
