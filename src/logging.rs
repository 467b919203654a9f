//! Log sink selection.
//!
//! A [`LogConfig`] is built once at startup and installs the global tracing
//! subscriber. In the foreground events go to stderr; a daemonized process has
//! no terminal, so events are forwarded to the system log instead.

use std::ffi::CString;
use std::io::{self, Write};

use tracing::{Level, Metadata};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::ServerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    Syslog,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub sink: LogSink,
    /// Default filter directive, overridden by `RUST_LOG` when set.
    pub filter: String,
}

impl LogConfig {
    pub fn from_server_config(cfg: &ServerConfig) -> Self {
        Self {
            sink: if cfg.daemon { LogSink::Syslog } else { LogSink::Stderr },
            filter: cfg.log_filter.clone().unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Installs the global subscriber. Fails if one is already installed.
    pub fn init(&self) -> anyhow::Result<()> {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.filter));

        let installed = match self.sink {
            LogSink::Stderr => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_level(true)
                .with_writer(io::stderr)
                .try_init(),
            LogSink::Syslog => {
                open_syslog();
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_target(false)
                    .with_level(false)
                    .with_ansi(false)
                    .without_time()
                    .with_writer(SyslogMakeWriter)
                    .try_init()
            }
        };

        installed.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
    }
}

fn open_syslog() {
    // SAFETY: the ident is a static C string that outlives the process.
    unsafe {
        libc::openlog(c"switchd".as_ptr(), libc::LOG_PID, libc::LOG_LOCAL0);
    }
}

fn syslog_priority(level: &Level) -> libc::c_int {
    match *level {
        Level::ERROR => libc::LOG_ERR,
        Level::WARN => libc::LOG_WARNING,
        Level::INFO => libc::LOG_INFO,
        _ => libc::LOG_DEBUG,
    }
}

struct SyslogMakeWriter;

impl<'a> MakeWriter<'a> for SyslogMakeWriter {
    type Writer = SyslogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SyslogWriter::new(libc::LOG_INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        SyslogWriter::new(syslog_priority(meta.level()))
    }
}

/// Collects one formatted event and emits it as a single syslog record on drop.
struct SyslogWriter {
    priority: libc::c_int,
    buf: Vec<u8>,
}

impl SyslogWriter {
    fn new(priority: libc::c_int) -> Self {
        Self {
            priority,
            buf: Vec::with_capacity(256),
        }
    }
}

impl Write for SyslogWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for SyslogWriter {
    fn drop(&mut self) {
        let line: Vec<u8> = self
            .buf
            .iter()
            .copied()
            .filter(|&b| b != 0)
            .collect();
        let line = line.trim_ascii_end();
        if line.is_empty() {
            return;
        }
        if let Ok(msg) = CString::new(line) {
            // SAFETY: both pointers are valid NUL-terminated strings for the call.
            unsafe {
                libc::syslog(self.priority, c"%s".as_ptr(), msg.as_ptr());
            }
        }
    }
}
