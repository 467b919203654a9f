use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::http::response::{Body, Response, ResponseHead};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Serializes the status line and headers, ending with the blank line.
pub fn serialize_head(head: &ResponseHead) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128);

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        head.status.as_u16(),
        head.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    if let Some(len) = head.content_length.filter(|&len| len > 0) {
        buf.extend_from_slice(format!("Content-Length: {len}\r\n").as_bytes());
    }

    if let Some(content_type) = head.content_type {
        buf.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
    }

    if let Some(directive) = head.connection {
        buf.extend_from_slice(format!("Connection: {}\r\n", directive.as_str()).as_bytes());
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

pub struct ResponseWriter {
    head: Vec<u8>,
    written: usize,
    body: Body,
}

impl ResponseWriter {
    pub fn new(response: Response) -> Self {
        Self {
            head: serialize_head(&response.head),
            written: 0,
            body: response.body,
        }
    }

    /// Writes the head, then streams the body. Returns the body byte count.
    ///
    /// A spooled body is removed afterwards whether or not the write succeeded.
    pub async fn write_to_stream<S>(&mut self, stream: &mut S) -> anyhow::Result<u64>
    where
        S: AsyncWrite + Unpin,
    {
        let result = self.write_all(stream).await;

        if let Body::Spooled(path) = &self.body {
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!("failed to remove spool file {}: {}", path.display(), e);
            }
        }

        result
    }

    async fn write_all<S>(&mut self, stream: &mut S) -> anyhow::Result<u64>
    where
        S: AsyncWrite + Unpin,
    {
        while self.written < self.head.len() {
            let n = stream.write(&self.head[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        let sent = match &mut self.body {
            Body::Bytes(bytes) => {
                stream.write_all(bytes).await?;
                bytes.len() as u64
            }
            Body::File(file) => tokio::io::copy(file, stream).await?,
            Body::Spooled(path) => {
                let mut file = tokio::fs::File::open(&*path).await?;
                tokio::io::copy(&mut file, stream).await?
            }
        };

        stream.flush().await?;
        Ok(sent)
    }
}
