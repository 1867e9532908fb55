use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::protocol::SendError;

/// Write half of a connection.
///
/// Every response is handed over as one complete byte slice and written with a
/// single `write_all` followed by a flush.
#[derive(Debug)]
pub struct MessageWriter<W> {
    writer: W,
}

impl<W> MessageWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn send(&mut self, bytes: &[u8]) -> Result<(), SendError> {
        if !bytes.is_empty() {
            self.writer.write_all(bytes).await?;
        }

        Ok(self.writer.flush().await?)
    }

    /// Shuts the write half down. The peer reads EOF afterwards.
    pub async fn shutdown(&mut self) {
        if let Err(e) = self.writer.shutdown().await {
            trace!(cause = %e, "shutdown transport failed");
        }
    }
}
