//! # Stdio Transport (C1)
//!
//! Length-prefixed framed JSON over stdin/stdout, for the browser-extension
//! relay. Each frame is a 4-byte little-endian length prefix followed by
//! exactly that many bytes of UTF-8 JSON, tagged by [`shared_types::Frame`]'s
//! `type` discriminant (`rpc_request` / `rpc_response` / `event`).
//!
//! One reader task owns stdin; writes are serialized behind an async mutex
//! so the reader loop, outbound responses, and broadcast events never
//! interleave a partial frame onto stdout.

use shared_types::Frame;
use std::future::Future;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Frames larger than this are refused rather than allocated; a malformed
/// or adversarial length prefix should not let a peer force an unbounded
/// allocation.
pub const MAX_FRAME_LEN: u32 = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("frame of {0} bytes exceeds the {MAX_FRAME_LEN}-byte limit")]
    FrameTooLarge(u32),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Read one length-prefixed frame from `reader`.
///
/// Returns `Ok(None)` on a clean EOF at a frame boundary (orderly
/// shutdown). A JSON decode failure is reported as `Ok(Some(Err(_)))` so
/// the reader loop can log and skip it instead of tearing the connection
/// down; `Err` is reserved for I/O failures and oversized frames.
async fn read_one_frame<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> Result<Option<Result<Frame, serde_json::Error>>, TransportError> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }
    let len = u32::from_le_bytes(len_buf);
    if len > MAX_FRAME_LEN {
        return Err(TransportError::FrameTooLarge(len));
    }

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await?;

    Ok(Some(serde_json::from_slice::<Frame>(&payload)))
}

/// Drive the read side of the transport until EOF or a fatal I/O error.
///
/// `on_frame` is invoked for every successfully decoded frame, in order.
/// A frame that fails to parse as JSON is logged and skipped; the loop
/// otherwise continues unless the underlying read fails or the peer sends
/// an oversized length prefix, either of which ends the connection.
pub async fn run_reader_loop<R, F, Fut>(mut reader: R, mut on_frame: F) -> Result<(), TransportError>
where
    R: AsyncRead + Unpin,
    F: FnMut(Frame) -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        match read_one_frame(&mut reader).await? {
            None => {
                tracing::info!("stdio transport reached EOF; shutting down reader loop");
                return Ok(());
            }
            Some(Ok(frame)) => on_frame(frame).await,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "skipping malformed frame on stdio transport");
            }
        }
    }
}

/// Single-writer-locked framed writer over stdout (or any `AsyncWrite`).
pub struct FramedWriter<W> {
    inner: Mutex<W>,
}

impl<W: AsyncWrite + Unpin> FramedWriter<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    /// Encode and write one frame, flushing afterward. Any failure here is
    /// fatal to the connection; the caller is expected to treat a write
    /// error as a reason to shut the transport down rather than retry.
    pub async fn send(&self, frame: &Frame) -> Result<(), TransportError> {
        let payload = serde_json::to_vec(frame)?;
        let len = u32::try_from(payload.len()).map_err(|_| TransportError::FrameTooLarge(u32::MAX))?;
        if len > MAX_FRAME_LEN {
            return Err(TransportError::FrameTooLarge(len));
        }

        let mut writer = self.inner.lock().await;
        writer.write_all(&len.to_le_bytes()).await?;
        writer.write_all(&payload).await?;
        writer.flush().await?;
        Ok(())
    }
}
