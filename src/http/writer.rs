use std::fmt;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::headers::HeaderMap;
use crate::http::parser::CRLF;
use crate::http::response::StatusCode;

/// Where a [`ResponseWriter`] is in the response.
///
/// Writing trailers moves back to `WritingBody`, which then only marks the
/// response as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    AwaitingStatus,
    AwaitingHeaders,
    WritingBody,
    AwaitingTrailers,
}

impl fmt::Display for WriterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriterState::AwaitingStatus => "awaiting status",
            WriterState::AwaitingHeaders => "awaiting headers",
            WriterState::WritingBody => "writing body",
            WriterState::AwaitingTrailers => "awaiting trailers",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    #[error("response writer is {actual}, expected {expected}")]
    State {
        expected: WriterState,
        actual: WriterState,
    },

    #[error("failed to write response")]
    Io(#[from] std::io::Error),
}

/// Writes one response to `sink` in wire order.
///
/// Each call checks the state first and fails without writing anything if it
/// is out of order. Bytes are flushed before a call returns; the state only
/// advances once they are.
pub struct ResponseWriter<W> {
    sink: W,
    state: WriterState,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            state: WriterState::AwaitingStatus,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), WriterError> {
        self.require(WriterState::AwaitingStatus)?;
        self.emit(status.status_line().as_bytes()).await?;
        self.state = WriterState::AwaitingHeaders;
        Ok(())
    }

    pub async fn write_headers(&mut self, headers: &HeaderMap) -> Result<(), WriterError> {
        self.require(WriterState::AwaitingHeaders)?;
        self.emit(&headers.to_wire()).await?;
        self.state = WriterState::WritingBody;
        Ok(())
    }

    /// Raw body bytes, no framing.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, WriterError> {
        self.require(WriterState::WritingBody)?;
        self.emit(body).await?;
        Ok(body.len())
    }

    /// One `<hex-len>\r\n<payload>\r\n` frame. Returns bytes put on the wire.
    pub async fn write_chunked_body(&mut self, chunk: &[u8]) -> Result<usize, WriterError> {
        self.require(WriterState::WritingBody)?;
        let mut frame = format!("{:x}\r\n", chunk.len()).into_bytes();
        frame.extend_from_slice(chunk);
        frame.extend_from_slice(CRLF);
        self.emit(&frame).await?;
        Ok(frame.len())
    }

    /// The terminal `0\r\n`. Trailers (possibly none) must follow.
    pub async fn write_chunked_body_done(&mut self) -> Result<usize, WriterError> {
        const LAST_CHUNK: &[u8] = b"0\r\n";

        self.require(WriterState::WritingBody)?;
        self.emit(LAST_CHUNK).await?;
        self.state = WriterState::AwaitingTrailers;
        Ok(LAST_CHUNK.len())
    }

    pub async fn write_trailers(&mut self, trailers: &HeaderMap) -> Result<(), WriterError> {
        self.require(WriterState::AwaitingTrailers)?;
        self.emit(&trailers.to_wire()).await?;
        self.state = WriterState::WritingBody;
        Ok(())
    }

    fn require(&self, expected: WriterState) -> Result<(), WriterError> {
        if self.state != expected {
            return Err(WriterError::State {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    async fn emit(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.sink.write_all(bytes).await?;
        self.sink.flush().await
    }
}
