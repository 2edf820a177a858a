use std::net::SocketAddr;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::http::request::Request;
use crate::http::response::{default_headers, HandlerError, StatusCode};
use crate::http::writer::{ResponseWriter, WriterError};

/// Produces the body for a request by writing into the sink, or fails with
/// a status and message that replace whatever was written.
pub type Handler =
    Arc<dyn Fn(&mut BytesMut, &Request) -> Result<(), HandlerError> + Send + Sync>;

/// Wraps a closure as a [`Handler`].
pub fn handler_fn<F>(f: F) -> Handler
where
    F: Fn(&mut BytesMut, &Request) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Serves exactly one request on one stream, then closes it.
pub struct Connection<S> {
    stream: S,
    peer: SocketAddr,
    handler: Handler,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: SocketAddr, handler: Handler) -> Self {
        Self {
            stream,
            peer,
            handler,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        let result = self.serve_one().await;
        // Closed whatever happened above; a failed shutdown changes nothing.
        let _ = self.stream.shutdown().await;
        result
    }

    async fn serve_one(&mut self) -> anyhow::Result<()> {
        let request = match Request::from_reader(&mut self.stream).await {
            Ok(req) => req,
            Err(e) => {
                warn!(peer = %self.peer, error = %e, "Rejecting unparseable request");
                let mut writer = ResponseWriter::new(&mut self.stream);
                if let Err(e) = respond(&mut writer, StatusCode::InternalServerError, &[]).await {
                    debug!(peer = %self.peer, error = %e, "Could not send error response");
                }
                return Ok(());
            }
        };

        debug!(
            peer = %self.peer,
            method = %request.method(),
            target = %request.target(),
            headers = request.headers.len(),
            "Parsed request"
        );

        let mut body = BytesMut::new();
        let (status, body) = match (self.handler)(&mut body, &request) {
            Ok(()) => (StatusCode::Ok, body.freeze()),
            Err(e) => {
                warn!(
                    peer = %self.peer,
                    status = e.status.as_u16(),
                    message = %e.message,
                    "Handler returned an error"
                );
                (e.status, Bytes::from(e.message))
            }
        };

        let mut writer = ResponseWriter::new(&mut self.stream);
        respond(&mut writer, status, &body).await?;

        debug!(peer = %self.peer, status = status.as_u16(), bytes = body.len(), "Response sent");
        Ok(())
    }
}

/// Status line, default headers sized to `body`, then `body`.
async fn respond<W>(
    writer: &mut ResponseWriter<W>,
    status: StatusCode,
    body: &[u8],
) -> Result<(), WriterError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_status_line(status).await?;
    writer.write_headers(&default_headers(body.len())).await?;
    writer.write_body(body).await?;
    Ok(())
}
