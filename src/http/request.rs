use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::headers::HeaderMap;
use crate::http::parser::{find_crlf, parse_request_line, ParseError, RequestLine, CRLF};

/// A fully parsed request.
///
/// Built in one go from a complete input buffer; a request that fails to
/// parse anywhere is never partially returned.
#[derive(Debug, Clone)]
pub struct Request {
    pub request_line: RequestLine,
    pub headers: HeaderMap,
    /// Bytes following the header block, exactly as received.
    pub body: Bytes,
}

impl Request {
    /// Reads `reader` until end-of-input and parses what arrived.
    ///
    /// There is no timeout: a peer that never closes its write side keeps
    /// this pending.
    pub async fn from_reader<R>(reader: &mut R) -> Result<Self, ParseError>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = Vec::with_capacity(4096);
        reader.read_to_end(&mut buf).await?;
        Self::from_bytes(&buf)
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self, ParseError> {
        let line_end = find_crlf(buf).ok_or(ParseError::InvalidRequestLine)?;
        let request_line = parse_request_line(&buf[..line_end])?;

        let mut headers = HeaderMap::new();
        let mut pos = line_end + CRLF.len();
        loop {
            let step = headers.parse(&buf[pos..])?;
            pos += step.consumed;
            if step.done {
                break;
            }
            if step.consumed == 0 {
                return Err(ParseError::UnterminatedHeaders);
            }
        }

        Ok(Self {
            request_line,
            headers,
            body: Bytes::copy_from_slice(&buf[pos..]),
        })
    }

    pub fn method(&self) -> &str {
        &self.request_line.method
    }

    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}
