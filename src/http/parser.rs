pub(crate) const CRLF: &[u8] = b"\r\n";

const SUPPORTED_VERSION: &str = "1.1";

/// Everything that can make a request unparseable.
///
/// Running out of buffered input is not one of them: the header parser
/// reports that as a step that consumed nothing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid request line")]
    InvalidRequestLine,

    #[error("invalid method: {0}")]
    InvalidMethod(String),

    #[error("unsupported HTTP version: {0}")]
    UnsupportedVersion(String),

    #[error("malformed header: missing colon")]
    MalformedHeader,

    #[error("invalid header name")]
    InvalidHeaderName,

    #[error("input ended before the end of the header block")]
    UnterminatedHeaders,

    #[error("failed to read request")]
    Io(#[from] std::io::Error),
}

/// The first line of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// Uppercase method token, e.g. `GET`
    pub method: String,
    /// Request target exactly as sent; not decoded or split
    pub target: String,
    /// Protocol version without the `HTTP/` prefix; always `1.1`
    pub version: String,
}

pub(crate) fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(CRLF.len()).position(|w| w == CRLF)
}

/// Parses a request line, given without its terminating CRLF.
///
/// Methods are restricted to uppercase ASCII letters, so extension methods
/// containing digits or `-` are rejected. Non-UTF-8 bytes in the target are
/// replaced rather than rejected.
pub fn parse_request_line(line: &[u8]) -> Result<RequestLine, ParseError> {
    let line = String::from_utf8_lossy(line);

    let parts: Vec<&str> = line.split(' ').collect();
    let &[method, target, protocol] = parts.as_slice() else {
        return Err(ParseError::InvalidRequestLine);
    };

    if method.is_empty() || !method.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ParseError::InvalidMethod(method.to_string()));
    }

    let version = protocol
        .strip_prefix("HTTP/")
        .filter(|v| *v == SUPPORTED_VERSION)
        .ok_or_else(|| ParseError::UnsupportedVersion(protocol.to_string()))?;

    Ok(RequestLine {
        method: method.to_string(),
        target: target.to_string(),
        version: version.to_string(),
    })
}
