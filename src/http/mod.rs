//! HTTP/1.1 message framing.
//!
//! # Architecture
//!
//! - **`parser`**: Request line parsing and the protocol error type
//! - **`headers`**: Header container and the incremental header block parser
//! - **`request`**: Assembles a [`request::Request`] from a finished byte stream
//! - **`response`**: Status codes, default headers and handler errors
//! - **`writer`**: Response serialization, including chunked bodies and trailers
//! - **`connection`**: Serves one request per accepted connection
//!
//! # Response Writer State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │  AwaitingStatus  │
//!        └────────┬─────────┘
//!                 │ write_status_line
//!                 ▼
//!        ┌──────────────────┐
//!        │ AwaitingHeaders  │
//!        └────────┬─────────┘
//!                 │ write_headers
//!                 ▼
//!        ┌──────────────────┐ ◄── write_body / write_chunked_body
//!        │   WritingBody    │
//!        └────────┬─────────┘
//!                 │ write_chunked_body_done
//!                 ▼
//!        ┌──────────────────┐
//!        │ AwaitingTrailers │ ── write_trailers ──► WritingBody (finished)
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tcphttp::http::writer::ResponseWriter;
//! use tcphttp::http::response::{default_headers, StatusCode};
//!
//! let mut writer = ResponseWriter::new(&mut stream);
//! writer.write_status_line(StatusCode::Ok).await?;
//! writer.write_headers(&default_headers(5)).await?;
//! writer.write_body(b"hello").await?;
//! ```

pub mod connection;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
