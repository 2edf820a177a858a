//! tcphttp - HTTP/1.1 framing over raw TCP
//!
//! Core library for request parsing, response writing and the connection server.

pub mod config;
pub mod http;
pub mod server;
