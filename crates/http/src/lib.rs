//! An asynchronous mini HTTP/1.x connection engine
//!
//! This crate accepts already-established transports (anything implementing
//! tokio's `AsyncRead`/`AsyncWrite`), parses requests off them, hands each
//! request to a [`handler::Handler`] and writes back whatever bytes the handler
//! produced. Routing, listening and threading live in `mini-web`.
//!
//! # Features
//!
//! - Request line and header parsing with a line grammar:
//!   `METHOD SP PATH SP HTTP/VERSION`, then `Key: Value` lines
//! - `Content-Length` bodies, read exactly before dispatch
//! - Keep-alive for HTTP/1.1 and above, sequential on one connection
//! - Raw responses: handlers write status line, headers and body themselves
//!
//! # Example
//!
//! ```no_run
//! use http::StatusCode;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn};
//! use mini_http::connection::HttpConnection;
//! use mini_http::handler::make_handler;
//! use mini_http::protocol::{Request, ResponseWriter};
//!
//! #[tokio::main]
//! async fn main() {
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = std::sync::Arc::new(make_handler(hello_world));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             if let Err(e) = HttpConnection::new(reader, writer).process(&handler).await {
//!                 error!("service has error, cause {}, connection shutdown", e);
//!             }
//!         });
//!     }
//! }
//!
//! fn hello_world(writer: &mut ResponseWriter, request: &Request) {
//!     info!("request path {}", request.path());
//!     writer.write_response(StatusCode::OK, &mime::TEXT_PLAIN_UTF_8, b"Hello World!\r\n");
//! }
//! ```
//!
//! # Architecture
//!
//! - [`connection`]: The request cycle of a single connection
//! - [`protocol`]: Request, response sink and error types
//! - [`codec`]: Request head and body decoding
//! - [`handler`]: The handler seam
//!
//! # Error Handling
//!
//! - [`protocol::HttpError`]: Top-level error type
//! - [`protocol::ParseError`]: Request parsing and read errors
//! - [`protocol::SendError`]: Response write errors
//!
//! Malformed requests are not errors of [`connection::HttpConnection::process`];
//! they are answered according to the [`connection::Fallback`] policy.
//!
//! # Limitations
//!
//! - No chunked transfer encoding
//! - No TLS (plug a TLS stream in as the transport)
//! - No idle timeout: a silent peer keeps its connection open
//! - Maximum header size: 8KB

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
