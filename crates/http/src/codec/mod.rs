//! HTTP codec module for decoding HTTP requests
//!
//! This module turns the bytes buffered from a connection into request heads
//! and payloads. It uses a state machine to switch between header parsing and
//! payload slicing.
//!
//! # Architecture
//!
//! - [`RequestDecoder`]: Decodes incoming HTTP requests
//!   - Header parsing via the `header` module
//!   - Payload slicing via the `body` module
//!
//! Responses are not encoded here: handlers write raw bytes into a
//! [`ResponseWriter`](crate::protocol::ResponseWriter) which the connection
//! transmits verbatim.
//!
//! # Example
//!
//! ```no_run
//! use mini_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut request_buffer = BytesMut::from("GET / HTTP/1.1\r\n\r\n");
//! let request = decoder.decode(&mut request_buffer);
//! ```

mod body;
mod header;
mod request_decoder;

pub use request_decoder::RequestDecoder;
