//! HTTP body handling module
//!
//! - [`LengthDecoder`]: slices a `Content-Length` payload off the read buffer
//!   and reports how many bytes are still missing from the transport
//!
//! Chunked transfer encoding is not supported.

mod length_decoder;

pub use length_decoder::LengthDecoder;
