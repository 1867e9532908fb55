//! HTTP request decoder module
//!
//! This module provides functionality for decoding HTTP requests from a read
//! buffer. It handles both header parsing and payload slicing through a state
//! machine pattern.
//!
//! # Components
//!
//! - [`RequestDecoder`]: Main decoder that coordinates header and payload parsing
//! - Header parsing: Uses [`HeaderDecoder`] for parsing the request head
//! - Payload handling: Uses [`LengthDecoder`] for `Content-Length` bodies
//!
//! # Example
//!
//! ```no_run
//! use mini_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::new();
//! // ... add request data to buffer ...
//! let result = decoder.decode(&mut buffer);
//! ```

use crate::codec::body::LengthDecoder;
use crate::codec::header::HeaderDecoder;
use crate::protocol::{Message, ParseError, PayloadSize, RequestHead};
use bytes::BytesMut;
use tokio_util::codec::Decoder;

/// A decoder for HTTP requests that handles both headers and payload
///
/// The decoder operates in two phases:
/// 1. Header parsing: Decodes the request head using [`HeaderDecoder`]
/// 2. Payload parsing: If a length was declared, waits for the whole body using [`LengthDecoder`]
///
/// # State Machine
///
/// The decoder maintains its state through the `payload_decoder` field:
/// - `None`: Currently parsing headers
/// - `Some(LengthDecoder)`: Currently waiting for the payload
#[derive(Debug, Default)]
pub struct RequestDecoder {
    header_decoder: HeaderDecoder,
    payload_decoder: Option<LengthDecoder>,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while a declared payload has not been fully decoded.
    #[inline]
    pub fn is_payload_pending(&self) -> bool {
        self.payload_decoder.is_some()
    }

    /// Upper bound for the next transport read.
    ///
    /// While a payload is pending this is exactly the number of bytes still
    /// missing from `src`, so the reader never consumes bytes of a following
    /// request. While parsing headers there is no bound.
    pub fn read_limit(&self, src: &BytesMut) -> Option<u64> {
        self.payload_decoder.as_ref().map(|decoder| decoder.remaining(src))
    }
}

impl Decoder for RequestDecoder {
    type Item = Message<(RequestHead, PayloadSize)>;
    type Error = ParseError;

    /// Attempts to decode an HTTP request from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Message::Header(_)))`: Successfully decoded request head
    /// - `Ok(Some(Message::Payload(_)))`: Successfully decoded the whole payload
    /// - `Ok(None)`: Need more data to proceed
    /// - `Err(_)`: Encountered a parsing error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // parse payload if have payload_decoder
        if let Some(payload_decoder) = &mut self.payload_decoder {
            let message = match payload_decoder.decode(src)? {
                Some(bytes) => {
                    // no need payload decoder in this request now
                    self.payload_decoder.take();
                    Some(Message::Payload(bytes))
                }
                None => None,
            };

            return Ok(message);
        }

        // parse request
        let message = match self.header_decoder.decode(src)? {
            Some((head, payload_size)) => {
                if let PayloadSize::Length(length) = payload_size {
                    self.payload_decoder = Some(LengthDecoder::new(length));
                }
                Some(Message::Header((head, payload_size)))
            }
            None => None,
        };

        Ok(message)
    }
}
