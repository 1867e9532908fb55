//! Decoder implementation for HTTP messages with Content-Length header.
//!
//! This module provides functionality to decode HTTP messages where the payload size
//! is specified by the Content-Length header, as defined in
//! [RFC 7230 Section 3.3.2](https://tools.ietf.org/html/rfc7230#section-3.3.2).

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;

use crate::protocol::{ParseError, PayloadSize};

/// A decoder for handling HTTP messages with a known content length.
///
/// Unlike a streaming decoder it yields the payload only once it is fully
/// buffered, as a single [`Bytes`]. Bytes past the declared length stay in the
/// buffer for the next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The declared payload length
    length: u64,
}

impl LengthDecoder {
    /// Creates a new LengthDecoder instance.
    ///
    /// # Arguments
    /// * `length` - The total content length to decode, specified by Content-Length header
    pub fn new(length: u64) -> Self {
        Self { length }
    }

    /// Number of payload bytes that still have to be read from the transport,
    /// given what `src` already holds. Never negative.
    #[inline]
    pub fn remaining(&self, src: &BytesMut) -> u64 {
        PayloadSize::Length(self.length).remaining(src.len())
    }
}

impl Decoder for LengthDecoder {
    type Item = Bytes;
    type Error = ParseError;

    /// Decodes the payload from the input buffer.
    ///
    /// # Returns
    /// * `Ok(Some(bytes))` once `length` bytes are buffered
    /// * `Ok(None)` when more data is needed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.remaining(src) > 0 {
            return Ok(None);
        }

        // remaining() is zero, so length fits into the buffered len
        let length = usize::try_from(self.length).unwrap_or(src.len());
        Ok(Some(src.split_to(length).freeze()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let mut buffer: BytesMut = BytesMut::from(&b"101234567890abcdef\r\n\r\n"[..]);

        let mut length_decoder = LengthDecoder::new(10);
        assert_eq!(length_decoder.remaining(&buffer), 0);

        let bytes = length_decoder.decode(&mut buffer).unwrap().unwrap();

        assert_eq!(bytes.len(), 10);
        assert_eq!(&bytes[..], b"1012345678");
        assert_eq!(&buffer[..], b"90abcdef\r\n\r\n");
    }

    #[test]
    fn waits_for_whole_payload() {
        let mut buffer = BytesMut::from(&b"he"[..]);

        let mut length_decoder = LengthDecoder::new(5);
        assert_eq!(length_decoder.remaining(&buffer), 3);
        assert!(length_decoder.decode(&mut buffer).unwrap().is_none());
        assert_eq!(&buffer[..], b"he");

        buffer.extend_from_slice(b"llo");
        assert_eq!(length_decoder.remaining(&buffer), 0);
        assert_eq!(&length_decoder.decode(&mut buffer).unwrap().unwrap()[..], b"hello");
        assert!(buffer.is_empty());
    }

    #[test]
    fn zero_length() {
        let mut buffer = BytesMut::from(&b"GET / HTTP/1.1\r\n\r\n"[..]);

        let bytes = LengthDecoder::new(0).decode(&mut buffer).unwrap().unwrap();

        assert!(bytes.is_empty());
        assert_eq!(buffer.len(), 18);
    }
}
