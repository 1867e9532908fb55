use bytes::Bytes;

/// Represents a decoded HTTP message that can either be a header or payload.
///
/// A request carrying a body is decoded as one `Header` followed by exactly one
/// `Payload` holding the whole body.
#[derive(Debug)]
pub enum Message<T> {
    /// Contains the header information of type `T`
    Header(T),
    /// Contains the complete payload
    Payload(Bytes),
}

/// Represents the size information of an HTTP request payload.
///
/// Only `Content-Length` framing is understood; a request without the
/// header carries no body at all.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PayloadSize {
    /// Payload with known length in bytes
    Length(u64),
    /// Empty payload (no body)
    Empty,
}

impl PayloadSize {
    #[inline]
    pub fn new_length(length: u64) -> Self {
        PayloadSize::Length(length)
    }

    #[inline]
    pub fn new_empty() -> Self {
        PayloadSize::Empty
    }

    /// Returns true if the payload is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, PayloadSize::Empty)
    }

    /// Number of bytes still missing from the transport when `buffered` bytes
    /// already sit behind the header terminator.
    ///
    /// A declared length smaller than what is buffered clamps to zero.
    #[inline]
    pub fn remaining(&self, buffered: usize) -> u64 {
        match self {
            PayloadSize::Length(length) => length.saturating_sub(buffered as u64),
            PayloadSize::Empty => 0,
        }
    }
}
