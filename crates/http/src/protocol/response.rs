//! The output sink handed to handlers.
//!
//! Handlers write raw response bytes (status line, headers, body) into a
//! [`ResponseWriter`]; the connection transmits them verbatim once the handler
//! returns.

use std::fmt;
use std::io;

use bytes::{BufMut, BytesMut};
use http::StatusCode;
use mime::Mime;

/// Initial buffer size allocated for a response
const INIT_RESPONSE_SIZE: usize = 4 * 1024;

#[derive(Debug, Default)]
pub struct ResponseWriter {
    buffer: BytesMut,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::with_capacity(INIT_RESPONSE_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { buffer: BytesMut::with_capacity(capacity) }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.buffer.put_slice(bytes);
    }

    /// Writes a complete HTTP/1.1 response with a `Content-Length` framed body.
    pub fn write_response(&mut self, status: StatusCode, content_type: &Mime, body: &[u8]) {
        self.write_head(status, Some(content_type), body.len());
        self.buffer.put_slice(body);
    }

    /// Writes a status line and framing headers, leaving the body to the caller.
    pub fn write_head(&mut self, status: StatusCode, content_type: Option<&Mime>, content_length: usize) {
        let reason = status.canonical_reason().unwrap_or("");
        self.buffer.reserve(128);
        self.buffer.put_slice(b"HTTP/1.1 ");
        self.buffer.put_slice(status.as_str().as_bytes());
        self.buffer.put_u8(b' ');
        self.buffer.put_slice(reason.as_bytes());
        self.buffer.put_slice(b"\r\n");

        if let Some(content_type) = content_type {
            self.buffer.put_slice(b"Content-Type: ");
            self.buffer.put_slice(content_type.as_ref().as_bytes());
            self.buffer.put_slice(b"\r\n");
        }

        self.buffer.put_slice(b"Content-Length: ");
        self.buffer.put_slice(content_length.to_string().as_bytes());
        self.buffer.put_slice(b"\r\n\r\n");
    }
}

impl io::Write for ResponseWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Write for ResponseWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buffer.put_slice(s.as_bytes());
        Ok(())
    }
}
