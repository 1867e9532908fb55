use std::io;

use bytes::BytesMut;
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio_util::codec::Decoder;
use tracing::{debug, error, trace};

use crate::codec::RequestDecoder;
use crate::connection::{Fallback, MessageWriter};
use crate::handler::{Handler, Outcome};
use crate::protocol::body::ReqBody;
use crate::protocol::{HttpError, Message, ParseError, PayloadSize, RequestHead, ResponseWriter};

/// Initial capacity of the read buffer
const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Minimum free space kept in the read buffer before an unbounded read
const READ_RESERVE: usize = 1024;

/// An HTTP connection that runs the request cycle over one transport.
///
/// `HttpConnection` handles the full lifecycle of an HTTP connection:
/// - Reading until a complete request head is buffered
/// - Reading exactly the declared body, if any
/// - Dispatching to the [`Handler`]
/// - Writing the produced bytes back
/// - Looping for keep-alive (HTTP/1.1 and above) or closing
///
/// Bytes read past the end of one request stay buffered and start the next
/// one.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: R,
    writer: MessageWriter<W>,
    read_buf: BytesMut,
    decoder: RequestDecoder,
    fallback: Fallback,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_capacity(reader, writer, READ_BUFFER_SIZE)
    }

    pub fn with_capacity(reader: R, writer: W, read_buffer_size: usize) -> Self {
        Self {
            reader,
            writer: MessageWriter::new(writer),
            read_buf: BytesMut::with_capacity(read_buffer_size),
            decoder: RequestDecoder::new(),
            fallback: Fallback::default(),
        }
    }

    /// Sets the policy for requests nothing responds to.
    #[must_use]
    pub fn fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Serves requests until the connection closes.
    ///
    /// Returns `Ok(())` when the peer closes between requests, after a
    /// response to a pre-1.1 request, or after an unanswered request. Transport
    /// failures end the connection with an error; nothing is retried.
    pub async fn process<H>(mut self, handler: &H) -> Result<(), HttpError>
    where
        H: Handler + ?Sized,
    {
        loop {
            let (head, payload_size) = match self.next_message().await {
                Ok(Some(Message::Header(header))) => header,

                Ok(Some(Message::Payload(_))) => {
                    error!("receive payload while awaiting request header");
                    return Err(ParseError::io(io::Error::new(io::ErrorKind::InvalidData, "payload without header")).into());
                }

                Ok(None) => {
                    debug!("cant read more request, break this connection down");
                    return Ok(());
                }

                Err(e) if e.is_malformed() => {
                    self.reject(&e).await?;
                    return Ok(());
                }

                Err(e) => return Err(e.into()),
            };

            trace!(method = head.method(), path = head.path(), version = head.version(), "parsed request head");

            let body = self.read_body(payload_size).await?;
            let mut request = head.body(body);
            let keep_alive = request.keep_alive();

            let mut response = ResponseWriter::new();
            match (handler.call(&mut response, &mut request), self.fallback) {
                (Outcome::Responded, _) => {}

                (Outcome::Unmatched, Fallback::Silent) => {
                    debug!(method = request.method(), path = request.path(), "no route matched, leave request unanswered");
                    self.writer.shutdown().await;
                    return Ok(());
                }

                (Outcome::Unmatched, Fallback::Status) => {
                    debug!(method = request.method(), path = request.path(), "no route matched");
                    response.write_head(StatusCode::NOT_FOUND, None, 0);
                }
            }
            drop(request);

            self.writer.send(response.as_bytes()).await?;
            trace!(size = response.len(), keep_alive, "response sent");

            if !keep_alive {
                self.writer.shutdown().await;
                return Ok(());
            }
        }
    }

    async fn read_body(&mut self, payload_size: PayloadSize) -> Result<Option<ReqBody>, ParseError> {
        if payload_size.is_empty() {
            return Ok(None);
        }

        match self.next_message().await? {
            Some(Message::Payload(bytes)) => Ok(Some(ReqBody::new(bytes))),
            // the decoder always yields the payload right after a sized header
            _ => Err(ParseError::io(io::Error::new(io::ErrorKind::InvalidData, "expect request payload"))),
        }
    }

    /// Decodes the next message, reading from the transport as needed.
    ///
    /// While a payload is pending, reads are capped at the number of missing
    /// payload bytes. `Ok(None)` means the peer closed with nothing buffered.
    async fn next_message(&mut self) -> Result<Option<Message<(RequestHead, PayloadSize)>>, ParseError> {
        loop {
            if let Some(message) = self.decoder.decode(&mut self.read_buf)? {
                return Ok(Some(message));
            }

            let read = match self.decoder.read_limit(&self.read_buf) {
                Some(limit) => (&mut self.reader).take(limit).read_buf(&mut self.read_buf).await,
                None => {
                    self.read_buf.reserve(READ_RESERVE);
                    self.reader.read_buf(&mut self.read_buf).await
                }
            }
            .map_err(ParseError::io)?;

            trace!(read, buffered = self.read_buf.len(), "read from transport");

            if read == 0 {
                if self.read_buf.is_empty() && !self.decoder.is_payload_pending() {
                    return Ok(None);
                }
                return Err(ParseError::io(io::ErrorKind::UnexpectedEof));
            }
        }
    }

    async fn reject(&mut self, error: &ParseError) -> Result<(), HttpError> {
        debug!(cause = %error, "malformed request, nothing to dispatch");

        if self.fallback == Fallback::Status {
            let mut response = ResponseWriter::with_capacity(64);
            response.write_head(StatusCode::BAD_REQUEST, None, 0);
            self.writer.send(response.as_bytes()).await?;
        }

        self.writer.shutdown().await;
        Ok(())
    }
}
