//! HTTP header decoder for parsing the request line and header block.
//!
//! The decoder waits until the blank line ending the header block is buffered,
//! splits the block off the source buffer and parses it line by line:
//!
//! 1. The request line must match `METHOD SP PATH SP HTTP/VERSION`. Any other
//!    shape fails with [`ParseError::InvalidRequestLine`].
//! 2. Each following line is matched as `Key: Value` (the space after the colon
//!    is optional) and inserted into the header map. The first line that does
//!    not match ends the header section.
//! 3. A `Content-Length` header selects [`PayloadSize::Length`], its absence
//!    [`PayloadSize::Empty`].
//!
//! # Limits
//!
//! - Maximum header size: 8KB
//!
//! Bytes following the header block are left in the buffer untouched.

use bytes::BytesMut;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{ParseError, PayloadSize, RequestHead};

/// Maximum size in bytes allowed for the entire header section
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Marks the end of the header section
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

const LINE_DELIMITER: &str = "\r\n";

static REQUEST_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^ ]*) ([^ ]*) HTTP/([^ ]*)$").expect("request line pattern must compile"));

static HEADER_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^:]*): ?(.*)$").expect("header line pattern must compile"));

/// Decoder for HTTP request headers implementing the [`Decoder`] trait.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderDecoder;

impl Decoder for HeaderDecoder {
    type Item = (RequestHead, PayloadSize);
    type Error = ParseError;

    /// Attempts to decode a request head from the provided bytes buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((head, payload_size)))` if a complete header block was parsed
    /// - `Ok(None)` if more data is needed
    /// - `Err(ParseError)` if parsing failed; a complete but malformed block has
    ///   been consumed from `src` when this happens
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(terminator_index) = find_terminator(src) else {
            ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
            return Ok(None);
        };

        let header_size = terminator_index + HEADER_TERMINATOR.len();
        ensure!(header_size <= MAX_HEADER_BYTES, ParseError::too_large_header(header_size, MAX_HEADER_BYTES));

        let header_bytes = src.split_to(header_size).freeze();
        trace!(header_size, remaining = src.len(), "split header block");

        let header_text = String::from_utf8_lossy(&header_bytes[..terminator_index]);
        let head = parse_head(&header_text)?;
        let payload_size = parse_payload(&head)?;

        Ok(Some((head, payload_size)))
    }
}

fn find_terminator(src: &[u8]) -> Option<usize> {
    src.windows(HEADER_TERMINATOR.len()).position(|window| window == HEADER_TERMINATOR)
}

/// Parses the header block, terminator excluded.
fn parse_head(header_text: &str) -> Result<RequestHead, ParseError> {
    let mut lines = header_text.split(LINE_DELIMITER);

    let request_line = lines.next().unwrap_or_default();
    let captures = REQUEST_LINE.captures(request_line).ok_or_else(|| ParseError::invalid_request_line(request_line))?;

    let mut head = RequestHead::new(&captures[1], &captures[2], &captures[3]);

    for line in lines {
        let Some(captures) = HEADER_LINE.captures(line) else {
            trace!(line, "stop header parsing at unmatched line");
            break;
        };
        head.insert_header(&captures[1], &captures[2]);
    }

    Ok(head)
}

/// Determines the payload size from the `Content-Length` header.
///
/// Spellings differing only in case must carry the same value.
fn parse_payload(head: &RequestHead) -> Result<PayloadSize, ParseError> {
    let Some(value) = head.content_length() else {
        return Ok(PayloadSize::new_empty());
    };

    let value = value.trim();
    ensure!(
        head.content_length_values().all(|other| other.trim() == value),
        ParseError::invalid_content_length(format!("conflicting values, last is {value}"))
    );

    let length = value.parse::<u64>().map_err(|e| ParseError::invalid_content_length(format!("value {value}: {e}")))?;

    Ok(PayloadSize::new_length(length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn crlf(text: &str) -> BytesMut {
        BytesMut::from(text.replace('\n', "\r\n").as_str())
    }

    #[test]
    fn from_curl() {
        let mut buf = crlf(indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "##});

        let (head, payload_size) = HeaderDecoder.decode(&mut buf).unwrap().unwrap();

        assert!(payload_size.is_empty());
        assert!(buf.is_empty());

        assert_eq!(head.method(), "GET");
        assert_eq!(head.path(), "/index.html");
        assert_eq!(head.version(), "1.1");

        assert_eq!(head.headers().len(), 3);
        assert_eq!(head.header("Host"), Some("127.0.0.1:8080"));
        assert_eq!(head.header("User-Agent"), Some("curl/7.79.1"));
        assert_eq!(head.header("Accept"), Some("*/*"));
    }

    #[test]
    fn from_edge() {
        let mut buf = crlf(indoc! {r##"
        GET /index/?a=1&b=2&a=3 HTTP/1.1
        Host: 127.0.0.1:8080
        Connection: keep-alive
        Cache-Control: max-age=0
        sec-ch-ua: "#Not_A Brand";v="99", "Microsoft Edge";v="109", "Chromium";v="109"
        sec-ch-ua-mobile: ?0
        sec-ch-ua-platform: "macOS"
        Upgrade-Insecure-Requests: 1
        Accept-Encoding: gzip, deflate, br
        Accept-Language: zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7

        "##});

        let (head, payload_size) = HeaderDecoder.decode(&mut buf).unwrap().unwrap();

        assert!(payload_size.is_empty());
        assert_eq!(head.path(), "/index/?a=1&b=2&a=3");
        assert_eq!(head.headers().len(), 9);

        assert_eq!(head.header("Connection"), Some("keep-alive"));
        assert_eq!(head.header("sec-ch-ua"), Some(r##""#Not_A Brand";v="99", "Microsoft Edge";v="109", "Chromium";v="109""##));
        assert_eq!(head.header("sec-ch-ua-platform"), Some("\"macOS\""));
        assert_eq!(head.header("Accept-Language"), Some("zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7"));
    }

    #[test]
    fn leaves_body_bytes_in_buffer() {
        let mut buf = BytesMut::from(&b"POST /string HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello"[..]);

        let (head, payload_size) = HeaderDecoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.method(), "POST");
        assert_eq!(payload_size, PayloadSize::Length(5));
        assert_eq!(&buf[..], b"hello");
    }

    #[test]
    fn partial_header_needs_more_data() {
        let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\nHost: x\r\n"[..]);

        assert!(HeaderDecoder.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 25);

        buf.extend_from_slice(b"\r\n");
        let (head, _) = HeaderDecoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(head.header("Host"), Some("x"));
    }

    #[test]
    fn invalid_request_line_consumes_block() {
        let mut buf = BytesMut::from(&b"GARBAGE\r\nHost: x\r\n\r\nGET / HTTP/1.1\r\n\r\n"[..]);

        let result = HeaderDecoder.decode(&mut buf);
        assert!(matches!(result, Err(ParseError::InvalidRequestLine { ref line }) if line == "GARBAGE"));
        assert_eq!(&buf[..], b"GET / HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn request_line_needs_single_spaces() {
        let mut buf = BytesMut::from(&b"GET  / HTTP/1.1\r\n\r\n"[..]);
        assert!(matches!(HeaderDecoder.decode(&mut buf), Err(ParseError::InvalidRequestLine { .. })));

        let mut buf = BytesMut::from(&b"GET / FTP/1.1\r\n\r\n"[..]);
        assert!(matches!(HeaderDecoder.decode(&mut buf), Err(ParseError::InvalidRequestLine { .. })));
    }

    #[test]
    fn request_line_tokens_are_split_on_spaces() {
        let cases = [("GET", "/", "1.1"), ("POST", "/match/abc123", "1.0"), ("DELETE", "/a?b=c", "2"), ("M-SEARCH", "*", "1.1")];

        for (method, path, version) in cases {
            let mut buf = BytesMut::from(format!("{method} {path} HTTP/{version}\r\n\r\n").as_str());
            let (head, _) = HeaderDecoder.decode(&mut buf).unwrap().unwrap();

            assert_eq!(head.method(), method);
            assert_eq!(head.path(), path);
            assert_eq!(head.version(), version);
        }
    }

    #[test]
    fn stops_at_first_unmatched_header_line() {
        let mut buf = crlf(indoc! {r##"
        GET / HTTP/1.1
        Host: x
        not a header line
        Accept: */*

        "##});

        let (head, _) = HeaderDecoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.headers().len(), 1);
        assert_eq!(head.header("Host"), Some("x"));
        assert_eq!(head.header("Accept"), None);
    }

    #[test]
    fn header_space_after_colon_is_optional() {
        let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\nA:1\r\nB: 2\r\nC:  3\r\n\r\n"[..]);

        let (head, _) = HeaderDecoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.header("A"), Some("1"));
        assert_eq!(head.header("B"), Some("2"));
        assert_eq!(head.header("C"), Some(" 3"));
    }

    #[test]
    fn duplicate_header_keeps_last_value() {
        let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\nX-Id: 1\r\nx-id: 2\r\nX-Id: 3\r\n\r\n"[..]);

        let (head, _) = HeaderDecoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.headers().len(), 2);
        assert_eq!(head.header("X-Id"), Some("3"));
        assert_eq!(head.header("x-id"), Some("2"));
    }

    #[test]
    fn invalid_content_length() {
        let mut buf = BytesMut::from(&b"POST / HTTP/1.1\r\nContent-Length: five\r\n\r\n"[..]);
        assert!(matches!(HeaderDecoder.decode(&mut buf), Err(ParseError::InvalidContentLength { .. })));

        let mut buf = BytesMut::from(&b"POST / HTTP/1.1\r\nContent-Length: -1\r\n\r\n"[..]);
        assert!(matches!(HeaderDecoder.decode(&mut buf), Err(ParseError::InvalidContentLength { .. })));
    }

    #[test]
    fn conflicting_content_length_spellings_are_rejected() {
        for _ in 0..64 {
            let mut buf = BytesMut::from(&b"POST / HTTP/1.1\r\ncontent-length: 3\r\nCONTENT-LENGTH: 5\r\n\r\nabcde"[..]);
            assert!(matches!(HeaderDecoder.decode(&mut buf), Err(ParseError::InvalidContentLength { .. })));
        }
    }

    #[test]
    fn agreeing_content_length_spellings_are_accepted() {
        let mut buf = BytesMut::from(&b"POST / HTTP/1.1\r\ncontent-length: 5\r\nContent-Length:5\r\n\r\nhello"[..]);

        let (_, payload_size) = HeaderDecoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(payload_size, PayloadSize::Length(5));
    }

    #[test]
    fn lowercase_content_length_is_honored() {
        let mut buf = BytesMut::from(&b"POST / HTTP/1.1\r\ncontent-length: 2\r\n\r\nhi"[..]);

        let (_, payload_size) = HeaderDecoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(payload_size, PayloadSize::Length(2));
    }

    #[test]
    fn too_large_header() {
        let mut buf = BytesMut::from(format!("GET / HTTP/1.1\r\nX-Big: {}", "a".repeat(MAX_HEADER_BYTES)).as_str());

        let result = HeaderDecoder.decode(&mut buf);
        assert!(matches!(result, Err(ParseError::TooLargeHeader { max_size: MAX_HEADER_BYTES, .. })));
    }
}
