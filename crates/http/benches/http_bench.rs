use criterion::{Criterion, criterion_group, criterion_main};
use futures::executor::block_on;
use http::StatusCode;
use mini_http::codec::RequestDecoder;
use mini_http::connection::HttpConnection;
use mini_http::handler::make_handler;
use mini_http::protocol::{Request, ResponseWriter};
use std::hint::black_box;
use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio_util::codec::Decoder;

/// In-memory transport replaying one request stream.
#[derive(Clone)]
struct MockIO {
    read_data: Vec<u8>,
    write_data: Vec<u8>,
    read_pos: usize,
}

impl MockIO {
    fn new(read_data: Vec<u8>) -> Self {
        Self { read_data, write_data: Vec::new(), read_pos: 0 }
    }
}

impl AsyncRead for MockIO {
    fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let remaining = &self.read_data[self.read_pos..];
        let amt = std::cmp::min(remaining.len(), buf.remaining());
        buf.put_slice(&remaining[..amt]);
        self.read_pos += amt;
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockIO {
    fn poll_write(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize, io::Error>> {
        self.write_data.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        Poll::Ready(Ok(()))
    }
}

fn test_handler(writer: &mut ResponseWriter, _request: &Request) {
    writer.write_response(StatusCode::OK, &mime::TEXT_PLAIN_UTF_8, b"Hello World!");
}

fn bench_request_decoder(c: &mut Criterion) {
    let request = b"GET / HTTP/1.1\r\nHost: localhost\r\nUser-Agent: curl/7.79.1\r\nAccept: */*\r\n\r\n";

    c.bench_function("decode_simple_request", |b| {
        b.iter(|| {
            let mut decoder = RequestDecoder::new();
            let mut bytes = bytes::BytesMut::from(&request[..]);
            black_box(decoder.decode(&mut bytes).unwrap());
        });
    });
}

fn bench_request_decoder_with_body(c: &mut Criterion) {
    let request = b"POST /string HTTP/1.1\r\nHost: localhost\r\nContent-Length: 11\r\n\r\nhello world";

    c.bench_function("decode_request_with_body", |b| {
        b.iter(|| {
            let mut decoder = RequestDecoder::new();
            let mut bytes = bytes::BytesMut::from(&request[..]);
            let header = decoder.decode(&mut bytes).unwrap();
            let body = decoder.decode(&mut bytes).unwrap();
            black_box((header, body));
        });
    });
}

fn bench_http_connection(c: &mut Criterion) {
    let request = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";
    let handler = make_handler(test_handler);

    c.bench_function("process_simple_request", |b| {
        b.iter(|| {
            let mock_io = MockIO::new(request.to_vec());
            let (reader, writer) = (mock_io.clone(), mock_io);
            let connection = HttpConnection::new(reader, writer);
            block_on(connection.process(&handler)).unwrap();
        });
    });
}

fn bench_keep_alive_connection(c: &mut Criterion) {
    let request = b"POST /string HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
    let stream = request.repeat(16);
    let handler = make_handler(test_handler);

    c.bench_function("process_keep_alive_requests", |b| {
        b.iter(|| {
            let mock_io = MockIO::new(stream.clone());
            let connection = HttpConnection::new(mock_io.clone(), mock_io);
            block_on(connection.process(&handler)).unwrap();
        });
    });
}

criterion_group!(benches, bench_request_decoder, bench_request_decoder_with_body, bench_http_connection, bench_keep_alive_connection);
criterion_main!(benches);
