//! Stream sources the server accepts connections from.
//!
//! The connection engine only needs a byte stream it can read, write and shut
//! down; the [`Acceptor`] trait hands such streams to the accept loop. Plain
//! TCP is provided here, an encrypted transport implements the same trait and
//! is passed to [`Server::serve_with`](crate::Server::serve_with).

use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};

#[trait_variant::make(Acceptor: Send)]
pub trait LocalAcceptor {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    /// Waits for the next inbound connection.
    async fn accept(&self) -> io::Result<(Self::Stream, SocketAddr)>;

    fn local_addr(&self) -> io::Result<SocketAddr>;
}

impl Acceptor for TcpListener {
    type Stream = TcpStream;

    async fn accept(&self) -> io::Result<(TcpStream, SocketAddr)> {
        TcpListener::accept(self).await
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        TcpListener::local_addr(self)
    }
}
