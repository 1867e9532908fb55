use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::num::NonZeroUsize;
use std::sync::Arc;

use mini_http::connection::{Fallback, HttpConnection};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::reactor::Reactor;
use crate::router::Router;
use crate::transport::Acceptor;

#[derive(Debug)]
pub struct ServerBuilder {
    router: Option<Router>,
    address: Option<io::Result<Vec<SocketAddr>>>,
    threads: NonZeroUsize,
    fallback: Fallback,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { router: None, address: None, threads: NonZeroUsize::MIN, fallback: Fallback::default() }
    }

    /// Sets the listen address. Resolution failures are reported by
    /// [`build`](Self::build).
    #[must_use]
    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = Some(address.to_socket_addrs().map(Iterator::collect));
        self
    }

    #[must_use]
    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Number of worker threads used by [`Server::run`]; `0` counts as `1`.
    #[must_use]
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = NonZeroUsize::new(threads).unwrap_or(NonZeroUsize::MIN);
        self
    }

    /// Policy for requests no route answers, see [`Fallback`].
    #[must_use]
    pub fn fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let router = self.router.ok_or(ServerBuildError::MissingRouter)?;
        let address = self.address.ok_or(ServerBuildError::MissingAddress)?.map_err(|e| ServerBuildError::InvalidAddress { source: e })?;
        if address.is_empty() {
            return Err(ServerBuildError::InvalidAddress { source: io::Error::new(io::ErrorKind::InvalidInput, "address resolved to nothing") });
        }

        Ok(Server { router: Arc::new(router), address, threads: self.threads, fallback: self.fallback })
    }
}

#[derive(Debug)]
pub struct Server {
    router: Arc<Router>,
    address: Vec<SocketAddr>,
    threads: NonZeroUsize,
    fallback: Fallback,
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("router must be set")]
    MissingRouter,
    #[error("address must be set")]
    MissingAddress,
    #[error("invalid address: {source}")]
    InvalidAddress {
        #[source]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {address:?}: {source}")]
    Bind {
        address: Vec<SocketAddr>,
        #[source]
        source: io::Error,
    },
    #[error("failed to start reactor: {source}")]
    Runtime {
        #[source]
        source: io::Error,
    },
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn address(&self) -> &[SocketAddr] {
        &self.address
    }

    /// Starts a [`Reactor`] with the configured threads and serves on it,
    /// blocking the calling thread.
    pub fn run(self) -> Result<(), ServerError> {
        let reactor = Reactor::new(self.threads).map_err(|e| ServerError::Runtime { source: e })?;
        reactor.block_on(self.serve())
    }

    /// Binds the configured address and serves on the current runtime.
    ///
    /// Only returns if binding fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let listener = match TcpListener::bind(self.address.as_slice()).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(cause = %e, address = ?self.address, "bind server error");
                return Err(ServerError::Bind { address: self.address, source: e });
            }
        };

        self.serve_with(listener).await;
        Ok(())
    }

    /// Runs the accept loop over `acceptor`, one task per connection.
    pub async fn serve_with<A: Acceptor>(self, acceptor: A) {
        match acceptor.local_addr() {
            Ok(addr) => info!(%addr, threads = self.threads.get(), "start listening"),
            Err(e) => warn!(cause = %e, "listening on unknown address"),
        }

        loop {
            let (stream, remote_addr) = match acceptor.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            debug!(%remote_addr, "accepted connection");
            let router = Arc::clone(&self.router);
            let fallback = self.fallback;

            tokio::spawn(async move {
                let (reader, writer) = tokio::io::split(stream);
                let connection = HttpConnection::new(reader, writer).fallback(fallback);
                match connection.process(router.as_ref()).await {
                    Ok(()) => {
                        debug!(%remote_addr, "finished process, connection shutdown");
                    }
                    Err(e) => {
                        error!(%remote_addr, cause = %e, "service has error, connection shutdown");
                    }
                }
            });
        }
    }
}
