//! A small multi-threaded web server routing requests by regular expression.
//!
//! `mini-web` puts a [`Router`] in front of the `mini-http` connection engine:
//! the [`Server`] accepts connections, runs each one as a task on a
//! [`Reactor`] and dispatches every request to the first route whose pattern
//! matches the whole path and which has a handler for the method.
//!
//! ```no_run
//! use http::StatusCode;
//! use mini_web::router::{get, Router};
//! use mini_web::Server;
//!
//! let router = Router::builder()
//!     .route("/match/([0-9a-zA-Z]+)", get(|writer, request| {
//!         let id = request.path_match().get(1).unwrap_or_default();
//!         writer.write_response(StatusCode::OK, &mime::TEXT_PLAIN_UTF_8, id.as_bytes());
//!     }))
//!     .build()
//!     .unwrap();
//!
//! Server::builder()
//!     .address("127.0.0.1:8080")
//!     .router(router)
//!     .threads(4)
//!     .build()
//!     .unwrap()
//!     .run()
//!     .unwrap();
//! ```

mod reactor;
mod server;

pub mod router;
pub mod transport;

pub use mini_http::connection::Fallback;
pub use reactor::Reactor;
pub use router::{Router, RouterError};
pub use server::{Server, ServerBuildError, ServerBuilder, ServerError};
pub use transport::Acceptor;
