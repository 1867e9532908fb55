//! HTTP connection handling module
//!
//! This module implements the per-connection request cycle of the server.
//!
//! # Components
//!
//! - [`HttpConnection`]: Main connection handler that:
//!   - Reads and decodes request heads
//!   - Reads exactly the declared body before dispatching
//!   - Invokes the handler with a fresh [`ResponseWriter`](crate::protocol::ResponseWriter)
//!   - Writes the response and decides between keep-alive and close
//! - [`Fallback`]: Policy for requests nothing responded to
//!
//! Each connection is driven by a single task, so its steps never run
//! concurrently and the read buffer moves with the task across suspension
//! points.

mod fallback;
mod http_connection;
mod message_writer;

pub use fallback::Fallback;
pub use http_connection::HttpConnection;
pub use message_writer::MessageWriter;
