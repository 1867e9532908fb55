//! Request body handling.
//!
//! The connection reads a declared body completely before dispatching, so a
//! [`ReqBody`] is a fully buffered byte stream. Handlers consume it either as an
//! `http_body::Body` or through a blocking [`std::io::Read`] adapter.

mod req_body;

pub use req_body::ReqBody;
