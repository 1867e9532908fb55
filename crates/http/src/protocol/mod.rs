//! Core HTTP protocol abstractions.
//!
//! - **Request** ([`request`]): [`RequestHead`] as decoded from the wire and the
//!   full [`Request`] handed to handlers, with its [`Headers`] and [`PathMatch`]
//! - **Response** ([`response`]): [`ResponseWriter`], the raw output sink
//! - **Messages** ([`message`]): [`Message`] and [`PayloadSize`] framing information
//! - **Body** ([`body`]): [`ReqBody`](body::ReqBody)
//! - **Errors** ([`error`]): [`HttpError`], [`ParseError`], [`SendError`]

mod message;
pub use message::Message;
pub use message::PayloadSize;

mod request;
pub use request::Headers;
pub use request::PathMatch;
pub use request::Request;
pub use request::RequestHead;

mod response;
pub use response::ResponseWriter;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;

pub mod body;
