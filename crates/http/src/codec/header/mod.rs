//! HTTP header processing module
//!
//! - [`HeaderDecoder`]: Decodes the request line and header block from raw bytes
//!   - Matches the request line as `METHOD SP PATH SP HTTP/VERSION`
//!   - Collects `Key: Value` lines until the first line that does not match
//!   - Manages header size limits
//!   - Selects the payload size from `Content-Length`

mod header_decoder;

pub use header_decoder::HeaderDecoder;
