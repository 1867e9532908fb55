//! HTTP request handling implementation.
//!
//! A request goes through two shapes: the [`RequestHead`] produced by the
//! decoder (request line plus headers) and the full [`Request`] the handler
//! sees once the body, if any, has been attached.

use std::collections::HashMap;

use crate::protocol::body::ReqBody;

/// Header mapping of a request.
///
/// Keys keep the case they were received with, a repeated key keeps the last
/// value seen.
pub type Headers = HashMap<String, String>;

const CONTENT_LENGTH: &str = "Content-Length";

/// The request line and header block of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    method: String,
    path: String,
    version: String,
    headers: Headers,
    /// Key of the `Content-Length` spelling inserted last.
    content_length_key: Option<String>,
}

impl RequestHead {
    pub fn new(method: impl Into<String>, path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            version: version.into(),
            headers: Headers::new(),
            content_length_key: None,
        }
    }

    /// Inserts a header, replacing any previous value for the same key.
    pub fn insert_header(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        if key.eq_ignore_ascii_case(CONTENT_LENGTH) {
            self.content_length_key = Some(key.clone());
        }
        self.headers.insert(key, value.into())
    }

    /// Returns the method token, e.g. `GET`.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the request path exactly as sent, query string included.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the version token following `HTTP/`, e.g. `1.1`.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Case-sensitive header lookup.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    /// Returns the raw `Content-Length` value.
    ///
    /// Keys are compared ignoring ASCII case; the header inserted last wins.
    pub fn content_length(&self) -> Option<&str> {
        self.content_length_key.as_deref().and_then(|key| self.header(key))
    }

    /// Iterates over the values of every `Content-Length` spelling present.
    pub fn content_length_values(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().filter(|(key, _)| key.eq_ignore_ascii_case(CONTENT_LENGTH)).map(|(_, value)| value.as_str())
    }

    /// Determines whether the connection should be reused after answering.
    ///
    /// Reuse is attempted for every declared version of 1.1 or above. A version
    /// token that is not `major[.minor]` closes the connection.
    pub fn keep_alive(&self) -> bool {
        parse_version(&self.version).is_some_and(|version| version >= (1, 1))
    }

    /// Attaches a body, converting the head into a full [`Request`].
    pub fn body(self, body: Option<ReqBody>) -> Request {
        Request { head: self, body, path_match: PathMatch::empty() }
    }
}

fn parse_version(version: &str) -> Option<(u32, u32)> {
    let (major, minor) = version.split_once('.').unwrap_or((version, "0"));
    Some((major.parse().ok()?, minor.parse().ok()?))
}

/// A parsed request as handed to handlers.
#[derive(Debug)]
pub struct Request {
    head: RequestHead,
    body: Option<ReqBody>,
    path_match: PathMatch,
}

impl Request {
    pub fn head(&self) -> &RequestHead {
        &self.head
    }

    pub fn method(&self) -> &str {
        self.head.method()
    }

    pub fn path(&self) -> &str {
        self.head.path()
    }

    pub fn version(&self) -> &str {
        self.head.version()
    }

    pub fn headers(&self) -> &Headers {
        self.head.headers()
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.head.header(key)
    }

    pub fn keep_alive(&self) -> bool {
        self.head.keep_alive()
    }

    /// Returns the body, present only when the request declared a length.
    pub fn body(&self) -> Option<&ReqBody> {
        self.body.as_ref()
    }

    pub fn take_body(&mut self) -> Option<ReqBody> {
        self.body.take()
    }

    /// Captures bound by the route pattern that matched this request.
    pub fn path_match(&self) -> &PathMatch {
        &self.path_match
    }

    pub fn set_path_match(&mut self, path_match: PathMatch) {
        self.path_match = path_match;
    }
}

/// Substrings bound by a route pattern's capture groups.
///
/// Index 0 is the whole match, indexes from 1 are the groups in pattern
/// order. Optional groups that did not participate are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMatch {
    groups: Vec<Option<String>>,
    names: HashMap<String, usize>,
}

impl PathMatch {
    pub fn new(groups: Vec<Option<String>>, names: HashMap<String, usize>) -> Self {
        Self { groups, names }
    }

    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of slots, whole match included.
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(Option::as_deref)
    }

    /// Looks a named group up, e.g. `(?P<id>[0-9]+)`.
    pub fn name(&self, name: &str) -> Option<&str> {
        self.names.get(name).and_then(|index| self.get(*index))
    }

    /// Iterates over the capture groups, skipping the whole match.
    pub fn groups(&self) -> impl Iterator<Item = Option<&str>> {
        self.groups.iter().skip(1).map(Option::as_deref)
    }
}
