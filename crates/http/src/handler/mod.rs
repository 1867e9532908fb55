//! Request handler seam between the connection engine and request dispatch.
//!
//! The connection invokes a [`Handler`] once per decoded request, on the worker
//! thread that is driving the connection. Handlers are synchronous: they write
//! the complete response into the [`ResponseWriter`] and must not block.

use crate::protocol::{Request, ResponseWriter};

/// Result of offering a request to a [`Handler`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The handler produced the response in the writer.
    Responded,
    /// Nothing was registered for the request; the writer is untouched.
    Unmatched,
}

pub trait Handler: Send + Sync {
    fn call(&self, writer: &mut ResponseWriter, request: &mut Request) -> Outcome;
}

impl<H: Handler + ?Sized> Handler for std::sync::Arc<H> {
    fn call(&self, writer: &mut ResponseWriter, request: &mut Request) -> Outcome {
        (**self).call(writer, request)
    }
}

/// Adapts a plain function into a [`Handler`] answering every request.
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut ResponseWriter, &Request) + Send + Sync,
{
    fn call(&self, writer: &mut ResponseWriter, request: &mut Request) -> Outcome {
        (self.f)(writer, request);
        Outcome::Responded
    }
}

pub fn make_handler<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&mut ResponseWriter, &Request) + Send + Sync,
{
    HandlerFn { f }
}
