use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::buf::Reader;
use bytes::{Buf, Bytes};
use http_body::{Body, Frame, SizeHint};

/// The body of a request carrying a `Content-Length` header.
///
/// Polling it as a [`Body`] yields the whole payload as a single data frame.
/// [`ReqBody::reader`] gives independent readers over the same bytes without
/// consuming the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReqBody {
    data: Bytes,
}

impl ReqBody {
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Returns a reader over the body bytes.
    pub fn reader(&self) -> Reader<Bytes> {
        self.data.clone().reader()
    }
}

impl From<Bytes> for ReqBody {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

impl Body for ReqBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        if this.data.is_empty() {
            return Poll::Ready(None);
        }

        Poll::Ready(Some(Ok(Frame::data(std::mem::take(&mut this.data)))))
    }

    fn is_end_stream(&self) -> bool {
        self.data.is_empty()
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.data.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::io::Read;

    #[tokio::test]
    async fn collect_body() {
        let body = ReqBody::from(Bytes::from_static(b"hello"));
        assert_eq!(body.size_hint().exact(), Some(5));

        let collected = body.collect().await.unwrap().to_bytes();
        assert_eq!(&collected[..], b"hello");
    }

    #[tokio::test]
    async fn empty_body_ends_immediately() {
        let mut body = ReqBody::default();
        assert!(body.is_end_stream());
        assert!(body.frame().await.is_none());
    }

    #[test]
    fn reader_does_not_consume() {
        let body = ReqBody::from(Bytes::from_static(b"a=1&b=2"));

        let mut first = String::new();
        body.reader().read_to_string(&mut first).unwrap();
        let mut second = String::new();
        body.reader().read_to_string(&mut second).unwrap();

        assert_eq!(first, "a=1&b=2");
        assert_eq!(first, second);
        assert_eq!(body.len(), 7);
    }
}
