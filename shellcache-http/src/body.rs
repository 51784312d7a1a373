//! Response body returned by the offline cache.
//!
//! Responses answered by the worker are fully buffered (cache hits, stored
//! network responses), while pass-through requests stream the inner
//! service's body untouched. [`ShellBody`] covers both so a single service
//! can return either.

use bytes::{Buf, Bytes};
use http_body::{Body as HttpBody, Frame, SizeHint};
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A body that is either buffered or streamed from an inner body.
///
/// # Variants
///
/// - [`Complete`](ShellBody::Complete): body answered by the worker, held in memory
/// - [`Passthrough`](ShellBody::Passthrough): body of the inner service, not read
#[pin_project(project = ShellBodyProj)]
#[derive(Debug)]
pub enum ShellBody<B> {
    /// Fully buffered body.
    ///
    /// The `Option` is used to yield the data once, then return `None` on subsequent polls.
    Complete(Option<Bytes>),

    /// Body of a request the worker did not intercept.
    Passthrough(#[pin] B),
}

impl<B> ShellBody<B> {
    /// Creates a buffered body. An empty buffer yields no frame.
    pub fn complete(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            ShellBody::Complete(None)
        } else {
            ShellBody::Complete(Some(bytes))
        }
    }

    /// Returns `true` if the body was answered by the worker.
    pub fn is_complete(&self) -> bool {
        matches!(self, ShellBody::Complete(_))
    }
}

impl<B> HttpBody for ShellBody<B>
where
    B: HttpBody,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            ShellBodyProj::Complete(data) => Poll::Ready(data.take().map(|bytes| Ok(Frame::data(bytes)))),
            ShellBodyProj::Passthrough(body) => match body.poll_frame(cx) {
                Poll::Ready(Some(Ok(frame))) => {
                    let frame = frame.map_data(|mut data| data.copy_to_bytes(data.remaining()));
                    Poll::Ready(Some(Ok(frame)))
                }
                Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Pending => Poll::Pending,
            },
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            ShellBody::Complete(Some(bytes)) => SizeHint::with_exact(bytes.len() as u64),
            ShellBody::Complete(None) => SizeHint::with_exact(0),
            ShellBody::Passthrough(body) => body.size_hint(),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            ShellBody::Complete(data) => data.is_none(),
            ShellBody::Passthrough(body) => body.is_end_stream(),
        }
    }
}
