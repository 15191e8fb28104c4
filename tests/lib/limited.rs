use std::convert::Infallible;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::stream::Stream;

/// Replays a payload in fixed-size chunks, so running-size checks see the
/// body arrive piecemeal the way a socket would deliver it.
pub struct Limited {
    payload: Bytes,
    limit: usize,
}

impl Limited {
    pub fn new(payload: Bytes, limit: usize) -> Self {
        assert!(limit > 0, "chunks must make progress");
        Self { payload, limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl fmt::Debug for Limited {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Limited")
            .field("limit", &self.limit)
            .field("remaining", &self.payload.len())
            .finish()
    }
}

impl Stream for Limited {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.payload.is_empty() {
            return Poll::Ready(None);
        }

        let n = self.limit.min(self.payload.len());
        let chunk = self.payload.split_to(n);
        Poll::Ready(Some(Ok(chunk)))
    }
}
