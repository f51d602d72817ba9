//! Future adapters over completion-style queries
//!
//! The bridge itself is callback based. These adapters let async callers
//! await a query instead; they do not need any particular executor.

use futures::{
    channel::oneshot,
    future::{Future, FutureExt},
};
use std::{
    pin::Pin,
    task::{Context, Poll},
};

/// Resolves to a query's decoded result.
///
/// Resolves to `None` when the result did not decode, and also when the
/// completion was dropped without being called (for instance because the
/// map was re-initialized while the query was in flight).
#[must_use = "futures do nothing unless polled"]
pub struct QueryFuture<T> {
    receiver: oneshot::Receiver<Option<T>>,
}

impl<T> Future for QueryFuture<T> {
    type Output = Option<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.receiver.poll_unpin(cx) {
            Poll::Ready(Ok(value)) => Poll::Ready(value),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Pairs a completion callback with the future it resolves
pub fn query_channel<T: 'static>() -> (impl FnOnce(Option<T>) + 'static, QueryFuture<T>) {
    let (sender, receiver) = oneshot::channel();
    let completion = move |value: Option<T>| {
        // Nobody is waiting if the future was dropped
        let _ = sender.send(value);
    };
    (completion, QueryFuture { receiver })
}
