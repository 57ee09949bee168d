// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bridges a demand-driven [`Publisher`] into a [`futures::Stream`].
//!
//! The stream keeps a bounded number of items in flight: it requests `prefetch`
//! items when subscribing and one more each time an item is taken, so a slow
//! poller exerts backpressure on the publisher.
//!
//! ```
//! use futures::StreamExt;
//! use replay_core::{sequence, PublisherStreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let stream = sequence::<_, ()>(1..=3).subscribe_stream(2);
//! let items: Vec<_> = stream.collect().await;
//! assert_eq!(items, vec![Ok(1), Ok(2), Ok(3)]);
//! # }
//! ```

use crate::replay_mutex::Mutex;
use crate::{Completion, Demand, Publisher, Subscriber, SubscriptionHandle};
use alloc::collections::VecDeque;
use alloc::sync::Arc;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::task::AtomicWaker;
use futures::Stream;

struct StreamShared<T, E> {
    queue: VecDeque<T>,
    completion: Option<Completion<E>>,
    subscription: Option<SubscriptionHandle>,
    finished: bool,
}

struct StreamSubscriber<T, E> {
    shared: Arc<Mutex<StreamShared<T, E>>>,
    waker: Arc<AtomicWaker>,
    prefetch: usize,
}

impl<T, E> Subscriber<T, E> for StreamSubscriber<T, E>
where
    T: Send,
    E: Send,
{
    fn on_subscribe(&mut self, subscription: SubscriptionHandle) {
        self.shared.lock().subscription = Some(Arc::clone(&subscription));
        subscription.request(Demand::max(self.prefetch));
    }

    fn on_next(&mut self, item: T) -> Demand {
        self.shared.lock().queue.push_back(item);
        self.waker.wake();
        Demand::NONE
    }

    fn on_complete(&mut self, completion: Completion<E>) {
        {
            let mut shared = self.shared.lock();
            shared.completion = Some(completion);
            shared.subscription = None;
        }
        self.waker.wake();
    }
}

/// A [`Stream`] of `Result<T, E>` fed by a publisher subscription.
///
/// Yields `Ok(item)` per item, then a final `Err(failure)` if the publisher failed,
/// then ends. Dropping the stream cancels the subscription.
#[must_use = "streams do nothing unless polled"]
pub struct SubscriberStream<T, E> {
    shared: Arc<Mutex<StreamShared<T, E>>>,
    waker: Arc<AtomicWaker>,
}

impl<T, E> SubscriberStream<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Subscribes to `publisher` keeping up to `prefetch` items in flight (at least one).
    pub fn new<P>(publisher: &P, prefetch: usize) -> Self
    where
        P: Publisher<Item = T, Failure = E> + ?Sized,
    {
        let shared = Arc::new(Mutex::new(StreamShared {
            queue: VecDeque::new(),
            completion: None,
            subscription: None,
            finished: false,
        }));
        let waker = Arc::new(AtomicWaker::new());

        publisher.subscribe(StreamSubscriber {
            shared: Arc::clone(&shared),
            waker: Arc::clone(&waker),
            prefetch: prefetch.max(1),
        });

        Self { shared, waker }
    }
}

impl<T, E> Stream for SubscriberStream<T, E> {
    type Item = Result<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.waker.register(cx.waker());

        let mut shared = self.shared.lock();
        if let Some(item) = shared.queue.pop_front() {
            let subscription = shared.subscription.clone();
            drop(shared);
            if let Some(subscription) = subscription {
                subscription.request(Demand::max(1));
            }
            return Poll::Ready(Some(Ok(item)));
        }

        if shared.finished {
            return Poll::Ready(None);
        }

        match shared.completion.take() {
            Some(Completion::Failed(e)) => {
                shared.finished = true;
                Poll::Ready(Some(Err(e)))
            }
            Some(Completion::Finished) => {
                shared.finished = true;
                Poll::Ready(None)
            }
            None => Poll::Pending,
        }
    }
}

impl<T, E> Drop for SubscriberStream<T, E> {
    fn drop(&mut self) {
        let subscription = self.shared.lock().subscription.take();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }
}

/// Extension trait turning any [`Publisher`] into a [`Stream`].
pub trait PublisherStreamExt: Publisher {
    /// Subscribes and returns the subscription as a stream.
    ///
    /// See the [module documentation](self) for the prefetch behaviour.
    fn subscribe_stream(&self, prefetch: usize) -> SubscriberStream<Self::Item, Self::Failure>
    where
        Self::Item: Send + 'static,
        Self::Failure: Send + 'static,
    {
        SubscriberStream::new(self, prefetch)
    }
}

impl<P: Publisher + ?Sized> PublisherStreamExt for P {}
