// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Multicast publisher that replays the latest items to late subscribers.
//!
//! ## Characteristics
//!
//! - **Lazy**: the upstream is subscribed on the first attach, exactly once, with
//!   unlimited demand.
//! - **Replaying**: each new subscriber first receives a snapshot of the last
//!   `capacity` items (oldest first), then every live item, without gaps or duplicates.
//! - **Per-subscriber backpressure**: items a subscriber has not requested yet wait in its
//!   own unbounded queue; the capacity only bounds the shared replay window.
//! - **Terminal**: the upstream completion is recorded once and delivered to every current
//!   and future subscriber after its queue has drained. Items or completions arriving
//!   after that are ignored.
//! - **Local cancellation**: cancelling a subscription detaches that subscriber only; the
//!   upstream keeps running for everybody else.
//!
//! ## Example
//!
//! ```
//! use replay_core::{Completion, PassthroughSubject, PublisherStreamExt};
//! use replay_latest::ReplayLatestExt;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let subject = PassthroughSubject::<&str, ()>::new();
//! let replay = subject.clone().replay_latest(2);
//! let _warm_up = replay.subscribe_stream(1);
//!
//! subject.send("a").unwrap();
//! subject.send("b").unwrap();
//! subject.send("c").unwrap();
//! subject.finish();
//!
//! let late: Vec<_> = replay.subscribe_stream(1).collect().await;
//! assert_eq!(late, vec![Ok("b"), Ok("c")]);
//! # }
//! ```

mod buffer;
mod channel;

use self::buffer::{ReplayBuffer, UpstreamSink};
use crate::ReplayCapacity;
use alloc::boxed::Box;
use alloc::sync::Arc;
use replay_core::replay_mutex::Mutex;
use replay_core::{Publisher, ReplayError, Subscriber};

/// A publisher that shares one upstream subscription and replays its latest items.
///
/// Cheap to clone; all clones share the same replay window and subscribers.
/// See the [module documentation](self) for the delivery guarantees.
///
/// # Lifetime
///
/// Once connected, the upstream subscription holds the shared state, so existing subscribers
/// keep receiving items after every `ReplayLatest` handle is dropped. That state is released
/// when the upstream completes. The shared state and the upstream subscription reference
/// each other, so an upstream that never completes leaks that state and its subscribers,
/// even after the upstream publisher itself is dropped.
pub struct ReplayLatest<P: Publisher> {
    upstream: Arc<Mutex<Option<P>>>,
    buffer: Arc<ReplayBuffer<P::Item, P::Failure>>,
}

impl<P> ReplayLatest<P>
where
    P: Publisher,
    P::Item: Clone + Send + 'static,
    P::Failure: Clone + Send + 'static,
{
    /// Wraps `upstream`. Nothing is subscribed until the first subscriber attaches.
    ///
    /// Prefer [`ReplayLatestExt`] over calling this directly.
    pub fn new(upstream: P, capacity: ReplayCapacity) -> Self {
        Self {
            upstream: Arc::new(Mutex::new(Some(upstream))),
            buffer: Arc::new(ReplayBuffer::new(capacity)),
        }
    }

    /// Like [`new`](Self::new) with a signed capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::InvalidCapacity`] if `capacity` is negative.
    pub fn try_new(upstream: P, capacity: i64) -> Result<Self, ReplayError> {
        Ok(Self::new(upstream, ReplayCapacity::try_from(capacity)?))
    }

    /// The configured replay capacity.
    #[must_use]
    pub fn capacity(&self) -> ReplayCapacity {
        self.buffer.capacity()
    }

    /// Number of subscribers that are neither cancelled nor completed.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.buffer.subscriber_count()
    }

    /// Number of items a subscriber attaching now would have replayed.
    #[must_use]
    pub fn replay_len(&self) -> usize {
        self.buffer.replay_len()
    }

    /// Returns `true` once the upstream has completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.buffer.is_completed()
    }

    /// Returns `true` while holding a live upstream subscription.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.buffer.is_connected()
    }

    fn connect(&self) {
        let upstream = self.upstream.lock().take();
        if let Some(upstream) = upstream {
            upstream.subscribe(UpstreamSink::new(Arc::clone(&self.buffer)));
        }
    }
}

impl<P> Publisher for ReplayLatest<P>
where
    P: Publisher,
    P::Item: Clone + Send + 'static,
    P::Failure: Clone + Send + 'static,
{
    type Item = P::Item;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Self::Item, Self::Failure> + 'static,
    {
        let (channel, connect) = self.buffer.attach(Box::new(subscriber));
        channel.start();

        if connect {
            self.connect();
        }
    }
}

impl<P: Publisher> Clone for ReplayLatest<P> {
    fn clone(&self) -> Self {
        Self {
            upstream: Arc::clone(&self.upstream),
            buffer: Arc::clone(&self.buffer),
        }
    }
}

/// Extension trait adding replay operators to every [`Publisher`].
pub trait ReplayLatestExt: Publisher + Sized
where
    Self::Item: Clone + Send + 'static,
    Self::Failure: Clone + Send + 'static,
{
    /// Replays up to `capacity` of the latest items to late subscribers.
    fn replay_latest(self, capacity: usize) -> ReplayLatest<Self> {
        ReplayLatest::new(self, ReplayCapacity::Bounded(capacity))
    }

    /// Replays every item ever produced to late subscribers.
    fn replay_all(self) -> ReplayLatest<Self> {
        ReplayLatest::new(self, ReplayCapacity::Unbounded)
    }

    /// Replays according to an explicit [`ReplayCapacity`].
    fn replay_latest_with(self, capacity: ReplayCapacity) -> ReplayLatest<Self> {
        ReplayLatest::new(self, capacity)
    }

    /// Like [`replay_latest`](Self::replay_latest) with a signed capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::InvalidCapacity`] if `capacity` is negative.
    fn try_replay_latest(self, capacity: i64) -> Result<ReplayLatest<Self>, ReplayError> {
        ReplayLatest::try_new(self, capacity)
    }
}

impl<P> ReplayLatestExt for P
where
    P: Publisher,
    P::Item: Clone + Send + 'static,
    P::Failure: Clone + Send + 'static,
{
}
