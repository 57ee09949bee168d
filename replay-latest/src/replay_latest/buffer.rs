// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The shared replay window, channel registry and upstream lifecycle.

use super::channel::{BoxSubscriber, ReplayChannel};
use crate::logging::{debug, trace, warn};
use crate::ReplayCapacity;
use alloc::collections::{BTreeMap, VecDeque};
use alloc::sync::Arc;
use alloc::vec::Vec;
use replay_core::replay_mutex::Mutex;
use replay_core::{Completion, Demand, Subscriber, SubscriptionHandle};

enum Upstream {
    /// Nobody attached yet.
    Idle,
    /// The first attach is subscribing upstream.
    Connecting,
    Connected(SubscriptionHandle),
    /// Completion recorded; the upstream subscription has been dropped.
    Released,
}

struct BufferState<T, E> {
    window: VecDeque<T>,
    channels: BTreeMap<u64, Arc<ReplayChannel<T, E>>>,
    next_id: u64,
    completion: Option<Completion<E>>,
    upstream: Upstream,
}

/// State shared by every subscriber of one [`ReplayLatest`](crate::ReplayLatest).
///
/// A single lock covers the window, the registry and the completion, so attaching
/// (snapshot + register) and fan-out (record + enqueue) are atomic with respect to each
/// other. Items are only *enqueued* under the lock; channels drain after it is released,
/// so subscriber callbacks never run while it is held.
pub(crate) struct ReplayBuffer<T, E> {
    capacity: ReplayCapacity,
    state: Mutex<BufferState<T, E>>,
}

impl<T, E> ReplayBuffer<T, E> {
    pub(crate) fn new(capacity: ReplayCapacity) -> Self {
        Self {
            capacity,
            state: Mutex::new(BufferState {
                window: VecDeque::new(),
                channels: BTreeMap::new(),
                next_id: 0,
                completion: None,
                upstream: Upstream::Idle,
            }),
        }
    }

    pub(crate) fn capacity(&self) -> ReplayCapacity {
        self.capacity
    }

    /// Removes a channel from the registry; a second removal of the same id is a no-op.
    pub(crate) fn detach(&self, id: u64) {
        let removed = self.state.lock().channels.remove(&id);
        if removed.is_some() {
            trace!("replay channel {} detached", id);
        }
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.state.lock().channels.len()
    }

    pub(crate) fn replay_len(&self) -> usize {
        self.state.lock().window.len()
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.state.lock().completion.is_some()
    }

    pub(crate) fn is_connected(&self) -> bool {
        matches!(self.state.lock().upstream, Upstream::Connected(_))
    }
}

impl<T, E> ReplayBuffer<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Registers a channel seeded with the current window and completion.
    ///
    /// Returns the channel and whether the caller must connect upstream, which is
    /// `true` for exactly one attach over the buffer's lifetime.
    pub(crate) fn attach(
        self: &Arc<Self>,
        sink: BoxSubscriber<T, E>,
    ) -> (Arc<ReplayChannel<T, E>>, bool) {
        let mut state = self.state.lock();

        let id = state.next_id;
        state.next_id += 1;

        let channel = Arc::new(ReplayChannel::new(
            id,
            Arc::downgrade(self),
            sink,
            state.window.clone(),
            state.completion.clone(),
        ));
        state.channels.insert(id, Arc::clone(&channel));

        let connect = matches!(state.upstream, Upstream::Idle);
        if connect {
            state.upstream = Upstream::Connecting;
        }

        trace!(
            "replay channel {} attached with {} replayed items",
            channel.id(),
            state.window.len()
        );
        (channel, connect)
    }

    pub(crate) fn on_upstream_subscribe(&self, subscription: SubscriptionHandle) {
        let accepted = {
            let mut state = self.state.lock();
            if matches!(state.upstream, Upstream::Connecting) {
                state.upstream = Upstream::Connected(Arc::clone(&subscription));
                true
            } else {
                false
            }
        };

        if accepted {
            debug!("replay buffer connected upstream");
            subscription.request(Demand::UNLIMITED);
        } else {
            warn!("replay buffer received an unexpected upstream subscription, cancelling it");
            subscription.cancel();
        }
    }

    pub(crate) fn on_upstream_item(&self, item: T) {
        let channels: Vec<_> = {
            let mut state = self.state.lock();
            if state.completion.is_some() {
                warn!("replay buffer received an item after completion, ignoring it");
                return;
            }

            if self.capacity.replays() {
                state.window.push_back(item.clone());
                while !self.capacity.admits(state.window.len()) {
                    state.window.pop_front();
                }
            }

            for channel in state.channels.values() {
                channel.enqueue(item.clone());
            }
            state.channels.values().cloned().collect()
        };

        trace!("replay buffer fanning out to {} channels", channels.len());
        for channel in channels {
            channel.drain();
        }
    }

    pub(crate) fn on_upstream_completion(&self, completion: Completion<E>) {
        let (channels, upstream): (Vec<_>, _) = {
            let mut state = self.state.lock();
            if state.completion.is_some() {
                warn!("replay buffer received a second completion, ignoring it");
                return;
            }

            for channel in state.channels.values() {
                channel.record_completion(completion.clone());
            }
            state.completion = Some(completion);
            let upstream = core::mem::replace(&mut state.upstream, Upstream::Released);
            (state.channels.values().cloned().collect(), upstream)
        };

        drop(upstream);
        debug!("replay buffer completed, upstream released");

        for channel in channels {
            channel.drain();
        }
    }
}

/// The subscriber a [`ReplayBuffer`] attaches upstream.
///
/// Holds the buffer strongly, so the buffer lives as long as the upstream keeps this sink,
/// even after every [`ReplayLatest`](crate::ReplayLatest) handle is gone. The cycle through
/// the upstream subscription is broken when the completion releases it.
pub(crate) struct UpstreamSink<T, E> {
    buffer: Arc<ReplayBuffer<T, E>>,
}

impl<T, E> UpstreamSink<T, E> {
    pub(crate) fn new(buffer: Arc<ReplayBuffer<T, E>>) -> Self {
        Self { buffer }
    }
}

impl<T, E> Subscriber<T, E> for UpstreamSink<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn on_subscribe(&mut self, subscription: SubscriptionHandle) {
        self.buffer.on_upstream_subscribe(subscription);
    }

    fn on_next(&mut self, item: T) -> Demand {
        self.buffer.on_upstream_item(item);
        Demand::NONE
    }

    fn on_complete(&mut self, completion: Completion<E>) {
        self.buffer.on_upstream_completion(completion);
    }
}
