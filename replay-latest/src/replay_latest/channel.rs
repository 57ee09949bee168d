// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-subscriber demand accounting and delivery.

use super::buffer::ReplayBuffer;
use crate::logging::trace;
use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::sync::{Arc, Weak};
use replay_core::replay_mutex::Mutex;
use replay_core::{Completion, Demand, Subscriber, Subscription, SubscriptionHandle};

pub(crate) type BoxSubscriber<T, E> = Box<dyn Subscriber<T, E>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// `on_subscribe` has not returned yet; nothing may be delivered.
    Subscribing,
    Idle,
    /// Some thread owns the sink and is delivering.
    Draining,
    /// Cancelled or completed. Terminal.
    Terminated,
}

struct ChannelState<T, E> {
    phase: Phase,
    demand: Demand,
    pending: VecDeque<T>,
    completion: Option<Completion<E>>,
    sink: Option<BoxSubscriber<T, E>>,
}

enum Step<T, E> {
    Deliver(T),
    Complete(Completion<E>),
    Stop,
}

/// One subscriber's view of a [`ReplayBuffer`].
///
/// The channel owns the subscriber's demand, a private unbounded queue of items not yet
/// delivered, and a completion waiting for that queue to empty. It is also the
/// [`Subscription`] handed to the subscriber.
///
/// Deliveries to one subscriber never overlap: whichever thread finds the channel idle
/// takes the sink and drains; requests and items arriving meanwhile (including from
/// inside `on_next`) only update the state and are picked up by the same drain pass.
pub(crate) struct ReplayChannel<T, E> {
    id: u64,
    buffer: Weak<ReplayBuffer<T, E>>,
    state: Mutex<ChannelState<T, E>>,
}

impl<T, E> ReplayChannel<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub(crate) fn new(
        id: u64,
        buffer: Weak<ReplayBuffer<T, E>>,
        sink: BoxSubscriber<T, E>,
        replay: VecDeque<T>,
        completion: Option<Completion<E>>,
    ) -> Self {
        Self {
            id,
            buffer,
            state: Mutex::new(ChannelState {
                phase: Phase::Subscribing,
                demand: Demand::NONE,
                pending: replay,
                completion,
                sink: Some(sink),
            }),
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Hands the subscription to the subscriber, then delivers whatever is already due.
    pub(crate) fn start(self: &Arc<Self>) {
        let Some(mut sink) = self.state.lock().sink.take() else {
            return;
        };

        let handle: SubscriptionHandle = Arc::clone(self) as SubscriptionHandle;
        sink.on_subscribe(handle);

        let rejected = {
            let mut state = self.state.lock();
            if state.phase == Phase::Terminated {
                Some(sink)
            } else {
                state.sink = Some(sink);
                state.phase = Phase::Idle;
                None
            }
        };
        if rejected.is_some() {
            trace!("replay channel {} cancelled during on_subscribe", self.id);
            return;
        }

        self.drain();
    }

    /// Queues an item behind everything already pending. Ignored once terminated.
    pub(crate) fn enqueue(&self, item: T) {
        let mut state = self.state.lock();
        if state.phase != Phase::Terminated && state.completion.is_none() {
            state.pending.push_back(item);
        }
    }

    /// Records the terminal event; it is delivered once the queue is empty.
    pub(crate) fn record_completion(&self, completion: Completion<E>) {
        let mut state = self.state.lock();
        if state.phase != Phase::Terminated && state.completion.is_none() {
            state.completion = Some(completion);
        }
    }

    /// Delivers queued items while demand lasts, then the completion if the queue ran dry.
    pub(crate) fn drain(&self) {
        let mut sink = {
            let mut state = self.state.lock();
            if state.phase != Phase::Idle {
                return;
            }
            let Some(sink) = state.sink.take() else {
                return;
            };
            state.phase = Phase::Draining;
            sink
        };

        loop {
            let step = {
                let mut state = self.state.lock();
                if state.phase == Phase::Terminated {
                    Step::Stop
                } else if state.demand.has_demand() && !state.pending.is_empty() {
                    match state.pending.pop_front() {
                        Some(item) => {
                            state.demand -= 1_usize;
                            Step::Deliver(item)
                        }
                        None => Step::Stop,
                    }
                } else if state.pending.is_empty() && state.completion.is_some() {
                    match state.completion.take() {
                        Some(completion) => {
                            state.phase = Phase::Terminated;
                            Step::Complete(completion)
                        }
                        None => Step::Stop,
                    }
                } else {
                    state.phase = Phase::Idle;
                    state.sink = Some(sink);
                    return;
                }
            };

            match step {
                Step::Deliver(item) => {
                    let more = sink.on_next(item);
                    if more.has_demand() {
                        let mut state = self.state.lock();
                        if state.phase != Phase::Terminated {
                            state.demand += more;
                        }
                    }
                }
                Step::Complete(completion) => {
                    sink.on_complete(completion);
                    self.detach();
                    return;
                }
                Step::Stop => return,
            }
        }
    }

    fn detach(&self) {
        if let Some(buffer) = self.buffer.upgrade() {
            buffer.detach(self.id);
        }
    }
}

impl<T, E> Subscription for ReplayChannel<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn request(&self, demand: Demand) {
        if demand.is_none() {
            return;
        }
        {
            let mut state = self.state.lock();
            if state.phase == Phase::Terminated {
                return;
            }
            state.demand += demand;
        }
        self.drain();
    }

    fn cancel(&self) {
        let sink = {
            let mut state = self.state.lock();
            if state.phase == Phase::Terminated {
                return;
            }
            state.phase = Phase::Terminated;
            state.pending.clear();
            state.completion = None;
            state.sink.take()
        };
        drop(sink);

        trace!("replay channel {} cancelled", self.id);
        self.detach();
    }
}
