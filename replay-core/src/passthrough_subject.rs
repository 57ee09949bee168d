// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, multi-subscriber subject driven by explicit pushes.
//!
//! A [`PassthroughSubject`] forwards each value passed to [`send`](PassthroughSubject::send)
//! to every subscriber that currently has demand for it.
//!
//! ## Characteristics
//!
//! - **Hot**: late subscribers do not receive past values, only values sent after subscribing.
//! - **Demand-aware**: a subscriber without outstanding demand misses the value.
//! - **Thread-safe**: cheap to clone; all clones share the same internal state.
//! - **Terminal**: once completed, the completion is handed to current and future subscribers
//!   and further sends are rejected.
//!
//! `send` calls are expected to be serialized by the caller, as with any upstream. A value
//! sent while a subscriber is still inside `on_next`, for example from that callback, is
//! queued for it and delivered once the callback returns.
//!
//! ## Example
//!
//! ```
//! use replay_core::{sink_values, PassthroughSubject};
//! use std::sync::{Arc, Mutex};
//!
//! let subject = PassthroughSubject::<i32, ()>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let seen_clone = Arc::clone(&seen);
//!
//! subject.send(0).unwrap(); // nobody listening yet
//! let _cancellable = sink_values(&subject, move |v| seen_clone.lock().unwrap().push(v));
//! subject.send(1).unwrap();
//! subject.finish();
//!
//! assert_eq!(*seen.lock().unwrap(), vec![1]);
//! assert!(subject.send(2).is_err());
//! ```

use crate::replay_mutex::Mutex;
use crate::{Completion, Demand, Publisher, SubjectError, Subscriber, Subscription};
use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;

type BoxSubscriber<T, E> = Box<dyn Subscriber<T, E>>;

struct SubjectState<T, E> {
    completion: Option<Completion<E>>,
    next_id: u64,
    subscriptions: Vec<Arc<SubjectSubscription<T, E>>>,
}

struct SlotState<T, E> {
    demand: Demand,
    sink: Option<BoxSubscriber<T, E>>,
    // Values and completion that arrived while the sink was busy in `on_next`.
    queued: VecDeque<T>,
    deferred: Option<Completion<E>>,
    cancelled: bool,
}

impl<T, E> SlotState<T, E> {
    /// Pops the next queued value the subscriber has demand for; values without demand are dropped.
    fn next_queued(&mut self) -> Option<T> {
        while let Some(value) = self.queued.pop_front() {
            if self.demand.has_demand() {
                self.demand -= 1_usize;
                return Some(value);
            }
        }
        None
    }
}

enum Step<T, E> {
    Next(T),
    Complete(Completion<E>),
}

struct SubjectSubscription<T, E> {
    id: u64,
    subject: Weak<Mutex<SubjectState<T, E>>>,
    slot: Mutex<SlotState<T, E>>,
}

impl<T, E> SubjectSubscription<T, E> {
    fn deliver(&self, mut value: T) {
        let mut sink = {
            let mut slot = self.slot.lock();
            if slot.cancelled || slot.deferred.is_some() {
                return;
            }
            let Some(sink) = slot.sink.take() else {
                // The delivery already running picks it up once `on_next` returns.
                slot.queued.push_back(value);
                return;
            };
            if !slot.demand.has_demand() {
                slot.sink = Some(sink);
                return;
            }
            slot.demand -= 1_usize;
            sink
        };

        loop {
            let more = sink.on_next(value);

            let step = {
                let mut slot = self.slot.lock();
                if slot.cancelled {
                    return;
                }
                slot.demand += more;
                if let Some(next) = slot.next_queued() {
                    Step::Next(next)
                } else if let Some(completion) = slot.deferred.take() {
                    slot.cancelled = true;
                    Step::Complete(completion)
                } else {
                    slot.sink = Some(sink);
                    return;
                }
            };

            match step {
                Step::Next(next) => value = next,
                Step::Complete(completion) => {
                    sink.on_complete(completion);
                    return;
                }
            }
        }
    }

    fn complete(&self, completion: Completion<E>) {
        let mut sink = {
            let mut slot = self.slot.lock();
            if slot.cancelled || slot.deferred.is_some() {
                return;
            }
            match slot.sink.take() {
                Some(sink) => {
                    slot.cancelled = true;
                    sink
                }
                None => {
                    slot.deferred = Some(completion);
                    return;
                }
            }
        };
        sink.on_complete(completion);
    }
}

impl<T, E> Subscription for SubjectSubscription<T, E>
where
    T: Send,
    E: Send,
{
    fn request(&self, demand: Demand) {
        let mut slot = self.slot.lock();
        if !slot.cancelled {
            slot.demand += demand;
        }
    }

    fn cancel(&self) {
        let sink = {
            let mut slot = self.slot.lock();
            if slot.cancelled {
                return;
            }
            slot.cancelled = true;
            slot.queued.clear();
            slot.deferred = None;
            slot.sink.take()
        };
        drop(sink);

        if let Some(subject) = self.subject.upgrade() {
            subject.lock().subscriptions.retain(|s| s.id != self.id);
        }
    }
}

/// A hot subject that forwards pushed values to all subscribers with demand.
///
/// See the [module documentation](self) for details.
pub struct PassthroughSubject<T, E> {
    state: Arc<Mutex<SubjectState<T, E>>>,
}

impl<T, E> PassthroughSubject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates a new subject with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                completion: None,
                next_id: 0,
                subscriptions: Vec::new(),
            })),
        }
    }

    /// Sends a value to every subscriber with outstanding demand.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has already completed.
    pub fn send(&self, value: T) -> Result<(), SubjectError> {
        let subscriptions = {
            let state = self.state.lock();
            if state.completion.is_some() {
                return Err(SubjectError::Closed);
            }
            state.subscriptions.clone()
        };

        for subscription in subscriptions {
            subscription.deliver(value.clone());
        }
        Ok(())
    }

    /// Completes the subject, handing `completion` to every subscriber.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has already completed.
    pub fn send_completion(&self, completion: Completion<E>) -> Result<(), SubjectError> {
        let subscriptions = {
            let mut state = self.state.lock();
            if state.completion.is_some() {
                return Err(SubjectError::Closed);
            }
            state.completion = Some(completion.clone());
            core::mem::take(&mut state.subscriptions)
        };

        for subscription in subscriptions {
            subscription.complete(completion.clone());
        }
        Ok(())
    }

    /// Completes the subject successfully. Idempotent.
    pub fn finish(&self) {
        let _ = self.send_completion(Completion::Finished);
    }

    /// Completes the subject with `error`. Ignored if already completed.
    pub fn fail(&self, error: E) {
        let _ = self.send_completion(Completion::Failed(error));
    }

    /// Returns `true` once the subject has completed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().completion.is_some()
    }

    /// Returns the number of attached, non-cancelled subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscriptions.len()
    }
}

impl<T, E> Publisher for PassthroughSubject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    type Item = T;
    type Failure = E;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<T, E> + 'static,
    {
        let id = {
            let mut state = self.state.lock();
            state.next_id += 1;
            state.next_id
        };
        let subscription = Arc::new(SubjectSubscription {
            id,
            subject: Arc::downgrade(&self.state),
            slot: Mutex::new(SlotState {
                demand: Demand::NONE,
                sink: None,
                queued: VecDeque::new(),
                deferred: None,
                cancelled: false,
            }),
        });

        let mut sink: BoxSubscriber<T, E> = Box::new(subscriber);
        sink.on_subscribe(subscription.clone());

        {
            let mut slot = subscription.slot.lock();
            if slot.cancelled {
                return;
            }
            slot.sink = Some(sink);
        }

        let completion = {
            let mut state = self.state.lock();
            match &state.completion {
                Some(completion) => Some(completion.clone()),
                None => {
                    state.subscriptions.push(subscription.clone());
                    None
                }
            }
        };

        if let Some(completion) = completion {
            subscription.complete(completion);
        }
    }
}

impl<T, E> Default for PassthroughSubject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for PassthroughSubject<T, E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}
