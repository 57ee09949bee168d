// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A subscriber that records what it receives.

use parking_lot::Mutex;
use replay_core::{Completion, Demand, Subscriber, SubscriptionHandle};
use std::sync::Arc;

/// One signal observed by a [`RecordingSubscriber`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<T, E> {
    Subscribed,
    Next(T),
    Complete(Completion<E>),
}

struct Recording<T, E> {
    events: Vec<Event<T, E>>,
    subscription: Option<SubscriptionHandle>,
}

/// Test-side handle of a [`RecordingSubscriber`].
///
/// Cloneable; every clone observes the same recording.
pub struct Recorder<T, E> {
    inner: Arc<Mutex<Recording<T, E>>>,
}

impl<T, E> Clone for Recorder<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone, E: Clone> Recorder<T, E> {
    /// Every recorded signal, in order.
    pub fn events(&self) -> Vec<Event<T, E>> {
        self.inner.lock().events.clone()
    }

    /// The received items, in order.
    pub fn values(&self) -> Vec<T> {
        self.inner
            .lock()
            .events
            .iter()
            .filter_map(|event| match event {
                Event::Next(v) => Some(v.clone()),
                _ => None,
            })
            .collect()
    }

    /// The first received completion.
    pub fn completion(&self) -> Option<Completion<E>> {
        self.inner.lock().events.iter().find_map(|event| match event {
            Event::Complete(c) => Some(c.clone()),
            _ => None,
        })
    }

    /// How many completions were received. Anything but 0 or 1 is a bug.
    pub fn completion_count(&self) -> usize {
        self.inner
            .lock()
            .events
            .iter()
            .filter(|event| matches!(event, Event::Complete(_)))
            .count()
    }

    /// Returns `true` once `on_subscribe` has been called.
    pub fn is_subscribed(&self) -> bool {
        self.inner.lock().subscription.is_some()
    }

    /// Requests more items through the recorded subscription.
    ///
    /// # Panics
    ///
    /// Panics if the subscriber was never subscribed.
    pub fn request(&self, demand: Demand) {
        let subscription = self.handle();
        subscription.request(demand);
    }

    /// Cancels the recorded subscription.
    ///
    /// # Panics
    ///
    /// Panics if the subscriber was never subscribed.
    pub fn cancel(&self) {
        let subscription = self.handle();
        subscription.cancel();
    }

    fn handle(&self) -> SubscriptionHandle {
        self.inner
            .lock()
            .subscription
            .clone()
            .expect("subscriber was never subscribed")
    }
}

/// A subscriber with scripted demand that records every signal.
pub struct RecordingSubscriber<T, E> {
    recorder: Recorder<T, E>,
    initial_demand: Demand,
    demand_per_item: Demand,
}

impl<T, E> RecordingSubscriber<T, E> {
    /// Requests `initial_demand` on subscription and nothing more on its own.
    pub fn new(initial_demand: Demand) -> (Self, Recorder<T, E>) {
        Self::replenishing(initial_demand, Demand::NONE)
    }

    /// Requests unlimited demand on subscription.
    pub fn unlimited() -> (Self, Recorder<T, E>) {
        Self::new(Demand::UNLIMITED)
    }

    /// Requests `initial_demand` on subscription and returns `demand_per_item` from each
    /// `on_next`.
    pub fn replenishing(initial_demand: Demand, demand_per_item: Demand) -> (Self, Recorder<T, E>) {
        let recorder = Recorder {
            inner: Arc::new(Mutex::new(Recording {
                events: Vec::new(),
                subscription: None,
            })),
        };
        let subscriber = Self {
            recorder: recorder.clone(),
            initial_demand,
            demand_per_item,
        };
        (subscriber, recorder)
    }
}

impl<T: Send, E: Send> Subscriber<T, E> for RecordingSubscriber<T, E> {
    fn on_subscribe(&mut self, subscription: SubscriptionHandle) {
        {
            let mut recording = self.recorder.inner.lock();
            recording.events.push(Event::Subscribed);
            recording.subscription = Some(Arc::clone(&subscription));
        }
        if self.initial_demand.has_demand() {
            subscription.request(self.initial_demand);
        }
    }

    fn on_next(&mut self, item: T) -> Demand {
        self.recorder.inner.lock().events.push(Event::Next(item));
        self.demand_per_item
    }

    fn on_complete(&mut self, completion: Completion<E>) {
        self.recorder
            .inner
            .lock()
            .events
            .push(Event::Complete(completion));
    }
}
