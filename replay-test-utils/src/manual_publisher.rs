// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! An upstream publisher driven by hand.

use parking_lot::Mutex;
use replay_core::{Completion, Demand, Publisher, Subscriber, Subscription, SubscriptionHandle};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// The subscription a [`ManualPublisher`] hands out. Records requests and cancellation.
#[derive(Debug, Default)]
pub struct ManualSubscription {
    requests: Mutex<Vec<Demand>>,
    cancelled: AtomicBool,
}

impl ManualSubscription {
    /// Every demand requested, in order.
    pub fn requests(&self) -> Vec<Demand> {
        self.requests.lock().clone()
    }

    /// Sum of all requested demand.
    pub fn total_requested(&self) -> Demand {
        self.requests
            .lock()
            .iter()
            .fold(Demand::NONE, |acc, d| acc + *d)
    }

    /// Returns `true` once cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Subscription for ManualSubscription {
    fn request(&self, demand: Demand) {
        self.requests.lock().push(demand);
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

struct ManualState<T, E> {
    subscribers: Vec<Box<dyn Subscriber<T, E>>>,
    subscriptions: Vec<Arc<ManualSubscription>>,
}

/// A publisher whose signals are emitted explicitly by the test.
///
/// Demand is recorded but not enforced, and nothing stops the test from breaking the
/// protocol (items after completion, a second completion, a second `on_subscribe`),
/// which is exactly what it is for.
pub struct ManualPublisher<T, E> {
    state: Arc<Mutex<ManualState<T, E>>>,
    subscribe_count: Arc<AtomicUsize>,
}

impl<T, E> Clone for ManualPublisher<T, E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            subscribe_count: Arc::clone(&self.subscribe_count),
        }
    }
}

impl<T: Clone, E: Clone> ManualPublisher<T, E> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualState {
                subscribers: Vec::new(),
                subscriptions: Vec::new(),
            })),
            subscribe_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// How many times `subscribe` was called.
    pub fn subscribe_count(&self) -> usize {
        self.subscribe_count.load(Ordering::SeqCst)
    }

    /// The subscription handed to the most recent subscriber.
    pub fn last_subscription(&self) -> Option<Arc<ManualSubscription>> {
        self.state.lock().subscriptions.last().cloned()
    }

    /// Calls `on_next` on every subscriber, returning the demand each one yielded.
    pub fn emit(&self, item: T) -> Vec<Demand> {
        self.with_subscribers(|subscriber| subscriber.on_next(item.clone()))
    }

    /// Calls `on_complete` on every subscriber. Can be called more than once.
    pub fn complete(&self, completion: Completion<E>) {
        self.with_subscribers(|subscriber| subscriber.on_complete(completion.clone()));
    }

    /// Hands every subscriber an additional, fresh subscription.
    pub fn resubscribe(&self) -> Arc<ManualSubscription> {
        let subscription = Arc::new(ManualSubscription::default());
        self.state
            .lock()
            .subscriptions
            .push(Arc::clone(&subscription));
        let handle: SubscriptionHandle = subscription.clone();
        self.with_subscribers(|subscriber| subscriber.on_subscribe(Arc::clone(&handle)));
        subscription
    }

    // Subscribers are taken out while being called so they may call back into the test.
    fn with_subscribers<R>(&self, mut f: impl FnMut(&mut Box<dyn Subscriber<T, E>>) -> R) -> Vec<R> {
        let mut subscribers = std::mem::take(&mut self.state.lock().subscribers);
        let results = subscribers.iter_mut().map(&mut f).collect();
        let mut state = self.state.lock();
        subscribers.append(&mut state.subscribers);
        state.subscribers = subscribers;
        results
    }
}

impl<T: Clone, E: Clone> Default for ManualPublisher<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Publisher for ManualPublisher<T, E>
where
    T: 'static,
    E: 'static,
{
    type Item = T;
    type Failure = E;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<T, E> + 'static,
    {
        self.subscribe_count.fetch_add(1, Ordering::SeqCst);

        let subscription = Arc::new(ManualSubscription::default());
        self.state
            .lock()
            .subscriptions
            .push(Arc::clone(&subscription));

        let mut subscriber: Box<dyn Subscriber<T, E>> = Box::new(subscriber);
        subscriber.on_subscribe(subscription);
        self.state.lock().subscribers.push(subscriber);
    }
}
