// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Closure-based subscribers with drop-cancelling handles.

use crate::replay_mutex::Mutex;
use crate::{Completion, Demand, Publisher, Subscriber, SubscriptionHandle};
use alloc::sync::Arc;
use alloc::vec::Vec;

#[derive(Default)]
struct CancelState {
    subscription: Option<SubscriptionHandle>,
    cancelled: bool,
}

/// Cancels its subscription when dropped.
///
/// Returned by [`sink`] and [`sink_values`]. Keep it alive for as long as values
/// should keep flowing.
#[must_use = "dropping a Cancellable cancels the subscription"]
pub struct Cancellable {
    state: Arc<Mutex<CancelState>>,
}

impl Cancellable {
    /// Cancels the subscription. Idempotent.
    pub fn cancel(&self) {
        let subscription = {
            let mut state = self.state.lock();
            state.cancelled = true;
            state.subscription.take()
        };
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.lock().cancelled
    }

    /// Moves this handle into `bag`, tying the subscription's lifetime to it.
    pub fn store(self, bag: &mut Vec<Cancellable>) {
        bag.push(self);
    }
}

impl Drop for Cancellable {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A subscriber that requests unlimited demand and forwards every signal to closures.
pub struct ClosureSubscriber<F, G> {
    on_value: F,
    on_completion: Option<G>,
    state: Arc<Mutex<CancelState>>,
}

impl<F, G> ClosureSubscriber<F, G> {
    /// Creates the subscriber together with the [`Cancellable`] controlling it.
    pub fn new(on_value: F, on_completion: G) -> (Self, Cancellable) {
        let state = Arc::new(Mutex::new(CancelState::default()));
        let subscriber = Self {
            on_value,
            on_completion: Some(on_completion),
            state: Arc::clone(&state),
        };
        (subscriber, Cancellable { state })
    }
}

impl<T, E, F, G> Subscriber<T, E> for ClosureSubscriber<F, G>
where
    F: FnMut(T) + Send,
    G: FnOnce(Completion<E>) + Send,
{
    fn on_subscribe(&mut self, subscription: SubscriptionHandle) {
        let already_cancelled = {
            let mut state = self.state.lock();
            if !state.cancelled {
                state.subscription = Some(Arc::clone(&subscription));
            }
            state.cancelled
        };

        if already_cancelled {
            subscription.cancel();
        } else {
            subscription.request(Demand::UNLIMITED);
        }
    }

    fn on_next(&mut self, item: T) -> Demand {
        (self.on_value)(item);
        Demand::NONE
    }

    fn on_complete(&mut self, completion: Completion<E>) {
        self.state.lock().subscription = None;
        if let Some(on_completion) = self.on_completion.take() {
            on_completion(completion);
        }
    }
}

/// Subscribes closures to `publisher` with unlimited demand.
pub fn sink<P, F, G>(publisher: &P, on_value: F, on_completion: G) -> Cancellable
where
    P: Publisher,
    F: FnMut(P::Item) + Send + 'static,
    G: FnOnce(Completion<P::Failure>) + Send + 'static,
{
    let (subscriber, cancellable) = ClosureSubscriber::new(on_value, on_completion);
    publisher.subscribe(subscriber);
    cancellable
}

/// Like [`sink`], ignoring the completion.
pub fn sink_values<P, F>(publisher: &P, on_value: F) -> Cancellable
where
    P: Publisher,
    F: FnMut(P::Item) + Send + 'static,
{
    sink(publisher, on_value, |_| {})
}
