// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cold publisher over an iterator.

use crate::replay_mutex::Mutex;
use crate::{Completion, Demand, Publisher, Subscriber, Subscription};
use alloc::boxed::Box;
use alloc::sync::Arc;
use core::iter::Peekable;
use core::marker::PhantomData;

/// A cold publisher that replays an iterator to every subscriber.
///
/// Each subscriber gets its own clone of the iterator, receives its items as demand
/// allows, and is then completed with `Completion::Finished`.
///
/// Built with [`sequence`].
pub struct Sequence<I, E> {
    items: I,
    _failure: PhantomData<fn() -> E>,
}

/// Creates a [`Sequence`] publisher from anything iterable.
///
/// ```
/// use replay_core::{sequence, sink_values};
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let seen_clone = Arc::clone(&seen);
/// let _c = sink_values(&sequence::<_, ()>(vec!['a', 'b']), move |c| seen_clone.lock().unwrap().push(c));
/// assert_eq!(*seen.lock().unwrap(), vec!['a', 'b']);
/// ```
pub fn sequence<I, E>(items: I) -> Sequence<I::IntoIter, E>
where
    I: IntoIterator,
{
    Sequence {
        items: items.into_iter(),
        _failure: PhantomData,
    }
}

impl<I: Clone, E> Clone for Sequence<I, E> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            _failure: PhantomData,
        }
    }
}

struct SequenceState<I: Iterator, E> {
    items: Peekable<I>,
    demand: Demand,
    sink: Option<Box<dyn Subscriber<I::Item, E>>>,
    draining: bool,
    done: bool,
}

struct SequenceSubscription<I: Iterator, E> {
    state: Mutex<SequenceState<I, E>>,
}

enum Step<T> {
    Emit(T),
    Finish,
    Park,
    Stop,
}

impl<I, E> SequenceSubscription<I, E>
where
    I: Iterator,
{
    fn drain(&self) {
        let mut sink = {
            let mut state = self.state.lock();
            if state.draining || state.done {
                return;
            }
            let Some(sink) = state.sink.take() else {
                return;
            };
            state.draining = true;
            sink
        };

        loop {
            let step = {
                let mut state = self.state.lock();
                if state.done {
                    Step::Stop
                } else if state.items.peek().is_none() {
                    state.done = true;
                    Step::Finish
                } else if !state.demand.has_demand() {
                    Step::Park
                } else if let Some(item) = state.items.next() {
                    state.demand -= 1_usize;
                    Step::Emit(item)
                } else {
                    Step::Stop
                }
            };

            match step {
                Step::Emit(item) => {
                    let more = sink.on_next(item);
                    self.state.lock().demand += more;
                }
                Step::Finish => {
                    sink.on_complete(Completion::Finished);
                    return;
                }
                Step::Park => {
                    let mut state = self.state.lock();
                    state.draining = false;
                    state.sink = Some(sink);
                    return;
                }
                Step::Stop => return,
            }
        }
    }
}

impl<I, E> Subscription for SequenceSubscription<I, E>
where
    I: Iterator + Send,
    I::Item: Send,
    E: Send,
{
    fn request(&self, demand: Demand) {
        if demand.is_none() {
            return;
        }
        {
            let mut state = self.state.lock();
            if state.done {
                return;
            }
            state.demand += demand;
        }
        self.drain();
    }

    fn cancel(&self) {
        let sink = {
            let mut state = self.state.lock();
            state.done = true;
            state.sink.take()
        };
        drop(sink);
    }
}

impl<I, E> Publisher for Sequence<I, E>
where
    I: Iterator + Clone + Send + 'static,
    I::Item: Send + 'static,
    E: Send + 'static,
{
    type Item = I::Item;
    type Failure = E;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<I::Item, E> + 'static,
    {
        let subscription = Arc::new(SequenceSubscription {
            state: Mutex::new(SequenceState {
                items: self.items.clone().peekable(),
                demand: Demand::NONE,
                sink: None,
                draining: true,
                done: false,
            }),
        });

        let mut sink: Box<dyn Subscriber<I::Item, E>> = Box::new(subscriber);
        sink.on_subscribe(subscription.clone());

        {
            let mut state = subscription.state.lock();
            if state.done {
                return;
            }
            state.sink = Some(sink);
            state.draining = false;
        }
        subscription.drain();
    }
}
