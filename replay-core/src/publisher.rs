// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Publisher, subscriber and subscription contracts.
//!
//! The handshake follows the demand-driven reactive model:
//!
//! 1. A [`Subscriber`] is handed to [`Publisher::subscribe`].
//! 2. The publisher calls [`Subscriber::on_subscribe`] exactly once with a [`SubscriptionHandle`].
//! 3. The subscriber signals demand through [`Subscription::request`]; the publisher never
//!    delivers more items than requested. Each [`Subscriber::on_next`] may return additional
//!    demand, which is added to what is still outstanding.
//! 4. The stream ends with at most one [`Subscriber::on_complete`]. After that, or after
//!    [`Subscription::cancel`], no further calls reach the subscriber.

use crate::{Completion, Demand};
use alloc::boxed::Box;
use alloc::sync::Arc;

/// Shared, type-erased handle to a subscription.
pub type SubscriptionHandle = Arc<dyn Subscription>;

/// The link between one publisher and one subscriber.
///
/// Calls on a single subscription are expected to come from one logical writer at a time:
/// the subscriber it was handed to. Different subscriptions may be driven from different
/// threads concurrently.
pub trait Subscription: Send + Sync {
    /// Adds `demand` to the outstanding demand. `Demand::NONE` is a no-op.
    fn request(&self, demand: Demand);

    /// Stops delivery to this subscriber. Idempotent.
    fn cancel(&self);
}

/// Receives items and the terminal event from a [`Publisher`].
pub trait Subscriber<T, E>: Send {
    /// Called once, before any other signal.
    fn on_subscribe(&mut self, subscription: SubscriptionHandle);

    /// Called for each item; the returned demand is added to the outstanding demand.
    fn on_next(&mut self, item: T) -> Demand;

    /// Called at most once when the stream ends.
    fn on_complete(&mut self, completion: Completion<E>);
}

impl<T, E, S> Subscriber<T, E> for Box<S>
where
    S: Subscriber<T, E> + ?Sized,
{
    fn on_subscribe(&mut self, subscription: SubscriptionHandle) {
        (**self).on_subscribe(subscription);
    }

    fn on_next(&mut self, item: T) -> Demand {
        (**self).on_next(item)
    }

    fn on_complete(&mut self, completion: Completion<E>) {
        (**self).on_complete(completion);
    }
}

/// A source of items that subscribers can attach to.
pub trait Publisher {
    /// The item type.
    type Item;
    /// The failure type carried by [`Completion::Failed`].
    type Failure;

    /// Attaches `subscriber` to this publisher.
    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Self::Item, Self::Failure> + 'static;
}
