// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Replay
//!
//! A multicast, backpressure-aware replay stage for demand-driven reactive streams.
//!
//! ## Overview
//!
//! One upstream [`Publisher`] is shared by many subscribers through [`ReplayLatest`].
//! Late subscribers first receive the latest items (up to a [`ReplayCapacity`]), then the
//! live ones, and every subscriber paces its own delivery with [`Demand`].
//!
//! ## Quick Start
//!
//! ```rust
//! use replay::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let subject = PassthroughSubject::<u32, ReplayError>::new();
//! let prices = subject.clone().replay_latest(1);
//!
//! subject.send(100).unwrap(); // not connected yet: no subscriber, nothing recorded
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let seen_clone = Arc::clone(&seen);
//! let _cancellable = sink_values(&prices, move |p| seen_clone.lock().unwrap().push(p));
//!
//! subject.send(101).unwrap();
//! subject.send(102).unwrap();
//!
//! assert_eq!(*seen.lock().unwrap(), vec![101, 102]);
//! assert_eq!(prices.replay_len(), 1);
//! ```

// Re-export core types
pub use replay_core::{
    sequence, sink, sink_values, Cancellable, Completion, Demand, PassthroughSubject, Publisher,
    PublisherStreamExt, ReplayError, Sequence, SubjectError, Subscriber, SubscriberStream,
    Subscription, SubscriptionHandle,
};

// Re-export the replay stage
pub use replay_latest::{ReplayCapacity, ReplayLatest, ReplayLatestExt};

/// Prelude module for convenient imports
pub mod prelude {
    pub use replay_core::{
        sequence, sink, sink_values, Completion, Demand, PassthroughSubject, Publisher,
        PublisherStreamExt, ReplayError, Subscriber, Subscription,
    };
    pub use replay_latest::{ReplayCapacity, ReplayLatest, ReplayLatestExt};
}
