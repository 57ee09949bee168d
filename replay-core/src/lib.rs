// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Demand-driven reactive contracts.
//!
//! This crate defines the vocabulary shared by every stage of a replay pipeline:
//!
//! - [`Demand`]: how many more items a subscriber is willing to receive.
//! - [`Completion`]: the terminal event of a stream, `Finished` or `Failed(E)`.
//! - [`Publisher`], [`Subscriber`] and [`Subscription`]: the push/pull handshake.
//!
//! It also ships a few building blocks on top of those contracts: a hot
//! [`PassthroughSubject`], a cold [`Sequence`] publisher, a closure-based [`sink`]
//! and a [`SubscriberStream`] adapter that bridges any publisher into a
//! [`futures::Stream`].
//!
//! # Example
//!
//! ```
//! use replay_core::{sequence, sink_values, Publisher};
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let seen_clone = Arc::clone(&seen);
//!
//! let _cancellable = sink_values(&sequence::<_, ()>(1..=3), move |v| {
//!     seen_clone.lock().unwrap().push(v);
//! });
//!
//! assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
//! ```

extern crate alloc;

pub mod completion;
pub mod demand;
pub mod error;
pub mod into_stream;
pub mod passthrough_subject;
pub mod publisher;
pub mod replay_mutex;
pub mod sequence;
pub mod sink;
pub mod subject_error;

pub use self::completion::Completion;
pub use self::demand::Demand;
pub use self::error::{ReplayError, Result};
pub use self::into_stream::{PublisherStreamExt, SubscriberStream};
pub use self::passthrough_subject::PassthroughSubject;
pub use self::publisher::{Publisher, Subscriber, Subscription, SubscriptionHandle};
pub use self::sequence::{sequence, Sequence};
pub use self::sink::{sink, sink_values, Cancellable, ClosureSubscriber};
pub use self::subject_error::SubjectError;
