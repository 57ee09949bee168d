// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Multicast replay of the latest items of a publisher.
//!
//! [`ReplayLatest`] subscribes once to an upstream [`Publisher`](replay_core::Publisher)
//! and fans its items out to any number of subscribers. Subscribers that attach late
//! first receive the most recent items, up to a configured [`ReplayCapacity`], then the
//! live items. Every subscriber controls its own demand; the upstream is always
//! requested with unlimited demand and slow subscribers accumulate a private backlog.
//!
//! # Example
//!
//! ```
//! use replay_core::{sink_values, PassthroughSubject};
//! use replay_latest::ReplayLatestExt;
//! use std::sync::{Arc, Mutex};
//!
//! let subject = PassthroughSubject::<i32, ()>::new();
//! let replay = subject.clone().replay_latest(2);
//! let results = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink_a = Arc::clone(&results);
//! let _a = sink_values(&replay, move |v| sink_a.lock().unwrap().push(v));
//!
//! subject.send(0).unwrap();
//! subject.send(1).unwrap();
//! subject.send(2).unwrap();
//!
//! let sink_b = Arc::clone(&results);
//! let _b = sink_values(&replay, move |v| sink_b.lock().unwrap().push(v));
//!
//! subject.send(3).unwrap();
//!
//! assert_eq!(*results.lock().unwrap(), vec![0, 1, 2, 1, 2, 3, 3]);
//! ```

extern crate alloc;

mod logging;

pub mod capacity;
pub mod replay_latest;

pub use self::capacity::ReplayCapacity;
pub use self::replay_latest::{ReplayLatest, ReplayLatestExt};
