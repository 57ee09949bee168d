// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for the replay workspace.
//!
//! Not intended for production code.
//!
//! # Key Types
//!
//! - [`RecordingSubscriber`] / [`Recorder`]: a subscriber with scripted demand that records
//!   every signal it receives, and the test-side handle to inspect and drive it.
//! - [`ManualPublisher`]: an upstream the test drives signal by signal, including
//!   protocol violations such as a second completion.
//! - [`helpers`]: timeout-guarded assertions for async streams.
//!
//! # Example
//!
//! ```rust
//! use replay_core::{Demand, Publisher};
//! use replay_test_utils::{ManualPublisher, RecordingSubscriber};
//!
//! let upstream = ManualPublisher::<i32, ()>::new();
//! let (subscriber, recorder) = RecordingSubscriber::new(Demand::max(1));
//! upstream.subscribe(subscriber);
//!
//! upstream.emit(7);
//! upstream.emit(8);
//!
//! // The manual publisher does not enforce demand, the recorder sees everything.
//! assert_eq!(recorder.values(), vec![7, 8]);
//! ```

pub mod helpers;
pub mod manual_publisher;
pub mod recording;

pub use helpers::{assert_no_element_emitted, assert_stream_ended, unwrap_stream};
pub use manual_publisher::{ManualPublisher, ManualSubscription};
pub use recording::{Event, Recorder, RecordingSubscriber};
