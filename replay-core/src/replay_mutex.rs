// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The mutex every publisher in the workspace locks its state with.
//!
//! `parking_lot` when `std` is enabled, a spin lock on bare `alloc` targets. Neither
//! poisons, so `lock()` returns the guard directly.

#[cfg(feature = "std")]
pub use parking_lot::Mutex;

#[cfg(not(feature = "std"))]
pub use spin::Mutex;
