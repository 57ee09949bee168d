// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

// Conditional logging shim: uses `tracing` when enabled, discards the message otherwise

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub(crate) fn discard(_args: core::fmt::Arguments<'_>) {}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_ {
    ($($arg:tt)*) => {
        $crate::logging::discard(format_args!($($arg)*))
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_ {
    ($($arg:tt)*) => {
        $crate::logging::discard(format_args!($($arg)*))
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_ {
    ($($arg:tt)*) => {
        $crate::logging::discard(format_args!($($arg)*))
    };
}

#[cfg(not(feature = "tracing"))]
// Suffixed names avoid clashing with the built-in `warn` attribute.
pub(crate) use {debug_ as debug, trace_ as trace, warn_ as warn};
