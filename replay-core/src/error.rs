// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for replay pipelines.
//!
//! # Examples
//!
//! ```
//! use replay_core::{ReplayError, Result};
//!
//! fn upstream_step() -> Result<()> {
//!     Err(ReplayError::stream_error("sensor offline"))
//! }
//!
//! assert!(upstream_step().is_err());
//! ```

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;

/// Root error type for replay operations.
///
/// `InvalidCapacity` is the only error raised by the library itself; the remaining
/// variants are convenient failure values for upstream publishers, relayed verbatim
/// to subscribers through [`Completion::Failed`](crate::Completion::Failed).
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// A replay window was configured with a negative capacity.
    #[error("Replay capacity must be non-negative, got {requested}")]
    InvalidCapacity {
        /// The rejected capacity
        requested: i64,
    },

    /// Stream processing encountered an error
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong
        context: String,
    },

    /// Custom error from user code
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn core::error::Error + Send + Sync>),
}

impl ReplayError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Create an invalid capacity error
    #[must_use]
    pub const fn invalid_capacity(requested: i64) -> Self {
        Self::InvalidCapacity { requested }
    }

    /// Wrap a user error
    pub fn user_error(error: impl core::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }
}

/// Specialized Result type for replay operations
pub type Result<T> = core::result::Result<T, ReplayError>;

impl Clone for ReplayError {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidCapacity { requested } => Self::InvalidCapacity {
                requested: *requested,
            },
            Self::StreamProcessingError { context } => Self::StreamProcessingError {
                context: context.clone(),
            },
            // The boxed error cannot be cloned, keep its message
            Self::UserError(e) => Self::StreamProcessingError {
                context: format!("User error: {e}"),
            },
        }
    }
}
