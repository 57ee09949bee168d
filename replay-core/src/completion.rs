// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;

/// The terminal event of a stream.
///
/// A stream ends exactly once, either successfully or with a failure value that is
/// relayed verbatim to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<E> {
    /// The stream produced all of its items.
    Finished,
    /// The stream terminated with an error.
    Failed(E),
}

impl<E> Completion<E> {
    /// Returns `true` if this is `Finished`.
    pub const fn is_finished(&self) -> bool {
        matches!(self, Completion::Finished)
    }

    /// Returns `true` if this is `Failed`.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Completion::Failed(_))
    }

    /// Returns the failure, if any.
    pub const fn failure(&self) -> Option<&E> {
        match self {
            Completion::Finished => None,
            Completion::Failed(e) => Some(e),
        }
    }

    /// Maps the failure type, leaving `Finished` untouched.
    pub fn map_failure<F, G>(self, f: G) -> Completion<F>
    where
        G: FnOnce(E) -> F,
    {
        match self {
            Completion::Finished => Completion::Finished,
            Completion::Failed(e) => Completion::Failed(f(e)),
        }
    }
}

impl<E> From<Result<(), E>> for Completion<E> {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Completion::Finished,
            Err(e) => Completion::Failed(e),
        }
    }
}

impl<E> From<Completion<E>> for Result<(), E> {
    fn from(completion: Completion<E>) -> Self {
        match completion {
            Completion::Finished => Ok(()),
            Completion::Failed(e) => Err(e),
        }
    }
}

impl<E: fmt::Display> fmt::Display for Completion<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Finished => write!(f, "finished"),
            Completion::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}
