// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Errors specific to subject operations.
///
/// These are distinct from stream failures: a subject error is reported to the
/// caller pushing values, never to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubjectError {
    /// The subject has already completed and cannot accept new values.
    #[error("Subject is closed")]
    Closed,
}
