// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Size of the replay window.

use core::fmt;
use replay_core::ReplayError;

/// How many of the most recent items a [`ReplayLatest`](crate::ReplayLatest) keeps
/// for subscribers that attach late.
///
/// ```
/// use replay_latest::ReplayCapacity;
///
/// assert_eq!(ReplayCapacity::default(), ReplayCapacity::Unbounded);
/// assert_eq!(ReplayCapacity::from(2_usize), ReplayCapacity::Bounded(2));
/// assert!(ReplayCapacity::try_from(-1_i64).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReplayCapacity {
    /// Keep at most this many items. `Bounded(0)` disables replay entirely.
    Bounded(usize),
    /// Keep every item.
    #[default]
    Unbounded,
}

impl ReplayCapacity {
    /// No replay: subscribers only see live items.
    pub const NONE: Self = Self::Bounded(0);

    /// The item limit, or `None` when unbounded.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        match self {
            Self::Bounded(n) => Some(*n),
            Self::Unbounded => None,
        }
    }

    /// Returns `true` if a window of `len` items fits.
    #[must_use]
    pub const fn admits(&self, len: usize) -> bool {
        match self {
            Self::Bounded(n) => len <= *n,
            Self::Unbounded => true,
        }
    }

    /// Returns `false` for a capacity of zero.
    #[must_use]
    pub const fn replays(&self) -> bool {
        !matches!(self, Self::Bounded(0))
    }
}

impl From<usize> for ReplayCapacity {
    fn from(n: usize) -> Self {
        Self::Bounded(n)
    }
}

impl TryFrom<i64> for ReplayCapacity {
    type Error = ReplayError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        usize::try_from(n)
            .map(Self::Bounded)
            .map_err(|_| ReplayError::invalid_capacity(n))
    }
}

impl TryFrom<isize> for ReplayCapacity {
    type Error = ReplayError;

    fn try_from(n: isize) -> Result<Self, Self::Error> {
        usize::try_from(n)
            .map(Self::Bounded)
            .map_err(|_| ReplayError::invalid_capacity(n as i64))
    }
}

impl fmt::Display for ReplayCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(n) => write!(f, "{n}"),
            Self::Unbounded => write!(f, "unbounded"),
        }
    }
}
