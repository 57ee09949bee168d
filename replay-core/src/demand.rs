// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Subscriber demand with a saturating "unlimited" state.
//!
//! A [`Demand`] is either a finite count of items (`Max(n)`) or [`Demand::UNLIMITED`].
//! All arithmetic saturates: finite demand never goes below zero, a finite sum that
//! overflows becomes unlimited, and unlimited absorbs both addition and subtraction.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Sub, SubAssign};

/// How many more items a subscriber is willing to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Demand {
    /// Up to `n` more items.
    Max(usize),
    /// Any number of items; never decremented.
    Unlimited,
}

impl Demand {
    /// No more items wanted.
    pub const NONE: Self = Self::Max(0);

    /// Unbounded demand.
    pub const UNLIMITED: Self = Self::Unlimited;

    /// Finite demand for `n` items.
    #[must_use]
    pub const fn max(n: usize) -> Self {
        Self::Max(n)
    }

    /// Returns `true` if no items are wanted.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::Max(0))
    }

    /// Returns `true` for [`Demand::UNLIMITED`].
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// Returns `true` if at least one more item is wanted.
    #[must_use]
    pub const fn has_demand(&self) -> bool {
        !self.is_none()
    }

    /// The finite count, or `None` when unlimited.
    #[must_use]
    pub const fn as_finite(&self) -> Option<usize> {
        match self {
            Self::Max(n) => Some(*n),
            Self::Unlimited => None,
        }
    }
}

impl Default for Demand {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<usize> for Demand {
    fn from(n: usize) -> Self {
        Self::Max(n)
    }
}

impl Add for Demand {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Max(a), Self::Max(b)) => a.checked_add(b).map_or(Self::Unlimited, Self::Max),
            _ => Self::Unlimited,
        }
    }
}

impl Add<usize> for Demand {
    type Output = Self;

    fn add(self, rhs: usize) -> Self {
        self + Self::Max(rhs)
    }
}

impl AddAssign for Demand {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl AddAssign<usize> for Demand {
    fn add_assign(&mut self, rhs: usize) {
        *self = *self + rhs;
    }
}

impl Sub<usize> for Demand {
    type Output = Self;

    fn sub(self, rhs: usize) -> Self {
        match self {
            Self::Max(n) => Self::Max(n.saturating_sub(rhs)),
            Self::Unlimited => Self::Unlimited,
        }
    }
}

impl Sub for Demand {
    type Output = Self;

    /// Subtracting unlimited from a finite demand yields none; unlimited minus anything stays unlimited.
    fn sub(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Unlimited, _) => Self::Unlimited,
            (Self::Max(_), Self::Unlimited) => Self::NONE,
            (Self::Max(a), Self::Max(b)) => Self::Max(a.saturating_sub(b)),
        }
    }
}

impl SubAssign<usize> for Demand {
    fn sub_assign(&mut self, rhs: usize) {
        *self = *self - rhs;
    }
}

impl SubAssign for Demand {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl PartialEq<usize> for Demand {
    fn eq(&self, other: &usize) -> bool {
        matches!(self, Self::Max(n) if n == other)
    }
}

impl PartialOrd<usize> for Demand {
    fn partial_cmp(&self, other: &usize) -> Option<Ordering> {
        match self {
            Self::Max(n) => n.partial_cmp(other),
            Self::Unlimited => Some(Ordering::Greater),
        }
    }
}

impl PartialOrd for Demand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Demand {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Max(a), Self::Max(b)) => a.cmp(b),
            (Self::Max(_), Self::Unlimited) => Ordering::Less,
            (Self::Unlimited, Self::Max(_)) => Ordering::Greater,
            (Self::Unlimited, Self::Unlimited) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Demand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Max(n) => write!(f, "max({n})"),
            Self::Unlimited => write!(f, "unlimited"),
        }
    }
}
