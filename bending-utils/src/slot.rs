//! Hotbar slot indices.
//!
//! Bindings are stored against slots `1..=9`. The host reports the held item
//! as a zero-based index, so conversions live here rather than at every call
//! site.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A hotbar slot in `1..=9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HotbarSlot(u8);

/// Returned for slot numbers outside `1..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("slot {0} is outside 1..=9")]
pub struct InvalidSlot(pub u8);

impl HotbarSlot {
    /// Lowest slot number.
    pub const MIN: u8 = 1;
    /// Highest slot number.
    pub const MAX: u8 = 9;

    /// Creates a slot from its one-based number.
    #[must_use]
    pub const fn new(slot: u8) -> Option<Self> {
        if slot >= Self::MIN && slot <= Self::MAX {
            Some(Self(slot))
        } else {
            None
        }
    }

    /// Converts the host's zero-based held item index.
    #[must_use]
    pub const fn from_held_index(index: u8) -> Option<Self> {
        if index < Self::MAX {
            Some(Self(index + 1))
        } else {
            None
        }
    }

    /// The one-based slot number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// All nine slots in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl TryFrom<u8> for HotbarSlot {
    type Error = InvalidSlot;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidSlot(value))
    }
}

impl From<HotbarSlot> for u8 {
    fn from(slot: HotbarSlot) -> Self {
        slot.0
    }
}

impl fmt::Display for HotbarSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
