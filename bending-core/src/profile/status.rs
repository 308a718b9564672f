//! Status flags owned by the profile itself.
//!
//! Status effects owned by other subsystems (paralysis, bloodbending, metal
//! clips, avatar state) are not stored here; see `StatusProvider`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Toggles and timed conditions of one player.
pub struct StatusFlags {
    toggled: AtomicBool,
    chi_blocked: AtomicBool,
    tremor_sense: AtomicBool,
    perma_removed: AtomicBool,
    /// Time after which the player may be slowed again.
    slow_until: AtomicU64,
}

impl StatusFlags {
    /// Bending and tremor sense on, not chi-blocked.
    #[must_use]
    pub const fn new(perma_removed: bool) -> Self {
        Self {
            toggled: AtomicBool::new(true),
            chi_blocked: AtomicBool::new(false),
            tremor_sense: AtomicBool::new(true),
            perma_removed: AtomicBool::new(perma_removed),
            slow_until: AtomicU64::new(0),
        }
    }

    /// Whether the player has bending switched on.
    #[inline]
    pub fn is_toggled(&self) -> bool {
        self.toggled.load(Ordering::Relaxed)
    }

    /// Flips the master bending switch and returns the new state.
    pub fn toggle_bending(&self) -> bool {
        !self.toggled.fetch_xor(true, Ordering::Relaxed)
    }

    /// Whether a chi blocker has disabled the player's bending.
    #[inline]
    pub fn is_chi_blocked(&self) -> bool {
        self.chi_blocked.load(Ordering::Relaxed)
    }

    /// Blocks chi until [`Self::unblock_chi`].
    #[inline]
    pub fn block_chi(&self) {
        self.chi_blocked.store(true, Ordering::Relaxed);
    }

    /// Restores the player's chi.
    #[inline]
    pub fn unblock_chi(&self) {
        self.chi_blocked.store(false, Ordering::Relaxed);
    }

    /// Whether tremor sense is on.
    #[inline]
    pub fn is_tremor_sensing(&self) -> bool {
        self.tremor_sense.load(Ordering::Relaxed)
    }

    /// Flips tremor sense and returns the new state.
    pub fn toggle_tremor_sense(&self) -> bool {
        !self.tremor_sense.fetch_xor(true, Ordering::Relaxed)
    }

    /// Whether a moderator has permanently removed this player's bending.
    #[inline]
    pub fn is_perma_removed(&self) -> bool {
        self.perma_removed.load(Ordering::Relaxed)
    }

    /// Marks or clears the permanent removal.
    #[inline]
    pub fn set_perma_removed(&self, perma_removed: bool) {
        self.perma_removed.store(perma_removed, Ordering::Relaxed);
    }

    /// Marks the player as slowed until `now + duration_ms`.
    pub fn slow(&self, duration_ms: u64, now: u64) {
        self.slow_until
            .store(now.saturating_add(duration_ms), Ordering::Relaxed);
    }

    /// Whether the previous slow has run out, so a new one may be applied.
    ///
    /// This is a re-armable debounce, not a "currently slowed" query.
    #[inline]
    pub fn can_be_slowed(&self, now: u64) -> bool {
        now > self.slow_until.load(Ordering::Relaxed)
    }
}

impl Default for StatusFlags {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let flags = StatusFlags::default();
        assert!(flags.is_toggled());
        assert!(flags.is_tremor_sensing());
        assert!(!flags.is_chi_blocked());
        assert!(!flags.is_perma_removed());
    }

    #[test]
    fn test_toggles_flip() {
        let flags = StatusFlags::default();
        assert!(!flags.toggle_bending());
        assert!(!flags.is_toggled());
        assert!(flags.toggle_bending());

        assert!(!flags.toggle_tremor_sense());
        assert!(flags.toggle_tremor_sense());
    }

    #[test]
    fn test_chi_block() {
        let flags = StatusFlags::default();
        flags.block_chi();
        assert!(flags.is_chi_blocked());
        flags.unblock_chi();
        assert!(!flags.is_chi_blocked());
    }

    #[test]
    fn test_slow_rearms_after_expiry() {
        let flags = StatusFlags::default();
        assert!(flags.can_be_slowed(1));

        flags.slow(1000, 5000);
        assert!(!flags.can_be_slowed(5500));
        assert!(!flags.can_be_slowed(6000));
        assert!(flags.can_be_slowed(6001));
    }
}
