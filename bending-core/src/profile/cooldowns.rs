//! Per-player cooldown ledger.
//!
//! Maps a cooldown key (normally an ability name) to the absolute time it
//! expires. Entries are never swept; a stale entry simply reads as absent.
//!
//! Mutations are two-phase: `propose_*` builds a [`CooldownChangeEvent`], the
//! host gets a chance to cancel it, and [`CooldownLedger::commit`] applies it.
//! [`CooldownLedger::add`] and [`CooldownLedger::remove`] run all three steps.

use std::time::Duration;

use uuid::Uuid;

use crate::event::{Cancellable, CooldownChangeEvent, CooldownChangeKind};
use crate::host::NotificationBus;

/// Cooldown expiries for one player.
pub struct CooldownLedger {
    owner: Uuid,
    entries: scc::HashMap<String, u64>,
}

impl CooldownLedger {
    /// Creates an empty ledger for `owner`.
    #[must_use]
    pub fn new(owner: Uuid) -> Self {
        Self {
            owner,
            entries: scc::HashMap::new(),
        }
    }

    /// Builds the event for starting a cooldown of `duration_ms` at `now`.
    #[must_use]
    pub fn propose_add(&self, ability: &str, duration_ms: u64, now: u64) -> CooldownChangeEvent {
        CooldownChangeEvent::added(self.owner, ability.to_owned(), duration_ms, now)
    }

    /// Builds the event for clearing a cooldown.
    #[must_use]
    pub fn propose_remove(&self, ability: &str) -> CooldownChangeEvent {
        CooldownChangeEvent::removed(self.owner, ability.to_owned())
    }

    /// Applies a proposed change unless it was cancelled.
    /// Returns `false` only for a cancelled change; removing a key that has
    /// no entry still counts as applied.
    pub fn commit(&self, event: &CooldownChangeEvent) -> bool {
        if event.cancelled() {
            log::debug!(
                "Cooldown change {:?} for {} on {} was cancelled",
                event.kind(),
                event.ability(),
                self.owner
            );
            return false;
        }
        match event.kind() {
            CooldownChangeKind::Added => {
                self.entries
                    .upsert_sync(event.ability().to_owned(), event.expires_at());
            }
            CooldownChangeKind::Removed => {
                self.entries.remove_sync(event.ability());
            }
        }
        true
    }

    /// Starts a cooldown, giving `bus` listeners the chance to veto it.
    /// The event is published even if a listener then cancels it.
    pub fn add(&self, ability: &str, duration_ms: u64, now: u64, bus: &dyn NotificationBus) -> bool {
        let mut event = self.propose_add(ability, duration_ms, now);
        bus.publish(&mut event);
        self.commit(&event)
    }

    /// Clears a cooldown, giving `bus` listeners the chance to veto it.
    /// Returns whether the removal went through.
    pub fn remove(&self, ability: &str, bus: &dyn NotificationBus) -> bool {
        let mut event = self.propose_remove(ability);
        bus.publish(&mut event);
        self.commit(&event)
    }

    /// Whether `ability` has an entry that has not expired yet.
    #[must_use]
    pub fn is_on_cooldown(&self, ability: &str, now: u64) -> bool {
        self.entries
            .read_sync(ability, |_, expiry| now < *expiry)
            .unwrap_or(false)
    }

    /// The live expiry of `ability`. A stale entry is dropped and reported
    /// as absent.
    #[must_use]
    pub fn get(&self, ability: &str, now: u64) -> Option<u64> {
        let expiry = self.stored(ability)?;
        if now < expiry {
            Some(expiry)
        } else {
            self.entries.remove_if_sync(ability, |e| *e <= now);
            None
        }
    }

    /// Time left on `ability`'s cooldown.
    #[must_use]
    pub fn remaining(&self, ability: &str, now: u64) -> Option<Duration> {
        self.get(ability, now)
            .map(|expiry| Duration::from_millis(expiry - now))
    }

    /// The stored expiry, whether or not it has passed.
    #[must_use]
    pub fn stored(&self, ability: &str) -> Option<u64> {
        self.entries.read_sync(ability, |_, expiry| *expiry)
    }

    /// Drops an entry without publishing anything, but only while `stale`
    /// holds for its stored value. Returns whether it was dropped.
    pub(crate) fn discard_if(&self, key: &str, stale: impl FnOnce(u64) -> bool) -> bool {
        self.entries
            .remove_if_sync(key, |value| stale(*value))
            .is_some()
    }

    /// Live entries sorted by expiry.
    #[must_use]
    pub fn snapshot(&self, now: u64) -> Vec<(String, u64)> {
        let mut live = Vec::new();
        self.entries.iter_sync(|ability, expiry| {
            if now < *expiry {
                live.push((ability.clone(), *expiry));
            }
            true
        });
        live.sort_unstable_by_key(|(_, expiry)| *expiry);
        live
    }

    /// Number of stored entries, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
