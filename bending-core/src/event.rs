//! Events published to the host before the core mutates state.

use uuid::Uuid;

/// An event that observers can veto.
pub trait Cancellable: Send + Sync {
    /// Whether an observer has cancelled the event.
    fn cancelled(&self) -> bool;
    /// Cancels or un-cancels the event.
    fn set_cancelled(&mut self, cancelled: bool);
}

/// Which way the cooldown ledger is about to change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownChangeKind {
    /// A cooldown is being started or replaced.
    Added,
    /// A cooldown is being cleared early.
    Removed,
}

/// Published before a cooldown is added or removed.
///
/// Built by the ledger's `propose_*` methods; the ledger only commits it if
/// no observer cancelled it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CooldownChangeEvent {
    player: Uuid,
    ability: String,
    cooldown_ms: u64,
    expires_at: u64,
    kind: CooldownChangeKind,
    cancelled: bool,
}

impl CooldownChangeEvent {
    pub(crate) const fn added(player: Uuid, ability: String, cooldown_ms: u64, now: u64) -> Self {
        Self {
            player,
            ability,
            cooldown_ms,
            expires_at: now.saturating_add(cooldown_ms),
            kind: CooldownChangeKind::Added,
            cancelled: false,
        }
    }

    pub(crate) const fn removed(player: Uuid, ability: String) -> Self {
        Self {
            player,
            ability,
            cooldown_ms: 0,
            expires_at: 0,
            kind: CooldownChangeKind::Removed,
            cancelled: false,
        }
    }

    /// The player whose ledger changes.
    #[must_use]
    pub const fn player(&self) -> Uuid {
        self.player
    }

    /// The cooldown key, usually an ability name.
    #[must_use]
    pub fn ability(&self) -> &str {
        &self.ability
    }

    /// Requested duration. Zero for removals.
    #[must_use]
    pub const fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    /// Absolute expiry that will be stored. Zero for removals.
    #[must_use]
    pub const fn expires_at(&self) -> u64 {
        self.expires_at
    }

    /// Add or remove.
    #[must_use]
    pub const fn kind(&self) -> CooldownChangeKind {
        self.kind
    }
}

impl Cancellable for CooldownChangeEvent {
    fn cancelled(&self) -> bool {
        self.cancelled
    }

    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}
