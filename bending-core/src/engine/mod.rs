//! The bending engine: authorization, ownership and status queries that need
//! the host, plus the mutators that must notify it.
//!
//! Profiles only store state. Anything that depends on permissions, the live
//! session, the clock or the notification bus goes through [`BendingEngine`].

mod auth;
mod ownership;
mod status;

use std::sync::Arc;

use bending_utils::HotbarSlot;

use crate::ability::{AbilityRegistry, CoreAbility};
use crate::host::{Host, Session};
use crate::profile::{BendingProfile, SlotBindings};
use crate::registry::ProfileRegistry;

pub use auth::DenyReason;

/// Authorizes ability use against a host.
pub struct BendingEngine {
    host: Host,
    abilities: Arc<AbilityRegistry>,
    profiles: Arc<ProfileRegistry>,
}

impl BendingEngine {
    /// Creates an engine over `host`.
    #[must_use]
    pub const fn new(
        host: Host,
        abilities: Arc<AbilityRegistry>,
        profiles: Arc<ProfileRegistry>,
    ) -> Self {
        Self {
            host,
            abilities,
            profiles,
        }
    }

    /// The host collaborators.
    #[must_use]
    pub const fn host(&self) -> &Host {
        &self.host
    }

    /// Registered abilities.
    #[must_use]
    pub fn abilities(&self) -> &AbilityRegistry {
        &self.abilities
    }

    /// Registered profiles.
    #[must_use]
    pub fn profiles(&self) -> &ProfileRegistry {
        &self.profiles
    }

    /// Current time from the host clock.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.host.clock.now_millis()
    }

    /// The live session of `profile`, if the player ever connected.
    #[must_use]
    pub fn session(&self, profile: &BendingProfile) -> Option<Arc<dyn Session>> {
        self.host.sessions.session(profile.uuid())
    }

    fn online_session(&self, profile: &BendingProfile) -> Option<Arc<dyn Session>> {
        self.session(profile).filter(|s| s.is_online())
    }

    fn has_permission(&self, profile: &BendingProfile, permission: &str) -> bool {
        self.host
            .permissions
            .has_permission(profile.uuid(), permission)
    }

    // Cooldowns

    /// Starts a cooldown of `duration_ms` on `ability`. Listeners may veto it.
    pub fn add_cooldown(&self, profile: &BendingProfile, ability: &str, duration_ms: u64) -> bool {
        profile.cooldowns().add(
            ability,
            duration_ms,
            self.now(),
            self.host.notifications.as_ref(),
        )
    }

    /// Starts `ability`'s own configured cooldown.
    pub fn add_ability_cooldown(&self, profile: &BendingProfile, ability: &dyn CoreAbility) -> bool {
        self.add_cooldown(profile, ability.name(), ability.cooldown_ms())
    }

    /// Clears the cooldown on `ability`. Listeners may veto it; returns `false`
    /// only then.
    pub fn remove_cooldown(&self, profile: &BendingProfile, ability: &str) -> bool {
        profile
            .cooldowns()
            .remove(ability, self.host.notifications.as_ref())
    }

    /// Whether `ability` is on cooldown right now.
    #[must_use]
    pub fn is_on_cooldown(&self, profile: &BendingProfile, ability: &str) -> bool {
        profile.cooldowns().is_on_cooldown(ability, self.now())
    }

    /// The expiry of `ability`'s cooldown, if it is still running.
    #[must_use]
    pub fn cooldown(&self, profile: &BendingProfile, ability: &str) -> Option<u64> {
        profile.cooldowns().get(ability, self.now())
    }

    // Bindings

    /// The ability name bound to the slot the player is holding.
    #[must_use]
    pub fn bound_ability_name(&self, profile: &BendingProfile) -> Option<String> {
        let session = self.session(profile)?;
        let slot = HotbarSlot::from_held_index(session.held_slot())?;
        profile.bound_ability_name(slot)
    }

    /// The ability bound to the slot the player is holding.
    #[must_use]
    pub fn bound_ability(&self, profile: &BendingProfile) -> Option<Arc<dyn CoreAbility>> {
        self.abilities.get(&self.bound_ability_name(profile)?)
    }

    /// Replaces every binding and persists the result.
    pub fn set_abilities(&self, profile: &BendingProfile, abilities: SlotBindings) {
        let saved = profile.set_abilities(abilities);
        self.host
            .persistence
            .save_slot_bindings(profile.uuid(), &saved);
    }

    /// Binds `ability` to `slot` and persists the result.
    pub fn bind(&self, profile: &BendingProfile, slot: HotbarSlot, ability: &str) {
        let saved = profile.bind(slot, ability);
        self.host
            .persistence
            .save_slot_bindings(profile.uuid(), &saved);
    }

    /// Clears `slot` and persists the result. Returns whether it was bound.
    pub fn unbind(&self, profile: &BendingProfile, slot: HotbarSlot) -> bool {
        let Some(saved) = profile.unbind(slot) else {
            return false;
        };
        self.host
            .persistence
            .save_slot_bindings(profile.uuid(), &saved);
        true
    }

    // Status

    /// Slows the player for `duration_ms`.
    pub fn slow(&self, profile: &BendingProfile, duration_ms: u64) {
        profile.status().slow(duration_ms, self.now());
    }

    /// Whether a previous slow has run out.
    #[must_use]
    pub fn can_be_slowed(&self, profile: &BendingProfile) -> bool {
        profile.status().can_be_slowed(self.now())
    }
}
