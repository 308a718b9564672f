//! Status effects owned by other subsystems, looked up through the session.
//! A player without a session is never affected.

use super::BendingEngine;
use crate::host::Session;
use crate::profile::BendingProfile;

impl BendingEngine {
    fn with_session(&self, profile: &BendingProfile, f: impl FnOnce(&dyn Session) -> bool) -> bool {
        self.session(profile).is_some_and(|s| f(s.as_ref()))
    }

    /// Paralysed by a chi blocker.
    #[must_use]
    pub fn is_paralyzed(&self, profile: &BendingProfile) -> bool {
        self.with_session(profile, |s| self.host.statuses.is_paralyzed(s))
    }

    /// Controlled by someone else's bloodbending.
    #[must_use]
    pub fn is_bloodbent(&self, profile: &BendingProfile) -> bool {
        self.with_session(profile, |s| self.host.statuses.is_bloodbent(s))
    }

    /// Held by metal clips.
    #[must_use]
    pub fn is_controlled_by_metal_clips(&self, profile: &BendingProfile) -> bool {
        self.with_session(profile, |s| {
            self.host.statuses.is_controlled_by_metal_clips(s)
        })
    }

    /// In avatar state.
    #[must_use]
    pub fn is_avatar_state(&self, profile: &BendingProfile) -> bool {
        self.with_session(profile, |s| self.host.statuses.has_avatar_state(s))
    }

    /// Whether another player's bloodbending can take hold of this one.
    ///
    /// A chi-blocked avatar is always vulnerable. Otherwise only a player who
    /// could bloodbend themselves while having bending toggled off is immune,
    /// and since toggled-off players never pass the bending checks, that means
    /// everyone is vulnerable in practice.
    #[must_use]
    pub fn can_be_bloodbent(&self, profile: &BendingProfile) -> bool {
        if self.is_avatar_state(profile) && profile.status().is_chi_blocked() {
            return true;
        }
        let bloodbending = self.abilities.get("Bloodbending");
        profile.status().is_toggled()
            || !self.can_bend_ignore_binds_cooldowns(profile, bloodbending.as_deref())
    }
}
