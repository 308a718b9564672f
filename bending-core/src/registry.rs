//! Lookup from player identity to profile.
//!
//! One registry is owned by the engine's host and shared by reference; there is
//! no global instance. Profiles stay registered after their player
//! disconnects so offline lookups keep working. Only a perma-removed profile
//! can be purged.
//!
//! Readers may come from any thread. Writes for a given identity are expected
//! to come from one place at a time (login handling or an admin command).

use std::sync::Arc;

use uuid::Uuid;

use crate::profile::{BendingProfile, StoredProfile};

/// Identity to profile map.
#[derive(Default)]
pub struct ProfileRegistry {
    profiles: scc::HashMap<Uuid, Arc<BendingProfile>>,
    /// Lower-cased player name to identity.
    names: scc::HashMap<String, Uuid>,
}

impl ProfileRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the profile for `stored` and registers it before anyone else
    /// can see it. A profile already registered for the same identity is
    /// replaced, so there is never more than one.
    pub fn load(&self, stored: StoredProfile) -> Arc<BendingProfile> {
        let uuid = stored.uuid;
        let profile = Arc::new(BendingProfile::new(stored));

        if let Some(previous) = self.profiles.upsert_sync(uuid, profile.clone()) {
            log::debug!("Replaced bending profile of {}", previous.name());
            if !previous.name().eq_ignore_ascii_case(profile.name()) {
                self.names
                    .remove_if_sync(&previous.name().to_ascii_lowercase(), |id| *id == uuid);
            }
        }
        self.names
            .upsert_sync(profile.name().to_ascii_lowercase(), uuid);

        log::debug!("Loaded bending profile of {} ({uuid})", profile.name());
        profile
    }

    /// The profile of `uuid`.
    #[must_use]
    pub fn get(&self, uuid: Uuid) -> Option<Arc<BendingProfile>> {
        self.profiles.read_sync(&uuid, |_, p| p.clone())
    }

    /// The profile of the player called `name`, ignoring case.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<Arc<BendingProfile>> {
        let uuid = self
            .names
            .read_sync(&name.to_ascii_lowercase(), |_, id| *id)?;
        self.get(uuid)
    }

    /// Called when a player leaves. The profile is retained.
    pub fn on_disconnect(&self, uuid: Uuid) {
        if let Some(profile) = self.get(uuid) {
            log::debug!("{} disconnected, keeping bending profile", profile.name());
        }
    }

    /// Drops a perma-removed profile. Returns `false` and keeps the profile
    /// if it is unknown or not perma-removed.
    pub fn purge(&self, uuid: Uuid) -> bool {
        let Some((_, profile)) = self
            .profiles
            .remove_if_sync(&uuid, |p| p.status().is_perma_removed())
        else {
            return false;
        };
        self.names
            .remove_if_sync(&profile.name().to_ascii_lowercase(), |id| *id == uuid);
        log::info!("Purged bending profile of {}", profile.name());
        true
    }

    /// Number of registered profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether no profile is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// A snapshot of every registered profile.
    #[must_use]
    pub fn profiles(&self) -> Vec<Arc<BendingProfile>> {
        let mut all = Vec::with_capacity(self.profiles.len());
        self.profiles.iter_sync(|_, p| {
            all.push(p.clone());
            true
        });
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    fn stored(id: u128, name: &str) -> StoredProfile {
        StoredProfile {
            uuid: Uuid::from_u128(id),
            name: name.to_owned(),
            elements: vec![Element::Air],
            ..StoredProfile::default()
        }
    }

    #[test]
    fn test_load_registers_immediately() {
        let registry = ProfileRegistry::new();
        let profile = registry.load(stored(1, "Aang"));

        let found = registry.get(Uuid::from_u128(1)).expect("registered");
        assert!(Arc::ptr_eq(&profile, &found));
        let by_name = registry.get_by_name("aang").expect("registered by name");
        assert!(Arc::ptr_eq(&profile, &by_name));
    }

    #[test]
    fn test_reload_keeps_one_profile_per_identity() {
        let registry = ProfileRegistry::new();
        registry.load(stored(1, "Aang"));
        let renamed = registry.load(stored(1, "Kuruk"));

        assert_eq!(registry.len(), 1);
        assert!(registry.get_by_name("Aang").is_none());
        let found = registry.get_by_name("KURUK").expect("new name");
        assert!(Arc::ptr_eq(&renamed, &found));
    }

    #[test]
    fn test_disconnect_retains_profile() {
        let registry = ProfileRegistry::new();
        registry.load(stored(1, "Aang"));
        registry.on_disconnect(Uuid::from_u128(1));
        assert!(registry.get(Uuid::from_u128(1)).is_some());
    }

    #[test]
    fn test_purge_requires_perma_removal() {
        let registry = ProfileRegistry::new();
        let profile = registry.load(stored(1, "Aang"));

        assert!(!registry.purge(Uuid::from_u128(1)));
        assert_eq!(registry.len(), 1);

        profile.status().set_perma_removed(true);
        assert!(registry.purge(Uuid::from_u128(1)));
        assert!(registry.is_empty());
        assert!(registry.get_by_name("Aang").is_none());
        assert!(!registry.purge(Uuid::from_u128(2)));
    }

    #[test]
    fn test_unknown_identity_is_absent() {
        let registry = ProfileRegistry::new();
        assert!(registry.get(Uuid::from_u128(9)).is_none());
        assert!(registry.get_by_name("nobody").is_none());
    }
}
