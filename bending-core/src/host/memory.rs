//! In-memory host for running without a server and for tests.
//!
//! [`MemoryHost`] implements every host trait except the notification bus,
//! which is [`MemoryBus`]. State is changed through plain setters.

use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use bending_utils::locks::{SyncMutex, SyncRwLock};
use bending_utils::{Clock, GameType, Location, WorldId};
use crossbeam::atomic::AtomicCell;
use glam::DVec3;
use rustc_hash::{FxHashMap, FxHashSet};
use uuid::Uuid;

use super::{
    CelestialState, Host, NotificationBus, PermissionOracle, PersistenceSink, RegionProtection,
    Session, SessionDirectory, StatusProvider,
};
use crate::config::Config;
use crate::event::{Cancellable, CooldownChangeEvent};
use crate::profile::SlotBindings;

/// A player connection held in memory.
pub struct MemorySession {
    id: Uuid,
    online: AtomicBool,
    dead: AtomicBool,
    location: SyncRwLock<Location>,
    game_mode: AtomicCell<GameType>,
    held_slot: AtomicU8,
}

impl MemorySession {
    /// An online, alive survival player holding the first slot.
    #[must_use]
    pub fn new(id: Uuid, location: Location) -> Self {
        Self {
            id,
            online: AtomicBool::new(true),
            dead: AtomicBool::new(false),
            location: SyncRwLock::new(location),
            game_mode: AtomicCell::new(GameType::Survival),
            held_slot: AtomicU8::new(0),
        }
    }

    /// Connects or disconnects the session.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }

    /// Kills or respawns the player.
    pub fn set_dead(&self, dead: bool) {
        self.dead.store(dead, Ordering::Relaxed);
    }

    /// Moves the player.
    pub fn teleport(&self, location: Location) {
        *self.location.write() = location;
    }

    /// Switches the game mode.
    pub fn set_game_mode(&self, game_mode: GameType) {
        self.game_mode.store(game_mode);
    }

    /// Selects a zero-based hotbar index.
    pub fn set_held_slot(&self, index: u8) {
        self.held_slot.store(index, Ordering::Relaxed);
    }
}

impl Session for MemorySession {
    fn id(&self) -> Uuid {
        self.id
    }

    fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    fn is_dead(&self) -> bool {
        self.dead.load(Ordering::Relaxed)
    }

    fn location(&self) -> Location {
        self.location.read().clone()
    }

    fn game_mode(&self) -> GameType {
        self.game_mode.load()
    }

    fn held_slot(&self) -> u8 {
        self.held_slot.load(Ordering::Relaxed)
    }
}

/// Status effects another subsystem can put on a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExternalStatus {
    /// Chi paralysis.
    Paralyzed,
    /// Held by a bloodbender.
    Bloodbent,
    /// Held by metal clips.
    MetalClipped,
    /// Avatar state active.
    AvatarState,
}

/// An axis-aligned box in which bending is forbidden.
#[derive(Clone, Debug, PartialEq)]
pub struct ProtectedRegion {
    /// World the region is in.
    pub world: WorldId,
    /// Minimum corner, inclusive.
    pub min: DVec3,
    /// Maximum corner, inclusive.
    pub max: DVec3,
    /// Abilities still allowed inside.
    pub allowed: Vec<String>,
}

impl ProtectedRegion {
    /// Whether `location` lies inside the region.
    #[must_use]
    pub fn contains(&self, location: &Location) -> bool {
        location.world == self.world
            && location.position.cmpge(self.min).all()
            && location.position.cmple(self.max).all()
    }

    fn blocks(&self, action: Option<&str>, location: &Location) -> bool {
        self.contains(location)
            && !action.is_some_and(|a| self.allowed.iter().any(|x| x.eq_ignore_ascii_case(a)))
    }
}

/// Every host trait backed by in-memory collections.
#[derive(Default)]
pub struct MemoryHost {
    permissions: SyncRwLock<FxHashMap<Uuid, FxHashSet<String>>>,
    sessions: scc::HashMap<Uuid, Arc<MemorySession>>,
    regions: SyncRwLock<Vec<ProtectedRegion>>,
    solar_eclipses: SyncRwLock<FxHashSet<WorldId>>,
    lunar_eclipses: SyncRwLock<FxHashSet<WorldId>>,
    statuses: SyncRwLock<FxHashSet<(Uuid, ExternalStatus)>>,
    saved_bindings: SyncRwLock<FxHashMap<Uuid, SlotBindings>>,
}

impl MemoryHost {
    /// Creates an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundles this host with a bus, clock and config.
    #[must_use]
    pub fn host(
        self: &Arc<Self>,
        bus: Arc<MemoryBus>,
        clock: Arc<dyn Clock>,
        config: Arc<Config>,
    ) -> Host {
        Host {
            permissions: self.clone(),
            sessions: self.clone(),
            regions: self.clone(),
            celestial: self.clone(),
            statuses: self.clone(),
            persistence: self.clone(),
            notifications: bus,
            clock,
            config,
        }
    }

    // Permissions

    /// Grants a permission node. Nodes are case-insensitive.
    pub fn grant(&self, player: Uuid, permission: &str) {
        self.permissions
            .write()
            .entry(player)
            .or_default()
            .insert(permission.to_ascii_lowercase());
    }

    /// Revokes a permission node. Returns whether it was granted.
    pub fn revoke(&self, player: Uuid, permission: &str) -> bool {
        self.permissions
            .write()
            .get_mut(&player)
            .is_some_and(|nodes| nodes.remove(&permission.to_ascii_lowercase()))
    }

    // Sessions

    /// Connects a player at `location`, replacing any previous session.
    pub fn connect(&self, player: Uuid, location: Location) -> Arc<MemorySession> {
        let session = Arc::new(MemorySession::new(player, location));
        self.sessions.upsert_sync(player, session.clone());
        session
    }

    /// The concrete session of `player`.
    #[must_use]
    pub fn memory_session(&self, player: Uuid) -> Option<Arc<MemorySession>> {
        self.sessions.read_sync(&player, |_, s| s.clone())
    }

    /// Marks the player offline. The session object stays resolvable.
    pub fn disconnect(&self, player: Uuid) {
        if let Some(session) = self.memory_session(player) {
            session.set_online(false);
        }
    }

    // Regions

    /// Adds a protected region.
    pub fn protect(&self, region: ProtectedRegion) {
        self.regions.write().push(region);
    }

    /// Removes every protected region in `world`.
    pub fn unprotect(&self, world: &WorldId) {
        self.regions.write().retain(|r| r.world != *world);
    }

    // Celestial

    /// Starts or ends a solar eclipse in `world`.
    pub fn set_solar_eclipse(&self, world: &WorldId, active: bool) {
        Self::set_member(&self.solar_eclipses, world.clone(), active);
    }

    /// Starts or ends a lunar eclipse in `world`.
    pub fn set_lunar_eclipse(&self, world: &WorldId, active: bool) {
        Self::set_member(&self.lunar_eclipses, world.clone(), active);
    }

    // Statuses

    /// Applies or lifts an external status effect.
    pub fn set_status(&self, player: Uuid, status: ExternalStatus, active: bool) {
        Self::set_member(&self.statuses, (player, status), active);
    }

    fn has_status(&self, session: &dyn Session, status: ExternalStatus) -> bool {
        self.statuses.read().contains(&(session.id(), status))
    }

    // Persistence

    /// The last bindings saved for `player`.
    #[must_use]
    pub fn saved_bindings(&self, player: Uuid) -> Option<SlotBindings> {
        self.saved_bindings.read().get(&player).cloned()
    }

    fn set_member<T: Eq + Hash>(set: &SyncRwLock<FxHashSet<T>>, value: T, on: bool) {
        let mut set = set.write();
        if on {
            set.insert(value);
        } else {
            set.remove(&value);
        }
    }
}

impl PermissionOracle for MemoryHost {
    fn has_permission(&self, player: Uuid, permission: &str) -> bool {
        self.permissions
            .read()
            .get(&player)
            .is_some_and(|nodes| nodes.contains(&permission.to_ascii_lowercase()))
    }
}

impl SessionDirectory for MemoryHost {
    fn session(&self, player: Uuid) -> Option<Arc<dyn Session>> {
        self.memory_session(player)
            .map(|s| s as Arc<dyn Session>)
    }
}

impl RegionProtection for MemoryHost {
    fn is_protected(
        &self,
        _session: &dyn Session,
        action: Option<&str>,
        location: &Location,
    ) -> bool {
        self.regions
            .read()
            .iter()
            .any(|r| r.blocks(action, location))
    }
}

impl CelestialState for MemoryHost {
    fn is_solar_eclipse(&self, world: &WorldId) -> bool {
        self.solar_eclipses.read().contains(world)
    }

    fn is_lunar_eclipse(&self, world: &WorldId) -> bool {
        self.lunar_eclipses.read().contains(world)
    }
}

impl StatusProvider for MemoryHost {
    fn is_paralyzed(&self, session: &dyn Session) -> bool {
        self.has_status(session, ExternalStatus::Paralyzed)
    }

    fn is_bloodbent(&self, session: &dyn Session) -> bool {
        self.has_status(session, ExternalStatus::Bloodbent)
    }

    fn is_controlled_by_metal_clips(&self, session: &dyn Session) -> bool {
        self.has_status(session, ExternalStatus::MetalClipped)
    }

    fn has_avatar_state(&self, session: &dyn Session) -> bool {
        self.has_status(session, ExternalStatus::AvatarState)
    }
}

impl PersistenceSink for MemoryHost {
    fn save_slot_bindings(&self, player: Uuid, bindings: &SlotBindings) {
        log::debug!("Saving {} bindings for {player}", bindings.len());
        self.saved_bindings.write().insert(player, bindings.clone());
    }
}

/// Records every published event and can veto all of them.
#[derive(Default)]
pub struct MemoryBus {
    veto: AtomicBool,
    published: SyncMutex<Vec<CooldownChangeEvent>>,
}

impl MemoryBus {
    /// A bus that lets everything through.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the bus cancel every following event.
    pub fn set_veto(&self, veto: bool) {
        self.veto.store(veto, Ordering::Relaxed);
    }

    /// Every event published so far, in order.
    #[must_use]
    pub fn published(&self) -> Vec<CooldownChangeEvent> {
        self.published.lock().clone()
    }
}

impl NotificationBus for MemoryBus {
    fn publish(&self, event: &mut CooldownChangeEvent) {
        if self.veto.load(Ordering::Relaxed) {
            event.set_cancelled(true);
        }
        self.published.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(world: &str, x: f64, y: f64, z: f64) -> Location {
        Location::new(WorldId::new(world), DVec3::new(x, y, z))
    }

    #[test]
    fn test_permissions_ignore_case() {
        let host = MemoryHost::new();
        let id = Uuid::from_u128(3);
        host.grant(id, "bending.ability.AvatarState");
        assert!(host.has_permission(id, "bending.ability.avatarstate"));
        assert!(host.revoke(id, "BENDING.ABILITY.AVATARSTATE"));
        assert!(!host.has_permission(id, "bending.ability.AvatarState"));
    }

    #[test]
    fn test_region_bounds_and_allow_list() {
        let host = MemoryHost::new();
        host.protect(ProtectedRegion {
            world: WorldId::new("world"),
            min: DVec3::new(0.0, 0.0, 0.0),
            max: DVec3::new(10.0, 255.0, 10.0),
            allowed: vec!["AirBlast".to_owned()],
        });
        let session = MemorySession::new(Uuid::nil(), at("world", 5.0, 64.0, 5.0));

        assert!(host.is_protected(&session, Some("FireBlast"), &at("world", 5.0, 64.0, 5.0)));
        assert!(host.is_protected(&session, None, &at("world", 10.0, 64.0, 10.0)));
        assert!(!host.is_protected(&session, Some("airblast"), &at("world", 5.0, 64.0, 5.0)));
        assert!(!host.is_protected(&session, None, &at("world", 11.0, 64.0, 5.0)));
        assert!(!host.is_protected(&session, None, &at("nether", 5.0, 64.0, 5.0)));
    }

    #[test]
    fn test_disconnect_keeps_session_resolvable() {
        let host = MemoryHost::new();
        let id = Uuid::from_u128(4);
        host.connect(id, at("world", 0.0, 64.0, 0.0));
        host.disconnect(id);
        let session = host.session(id).expect("still resolvable");
        assert!(!session.is_online());
    }

    #[test]
    fn test_bus_records_vetoed_events() {
        let bus = MemoryBus::new();
        bus.set_veto(true);
        let mut event = CooldownChangeEvent::removed(Uuid::nil(), "X".to_owned());
        bus.publish(&mut event);
        assert!(event.cancelled());
        assert_eq!(bus.published().len(), 1);
    }
}
