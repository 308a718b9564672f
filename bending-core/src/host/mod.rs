//! Interfaces to the server hosting the plugin.
//!
//! The core never talks to the server directly. Everything it needs from the
//! outside world, from permissions to the player's current world, comes
//! through these traits, bundled together in [`Host`].

pub mod memory;

use std::sync::Arc;

use bending_utils::{Clock, GameType, HotbarSlot, Location, WorldId};
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::config::Config;
use crate::event::CooldownChangeEvent;

/// Resolves permission nodes for a player.
///
/// Implementations are expected to be cheap (cached by the host) and to match
/// nodes case-insensitively.
pub trait PermissionOracle: Send + Sync {
    /// Whether `player` has been granted `permission`.
    fn has_permission(&self, player: Uuid, permission: &str) -> bool;
}

/// A live connection to a player.
pub trait Session: Send + Sync {
    /// Stable identity.
    fn id(&self) -> Uuid;
    /// Whether the player is still connected.
    fn is_online(&self) -> bool;
    /// Whether the player is dead and waiting to respawn.
    fn is_dead(&self) -> bool;
    /// Current location.
    fn location(&self) -> Location;
    /// Current game mode.
    fn game_mode(&self) -> GameType;
    /// Zero-based index of the selected hotbar slot.
    fn held_slot(&self) -> u8;

    /// World the player is in.
    fn world(&self) -> WorldId {
        self.location().world
    }
}

/// Looks up the live session for an identity.
pub trait SessionDirectory: Send + Sync {
    /// The session for `player`, or `None` if they never connected.
    fn session(&self, player: Uuid) -> Option<Arc<dyn Session>>;
}

/// Region protection plugins (claims, guarded areas).
pub trait RegionProtection: Send + Sync {
    /// Whether `session` is prevented from performing `action` at `location`.
    /// `action` is an ability name, or `None` for generic bending.
    fn is_protected(&self, session: &dyn Session, action: Option<&str>, location: &Location)
    -> bool;
}

/// Sun and moon events that disable fire and water bending.
pub trait CelestialState: Send + Sync {
    /// Whether a solar eclipse is active in `world`.
    fn is_solar_eclipse(&self, world: &WorldId) -> bool;
    /// Whether a lunar eclipse is active in `world`.
    fn is_lunar_eclipse(&self, world: &WorldId) -> bool;
}

/// Status effects owned by other subsystems (chi paralysis, bloodbending,
/// metal clips, avatar state).
pub trait StatusProvider: Send + Sync {
    /// Paralysed by a chi blocker.
    fn is_paralyzed(&self, session: &dyn Session) -> bool;
    /// Being controlled by another player's bloodbending.
    fn is_bloodbent(&self, session: &dyn Session) -> bool;
    /// Held by another player's metal clips.
    fn is_controlled_by_metal_clips(&self, session: &dyn Session) -> bool;
    /// Has avatar state running.
    fn has_avatar_state(&self, session: &dyn Session) -> bool;
}

/// Stores slot bindings. Fire-and-forget; failures are the sink's problem.
pub trait PersistenceSink: Send + Sync {
    /// Saves the full binding map of `player`.
    fn save_slot_bindings(&self, player: Uuid, bindings: &FxHashMap<HotbarSlot, String>);
}

/// Synchronous event delivery to the host's listeners.
pub trait NotificationBus: Send + Sync {
    /// Hands the event to every listener. Listeners may cancel it.
    fn publish(&self, event: &mut CooldownChangeEvent);
}

/// Everything the engine needs from the server.
#[derive(Clone)]
pub struct Host {
    /// Permission lookups.
    pub permissions: Arc<dyn PermissionOracle>,
    /// Identity to session resolution.
    pub sessions: Arc<dyn SessionDirectory>,
    /// Region protection checks.
    pub regions: Arc<dyn RegionProtection>,
    /// Eclipse state per world.
    pub celestial: Arc<dyn CelestialState>,
    /// Externally owned status effects.
    pub statuses: Arc<dyn StatusProvider>,
    /// Binding storage.
    pub persistence: Arc<dyn PersistenceSink>,
    /// Cooldown change listeners.
    pub notifications: Arc<dyn NotificationBus>,
    /// Shared timestamp source.
    pub clock: Arc<dyn Clock>,
    /// Plugin configuration.
    pub config: Arc<Config>,
}
