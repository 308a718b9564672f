//! Ability descriptors and the name lookup used to resolve bindings.
//!
//! Concrete ability behaviour lives elsewhere; this crate only needs to know
//! an ability's name, element and cooldown, and for running instances, which
//! world they were started in.

use std::sync::Arc;

use bending_utils::WorldId;
use bending_utils::locks::SyncRwLock;
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::element::Element;

/// What the authorization engine needs to know about an ability.
pub trait CoreAbility: Send + Sync {
    /// Unique ability name, e.g. `Bloodbending`.
    fn name(&self) -> &str;

    /// The element the ability belongs to.
    fn element(&self) -> Element;

    /// Configured cooldown in milliseconds.
    fn cooldown_ms(&self) -> u64 {
        0
    }

    /// For a running instance, the world it was started in.
    /// `None` for the registered template.
    fn bound_world(&self) -> Option<&WorldId> {
        None
    }

    /// Fire abilities, including combustion and lightning.
    fn is_fire_family(&self) -> bool {
        self.element().root() == Element::Fire
    }

    /// Water abilities, including blood, healing, ice and plant.
    fn is_water_family(&self) -> bool {
        self.element().root() == Element::Water
    }
}

/// A registered ability template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityInfo {
    name: String,
    element: Element,
    cooldown_ms: u64,
}

impl AbilityInfo {
    /// Creates an ability template with no cooldown.
    #[must_use]
    pub fn new(name: impl Into<String>, element: impl Into<Element>) -> Self {
        Self {
            name: name.into(),
            element: element.into(),
            cooldown_ms: 0,
        }
    }

    /// Sets the cooldown applied after each use.
    #[must_use]
    pub const fn with_cooldown(mut self, cooldown_ms: u64) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }
}

impl CoreAbility for AbilityInfo {
    fn name(&self) -> &str {
        &self.name
    }

    fn element(&self) -> Element {
        self.element
    }

    fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }
}

/// A running ability, started by `player` in `world`.
pub struct AbilityInstance {
    ability: Arc<dyn CoreAbility>,
    player: Uuid,
    world: WorldId,
}

impl AbilityInstance {
    /// Starts tracking an instance of `ability`.
    #[must_use]
    pub fn new(ability: Arc<dyn CoreAbility>, player: Uuid, world: WorldId) -> Self {
        Self {
            ability,
            player,
            world,
        }
    }

    /// The player who started the instance.
    #[must_use]
    pub const fn player(&self) -> Uuid {
        self.player
    }
}

impl CoreAbility for AbilityInstance {
    fn name(&self) -> &str {
        self.ability.name()
    }

    fn element(&self) -> Element {
        self.ability.element()
    }

    fn cooldown_ms(&self) -> u64 {
        self.ability.cooldown_ms()
    }

    fn bound_world(&self) -> Option<&WorldId> {
        Some(&self.world)
    }
}

/// Case-insensitive lookup from ability name to template.
#[derive(Default)]
pub struct AbilityRegistry {
    by_name: SyncRwLock<FxHashMap<String, Arc<dyn CoreAbility>>>,
}

impl AbilityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an ability, replacing any previous one with the same name.
    pub fn register(&self, ability: Arc<dyn CoreAbility>) {
        let key = ability.name().to_ascii_lowercase();
        if self.by_name.write().insert(key, ability).is_some() {
            log::warn!("Ability registered twice, keeping the newer one");
        }
    }

    /// Looks an ability up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn CoreAbility>> {
        self.by_name.read().get(&name.to_ascii_lowercase()).cloned()
    }

    /// Number of registered abilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.read().len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.read().is_empty()
    }

    /// Names of all abilities of `element`, sorted.
    #[must_use]
    pub fn names_for(&self, element: Element) -> Vec<String> {
        let mut names: Vec<String> = self
            .by_name
            .read()
            .values()
            .filter(|a| a.element() == element)
            .map(|a| a.name().to_owned())
            .collect();
        names.sort_unstable();
        names
    }
}
