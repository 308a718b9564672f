//! Per-player bending state.
//!
//! A [`BendingProfile`] holds what a player knows and has bound, their
//! cooldowns and their own status flags. It holds no session:
//! the engine resolves the live session per query, so a profile outlives
//! disconnects.

pub mod cooldowns;
pub mod status;

use std::sync::{Arc, Weak};

use bending_utils::HotbarSlot;
use bending_utils::locks::{SyncMutex, SyncRwLock};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use uuid::Uuid;

use crate::ability::CoreAbility;
use crate::element::Element;

pub use cooldowns::CooldownLedger;
pub use status::StatusFlags;

/// Slot bindings keyed by hotbar slot.
pub type SlotBindings = FxHashMap<HotbarSlot, String>;

/// Data a profile is created from, as stored by the persistence layer.
#[derive(Debug, Clone, Default)]
pub struct StoredProfile {
    /// Stable identity.
    pub uuid: Uuid,
    /// Last known player name.
    pub name: String,
    /// Learned elements.
    pub elements: Vec<Element>,
    /// Slot bindings.
    pub abilities: SlotBindings,
    /// Whether bending was permanently removed.
    pub perma_removed: bool,
}

/// Converts raw slot numbers into bindings.
///
/// Slots outside `1..=9` and empty or `"null"` names are dropped.
pub fn slot_bindings<I>(raw: I) -> SlotBindings
where
    I: IntoIterator<Item = (u8, String)>,
{
    raw.into_iter()
        .filter_map(|(slot, name)| {
            let Some(slot) = HotbarSlot::new(slot) else {
                log::warn!("Dropping binding {name} for invalid slot {slot}");
                return None;
            };
            (!name.is_empty() && name != "null").then_some((slot, name))
        })
        .collect()
}

/// All bending state of one player.
pub struct BendingProfile {
    uuid: Uuid,
    name: String,
    elements: SyncRwLock<SmallVec<[Element; 4]>>,
    abilities: SyncRwLock<SlotBindings>,
    cooldowns: CooldownLedger,
    toggled_elements: scc::HashMap<Element, bool>,
    status: StatusFlags,
    stance: SyncMutex<Option<Weak<dyn CoreAbility>>>,
}

impl BendingProfile {
    /// Builds a profile from stored data. Only the registry calls this, so
    /// that every profile is registered as soon as it exists.
    pub(crate) fn new(stored: StoredProfile) -> Self {
        let mut elements: SmallVec<[Element; 4]> = SmallVec::new();
        for element in stored.elements {
            if !elements.contains(&element) {
                elements.push(element);
            }
        }

        let toggled_elements = scc::HashMap::new();
        for element in Element::BASE {
            toggled_elements.upsert_sync(element, true);
        }

        Self {
            uuid: stored.uuid,
            name: stored.name,
            elements: SyncRwLock::new(elements),
            abilities: SyncRwLock::new(stored.abilities),
            cooldowns: CooldownLedger::new(stored.uuid),
            toggled_elements,
            status: StatusFlags::new(stored.perma_removed),
            stance: SyncMutex::new(None),
        }
    }

    /// Stable identity.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Player name. Also the key of the global cooldown entry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cooldown ledger.
    #[must_use]
    pub const fn cooldowns(&self) -> &CooldownLedger {
        &self.cooldowns
    }

    /// Locally owned status flags.
    #[must_use]
    pub const fn status(&self) -> &StatusFlags {
        &self.status
    }

    // Elements

    /// Learned elements in the order they were learned.
    #[must_use]
    pub fn elements(&self) -> Vec<Element> {
        self.elements.read().to_vec()
    }

    /// Whether `element` is in the learned set. Does not consult permissions.
    #[must_use]
    pub fn knows_element(&self, element: Element) -> bool {
        self.elements.read().contains(&element)
    }

    /// Learns an element. Returns `false` if it was already known.
    pub fn add_element(&self, element: Element) -> bool {
        let mut elements = self.elements.write();
        if elements.contains(&element) {
            return false;
        }
        elements.push(element);
        true
    }

    /// Replaces every learned element with `element`.
    pub fn set_element(&self, element: Element) {
        let mut elements = self.elements.write();
        elements.clear();
        elements.push(element);
    }

    /// Forgets an element. Returns whether it was known.
    pub fn remove_element(&self, element: Element) -> bool {
        let mut elements = self.elements.write();
        let before = elements.len();
        elements.retain(|e| *e != element);
        elements.len() != before
    }

    /// Whether the player has `element` switched on. Defaults to on.
    #[must_use]
    pub fn is_element_toggled(&self, element: Element) -> bool {
        self.toggled_elements
            .read_sync(&element, |_, on| *on)
            .unwrap_or(true)
    }

    /// Flips `element` on or off and returns the new state.
    pub fn toggle_element(&self, element: Element) -> bool {
        let mut entry = self
            .toggled_elements
            .entry_sync(element)
            .or_insert(true);
        let on = !*entry.get();
        *entry.get_mut() = on;
        on
    }

    // Bindings

    /// A copy of every slot binding.
    #[must_use]
    pub fn abilities(&self) -> SlotBindings {
        self.abilities.read().clone()
    }

    /// The ability name bound to `slot`.
    #[must_use]
    pub fn bound_ability_name(&self, slot: HotbarSlot) -> Option<String> {
        self.abilities.read().get(&slot).cloned()
    }

    /// Replaces all bindings and returns the result for persisting.
    pub(crate) fn set_abilities(&self, abilities: SlotBindings) -> SlotBindings {
        let mut current = self.abilities.write();
        *current = abilities;
        current.clone()
    }

    /// Binds `ability` to `slot` and returns the result for persisting.
    pub(crate) fn bind(&self, slot: HotbarSlot, ability: &str) -> SlotBindings {
        let mut current = self.abilities.write();
        current.insert(slot, ability.to_owned());
        current.clone()
    }

    /// Clears `slot`. Returns the result for persisting, or `None` if the
    /// slot was already empty.
    pub(crate) fn unbind(&self, slot: HotbarSlot) -> Option<SlotBindings> {
        let mut current = self.abilities.write();
        current.remove(&slot)?;
        Some(current.clone())
    }

    // Stance

    /// The active chi stance, if it is still running.
    #[must_use]
    pub fn stance(&self) -> Option<Arc<dyn CoreAbility>> {
        self.stance.lock().as_ref().and_then(Weak::upgrade)
    }

    /// Sets or clears the active chi stance. Only a weak reference is kept.
    pub fn set_stance(&self, stance: Option<&Arc<dyn CoreAbility>>) {
        *self.stance.lock() = stance.map(Arc::downgrade);
    }
}
