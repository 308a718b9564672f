//! Whether a player may use an ability right now.
//!
//! Checks run in a fixed order and the first failure wins. Denial is the
//! normal outcome of a check, never an error. The only side effect is dropping
//! a stale global cooldown entry.

use std::fmt;

use bending_utils::HotbarSlot;

use super::BendingEngine;
use crate::ability::CoreAbility;
use crate::element::Element;
use crate::host::Session;
use crate::profile::BendingProfile;

/// The check that refused an ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No ability was given.
    NoAbility,
    /// The player has no session or is offline.
    Offline,
    /// The player is dead.
    Dead,
    /// The ability instance was started in another world.
    WrongWorld,
    /// The ability's own cooldown is running.
    OnCooldown,
    /// The ability is not bound to the held slot.
    NotBound,
    /// Bending is disabled in the player's world.
    DisabledWorld,
    /// An admin switched bending off for everyone.
    DisabledForAll,
    /// The player switched their bending off.
    BendingToggledOff,
    /// The player switched the ability's element off.
    ElementToggledOff,
    /// Spectators cannot bend.
    Spectator,
    /// The per-player global cooldown is running.
    GlobalCooldown,
    /// Chi-blocked.
    ChiBlocked,
    /// Paralysed by a chi blocker.
    Paralyzed,
    /// Controlled by a bloodbender.
    Bloodbent,
    /// Held by metal clips.
    MetalClipped,
    /// The location is protected against this ability.
    RegionProtected,
    /// Fire abilities fail during a solar eclipse.
    SolarEclipse,
    /// Water abilities fail during a lunar eclipse.
    LunarEclipse,
    /// Missing the permission or element needed to bind the ability.
    CannotBind,
    /// Missing the passive permission for the element.
    NoPassivePermission,
    /// The element is not known to the player.
    MissingElement,
}

impl DenyReason {
    /// Short human-readable description.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::NoAbility => "no ability",
            Self::Offline => "player is offline",
            Self::Dead => "player is dead",
            Self::WrongWorld => "ability was started in another world",
            Self::OnCooldown => "ability is on cooldown",
            Self::NotBound => "ability is not bound to the held slot",
            Self::DisabledWorld => "bending is disabled in this world",
            Self::DisabledForAll => "bending is disabled for everyone",
            Self::BendingToggledOff => "bending is toggled off",
            Self::ElementToggledOff => "element is toggled off",
            Self::Spectator => "player is spectating",
            Self::GlobalCooldown => "global cooldown",
            Self::ChiBlocked => "player is chi-blocked",
            Self::Paralyzed => "player is paralyzed",
            Self::Bloodbent => "player is being bloodbent",
            Self::MetalClipped => "player is held by metal clips",
            Self::RegionProtected => "location is protected",
            Self::SolarEclipse => "solar eclipse",
            Self::LunarEclipse => "lunar eclipse",
            Self::CannotBind => "player cannot bind this ability",
            Self::NoPassivePermission => "no passive permission",
            Self::MissingElement => "player does not know this element",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

const fn deny_if(condition: bool, reason: DenyReason) -> Result<(), DenyReason> {
    if condition { Err(reason) } else { Ok(()) }
}

impl BendingEngine {
    /// Whether the player may use `ability` from their held slot.
    #[must_use]
    pub fn can_bend(&self, profile: &BendingProfile, ability: Option<&dyn CoreAbility>) -> bool {
        self.can_use(profile, ability, false, false)
    }

    /// Like [`Self::can_bend`] but the ability need not be bound or bindable.
    #[must_use]
    pub fn can_bend_ignore_binds(
        &self,
        profile: &BendingProfile,
        ability: Option<&dyn CoreAbility>,
    ) -> bool {
        self.can_use(profile, ability, true, false)
    }

    /// Like [`Self::can_bend`] but cooldowns are not checked.
    #[must_use]
    pub fn can_bend_ignore_cooldowns(
        &self,
        profile: &BendingProfile,
        ability: Option<&dyn CoreAbility>,
    ) -> bool {
        self.can_use(profile, ability, false, true)
    }

    /// Ignores both bindings and cooldowns.
    #[must_use]
    pub fn can_bend_ignore_binds_cooldowns(
        &self,
        profile: &BendingProfile,
        ability: Option<&dyn CoreAbility>,
    ) -> bool {
        self.can_use(profile, ability, true, true)
    }

    fn can_use(
        &self,
        profile: &BendingProfile,
        ability: Option<&dyn CoreAbility>,
        ignore_binds: bool,
        ignore_cooldowns: bool,
    ) -> bool {
        match self.evaluate(profile, ability, ignore_binds, ignore_cooldowns) {
            Ok(()) => true,
            Err(reason) => {
                log::trace!(
                    "{} may not use {}: {reason}",
                    profile.name(),
                    ability.map_or("<none>", |a| a.name())
                );
                false
            }
        }
    }

    /// Runs every check and reports the first one that fails.
    pub fn evaluate(
        &self,
        profile: &BendingProfile,
        ability: Option<&dyn CoreAbility>,
        ignore_binds: bool,
        ignore_cooldowns: bool,
    ) -> Result<(), DenyReason> {
        let ability = ability.ok_or(DenyReason::NoAbility)?;
        let session = self.online_session(profile).ok_or(DenyReason::Offline)?;
        deny_if(session.is_dead(), DenyReason::Dead)?;

        let location = session.location();
        let now = self.now();

        deny_if(
            ability.bound_world().is_some_and(|w| *w != location.world),
            DenyReason::WrongWorld,
        )?;
        deny_if(
            !ignore_cooldowns && profile.cooldowns().is_on_cooldown(ability.name(), now),
            DenyReason::OnCooldown,
        )?;
        deny_if(
            !ignore_binds && !Self::holds(profile, session.as_ref(), ability.name()),
            DenyReason::NotBound,
        )?;

        let config = &self.host.config;
        deny_if(
            config.is_world_disabled(&location.world),
            DenyReason::DisabledWorld,
        )?;
        deny_if(config.is_toggled_for_all(), DenyReason::DisabledForAll)?;
        deny_if(!profile.status().is_toggled(), DenyReason::BendingToggledOff)?;
        deny_if(
            !profile.is_element_toggled(ability.element()),
            DenyReason::ElementToggledOff,
        )?;
        deny_if(session.game_mode().is_spectator(), DenyReason::Spectator)?;

        if !ignore_cooldowns {
            self.check_global_cooldown(profile, now)?;
        }

        let statuses = &self.host.statuses;
        deny_if(profile.status().is_chi_blocked(), DenyReason::ChiBlocked)?;
        deny_if(statuses.is_paralyzed(session.as_ref()), DenyReason::Paralyzed)?;
        deny_if(statuses.is_bloodbent(session.as_ref()), DenyReason::Bloodbent)?;
        deny_if(
            statuses.is_controlled_by_metal_clips(session.as_ref()),
            DenyReason::MetalClipped,
        )?;

        deny_if(
            self.host
                .regions
                .is_protected(session.as_ref(), Some(ability.name()), &location),
            DenyReason::RegionProtected,
        )?;

        let celestial = &self.host.celestial;
        deny_if(
            ability.is_fire_family() && celestial.is_solar_eclipse(&location.world),
            DenyReason::SolarEclipse,
        )?;
        deny_if(
            ability.is_water_family() && celestial.is_lunar_eclipse(&location.world),
            DenyReason::LunarEclipse,
        )?;

        deny_if(
            !ignore_binds && !self.can_bind(profile, Some(ability)),
            DenyReason::CannotBind,
        )
    }

    /// Whether the held slot is bound to `ability_name`.
    fn holds(profile: &BendingProfile, session: &dyn Session, ability_name: &str) -> bool {
        HotbarSlot::from_held_index(session.held_slot())
            .and_then(|slot| profile.bound_ability_name(slot))
            .is_some_and(|bound| bound == ability_name)
    }

    /// The global cooldown is stored in the ledger under the player's name.
    /// Its stored value is compared against `global_cooldown` rather than
    /// treated as an expiry; once it no longer blocks it is dropped.
    fn check_global_cooldown(&self, profile: &BendingProfile, now: u64) -> Result<(), DenyReason> {
        let Some(stored) = profile.cooldowns().stored(profile.name()) else {
            return Ok(());
        };
        let window = self.host.config.global_cooldown_ms();
        deny_if(
            stored.saturating_add(window) >= now,
            DenyReason::GlobalCooldown,
        )?;
        // A concurrent re-arm stores a newer value, which must survive.
        profile
            .cooldowns()
            .discard_if(profile.name(), |value| value.saturating_add(window) < now);
        Ok(())
    }

    /// Whether the player's passive abilities of `element` are active.
    #[must_use]
    pub fn can_bend_passive(&self, profile: &BendingProfile, element: Element) -> bool {
        match self.evaluate_passive(profile, element) {
            Ok(()) => true,
            Err(reason) => {
                log::trace!("{} has no {element} passives: {reason}", profile.name());
                false
            }
        }
    }

    /// Reduced check set for passives; ignores bindings and cooldowns.
    pub fn evaluate_passive(
        &self,
        profile: &BendingProfile,
        element: Element,
    ) -> Result<(), DenyReason> {
        let session = self.online_session(profile).ok_or(DenyReason::Offline)?;
        let permission = format!("bending.{}.passive", element.permission_name());

        deny_if(
            !self.has_permission(profile, &permission),
            DenyReason::NoPassivePermission,
        )?;
        deny_if(!profile.status().is_toggled(), DenyReason::BendingToggledOff)?;
        deny_if(!self.has_element(profile, element), DenyReason::MissingElement)?;
        deny_if(
            !profile.is_element_toggled(element),
            DenyReason::ElementToggledOff,
        )?;

        let statuses = &self.host.statuses;
        deny_if(profile.status().is_chi_blocked(), DenyReason::ChiBlocked)?;
        deny_if(statuses.is_paralyzed(session.as_ref()), DenyReason::Paralyzed)?;
        deny_if(statuses.is_bloodbent(session.as_ref()), DenyReason::Bloodbent)?;

        let location = session.location();
        deny_if(
            self.host
                .regions
                .is_protected(session.as_ref(), None, &location),
            DenyReason::RegionProtected,
        )
    }
}
