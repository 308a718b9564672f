//! Element ownership and binding rights.
//!
//! Base elements are owned by learning them. Sub-elements and the Avatar
//! pseudo-element are owned purely through permissions, whatever the learned
//! set says.

use super::BendingEngine;
use crate::ability::CoreAbility;
use crate::element::Element;
use crate::profile::BendingProfile;

impl BendingEngine {
    /// Whether the player owns `element`.
    #[must_use]
    pub fn has_element(&self, profile: &BendingProfile, element: Element) -> bool {
        match element {
            // Both nodes are accepted until the older one is retired.
            Element::Avatar => {
                self.has_permission(profile, "bending.avatar")
                    || self.has_permission(profile, "bending.ability.AvatarState")
            }
            Element::Sub(sub) => {
                let node = format!(
                    "bending.{}.{}",
                    sub.parent().permission_name(),
                    element.permission_name()
                );
                // Some nodes are `bending.water.blood`, others `bending.water.bloodbending`.
                self.has_permission(profile, &node)
                    || self.has_permission(profile, &format!("{node}bending"))
            }
            base => profile.knows_element(base),
        }
    }

    /// Whether the player may bind `ability` to a slot.
    #[must_use]
    pub fn can_bind(&self, profile: &BendingProfile, ability: Option<&dyn CoreAbility>) -> bool {
        let Some(ability) = ability else {
            return false;
        };
        if self.online_session(profile).is_none() {
            return false;
        }
        if !self.has_permission(profile, &format!("bending.ability.{}", ability.name())) {
            return false;
        }
        let element = ability.element();
        if !self.has_element(profile, element) {
            return false;
        }
        element
            .as_sub()
            .is_none_or(|sub| self.has_element(profile, sub.parent()))
    }

    /// `bending.water.bloodbending`
    #[must_use]
    pub fn can_bloodbend(&self, profile: &BendingProfile) -> bool {
        self.has_permission(profile, "bending.water.bloodbending")
    }

    /// Bloodbending regardless of moon phase.
    #[must_use]
    pub fn can_bloodbend_at_anytime(&self, profile: &BendingProfile) -> bool {
        self.can_bloodbend(profile)
            && self.has_permission(profile, "bending.water.bloodbending.anytime")
    }

    /// `bending.fire.combustionbending`
    #[must_use]
    pub fn can_combustionbend(&self, profile: &BendingProfile) -> bool {
        self.has_permission(profile, "bending.fire.combustionbending")
    }

    /// `bending.water.icebending`
    #[must_use]
    pub fn can_icebend(&self, profile: &BendingProfile) -> bool {
        self.has_permission(profile, "bending.water.icebending")
    }

    /// `bending.earth.lavabending`
    #[must_use]
    pub fn can_lavabend(&self, profile: &BendingProfile) -> bool {
        self.has_permission(profile, "bending.earth.lavabending")
    }

    /// `bending.fire.lightningbending`
    #[must_use]
    pub fn can_lightningbend(&self, profile: &BendingProfile) -> bool {
        self.has_permission(profile, "bending.fire.lightningbending")
    }

    /// `bending.earth.metalbending`
    #[must_use]
    pub fn can_metalbend(&self, profile: &BendingProfile) -> bool {
        self.has_permission(profile, "bending.earth.metalbending")
    }

    /// Server-wide; packed ice is either bendable for everyone or nobody.
    #[must_use]
    pub fn can_packed_icebend(&self) -> bool {
        self.host.config.can_bend_packed_ice()
    }

    /// `bending.water.plantbending`
    #[must_use]
    pub fn can_plantbend(&self, profile: &BendingProfile) -> bool {
        self.has_permission(profile, "bending.water.plantbending")
    }

    /// `bending.earth.sandbending`
    #[must_use]
    pub fn can_sandbend(&self, profile: &BendingProfile) -> bool {
        self.has_permission(profile, "bending.earth.sandbending")
    }

    /// `bending.air.flight`
    #[must_use]
    pub fn can_use_flight(&self, profile: &BendingProfile) -> bool {
        self.has_permission(profile, "bending.air.flight")
    }

    /// `bending.air.spiritualprojection`
    #[must_use]
    pub fn can_use_spiritual_projection(&self, profile: &BendingProfile) -> bool {
        self.has_permission(profile, "bending.air.spiritualprojection")
    }

    /// `bending.water.healing`
    #[must_use]
    pub fn can_water_heal(&self, profile: &BendingProfile) -> bool {
        self.has_permission(profile, "bending.water.healing")
    }
}
