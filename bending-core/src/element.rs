//! Bending elements and their specialisations.
//!
//! Base elements are learned (stored on the profile); sub-elements are granted
//! purely through permissions and always hang off a parent element.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A bending discipline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Element {
    /// Airbending.
    Air,
    /// Waterbending.
    Water,
    /// Earthbending.
    Earth,
    /// Firebending.
    Fire,
    /// Chi blocking.
    Chi,
    /// Pseudo-element for the Avatar, resolved through permissions only.
    Avatar,
    /// A specialisation of one of the base elements.
    Sub(SubElement),
}

/// A specialisation that belongs to exactly one parent element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubElement {
    /// Air: flight.
    Flight,
    /// Air: spiritual projection.
    SpiritualProjection,
    /// Water: bloodbending.
    Blood,
    /// Water: healing.
    Healing,
    /// Water: icebending.
    Ice,
    /// Water: plantbending.
    Plant,
    /// Earth: lavabending.
    Lava,
    /// Earth: metalbending.
    Metal,
    /// Earth: sandbending.
    Sand,
    /// Fire: combustion.
    Combustion,
    /// Fire: lightning.
    Lightning,
}

impl SubElement {
    /// Every sub-element.
    pub const ALL: [Self; 11] = [
        Self::Flight,
        Self::SpiritualProjection,
        Self::Blood,
        Self::Healing,
        Self::Ice,
        Self::Plant,
        Self::Lava,
        Self::Metal,
        Self::Sand,
        Self::Combustion,
        Self::Lightning,
    ];

    /// The element this specialisation belongs to.
    #[must_use]
    pub const fn parent(self) -> Element {
        match self {
            Self::Flight | Self::SpiritualProjection => Element::Air,
            Self::Blood | Self::Healing | Self::Ice | Self::Plant => Element::Water,
            Self::Lava | Self::Metal | Self::Sand => Element::Earth,
            Self::Combustion | Self::Lightning => Element::Fire,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Flight => "Flight",
            Self::SpiritualProjection => "SpiritualProjection",
            Self::Blood => "Blood",
            Self::Healing => "Healing",
            Self::Ice => "Ice",
            Self::Plant => "Plant",
            Self::Lava => "Lava",
            Self::Metal => "Metal",
            Self::Sand => "Sand",
            Self::Combustion => "Combustion",
            Self::Lightning => "Lightning",
        }
    }
}

impl Element {
    /// The learnable base elements.
    pub const BASE: [Self; 5] = [Self::Air, Self::Water, Self::Earth, Self::Fire, Self::Chi];

    /// Display name, e.g. `Water` or `Blood`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Air => "Air",
            Self::Water => "Water",
            Self::Earth => "Earth",
            Self::Fire => "Fire",
            Self::Chi => "Chi",
            Self::Avatar => "Avatar",
            Self::Sub(sub) => sub.name(),
        }
    }

    /// Lower-case name used when building permission nodes.
    #[must_use]
    pub fn permission_name(self) -> String {
        self.name().to_ascii_lowercase()
    }

    /// The sub-element, if this is one.
    #[must_use]
    pub const fn as_sub(self) -> Option<SubElement> {
        match self {
            Self::Sub(sub) => Some(sub),
            _ => None,
        }
    }

    /// The parent element for sub-elements, itself otherwise.
    #[must_use]
    pub const fn root(self) -> Self {
        match self {
            Self::Sub(sub) => sub.parent(),
            other => other,
        }
    }
}

impl From<SubElement> for Element {
    fn from(sub: SubElement) -> Self {
        Self::Sub(sub)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when an element name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown element: {0}")]
pub struct UnknownElement(pub String);

impl FromStr for Element {
    type Err = UnknownElement;

    /// Accepts display names case-insensitively, plus the `<name>bending`
    /// spelling (`waterbending`, `bloodbending`) and `chiblocking`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let stem = lower.strip_suffix("bending").unwrap_or(&lower);
        let stem = if stem == "chiblocking" { "chi" } else { stem };

        Self::BASE
            .into_iter()
            .chain([Self::Avatar])
            .chain(SubElement::ALL.into_iter().map(Self::Sub))
            .find(|e| e.name().eq_ignore_ascii_case(stem))
            .ok_or_else(|| UnknownElement(s.to_owned()))
    }
}

impl TryFrom<String> for Element {
    type Error = UnknownElement;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Element> for String {
    fn from(element: Element) -> Self {
        element.name().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_elements_have_base_parents() {
        for sub in SubElement::ALL {
            assert!(Element::BASE.contains(&sub.parent()), "{sub:?}");
            assert_eq!(Element::Sub(sub).root(), sub.parent());
        }
        assert_eq!(Element::Chi.root(), Element::Chi);
    }

    #[test]
    fn test_parse_spellings() {
        assert_eq!("water".parse(), Ok(Element::Water));
        assert_eq!("Waterbending".parse(), Ok(Element::Water));
        assert_eq!("bloodbending".parse(), Ok(Element::Sub(SubElement::Blood)));
        assert_eq!("chiblocking".parse(), Ok(Element::Chi));
        assert_eq!(
            "spiritualprojection".parse(),
            Ok(Element::Sub(SubElement::SpiritualProjection))
        );
        assert!("shadow".parse::<Element>().is_err());
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&[Element::Fire, Element::Sub(SubElement::Lava)])
            .expect("elements serialize");
        assert_eq!(json, r#"["Fire","Lava"]"#);
        let back: Vec<Element> = serde_json::from_str(&json).expect("elements deserialize");
        assert_eq!(back, vec![Element::Fire, Element::Sub(SubElement::Lava)]);
    }
}
