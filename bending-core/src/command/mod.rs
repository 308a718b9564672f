//! Admin commands for inspecting and changing bending state.
//!
//! Commands are parsed from whitespace-separated words (without the leading
//! `/bending`) and run against a [`BendingEngine`]. On success they return the
//! feedback line to show the sender.

pub mod error;

use std::fmt::Write;
use std::sync::Arc;

use bending_utils::HotbarSlot;

use crate::element::Element;
use crate::engine::BendingEngine;
use crate::profile::BendingProfile;

pub use error::CommandError;

/// A parsed admin command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BendingCommand {
    /// `toggle all`: flip bending for the whole server.
    ToggleAll,
    /// `toggle <player>`: flip one player's bending.
    Toggle {
        /// Target player.
        player: String,
    },
    /// `toggle <player> <element>`: flip one element for a player.
    ToggleElement {
        /// Target player.
        player: String,
        /// Element to flip.
        element: Element,
    },
    /// `tremorsense <player>`
    TremorSense {
        /// Target player.
        player: String,
    },
    /// `chiblock <player>` / `unchiblock <player>`
    ChiBlock {
        /// Target player.
        player: String,
        /// Block or unblock.
        blocked: bool,
    },
    /// `cooldown <player> <ability> <ms>`
    Cooldown {
        /// Target player.
        player: String,
        /// Cooldown key.
        ability: String,
        /// Duration in milliseconds.
        duration_ms: u64,
    },
    /// `uncooldown <player> <ability>`
    Uncooldown {
        /// Target player.
        player: String,
        /// Cooldown key.
        ability: String,
    },
    /// `cooldowns <player>`: list running cooldowns.
    Cooldowns {
        /// Target player.
        player: String,
    },
    /// `bind <player> <slot> <ability>`
    Bind {
        /// Target player.
        player: String,
        /// Slot to bind.
        slot: HotbarSlot,
        /// Ability name.
        ability: String,
    },
    /// `unbind <player> <slot>`
    Unbind {
        /// Target player.
        player: String,
        /// Slot to clear.
        slot: HotbarSlot,
    },
    /// `add <player> <element>`
    AddElement {
        /// Target player.
        player: String,
        /// Element to learn.
        element: Element,
    },
    /// `remove <player>`: strip every element and mark the profile
    /// perma-removed.
    Remove {
        /// Target player.
        player: String,
    },
    /// `check <player>`: whether the held ability can be used, and why not.
    Check {
        /// Target player.
        player: String,
    },
}

fn slot_arg(word: &str) -> Result<HotbarSlot, CommandError> {
    let number: u8 = word
        .parse()
        .map_err(|_| CommandError::InvalidNumber(word.to_owned()))?;
    Ok(HotbarSlot::try_from(number)?)
}

impl BendingCommand {
    /// Parses the words after `/bending`.
    pub fn parse(words: &[&str]) -> Result<Self, CommandError> {
        let (&name, args) = words.split_first().ok_or(CommandError::Empty)?;
        let owned = |s: &str| s.to_owned();

        let command = match (name.to_ascii_lowercase().as_str(), args) {
            ("toggle", ["all"]) => Self::ToggleAll,
            ("toggle", [player]) => Self::Toggle {
                player: owned(player),
            },
            ("toggle", [player, element]) => Self::ToggleElement {
                player: owned(player),
                element: element.parse()?,
            },
            ("toggle", _) => return Err(CommandError::Usage("toggle <all|player> [element]")),
            ("tremorsense", [player]) => Self::TremorSense {
                player: owned(player),
            },
            ("chiblock" | "unchiblock", [player]) => Self::ChiBlock {
                player: owned(player),
                blocked: name.eq_ignore_ascii_case("chiblock"),
            },
            ("cooldown", [player, ability, ms]) => Self::Cooldown {
                player: owned(player),
                ability: owned(ability),
                duration_ms: ms
                    .parse()
                    .map_err(|_| CommandError::InvalidNumber(owned(ms)))?,
            },
            ("cooldown", _) => return Err(CommandError::Usage("cooldown <player> <ability> <ms>")),
            ("uncooldown", [player, ability]) => Self::Uncooldown {
                player: owned(player),
                ability: owned(ability),
            },
            ("cooldowns", [player]) => Self::Cooldowns {
                player: owned(player),
            },
            ("bind", [player, slot, ability]) => Self::Bind {
                player: owned(player),
                slot: slot_arg(slot)?,
                ability: owned(ability),
            },
            ("bind", _) => return Err(CommandError::Usage("bind <player> <slot> <ability>")),
            ("unbind", [player, slot]) => Self::Unbind {
                player: owned(player),
                slot: slot_arg(slot)?,
            },
            ("add", [player, element]) => Self::AddElement {
                player: owned(player),
                element: element.parse()?,
            },
            ("remove", [player]) => Self::Remove {
                player: owned(player),
            },
            ("check", [player]) => Self::Check {
                player: owned(player),
            },
            (
                "tremorsense" | "chiblock" | "unchiblock" | "uncooldown" | "cooldowns" | "unbind"
                | "add" | "remove" | "check",
                _,
            ) => return Err(CommandError::Usage("<command> <player> [args...]")),
            (other, _) => return Err(CommandError::UnknownCommand(other.to_owned())),
        };
        Ok(command)
    }

    /// Runs the command and returns the feedback line.
    pub fn execute(&self, engine: &BendingEngine) -> Result<String, CommandError> {
        let find = |name: &str| -> Result<Arc<BendingProfile>, CommandError> {
            engine
                .profiles()
                .get_by_name(name)
                .ok_or_else(|| CommandError::UnknownPlayer(name.to_owned()))
        };

        let feedback = match self {
            Self::ToggleAll => {
                let disabled = engine.host().config.toggle_for_all();
                log::info!("Bending toggled {} for all players", on_off(!disabled));
                format!("Bending is now {} for everyone", on_off(!disabled))
            }
            Self::Toggle { player } => {
                let profile = find(player)?;
                let on = profile.status().toggle_bending();
                format!("{}'s bending is now {}", profile.name(), on_off(on))
            }
            Self::ToggleElement { player, element } => {
                let profile = find(player)?;
                let on = profile.toggle_element(*element);
                format!("{}'s {element} is now {}", profile.name(), on_off(on))
            }
            Self::TremorSense { player } => {
                let profile = find(player)?;
                let on = profile.status().toggle_tremor_sense();
                format!("{}'s tremor sense is now {}", profile.name(), on_off(on))
            }
            Self::ChiBlock { player, blocked } => chi_block(&*find(player)?, *blocked),
            Self::Cooldown {
                player,
                ability,
                duration_ms,
            } => {
                let profile = find(player)?;
                if !engine.add_cooldown(&profile, ability, *duration_ms) {
                    return Err(CommandError::Cancelled(ability.clone()));
                }
                format!("{ability} is on cooldown for {duration_ms}ms")
            }
            Self::Uncooldown { player, ability } => uncooldown(engine, &*find(player)?, ability)?,
            Self::Cooldowns { player } => list_cooldowns(engine, &*find(player)?),
            Self::Bind {
                player,
                slot,
                ability,
            } => bind(engine, &*find(player)?, *slot, ability)?,
            Self::Unbind { player, slot } => {
                if engine.unbind(&*find(player)?, *slot) {
                    format!("Cleared slot {slot}")
                } else {
                    format!("Slot {slot} was already empty")
                }
            }
            Self::AddElement { player, element } => {
                let profile = find(player)?;
                if profile.add_element(*element) {
                    format!("{} is now a {element} bender", profile.name())
                } else {
                    format!("{} already knows {element}", profile.name())
                }
            }
            Self::Remove { player } => remove_bending(&*find(player)?),
            Self::Check { player } => check(engine, &*find(player)?),
        };
        Ok(feedback)
    }
}

fn chi_block(profile: &BendingProfile, blocked: bool) -> String {
    if blocked {
        profile.status().block_chi();
        format!("{} is chi-blocked", profile.name())
    } else {
        profile.status().unblock_chi();
        format!("{} is no longer chi-blocked", profile.name())
    }
}

/// A missing entry is not an error; only a listener veto is.
fn uncooldown(
    engine: &BendingEngine,
    profile: &BendingProfile,
    ability: &str,
) -> Result<String, CommandError> {
    let had_entry = profile.cooldowns().stored(ability).is_some();
    if !engine.remove_cooldown(profile, ability) {
        return Err(CommandError::Cancelled(ability.to_owned()));
    }
    Ok(if had_entry {
        format!("Cleared the {ability} cooldown of {}", profile.name())
    } else {
        format!("{} has no {ability} cooldown", profile.name())
    })
}

fn list_cooldowns(engine: &BendingEngine, profile: &BendingProfile) -> String {
    let now = engine.now();
    let live = profile.cooldowns().snapshot(now);
    if live.is_empty() {
        return format!("{} has no cooldowns", profile.name());
    }
    let mut out = format!("{}'s cooldowns:", profile.name());
    for (ability, expiry) in live {
        let _ = write!(out, " {ability} ({}ms)", expiry.saturating_sub(now));
    }
    out
}

fn bind(
    engine: &BendingEngine,
    profile: &BendingProfile,
    slot: HotbarSlot,
    ability: &str,
) -> Result<String, CommandError> {
    let found = engine
        .abilities()
        .get(ability)
        .ok_or_else(|| CommandError::UnknownAbility(ability.to_owned()))?;
    if !engine.can_bind(profile, Some(found.as_ref())) {
        return Err(CommandError::CannotBind {
            player: profile.name().to_owned(),
            ability: found.name().to_owned(),
        });
    }
    engine.bind(profile, slot, found.name());
    Ok(format!("Bound {} to slot {slot}", found.name()))
}

fn remove_bending(profile: &BendingProfile) -> String {
    for element in profile.elements() {
        profile.remove_element(element);
    }
    profile.status().set_perma_removed(true);
    log::info!("Permanently removed the bending of {}", profile.name());
    format!("Removed all bending from {}", profile.name())
}

fn check(engine: &BendingEngine, profile: &BendingProfile) -> String {
    let Some(name) = engine.bound_ability_name(profile) else {
        return format!("{} is not holding a bound slot", profile.name());
    };
    let ability = engine.abilities().get(&name);
    match engine.evaluate(profile, ability.as_deref(), false, false) {
        Ok(()) => format!("{} can use {name}", profile.name()),
        Err(reason) => format!("{} cannot use {name}: {reason}", profile.name()),
    }
}

const fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
