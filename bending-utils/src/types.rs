//! Small host-facing enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The game mode a player is in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    /// Normal play.
    #[default]
    Survival,
    /// Unlimited resources, flight.
    Creative,
    /// Cannot break or place blocks freely.
    Adventure,
    /// Non-interactive observer.
    Spectator,
}

impl GameType {
    /// Lower-case name, as used in commands.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Survival => "survival",
            Self::Creative => "creative",
            Self::Adventure => "adventure",
            Self::Spectator => "spectator",
        }
    }

    /// Whether the player can interact with the world at all.
    #[must_use]
    pub const fn is_spectator(self) -> bool {
        matches!(self, Self::Spectator)
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a game mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game mode: {0}")]
pub struct UnknownGameType(pub String);

impl FromStr for GameType {
    type Err = UnknownGameType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "survival" | "s" | "0" => Ok(Self::Survival),
            "creative" | "c" | "1" => Ok(Self::Creative),
            "adventure" | "a" | "2" => Ok(Self::Adventure),
            "spectator" | "sp" | "3" => Ok(Self::Spectator),
            _ => Err(UnknownGameType(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_game_type() {
        assert_eq!("Spectator".parse(), Ok(GameType::Spectator));
        assert_eq!("1".parse(), Ok(GameType::Creative));
        assert!("hardcore".parse::<GameType>().is_err());
    }
}
