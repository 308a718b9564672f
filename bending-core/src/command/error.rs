//! Errors returned by admin commands.

use bending_utils::slot::InvalidSlot;

use crate::element::UnknownElement;

/// Why a command could not be run.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Nothing was typed.
    #[error("empty command")]
    Empty,
    /// The first word is not a command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// Wrong number or shape of arguments.
    #[error("usage: {0}")]
    Usage(&'static str),
    /// No profile with that name.
    #[error("no bending profile for {0}")]
    UnknownPlayer(String),
    /// No registered ability with that name.
    #[error("unknown ability: {0}")]
    UnknownAbility(String),
    /// An argument should have been a number.
    #[error("not a number: {0}")]
    InvalidNumber(String),
    /// A slot argument is out of range.
    #[error(transparent)]
    InvalidSlot(#[from] InvalidSlot),
    /// An element argument is not an element.
    #[error(transparent)]
    UnknownElement(#[from] UnknownElement),
    /// The player lacks the permission or element for the ability.
    #[error("{player} cannot bind {ability}")]
    CannotBind {
        /// Player name.
        player: String,
        /// Ability name.
        ability: String,
    },
    /// A listener cancelled the cooldown change.
    #[error("cooldown change for {0} was cancelled")]
    Cancelled(String),
}
