//! Player bending state and ability gating.
//!
//! A [`BendingProfile`] holds what a player knows and has bound, their
//! cooldowns and status flags. The [`BendingEngine`] answers whether a player
//! may use an ability right now, asking the server through the traits in
//! [`host`].

pub mod ability;
pub mod command;
pub mod config;
pub mod element;
pub mod engine;
pub mod event;
pub mod host;
pub mod profile;
pub mod registry;

pub use ability::{AbilityInfo, AbilityInstance, AbilityRegistry, CoreAbility};
pub use command::{BendingCommand, CommandError};
pub use config::{BendingConfig, Config, ConfigError};
pub use element::{Element, SubElement};
pub use engine::{BendingEngine, DenyReason};
pub use event::{Cancellable, CooldownChangeEvent, CooldownChangeKind};
pub use host::Host;
pub use profile::{BendingProfile, StoredProfile};
pub use registry::ProfileRegistry;
