//! Plugin configuration.
//!
//! The file is JSON5 so server owners can leave comments in it. A missing file
//! is created with defaults on first start.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use bending_utils::WorldId;
use serde::{Deserialize, Serialize};

/// Default global cooldown between any two abilities, in milliseconds.
pub const DEFAULT_GLOBAL_COOLDOWN: u64 = 500;

/// An error that can occur while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("config I/O error: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid JSON5 for [`BendingConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json5::Error),
    /// The defaults could not be serialized.
    #[error("could not write default config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Values read from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BendingConfig {
    /// Worlds in which bending is disabled entirely.
    pub disabled_worlds: Vec<String>,
    /// Minimum delay between any two abilities of a player, in milliseconds.
    pub global_cooldown: u64,
    /// Whether water benders may bend packed ice.
    pub can_bend_packed_ice: bool,
    /// Default log filter, overridden by `RUST_LOG`.
    pub log_level: String,
}

impl Default for BendingConfig {
    fn default() -> Self {
        Self {
            disabled_worlds: Vec::new(),
            global_cooldown: DEFAULT_GLOBAL_COOLDOWN,
            can_bend_packed_ice: true,
            log_level: "info".to_owned(),
        }
    }
}

impl BendingConfig {
    /// Parses a JSON5 document.
    pub fn from_json5(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json5::from_str(source)?)
    }

    /// Loads `path`, writing the defaults there first if it does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let defaults = Self::default();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, serde_json::to_string_pretty(&defaults)?)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(defaults);
        }
        Self::from_json5(&fs::read_to_string(path)?)
    }
}

/// Live configuration shared by every engine component.
///
/// Readers always see a complete snapshot; [`Config::reload`] swaps the whole
/// thing at once.
pub struct Config {
    current: ArcSwap<BendingConfig>,
    toggled_for_all: AtomicBool,
}

impl Config {
    /// Wraps a loaded configuration.
    #[must_use]
    pub fn new(config: BendingConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(config),
            toggled_for_all: AtomicBool::new(false),
        }
    }

    /// The current snapshot.
    #[must_use]
    pub fn get(&self) -> Arc<BendingConfig> {
        self.current.load_full()
    }

    /// Replaces the configuration for all subsequent reads.
    pub fn reload(&self, config: BendingConfig) {
        self.current.store(Arc::new(config));
        log::info!("Bending configuration reloaded");
    }

    /// Whether bending is disabled in `world`.
    #[must_use]
    pub fn is_world_disabled(&self, world: &WorldId) -> bool {
        self.current
            .load()
            .disabled_worlds
            .iter()
            .any(|w| w == world.name())
    }

    /// The global cooldown in milliseconds.
    #[must_use]
    pub fn global_cooldown_ms(&self) -> u64 {
        self.current.load().global_cooldown
    }

    /// Whether packed ice counts as bendable ice.
    #[must_use]
    pub fn can_bend_packed_ice(&self) -> bool {
        self.current.load().can_bend_packed_ice
    }

    /// Whether an admin has switched bending off for everybody.
    #[must_use]
    pub fn is_toggled_for_all(&self) -> bool {
        self.toggled_for_all.load(Ordering::Relaxed)
    }

    /// Sets the server-wide bending switch.
    pub fn set_toggled_for_all(&self, disabled: bool) {
        self.toggled_for_all.store(disabled, Ordering::Relaxed);
    }

    /// Flips the server-wide switch and returns the new state.
    pub fn toggle_for_all(&self) -> bool {
        !self.toggled_for_all.fetch_xor(true, Ordering::Relaxed)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(BendingConfig::default())
    }
}
