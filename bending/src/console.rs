//! Line-based console: host simulation commands plus the admin commands of
//! `bending_core::command`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use bending_core::host::memory::{MemoryHost, MemorySession};
use bending_core::{BendingCommand, BendingConfig, BendingEngine, StoredProfile};
use bending_utils::{GameType, HotbarSlot, Location, WorldId};
use glam::DVec3;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const HELP: &str = "\
simulation: join <player> [world] | quit <player> | hold <player> <slot> \
| world <player> <world> [x y z] | grant <player> <node> | revoke <player> <node> \
| gamemode <player> <mode> | reload | help
admin: toggle <all|player> [element] | tremorsense <player> | chiblock <player> \
| unchiblock <player> | cooldown <player> <ability> <ms> | uncooldown <player> <ability> \
| cooldowns <player> | bind <player> <slot> <ability> | unbind <player> <slot> \
| add <player> <element> | remove <player> | check <player>";

/// Owns the in-memory server and the engine running on it.
pub struct Console {
    memory: Arc<MemoryHost>,
    engine: BendingEngine,
    config_path: PathBuf,
}

impl Console {
    /// Wraps a host and its engine; `config_path` is re-read on `reload`.
    pub fn new(memory: Arc<MemoryHost>, engine: BendingEngine, config_path: &Path) -> Self {
        Self {
            memory,
            engine,
            config_path: config_path.to_path_buf(),
        }
    }

    /// Reads commands until stdin closes or `cancel_token` fires.
    pub async fn run(&self, cancel_token: CancellationToken) -> anyhow::Result<()> {
        let mut lines = BufReader::new(io::stdin()).lines();
        loop {
            let line = tokio::select! {
                () = cancel_token.cancelled() => break,
                line = lines.next_line() => line.context("failed to read stdin")?,
            };
            let Some(line) = line else {
                break;
            };
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.is_empty() {
                continue;
            }
            match self.handle(&words) {
                Ok(feedback) => tracing::info!("{feedback}"),
                Err(err) => tracing::warn!("{err:#}"),
            }
        }
        Ok(())
    }

    fn handle(&self, words: &[&str]) -> anyhow::Result<String> {
        let feedback = match words {
            ["help"] => HELP.to_owned(),
            ["reload"] => {
                let config = BendingConfig::load_or_create(&self.config_path)?;
                self.engine.host().config.reload(config);
                "Configuration reloaded".to_owned()
            }
            ["join", name] => self.join(name, "world"),
            ["join", name, world] => self.join(name, world),
            ["quit", name] => {
                let uuid = self.uuid(name)?;
                self.memory.disconnect(uuid);
                self.engine.profiles().on_disconnect(uuid);
                format!("{name} left")
            }
            ["hold", name, slot] => {
                let slot = HotbarSlot::try_from(slot.parse::<u8>()?)?;
                self.session(name)?.set_held_slot(slot.get() - 1);
                format!("{name} is holding slot {slot}")
            }
            ["world", name, world] => self.teleport(name, world, DVec3::new(0.0, 64.0, 0.0))?,
            ["world", name, world, x, y, z] => {
                let position = DVec3::new(x.parse()?, y.parse()?, z.parse()?);
                self.teleport(name, world, position)?
            }
            ["grant", name, node] => {
                self.memory.grant(self.uuid(name)?, node);
                format!("Granted {node} to {name}")
            }
            ["revoke", name, node] => {
                if !self.memory.revoke(self.uuid(name)?, node) {
                    bail!("{name} does not have {node}");
                }
                format!("Revoked {node} from {name}")
            }
            ["gamemode", name, mode] => {
                let mode: GameType = mode.parse()?;
                self.session(name)?.set_game_mode(mode);
                format!("{name} is now in {mode} mode")
            }
            _ => BendingCommand::parse(words)?.execute(&self.engine)?,
        };
        Ok(feedback)
    }

    /// Connects `name`, creating an empty profile on first join.
    fn join(&self, name: &str, world: &str) -> String {
        let profiles = self.engine.profiles();
        let profile = profiles.get_by_name(name).unwrap_or_else(|| {
            profiles.load(StoredProfile {
                uuid: Uuid::new_v4(),
                name: name.to_owned(),
                ..StoredProfile::default()
            })
        });
        let spawn = Location::new(WorldId::new(world), DVec3::new(0.0, 64.0, 0.0));
        self.memory.connect(profile.uuid(), spawn);
        format!("{} joined {world} ({})", profile.name(), profile.uuid())
    }

    fn teleport(&self, name: &str, world: &str, position: DVec3) -> anyhow::Result<String> {
        self.session(name)?
            .teleport(Location::new(WorldId::new(world), position));
        Ok(format!("Moved {name} to {world} {position}"))
    }

    fn uuid(&self, name: &str) -> anyhow::Result<Uuid> {
        self.engine
            .profiles()
            .get_by_name(name)
            .map(|p| p.uuid())
            .with_context(|| format!("{name} never joined"))
    }

    fn session(&self, name: &str) -> anyhow::Result<Arc<MemorySession>> {
        let uuid = self.uuid(name)?;
        self.memory
            .memory_session(uuid)
            .with_context(|| format!("{name} has no session"))
    }
}
