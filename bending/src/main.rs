//! Stand-alone bending host.
//!
//! Runs the engine against an in-memory server and takes admin and
//! simulation commands from stdin until EOF or Ctrl-C.

mod console;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use bending_core::host::memory::{MemoryBus, MemoryHost};
use bending_core::{
    AbilityInfo, AbilityRegistry, BendingConfig, BendingEngine, Config, Element, ProfileRegistry,
    SubElement,
};
use bending_utils::SystemClock;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::console::Console;

const CONFIG_PATH: &str = "config/bending.json5";

/// `RUST_LOG` wins over the configured level. `log` records from the library
/// crates are bridged into tracing by `init`.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn builtin_abilities() -> AbilityRegistry {
    let registry = AbilityRegistry::new();
    let abilities = [
        AbilityInfo::new("AirBlast", Element::Air).with_cooldown(500),
        AbilityInfo::new("AirScooter", Element::Air),
        AbilityInfo::new("Flight", SubElement::Flight),
        AbilityInfo::new("Surge", Element::Water).with_cooldown(500),
        AbilityInfo::new("WaterManipulation", Element::Water).with_cooldown(1000),
        AbilityInfo::new("Bloodbending", SubElement::Blood).with_cooldown(5000),
        AbilityInfo::new("HealingWaters", SubElement::Healing),
        AbilityInfo::new("PhaseChange", SubElement::Ice),
        AbilityInfo::new("EarthBlast", Element::Earth).with_cooldown(500),
        AbilityInfo::new("LavaFlow", SubElement::Lava).with_cooldown(10_000),
        AbilityInfo::new("MetalClips", SubElement::Metal).with_cooldown(1000),
        AbilityInfo::new("FireBlast", Element::Fire).with_cooldown(1500),
        AbilityInfo::new("Lightning", SubElement::Lightning).with_cooldown(2500),
        AbilityInfo::new("Combustion", SubElement::Combustion).with_cooldown(10_000),
        AbilityInfo::new("RapidPunch", Element::Chi).with_cooldown(4000),
        AbilityInfo::new("AvatarState", Element::Avatar).with_cooldown(480_000),
    ];
    for ability in abilities {
        registry.register(Arc::new(ability));
    }
    registry
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let bending_config = BendingConfig::load_or_create(Path::new(CONFIG_PATH))
        .with_context(|| format!("failed to load {CONFIG_PATH}"))?;
    init_logging(&bending_config.log_level);

    let config = Arc::new(Config::new(bending_config));
    let memory = Arc::new(MemoryHost::new());
    let bus = Arc::new(MemoryBus::new());
    let host = memory.host(bus, Arc::new(SystemClock::new()), config);

    let abilities = Arc::new(builtin_abilities());
    log::info!("Registered {} abilities", abilities.len());
    let engine = BendingEngine::new(host, abilities, Arc::new(ProfileRegistry::new()));

    let cancel_token = CancellationToken::new();
    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            log::info!("Received Ctrl-C, shutting down");
        }
        ctrl_c_token.cancel();
    });

    let console = Console::new(memory, engine, Path::new(CONFIG_PATH));
    log::info!("Bending host ready, type `help` for commands");
    console.run(cancel_token).await?;
    log::info!("Bending host stopped");
    Ok(())
}
