//! End-to-end authorization scenarios against the in-memory host.
//!
//! Every test starts from a player who passes all checks for Bloodbending and
//! then breaks exactly one condition.

use std::sync::Arc;

use bending_core::host::memory::{ExternalStatus, MemoryBus, MemoryHost, MemorySession, ProtectedRegion};
use bending_core::profile::slot_bindings;
use bending_core::{
    AbilityInfo, AbilityInstance, AbilityRegistry, BendingCommand, BendingConfig, BendingEngine,
    BendingProfile, CommandError, Config, CooldownChangeKind, CoreAbility, DenyReason, Element,
    ProfileRegistry, StoredProfile, SubElement,
};
use bending_utils::{GameType, HotbarSlot, Location, ManualClock, WorldId};
use glam::DVec3;
use uuid::Uuid;

const START: u64 = 100_000;
const PLAYER: Uuid = Uuid::from_u128(0x5eed);

struct Fixture {
    host: Arc<MemoryHost>,
    bus: Arc<MemoryBus>,
    clock: Arc<ManualClock>,
    config: Arc<Config>,
    engine: BendingEngine,
    profile: Arc<BendingProfile>,
    session: Arc<MemorySession>,
    bloodbending: Arc<dyn CoreAbility>,
}

impl Fixture {
    /// Water bender holding slot 3, which is bound to Bloodbending.
    fn new() -> Self {
        let host = Arc::new(MemoryHost::new());
        let bus = Arc::new(MemoryBus::new());
        let clock = Arc::new(ManualClock::new(START));
        let config = Arc::new(Config::default());

        let abilities = Arc::new(AbilityRegistry::new());
        let bloodbending: Arc<dyn CoreAbility> =
            Arc::new(AbilityInfo::new("Bloodbending", SubElement::Blood).with_cooldown(5000));
        abilities.register(bloodbending.clone());
        abilities.register(Arc::new(AbilityInfo::new("FireBlast", Element::Fire)));

        let profiles = Arc::new(ProfileRegistry::new());
        let profile = profiles.load(StoredProfile {
            uuid: PLAYER,
            name: "Hama".to_owned(),
            elements: vec![Element::Water],
            abilities: slot_bindings([(3, "Bloodbending".to_owned())]),
            perma_removed: false,
        });

        host.grant(PLAYER, "bending.ability.Bloodbending");
        host.grant(PLAYER, "bending.water.bloodbending");
        let session = host.connect(PLAYER, world_at(0.0, 64.0, 0.0));
        session.set_held_slot(2);

        let engine = BendingEngine::new(
            host.host(bus.clone(), clock.clone(), config.clone()),
            abilities,
            profiles,
        );

        Self {
            host,
            bus,
            clock,
            config,
            engine,
            profile,
            session,
            bloodbending,
        }
    }

    fn evaluate(&self) -> Result<(), DenyReason> {
        self.engine
            .evaluate(&self.profile, Some(self.bloodbending.as_ref()), false, false)
    }

    fn can_bend(&self) -> bool {
        self.engine
            .can_bend(&self.profile, Some(self.bloodbending.as_ref()))
    }

    fn run(&self, line: &str) -> Result<String, CommandError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        BendingCommand::parse(&words)?.execute(&self.engine)
    }
}

fn world_at(x: f64, y: f64, z: f64) -> Location {
    Location::new(WorldId::new("world"), DVec3::new(x, y, z))
}

#[test]
fn test_bloodbending_scenario() {
    let f = Fixture::new();
    assert!(f.can_bend());

    assert!(f.engine.add_cooldown(&f.profile, "Bloodbending", 5000));
    assert!(!f.can_bend());
    assert_eq!(f.evaluate(), Err(DenyReason::OnCooldown));
    assert!(
        f.engine
            .can_bend_ignore_cooldowns(&f.profile, Some(f.bloodbending.as_ref()))
    );
}

#[test]
fn test_missing_ability() {
    let f = Fixture::new();
    assert_eq!(
        f.engine.evaluate(&f.profile, None, true, true),
        Err(DenyReason::NoAbility)
    );
    assert!(!f.engine.can_bend(&f.profile, None));
}

#[test]
fn test_offline_or_dead() {
    let f = Fixture::new();
    f.session.set_dead(true);
    assert_eq!(f.evaluate(), Err(DenyReason::Dead));

    f.session.set_dead(false);
    f.host.disconnect(PLAYER);
    assert_eq!(f.evaluate(), Err(DenyReason::Offline));
}

#[test]
fn test_instance_from_another_world() {
    let f = Fixture::new();
    let here = AbilityInstance::new(f.bloodbending.clone(), PLAYER, WorldId::new("world"));
    let there = AbilityInstance::new(f.bloodbending.clone(), PLAYER, WorldId::new("nether"));

    assert!(f.engine.can_bend(&f.profile, Some(&here)));
    assert_eq!(
        f.engine.evaluate(&f.profile, Some(&there), true, true),
        Err(DenyReason::WrongWorld)
    );
}

#[test]
fn test_holding_another_slot() {
    let f = Fixture::new();
    f.session.set_held_slot(0);
    assert_eq!(f.evaluate(), Err(DenyReason::NotBound));
}

#[test]
fn test_disabled_world() {
    let f = Fixture::new();
    f.config.reload(BendingConfig {
        disabled_worlds: vec!["world".to_owned()],
        ..BendingConfig::default()
    });
    assert_eq!(f.evaluate(), Err(DenyReason::DisabledWorld));

    f.session.teleport(Location::new(WorldId::new("nether"), DVec3::ZERO));
    assert!(f.can_bend());
}

#[test]
fn test_toggles() {
    let f = Fixture::new();

    assert!(f.config.toggle_for_all());
    assert_eq!(f.evaluate(), Err(DenyReason::DisabledForAll));
    assert!(!f.config.toggle_for_all());

    assert!(!f.profile.status().toggle_bending());
    assert_eq!(f.evaluate(), Err(DenyReason::BendingToggledOff));
    assert!(f.profile.status().toggle_bending());

    // Only the ability's own element counts, not its parent.
    assert!(!f.profile.toggle_element(Element::Water));
    assert!(f.can_bend());
    assert!(!f.profile.toggle_element(SubElement::Blood.into()));
    assert_eq!(f.evaluate(), Err(DenyReason::ElementToggledOff));

    assert!(f.profile.toggle_element(SubElement::Blood.into()));
    assert!(f.profile.is_element_toggled(SubElement::Blood.into()));
}

#[test]
fn test_spectator() {
    let f = Fixture::new();
    f.session.set_game_mode(GameType::Spectator);
    assert_eq!(f.evaluate(), Err(DenyReason::Spectator));
    f.session.set_game_mode(GameType::Creative);
    assert!(f.can_bend());
}

#[test]
fn test_global_cooldown_is_dropped_once_passed() {
    let f = Fixture::new();
    assert!(f.engine.add_cooldown(&f.profile, "Hama", 0));
    assert_eq!(f.evaluate(), Err(DenyReason::GlobalCooldown));

    f.clock.advance(500);
    assert_eq!(f.evaluate(), Err(DenyReason::GlobalCooldown));

    f.clock.advance(1);
    assert!(f.can_bend());
    assert_eq!(f.profile.cooldowns().stored("Hama"), None);
    // Dropping the stale entry publishes nothing.
    assert_eq!(f.bus.published().len(), 1);
}

#[test]
fn test_external_statuses() {
    let f = Fixture::new();
    f.profile.status().block_chi();
    assert_eq!(f.evaluate(), Err(DenyReason::ChiBlocked));
    f.profile.status().unblock_chi();

    for (status, reason) in [
        (ExternalStatus::Paralyzed, DenyReason::Paralyzed),
        (ExternalStatus::Bloodbent, DenyReason::Bloodbent),
        (ExternalStatus::MetalClipped, DenyReason::MetalClipped),
    ] {
        f.host.set_status(PLAYER, status, true);
        assert_eq!(f.evaluate(), Err(reason));
        f.host.set_status(PLAYER, status, false);
    }
    assert!(f.can_bend());
}

#[test]
fn test_protected_region() {
    let f = Fixture::new();
    f.host.protect(ProtectedRegion {
        world: WorldId::new("world"),
        min: DVec3::new(-10.0, 0.0, -10.0),
        max: DVec3::new(10.0, 255.0, 10.0),
        allowed: Vec::new(),
    });
    assert_eq!(f.evaluate(), Err(DenyReason::RegionProtected));

    f.session.teleport(world_at(50.0, 64.0, 50.0));
    assert!(f.can_bend());
}

#[test]
fn test_eclipses_follow_root_element() {
    let f = Fixture::new();
    let world = WorldId::new("world");
    let lightning = AbilityInfo::new("Lightning", SubElement::Lightning);

    f.host.set_solar_eclipse(&world, true);
    assert!(f.can_bend());
    assert_eq!(
        f.engine.evaluate(&f.profile, Some(&lightning), true, false),
        Err(DenyReason::SolarEclipse)
    );

    f.host.set_solar_eclipse(&world, false);
    f.host.set_lunar_eclipse(&world, true);
    assert_eq!(f.evaluate(), Err(DenyReason::LunarEclipse));
    assert!(
        f.engine
            .can_bend_ignore_binds(&f.profile, Some(&lightning))
    );
}

#[test]
fn test_bind_rights() {
    let f = Fixture::new();
    assert!(f.host.revoke(PLAYER, "bending.ability.Bloodbending"));
    assert_eq!(f.evaluate(), Err(DenyReason::CannotBind));

    let f = Fixture::new();
    assert!(f.host.revoke(PLAYER, "bending.water.bloodbending"));
    assert_eq!(f.evaluate(), Err(DenyReason::CannotBind));

    // The sub-element comes from the permission alone, but binding still
    // needs the parent element.
    let f = Fixture::new();
    assert!(f.profile.remove_element(Element::Water));
    assert!(f.engine.has_element(&f.profile, SubElement::Blood.into()));
    assert!(!f.engine.has_element(&f.profile, Element::Water));
    assert_eq!(f.evaluate(), Err(DenyReason::CannotBind));
}

#[test]
fn test_ignore_binds_skips_binding_checks() {
    let f = Fixture::new();
    f.session.set_held_slot(0);
    f.host.revoke(PLAYER, "bending.ability.Bloodbending");

    assert!(!f.can_bend());
    assert!(
        f.engine
            .can_bend_ignore_binds(&f.profile, Some(f.bloodbending.as_ref()))
    );
}

#[test]
fn test_ignore_cooldowns_skips_both_cooldowns() {
    let f = Fixture::new();
    f.engine.add_ability_cooldown(&f.profile, f.bloodbending.as_ref());
    f.engine.add_cooldown(&f.profile, "Hama", 0);

    assert!(!f.can_bend());
    assert!(
        f.engine
            .can_bend_ignore_cooldowns(&f.profile, Some(f.bloodbending.as_ref()))
    );
    // Ignoring cooldowns leaves the global entry in place.
    assert!(f.profile.cooldowns().stored("Hama").is_some());
}

#[test]
fn test_cooldown_expiry_and_removal() {
    let f = Fixture::new();
    f.engine.add_cooldown(&f.profile, "Surge", 1000);
    assert!(f.engine.is_on_cooldown(&f.profile, "Surge"));

    f.clock.advance(1000);
    assert!(!f.engine.is_on_cooldown(&f.profile, "Surge"));
    assert_eq!(f.engine.cooldown(&f.profile, "Surge"), None);

    f.engine.add_cooldown(&f.profile, "Surge", 1000);
    assert!(f.engine.remove_cooldown(&f.profile, "Surge"));
    assert!(!f.engine.is_on_cooldown(&f.profile, "Surge"));

    let kinds: Vec<_> = f.bus.published().iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        [
            CooldownChangeKind::Added,
            CooldownChangeKind::Added,
            CooldownChangeKind::Removed
        ]
    );
}

#[test]
fn test_vetoed_changes_leave_ledger_alone() {
    let f = Fixture::new();
    f.engine.add_cooldown(&f.profile, "Surge", 1000);

    f.bus.set_veto(true);
    assert!(!f.engine.add_cooldown(&f.profile, "Torrent", 1000));
    assert!(!f.engine.is_on_cooldown(&f.profile, "Torrent"));
    assert!(!f.engine.remove_cooldown(&f.profile, "Surge"));
    assert!(f.engine.is_on_cooldown(&f.profile, "Surge"));
    assert_eq!(f.bus.published().len(), 3);
}

#[test]
fn test_passives() {
    let f = Fixture::new();
    assert_eq!(
        f.engine.evaluate_passive(&f.profile, Element::Water),
        Err(DenyReason::NoPassivePermission)
    );

    f.host.grant(PLAYER, "bending.water.passive");
    f.host.grant(PLAYER, "bending.fire.passive");
    assert!(f.engine.can_bend_passive(&f.profile, Element::Water));
    assert_eq!(
        f.engine.evaluate_passive(&f.profile, Element::Fire),
        Err(DenyReason::MissingElement)
    );

    f.profile.status().block_chi();
    assert!(!f.engine.can_bend_passive(&f.profile, Element::Water));
}

fn passive_fixture() -> Fixture {
    let f = Fixture::new();
    f.host.grant(PLAYER, "bending.water.passive");
    assert_eq!(f.engine.evaluate_passive(&f.profile, Element::Water), Ok(()));
    f
}

#[test]
fn test_passive_toggles() {
    let f = passive_fixture();
    f.profile.status().toggle_bending();
    assert_eq!(
        f.engine.evaluate_passive(&f.profile, Element::Water),
        Err(DenyReason::BendingToggledOff)
    );

    let f = passive_fixture();
    f.profile.toggle_element(Element::Water);
    assert_eq!(
        f.engine.evaluate_passive(&f.profile, Element::Water),
        Err(DenyReason::ElementToggledOff)
    );
}

#[test]
fn test_passive_external_statuses() {
    for (status, reason) in [
        (ExternalStatus::Paralyzed, DenyReason::Paralyzed),
        (ExternalStatus::Bloodbent, DenyReason::Bloodbent),
    ] {
        let f = passive_fixture();
        f.host.set_status(PLAYER, status, true);
        assert_eq!(
            f.engine.evaluate_passive(&f.profile, Element::Water),
            Err(reason)
        );
    }

    // Metal clips only stop active abilities.
    let f = passive_fixture();
    f.host.set_status(PLAYER, ExternalStatus::MetalClipped, true);
    assert!(f.engine.can_bend_passive(&f.profile, Element::Water));
}

#[test]
fn test_passive_protected_region() {
    let f = passive_fixture();
    f.host.protect(ProtectedRegion {
        world: WorldId::new("world"),
        min: DVec3::new(-10.0, 0.0, -10.0),
        max: DVec3::new(10.0, 255.0, 10.0),
        allowed: vec!["Bloodbending".to_owned()],
    });
    // Passives carry no ability name, so an allow-list never applies.
    assert_eq!(
        f.engine.evaluate_passive(&f.profile, Element::Water),
        Err(DenyReason::RegionProtected)
    );
}

#[test]
fn test_passive_ignores_cooldowns_and_bindings() {
    let f = passive_fixture();
    f.engine.add_ability_cooldown(&f.profile, f.bloodbending.as_ref());
    f.engine.add_cooldown(&f.profile, "Hama", 0);
    f.session.set_held_slot(5);
    f.host.revoke(PLAYER, "bending.ability.Bloodbending");

    assert!(!f.can_bend());
    assert!(f.engine.can_bend_passive(&f.profile, Element::Water));
}

#[test]
fn test_slow_debounce() {
    let f = Fixture::new();
    assert!(f.engine.can_be_slowed(&f.profile));
    f.engine.slow(&f.profile, 1000);
    assert!(!f.engine.can_be_slowed(&f.profile));
    f.clock.advance(1001);
    assert!(f.engine.can_be_slowed(&f.profile));
}

#[test]
fn test_can_be_bloodbent() {
    let f = Fixture::new();
    assert!(f.engine.can_be_bloodbent(&f.profile));

    f.profile.status().toggle_bending();
    assert!(f.engine.can_be_bloodbent(&f.profile));
}

#[test]
fn test_bound_ability_follows_held_slot() {
    let f = Fixture::new();
    assert_eq!(
        f.engine.bound_ability(&f.profile).map(|a| a.name().to_owned()),
        Some("Bloodbending".to_owned())
    );
    f.session.set_held_slot(8);
    assert!(f.engine.bound_ability(&f.profile).is_none());
}

#[test]
fn test_bind_and_unbind_commands_persist() {
    let f = Fixture::new();
    let err = f.run("bind hama 1 FireBlast").expect_err("no fire permission");
    assert!(matches!(err, CommandError::CannotBind { .. }));

    f.host.grant(PLAYER, "bending.ability.FireBlast");
    f.run("add hama fire").expect("add fire");
    f.run("bind hama 1 fireblast").expect("bind");

    let saved = f.host.saved_bindings(PLAYER).expect("saved");
    let slot = HotbarSlot::new(1).expect("valid slot");
    assert_eq!(saved.get(&slot).map(String::as_str), Some("FireBlast"));

    f.run("unbind hama 1").expect("unbind");
    let saved = f.host.saved_bindings(PLAYER).expect("saved");
    assert!(!saved.contains_key(&slot));
}

#[test]
fn test_check_command_reports_reason() {
    let f = Fixture::new();
    assert_eq!(
        f.run("check Hama").expect("check"),
        "Hama can use Bloodbending"
    );

    f.run("cooldown Hama Bloodbending 5000").expect("cooldown");
    let report = f.run("check Hama").expect("check");
    assert!(report.ends_with(DenyReason::OnCooldown.describe()), "{report}");

    f.run("uncooldown Hama Bloodbending").expect("uncooldown");
    assert!(f.can_bend());
}

#[test]
fn test_uncooldown_without_entry_is_not_cancelled() {
    let f = Fixture::new();
    assert_eq!(
        f.run("uncooldown Hama Surge").expect("nothing vetoed"),
        "Hama has no Surge cooldown"
    );
    assert_eq!(f.bus.published().len(), 1);

    f.bus.set_veto(true);
    assert!(matches!(
        f.run("uncooldown Hama Surge"),
        Err(CommandError::Cancelled(_))
    ));
}

#[test]
fn test_uncooldown_clears_entry() {
    let f = Fixture::new();
    f.run("cooldown Hama Surge 5000").expect("cooldown");
    assert_eq!(
        f.run("uncooldown hama Surge").expect("uncooldown"),
        "Cleared the Surge cooldown of Hama"
    );
    assert!(!f.engine.is_on_cooldown(&f.profile, "Surge"));
}

#[test]
fn test_remove_command_allows_purge() {
    let f = Fixture::new();
    assert!(!f.engine.profiles().purge(PLAYER));

    f.run("remove Hama").expect("remove");
    assert!(f.profile.elements().is_empty());
    assert!(f.profile.status().is_perma_removed());
    assert!(f.engine.profiles().purge(PLAYER));
    assert!(matches!(
        f.run("toggle Hama"),
        Err(CommandError::UnknownPlayer(_))
    ));
}
