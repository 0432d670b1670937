//! Integration tests for the Skirmish battle simulator
//!
//! Tests the full stack: content loading, turn engine, decision engine,
//! battle orchestration and series play, driven by the bundled data files.

use std::path::PathBuf;

use skirmish_arena::{
    run_series, simulate_battle, Battle, BattleConfig, Outcome, SeriesConfig,
};
use skirmish_core::{
    AbilityCatalog, AreaOfEffect, Character, CombatEvent, Personality, Roster, Team,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn data_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../data").join(relative)
}

fn catalog() -> AbilityCatalog {
    AbilityCatalog::load(&data_path("abilities.json")).unwrap()
}

/// Vanguard (ids 0..) against Marauders (ids after)
fn teams(catalog: &AbilityCatalog) -> (Vec<Character>, Vec<Character>) {
    let vanguard = Roster::load(&data_path("rosters/vanguard.json")).unwrap();
    let marauders = Roster::load(&data_path("rosters/marauders.json")).unwrap();
    let team_a = vanguard.instantiate(catalog, 0).unwrap();
    let team_b = marauders.instantiate(catalog, team_a.len() as u32).unwrap();
    (team_a, team_b)
}

// ============================================================================
// CONTENT
// ============================================================================

#[test]
fn test_bundled_content_loads() {
    let catalog = catalog();
    assert_eq!(catalog.len(), 11);

    let fireball = catalog.get(catalog.id_of("fireball").unwrap());
    assert_eq!(fireball.area, AreaOfEffect::Radius(1));
    let cone = catalog.get(catalog.id_of("frost_cone").unwrap());
    assert_eq!(cone.area, AreaOfEffect::Cone(2));
    let guard = catalog.get(catalog.id_of("guard").unwrap());
    assert!(guard.is_defensive());

    let (team_a, team_b) = teams(&catalog);
    assert_eq!(team_a.len(), 3);
    assert_eq!(team_b.len(), 3);
    let ids: Vec<u32> = team_a.iter().chain(&team_b).map(|c| c.id.0).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
    assert!(team_a.iter().all(|c| c.hp == c.max_hp));
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(AbilityCatalog::load(&data_path("nope.json")).is_err());
    assert!(Roster::load(&data_path("rosters/nope.json")).is_err());
}

// ============================================================================
// FULL BATTLES
// ============================================================================

#[test]
fn test_full_battle_is_consistent() {
    let catalog = catalog();
    let (team_a, team_b) = teams(&catalog);
    let result = simulate_battle(&catalog, team_a, team_b, BattleConfig::default().with_seed(3)).unwrap();

    assert!(result.rounds >= 1 && result.rounds <= 50);
    assert!(matches!(result.log.first(), Some(CombatEvent::CombatStarted { .. })));

    for character in result.team_a.iter().chain(&result.team_b) {
        assert!(character.hp >= 0 && character.hp <= character.max_hp);
        let stats = &result.statistics.characters[&character.id];
        assert_eq!(stats.defeated, character.is_defeated());
    }

    // The rosters deploy out of reach of each other and have to close in
    let walked: u32 = result.statistics.characters.values().map(|s| s.cells_moved).sum();
    assert!(walked > 0);
    assert!(result.log.iter().any(|e| matches!(e, CombatEvent::Moved { .. })));

    match result.outcome {
        Outcome::TeamAVictory => assert_eq!(result.survivors(Team::B), 0),
        Outcome::TeamBVictory => assert_eq!(result.survivors(Team::A), 0),
        Outcome::Draw => {}
    }
    if let Some(winner) = result.outcome.winner() {
        assert!(matches!(
            result.log.last(),
            Some(CombatEvent::CombatEnded { winner: Some(team), .. }) if *team == winner
        ));
    }
}

#[test]
fn test_seeded_battles_replay_exactly() {
    let catalog = catalog();
    let config = BattleConfig::default().with_seed(2024);

    let (a1, b1) = teams(&catalog);
    let first = simulate_battle(&catalog, a1, b1, config.clone()).unwrap();
    let (a2, b2) = teams(&catalog);
    let second = simulate_battle(&catalog, a2, b2, config).unwrap();

    assert_eq!(first.outcome, second.outcome);
    assert_eq!(first.rounds, second.rounds);
    assert_eq!(first.log, second.log);
    assert_eq!(first.statistics, second.statistics);
}

#[test]
fn test_turn_by_turn_matches_simulation() {
    let catalog = catalog();
    let config = BattleConfig::default().with_seed(77);

    let (a, b) = teams(&catalog);
    let mut battle = Battle::new(&catalog, a, b, config.clone()).unwrap();
    let mut turns = 0;
    while battle.is_running() {
        battle.play_turn();
        turns += 1;
        assert!(turns < 10_000);
    }
    let stepped = battle.finish();

    let (a, b) = teams(&catalog);
    let simulated = simulate_battle(&catalog, a, b, config).unwrap();
    assert_eq!(stepped.log, simulated.log);
}

#[test]
fn test_round_cap_produces_draw() {
    let catalog = catalog();
    let (team_a, team_b) = teams(&catalog);
    let config = BattleConfig::default().with_max_rounds(1);
    let result = simulate_battle(&catalog, team_a, team_b, config).unwrap();

    assert_eq!(result.rounds, 1);
    assert!(result.turns <= 6);
    assert!(!result.log.iter().any(|e| matches!(e, CombatEvent::TurnStarted { round: 2, .. })));
    if result.is_draw() {
        assert!(result.survivors(Team::A) > 0 && result.survivors(Team::B) > 0);
        assert!(result.team_a.iter().chain(&result.team_b).all(|c| c.experience == 0));
    }
}

#[test]
fn test_fallen_roster_loses_immediately() {
    let catalog = catalog();
    let (team_a, team_b) = teams(&catalog);
    let fallen: Vec<Character> = team_b.into_iter().map(|c| c.with_hp(0, 10)).collect();
    let result = simulate_battle(&catalog, team_a, fallen, BattleConfig::default()).unwrap();

    assert_eq!(result.outcome, Outcome::TeamAVictory);
    assert_eq!(result.turns, 0);
    assert!(result.team_a.iter().all(|c| c.experience == 100));
}

// ============================================================================
// SERIES
// ============================================================================

#[test]
fn test_series_over_bundled_rosters() {
    let catalog = catalog();
    let (team_a, team_b) = teams(&catalog);
    let smart = Personality::new(0.5, 0.8, 1.0, 0.4);
    let config = SeriesConfig::new(
        8,
        BattleConfig::default().with_seed(500).with_personalities(smart, Personality::default()),
    );

    let result = run_series(&catalog, &team_a, &team_b, &config);
    assert_eq!(result.battles_played, 8);
    assert_eq!(result.team_a_wins + result.team_b_wins + result.draws, 8);
    assert!(result.avg_rounds >= 1.0);

    let sequential = run_series(&catalog, &team_a, &team_b, &config.clone().sequential());
    assert_eq!(result.battles, sequential.battles);
}
