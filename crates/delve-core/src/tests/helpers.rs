//! Test helper functions for building games and rosters.

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use delve_grid::Direction;

use crate::battle::{
    run_to_completion, Allegiance, BattleRules, BattleState, CombatEntity, FirstLivingOpponent,
};
use crate::bus::EventBus;
use crate::explore::{Engine, EngineConfig, ExploreAction, GameSnapshot};

// =============================================================================
// Exploration
// =============================================================================

/// Creates an engine on a fresh bus.
pub fn new_engine(config: &EngineConfig) -> (Engine, EventBus) {
    let bus = EventBus::new();
    let engine = Engine::new(config, bus.clone()).expect("valid test config");
    (engine, bus)
}

/// A fixed action script touching every direction and `wait`.
pub fn scripted_actions() -> Vec<ExploreAction> {
    let mut actions = Vec::new();
    for dir in [Direction::Right, Direction::Up, Direction::Left, Direction::Down] {
        actions.push(ExploreAction::Move { dir });
        actions.push(ExploreAction::Move { dir });
        actions.push(ExploreAction::Wait);
    }
    actions
}

/// Plays `actions` and returns every intermediate snapshot.
pub fn play(engine: &mut Engine, actions: &[ExploreAction]) -> Vec<GameSnapshot> {
    actions
        .iter()
        .map(|&action| engine.step(action).expect("player present"))
        .collect()
}

// =============================================================================
// Battle
// =============================================================================

/// Generates a random but seed-determined two-sided roster.
pub fn random_roster(seed: u64, per_side: usize) -> Vec<CombatEntity> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut roster = Vec::with_capacity(per_side * 2);
    for (team, prefix) in [(Allegiance::Player, "p"), (Allegiance::Enemy, "e")] {
        for i in 0..per_side {
            let id = format!("{prefix}{i}");
            let entity = CombatEntity::new(
                &id,
                team,
                &id.to_uppercase(),
                rng.gen_range(5..20),
                rng.gen_range(1..6),
                rng.gen_range(1..15),
            )
            .with_armor(rng.gen_range(0..3));
            roster.push(entity);
        }
    }
    roster
}

/// Plays a battle to the end with the default rules and policy.
pub fn auto_battle(roster: &[CombatEntity], seed: &str) -> BattleState {
    let state = BattleState::new(roster, seed);
    run_to_completion(&BattleRules::new(), &state, &FirstLivingOpponent, 500)
}

/// Log messages without timestamps, for comparing two runs.
pub fn messages(state: &BattleState) -> Vec<String> {
    state.log().iter().map(|e| e.message.clone()).collect()
}
