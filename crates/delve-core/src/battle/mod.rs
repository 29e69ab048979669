//! Turn-based battle state machine.
//!
//! A battle is a pure-data [`BattleState`] plus a transition function. Each
//! call clones the input state and returns the next one, so callers can keep
//! any snapshot for replay, undo or rendering.
//!
//! # Architecture
//!
//! ```text
//! create_initial_battle_state(roster, seed)
//!        |
//!        v
//!   startTurn --step--> awaitingAction --apply_action--> resolvingAction
//!        ^                                                     |
//!        |                                                   step
//!        +------------- step <------------- endTurn <----------+
//!                                              |
//!                                              +--> finished
//! ```
//!
//! The free functions below use the default [`BattleRules`]. Hooks and crit
//! tuning need an explicit rules value.
//!
//! # Example
//!
//! ```
//! use delve_core::battle::{
//!     apply_action, create_initial_battle_state, step, Allegiance, BattleAction, CombatEntity,
//!     Phase,
//! };
//!
//! let roster = [
//!     CombatEntity::new("hero", Allegiance::Player, "Hero", 10, 3, 10),
//!     CombatEntity::new("gob", Allegiance::Enemy, "Goblin", 6, 1, 5),
//! ];
//! let state = create_initial_battle_state(&roster, "1");
//! let state = step(&state);
//! assert_eq!(state.phase(), Phase::AwaitingAction);
//!
//! let attack = BattleAction::basic_attack(&"hero".into(), &"gob".into());
//! let state = step(&apply_action(&state, attack));
//! assert_eq!(state.entity(&"gob".into()).unwrap().hp, 3);
//! ```

mod action;
mod combatant;
mod driver;
mod rules;
mod state;

pub use action::{ActionEffect, ActionKind, BattleAction, TargetMode};
pub use combatant::{Allegiance, CombatEntity, CombatTags, CombatantId, StatusEffect};
pub use driver::{run_to_completion, ActionPolicy, FirstLivingOpponent};
pub use rules::{BattleRules, CritConfig, HookTiming, StatusHook};
pub use state::{BattleState, LogEntry, Phase, Winner};

/// Builds the opening state. See [`BattleState::new`].
#[must_use]
pub fn create_initial_battle_state(roster: &[CombatEntity], seed: &str) -> BattleState {
    BattleState::new(roster, seed)
}

/// One transition under the default rules.
#[must_use]
pub fn step(state: &BattleState) -> BattleState {
    BattleRules::default().step(state)
}

/// Submits an action under the default rules.
#[must_use]
pub fn apply_action(state: &BattleState, action: BattleAction) -> BattleState {
    BattleRules::default().apply_action(state, action)
}

/// True while the battle runs and a player-side combatant holds the turn.
#[must_use]
pub fn is_players_turn(state: &BattleState) -> bool {
    is_turn_of(state, Allegiance::Player)
}

/// True while the battle runs and an enemy-side combatant holds the turn.
#[must_use]
pub fn is_enemies_turn(state: &BattleState) -> bool {
    is_turn_of(state, Allegiance::Enemy)
}

fn is_turn_of(state: &BattleState, team: Allegiance) -> bool {
    !state.is_finished()
        && state
            .current_actor()
            .is_some_and(|a| a.is_living() && a.team == team)
}
