//! Drives a battle to completion with an automatic policy.
//!
//! Interactive front ends call [`step`](super::step) and
//! [`apply_action`](super::apply_action) themselves. Simulations, benches and
//! the playtest harness use [`run_to_completion`] instead.

use tracing::debug;

use super::{BattleAction, BattleRules, BattleState, CombatEntity, Phase};

/// Chooses an action for the actor whose turn it is.
pub trait ActionPolicy {
    /// Returns the action `actor` takes in `state`.
    fn choose(&self, state: &BattleState, actor: &CombatEntity) -> BattleAction;
}

/// Basic-attacks the first living opponent in id order.
///
/// With no opponent left the action targets nothing and resolves to a
/// narrative line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLivingOpponent;

impl ActionPolicy for FirstLivingOpponent {
    fn choose(&self, state: &BattleState, actor: &CombatEntity) -> BattleAction {
        let target = state
            .living(actor.team.opponent())
            .find(|e| e.is_living())
            .map(|e| e.id.clone());
        match target {
            Some(target) => BattleAction::basic_attack(&actor.id, &target),
            None => {
                let mut action = BattleAction::basic_attack(&actor.id, &actor.id);
                action.targets.clear();
                action
            }
        }
    }
}

/// Runs the machine until it finishes or `max_turns` turns have started.
///
/// The returned state is either finished or paused at `awaitingAction` of
/// the turn after the limit.
#[must_use]
pub fn run_to_completion(
    rules: &BattleRules,
    state: &BattleState,
    policy: &dyn ActionPolicy,
    max_turns: u32,
) -> BattleState {
    let mut state = state.clone();
    loop {
        match state.phase() {
            Phase::Finished => return state,
            Phase::AwaitingAction => {
                if state.turn() > max_turns {
                    debug!(turn = state.turn(), max_turns, "turn limit reached");
                    return state;
                }
                let Some(actor) = state.current_actor().cloned() else {
                    return state;
                };
                let action = policy.choose(&state, &actor);
                state = rules.apply_action(&state, action);
            }
            _ => state = rules.step(&state),
        }
    }
}
