//! Phase transitions and action resolution.
//!
//! [`BattleRules`] is the transition function of the battle state machine.
//! It holds no battle state of its own: every call takes a snapshot, clones
//! it into the next state, mutates the clone and returns it.
//!
//! # Hooks
//!
//! Status effects plug in through [`StatusHook`]. Hooks run in registration
//! order at the start of an actor's turn (before it may act) and at the end
//! of its turn (before the death scan), so a hook that drains hp to zero is
//! picked up by the same end-of-turn evaluation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::rng::{seed_from_str, Lcg};

use super::{ActionKind, BattleAction, BattleState, CombatantId, Phase};

/// When a hook is invoked.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HookTiming {
    /// After the actor is selected, before it acts
    StartOfTurn,
    /// After the action resolved, before the death scan
    EndOfTurn,
}

/// Extension point for status effects.
///
/// A hook receives the state by value and returns the (possibly modified)
/// state. It must be deterministic given its inputs.
pub trait StatusHook: Send + Sync {
    /// Applies the hook for `actor` at `timing`.
    fn apply(&self, state: BattleState, actor: &CombatantId, timing: HookTiming) -> BattleState;
}

/// Critical hit parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CritConfig {
    /// Probability of a critical hit, compared against one RNG draw
    pub chance: f64,
    /// Damage multiplier on a critical hit, result rounded to nearest
    pub multiplier: f64,
}

impl Default for CritConfig {
    fn default() -> Self {
        Self {
            chance: 0.10,
            multiplier: 1.5,
        }
    }
}

/// The battle transition function, plus its hooks and tuning.
#[derive(Default)]
pub struct BattleRules {
    hooks: Vec<Box<dyn StatusHook>>,
    crit: CritConfig,
}

impl fmt::Debug for BattleRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleRules")
            .field("hooks", &format!("[{} hooks]", self.hooks.len()))
            .field("crit", &self.crit)
            .finish()
    }
}

impl BattleRules {
    /// Rules with no hooks and default crit parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the crit parameters.
    #[must_use]
    pub fn with_crit(mut self, crit: CritConfig) -> Self {
        self.crit = crit;
        self
    }

    /// Registers a status hook. Hooks run in the order they are added.
    pub fn add_hook(&mut self, hook: Box<dyn StatusHook>) {
        self.hooks.push(hook);
    }

    /// Number of registered hooks.
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// The crit parameters.
    #[must_use]
    pub const fn crit(&self) -> CritConfig {
        self.crit
    }

    /// Performs one transition.
    ///
    /// `awaitingAction` is the single suspension point: stepping it returns
    /// the state unchanged until [`BattleRules::apply_action`] is called.
    /// `finished` is terminal and also returns the state unchanged.
    #[must_use]
    pub fn step(&self, state: &BattleState) -> BattleState {
        match state.phase {
            Phase::Idle => {
                let mut next = state.clone();
                next.phase = Phase::StartTurn;
                next
            }
            Phase::StartTurn => self.start_turn(state.clone()),
            Phase::AwaitingAction | Phase::Finished => state.clone(),
            Phase::ResolvingAction => self.resolve_action(state.clone()),
            Phase::EndTurn => self.end_turn(state.clone()),
        }
    }

    /// Submits an action. Ignored unless the battle is awaiting one.
    #[must_use]
    pub fn apply_action(&self, state: &BattleState, action: BattleAction) -> BattleState {
        if state.phase != Phase::AwaitingAction {
            debug!(phase = ?state.phase, actor = %action.actor, "action ignored outside awaitingAction");
            return state.clone();
        }
        let mut next = state.clone();
        next.pending_action = Some(action);
        next.phase = Phase::ResolvingAction;
        next
    }

    fn run_hooks(&self, mut state: BattleState, actor: &CombatantId, timing: HookTiming) -> BattleState {
        for hook in &self.hooks {
            state = hook.apply(state, actor, timing);
        }
        state
    }

    fn start_turn(&self, mut next: BattleState) -> BattleState {
        let actor_id = next
            .current_actor_id()
            .filter(|id| next.entity(id).is_some_and(super::CombatEntity::is_living))
            .cloned();

        let Some(actor_id) = actor_id else {
            debug!(turn = next.turn, index = next.current_index, "skipping dead or missing actor");
            next.advance_to_next_turn();
            return next;
        };

        if let Some(actor) = next.entity_mut(&actor_id) {
            actor.actions_remaining = 1;
        }
        let mut next = self.run_hooks(next, &actor_id, HookTiming::StartOfTurn);
        next.phase = Phase::AwaitingAction;
        debug!(turn = next.turn, round = next.round, actor = %actor_id, "awaiting action");
        next
    }

    fn resolve_action(&self, mut next: BattleState) -> BattleState {
        let Some(action) = next.pending_action.take() else {
            next.phase = Phase::EndTurn;
            return next;
        };

        let actor_name = match next.entity(&action.actor) {
            Some(actor) if actor.is_living() => actor.name.clone(),
            _ => {
                debug!(actor = %action.actor, "dropping action from dead or missing actor");
                next.phase = Phase::EndTurn;
                return next;
            }
        };

        match &action.kind {
            ActionKind::BasicAttack => self.resolve_basic_attack(&mut next, &action),
            ActionKind::Other(kind) => {
                next.push_log(format!("{actor_name} tries to {kind}, but nothing happens."));
            }
        }

        if let Some(actor) = next.entity_mut(&action.actor) {
            actor.actions_remaining = actor.actions_remaining.saturating_sub(1);
        }
        next.phase = Phase::EndTurn;
        next
    }

    fn end_turn(&self, next: BattleState) -> BattleState {
        let mut next = match next.current_actor_id().cloned() {
            Some(actor_id) => self.run_hooks(next, &actor_id, HookTiming::EndOfTurn),
            None => next,
        };

        let fallen: Vec<CombatantId> = next
            .entities
            .values()
            .filter(|e| e.alive && e.hp <= 0)
            .map(|e| e.id.clone())
            .collect();
        for id in &fallen {
            if let Some(entity) = next.entity_mut(id) {
                entity.alive = false;
                entity.hp = 0;
                let message = format!("{} falls in battle.", entity.name);
                next.push_log(message);
            }
        }

        if let Some(winner) = next.evaluate_winner() {
            next.winner = Some(winner);
            next.phase = Phase::Finished;
            info!(?winner, turn = next.turn, round = next.round, "battle finished");
            return next;
        }

        if !next.entities.values().any(|e| e.alive) {
            next.phase = Phase::Finished;
            info!(turn = next.turn, "battle finished with no survivors");
            return next;
        }

        next.advance_to_next_turn();
        next
    }

    fn resolve_basic_attack(&self, next: &mut BattleState, action: &BattleAction) {
        let Some(attacker) = next.entity(&action.actor).cloned() else {
            return;
        };

        let target = action
            .primary_target()
            .and_then(|id| next.entity(id))
            .filter(|t| t.is_living())
            .cloned();
        let Some(target) = target else {
            next.push_log(format!("{}'s attack finds no target.", attacker.name));
            return;
        };

        let base = action.effect.damage.unwrap_or(attacker.attack);
        let mut rng = Lcg::new(seed_from_str(&next.seed).wrapping_add(next.turn));
        let crit = rng.next_f64() < self.crit.chance;
        let damage = if crit {
            // Attack values are small integers; the product fits in i32.
            #[allow(clippy::cast_possible_truncation)]
            let boosted = (f64::from(base) * self.crit.multiplier).round() as i32;
            boosted
        } else {
            base
        };
        let dealt = damage.saturating_sub(target.armor).max(1);

        if let Some(t) = next.entity_mut(&target.id) {
            t.hp = t.hp.saturating_sub(dealt).max(0);
        }

        let armor_note = if target.armor > 0 {
            format!(" ({} absorbed by armor)", target.armor)
        } else {
            String::new()
        };
        let crit_note = if crit { " Critical hit!" } else { "" };
        next.push_log(format!(
            "{} attacks {} for {dealt} damage{armor_note}.{crit_note}",
            attacker.name, target.name
        ));
        debug!(
            attacker = %attacker.id,
            target = %target.id,
            dealt,
            crit,
            "basic attack resolved"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{Allegiance, CombatEntity, StatusEffect, Winner};

    // Seed whose first draw is below 0.10 for turns 1..=5.
    const CRIT_SEED: &str = "634785764";

    fn duel(enemy_armor: i32, enemy_hp: i32) -> BattleState {
        BattleState::new(
            &[
                CombatEntity::new("hero", Allegiance::Player, "Hero", 10, 3, 10),
                CombatEntity::new("gob", Allegiance::Enemy, "Goblin", enemy_hp, 2, 5)
                    .with_armor(enemy_armor),
            ],
            "1",
        )
    }

    fn hero() -> CombatantId {
        CombatantId::new("hero")
    }

    fn gob() -> CombatantId {
        CombatantId::new("gob")
    }

    fn to_awaiting(rules: &BattleRules, state: BattleState) -> BattleState {
        let mut state = state;
        while state.phase() != Phase::AwaitingAction && !state.is_finished() {
            state = rules.step(&state);
        }
        state
    }

    fn attack_once(rules: &BattleRules, state: &BattleState, action: BattleAction) -> BattleState {
        let state = rules.apply_action(state, action);
        let state = rules.step(&state); // resolvingAction -> endTurn
        rules.step(&state) // endTurn -> startTurn | finished
    }

    mod phase_tests {
        use super::*;

        #[test]
        fn start_turn_awaits_fastest_actor() {
            let rules = BattleRules::new();
            let state = rules.step(&duel(0, 6));
            assert_eq!(state.phase(), Phase::AwaitingAction);
            assert_eq!(state.current_actor_id(), Some(&hero()));
            assert_eq!(state.current_actor().unwrap().actions_remaining, 1);
        }

        #[test]
        fn awaiting_action_is_a_pause() {
            let rules = BattleRules::new();
            let state = rules.step(&duel(0, 6));
            let again = rules.step(&state);
            assert_eq!(again, state);
        }

        #[test]
        fn idle_moves_to_start_turn() {
            let rules = BattleRules::new();
            let mut state = duel(0, 6);
            state.phase = Phase::Idle;
            assert_eq!(rules.step(&state).phase(), Phase::StartTurn);
        }

        #[test]
        fn apply_action_outside_awaiting_is_noop() {
            let rules = BattleRules::new();
            for phase in [Phase::Idle, Phase::StartTurn, Phase::ResolvingAction, Phase::EndTurn] {
                let mut state = duel(0, 6);
                state.phase = phase;
                let after = rules.apply_action(&state, BattleAction::basic_attack(&hero(), &gob()));
                assert_eq!(after, state, "apply_action mutated state in {phase:?}");
            }
        }

        #[test]
        fn apply_action_stores_pending() {
            let rules = BattleRules::new();
            let state = rules.step(&duel(0, 6));
            let action = BattleAction::basic_attack(&hero(), &gob());
            let after = rules.apply_action(&state, action.clone());
            assert_eq!(after.phase(), Phase::ResolvingAction);
            assert_eq!(after.pending_action(), Some(&action));
        }

        #[test]
        fn resolving_consumes_action_allowance() {
            let rules = BattleRules::new();
            let state = rules.step(&duel(0, 6));
            let state = rules.apply_action(&state, BattleAction::basic_attack(&hero(), &gob()));
            let state = rules.step(&state);
            assert_eq!(state.phase(), Phase::EndTurn);
            assert_eq!(state.pending_action(), None);
            assert_eq!(state.entity(&hero()).unwrap().actions_remaining, 0);
        }

        #[test]
        fn resolving_without_pending_goes_to_end_turn() {
            let rules = BattleRules::new();
            let mut state = rules.step(&duel(0, 6));
            state.phase = Phase::ResolvingAction;
            let after = rules.step(&state);
            assert_eq!(after.phase(), Phase::EndTurn);
            assert!(after.log().is_empty());
        }

        #[test]
        fn dead_actor_start_turn_skips_ahead() {
            let rules = BattleRules::new();
            let mut state = duel(0, 6);
            state.entity_mut(&hero()).unwrap().alive = false;
            let after = rules.step(&state);
            assert_eq!(after.phase(), Phase::StartTurn);
            assert_eq!(after.current_actor_id(), Some(&gob()));
            assert_eq!(after.turn(), 2);
            assert_eq!(after.round(), 1);
        }
    }

    mod attack_tests {
        use super::*;

        #[test]
        fn attack_reduces_hp_and_logs() {
            let rules = BattleRules::new();
            let state = to_awaiting(&rules, duel(0, 6));
            let state = attack_once(&rules, &state, BattleAction::basic_attack(&hero(), &gob()));

            assert_eq!(state.entity(&gob()).unwrap().hp, 3);
            let message = &state.log()[0].message;
            assert_eq!(message, "Hero attacks Goblin for 3 damage.");
        }

        #[test]
        fn armor_is_reported_and_subtracted() {
            let rules = BattleRules::new();
            let state = to_awaiting(&rules, duel(2, 6));
            let state = attack_once(&rules, &state, BattleAction::basic_attack(&hero(), &gob()));

            assert_eq!(state.entity(&gob()).unwrap().hp, 5);
            assert!(state.log()[0].message.contains("(2 absorbed by armor)"));
        }

        #[test]
        fn armor_never_reduces_below_one() {
            let rules = BattleRules::new();
            let state = to_awaiting(&rules, duel(50, 6));
            let state = attack_once(&rules, &state, BattleAction::basic_attack(&hero(), &gob()));
            assert_eq!(state.entity(&gob()).unwrap().hp, 5);
        }

        #[test]
        fn zero_damage_zero_armor_deals_one() {
            let rules = BattleRules::new();
            let state = to_awaiting(&rules, duel(0, 6));
            let action = BattleAction::basic_attack(&hero(), &gob()).with_damage(0);
            let state = attack_once(&rules, &state, action);
            assert_eq!(state.entity(&gob()).unwrap().hp, 5);
        }

        #[test]
        fn extreme_damage_overrides_do_not_overflow() {
            let rules = BattleRules::new();
            let state = to_awaiting(&rules, duel(1, 6));
            let action = BattleAction::basic_attack(&hero(), &gob()).with_damage(i32::MIN);
            let after = attack_once(&rules, &state, action);
            assert_eq!(after.entity(&gob()).unwrap().hp, 5);

            let action = BattleAction::basic_attack(&hero(), &gob()).with_damage(i32::MAX);
            let after = attack_once(&rules, &state, action);
            let goblin = after.entity(&gob()).unwrap();
            assert_eq!(goblin.hp, 0);
            assert!(!goblin.alive);
        }

        #[test]
        fn damage_override_replaces_attack() {
            let rules = BattleRules::new();
            let state = to_awaiting(&rules, duel(0, 20));
            let action = BattleAction::basic_attack(&hero(), &gob()).with_damage(7);
            let state = attack_once(&rules, &state, action);
            assert_eq!(state.entity(&gob()).unwrap().hp, 13);
        }

        #[test]
        fn crit_multiplies_and_rounds() {
            let rules = BattleRules::new();
            let mut state = duel(0, 20);
            state.seed = CRIT_SEED.to_string();
            let state = to_awaiting(&rules, state);
            let state = attack_once(&rules, &state, BattleAction::basic_attack(&hero(), &gob()));

            // 3 * 1.5 = 4.5, rounds to 5
            assert_eq!(state.entity(&gob()).unwrap().hp, 15);
            assert!(state.log()[0].message.ends_with("Critical hit!"));
        }

        #[test]
        fn crit_chance_zero_never_crits() {
            let rules = BattleRules::new().with_crit(CritConfig { chance: 0.0, multiplier: 1.5 });
            let mut state = duel(0, 20);
            state.seed = CRIT_SEED.to_string();
            let state = to_awaiting(&rules, state);
            let state = attack_once(&rules, &state, BattleAction::basic_attack(&hero(), &gob()));
            assert_eq!(state.entity(&gob()).unwrap().hp, 17);
        }

        #[test]
        fn only_first_target_is_resolved() {
            let rules = BattleRules::new();
            let roster = [
                CombatEntity::new("hero", Allegiance::Player, "Hero", 10, 3, 10),
                CombatEntity::new("gob", Allegiance::Enemy, "Goblin", 6, 2, 5),
                CombatEntity::new("rat", Allegiance::Enemy, "Rat", 6, 1, 4),
            ];
            let state = to_awaiting(&rules, BattleState::new(&roster, "1"));
            let mut action = BattleAction::basic_attack(&hero(), &gob());
            action.targets.push(CombatantId::new("rat"));
            let state = attack_once(&rules, &state, action);

            assert_eq!(state.entity(&gob()).unwrap().hp, 3);
            assert_eq!(state.entity(&CombatantId::new("rat")).unwrap().hp, 6);
        }

        #[test]
        fn unknown_kind_logs_and_consumes_turn() {
            let rules = BattleRules::new();
            let state = to_awaiting(&rules, duel(0, 6));
            let mut action = BattleAction::basic_attack(&hero(), &gob());
            action.kind = ActionKind::Other("dance".to_string());
            let state = attack_once(&rules, &state, action);

            assert_eq!(state.log()[0].message, "Hero tries to dance, but nothing happens.");
            assert_eq!(state.entity(&gob()).unwrap().hp, 6);
            assert_eq!(state.current_actor_id(), Some(&gob()));
        }

        #[test]
        fn missing_target_logs_narrative() {
            let rules = BattleRules::new();
            let state = to_awaiting(&rules, duel(0, 6));
            let action = BattleAction::basic_attack(&hero(), &CombatantId::new("ghost"));
            let state = attack_once(&rules, &state, action);
            assert_eq!(state.log()[0].message, "Hero's attack finds no target.");
            assert_eq!(state.turn(), 2);
        }

        #[test]
        fn dead_actor_action_is_dropped() {
            let rules = BattleRules::new();
            let state = to_awaiting(&rules, duel(0, 6));
            let mut state =
                rules.apply_action(&state, BattleAction::basic_attack(&hero(), &gob()));
            state.entity_mut(&hero()).unwrap().alive = false;
            let state = rules.step(&state);
            assert_eq!(state.phase(), Phase::EndTurn);
            assert_eq!(state.entity(&gob()).unwrap().hp, 6);
            assert!(state.log().is_empty());
        }
    }

    mod end_turn_tests {
        use super::*;

        #[test]
        fn killing_blow_flips_alive_and_declares_winner() {
            let rules = BattleRules::new();
            let state = to_awaiting(&rules, duel(0, 3));
            let state = attack_once(&rules, &state, BattleAction::basic_attack(&hero(), &gob()));

            let goblin = state.entity(&gob()).unwrap();
            assert!(!goblin.alive);
            assert_eq!(goblin.hp, 0);
            assert_eq!(state.winner(), Some(Winner::Players));
            assert!(state.is_finished());
            assert_eq!(state.log().last().unwrap().message, "Goblin falls in battle.");
        }

        #[test]
        fn finished_is_idempotent() {
            let rules = BattleRules::new();
            let state = to_awaiting(&rules, duel(0, 3));
            let state = attack_once(&rules, &state, BattleAction::basic_attack(&hero(), &gob()));
            assert!(state.is_finished());

            let again = rules.step(&state);
            assert_eq!(again, state);
            let after_action =
                rules.apply_action(&state, BattleAction::basic_attack(&hero(), &gob()));
            assert_eq!(after_action, state);
        }

        #[test]
        fn enemies_win_when_party_falls() {
            let rules = BattleRules::new();
            let roster = [
                CombatEntity::new("hero", Allegiance::Player, "Hero", 2, 3, 1),
                CombatEntity::new("gob", Allegiance::Enemy, "Goblin", 6, 5, 5),
            ];
            let state = to_awaiting(&rules, BattleState::new(&roster, "1"));
            let state = attack_once(&rules, &state, BattleAction::basic_attack(&gob(), &hero()));
            assert_eq!(state.winner(), Some(Winner::Enemies));
        }

        #[test]
        fn total_wipe_finishes_without_winner() {
            let rules = BattleRules::new();
            let mut state = to_awaiting(&rules, duel(0, 6));
            state.entity_mut(&hero()).unwrap().hp = 0;
            state.entity_mut(&gob()).unwrap().hp = 0;
            state.phase = Phase::EndTurn;
            let state = rules.step(&state);
            assert!(state.is_finished());
            assert_eq!(state.winner(), None);
            assert_eq!(state.log().len(), 2);
        }
    }

    mod hook_tests {
        use super::*;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        /// Deals `potency` damage per turn to the acting entity while poisoned.
        struct Poison;

        impl StatusHook for Poison {
            fn apply(&self, mut state: BattleState, actor: &CombatantId, timing: HookTiming) -> BattleState {
                if timing != HookTiming::EndOfTurn {
                    return state;
                }
                let mut message = None;
                if let Some(entity) = state.entity_mut(actor) {
                    if let Some(poison) = entity.statuses.iter_mut().find(|s| s.name == "poison") {
                        entity.hp = (entity.hp - poison.potency).max(0);
                        poison.turns_remaining = poison.turns_remaining.saturating_sub(1);
                        message = Some(format!("{} suffers from poison.", entity.name));
                    }
                    entity.statuses.retain(|s| s.turns_remaining > 0);
                }
                if let Some(message) = message {
                    state.push_log(message);
                }
                state
            }
        }

        struct Counting {
            starts: Arc<AtomicUsize>,
            ends: Arc<AtomicUsize>,
        }

        impl StatusHook for Counting {
            fn apply(&self, state: BattleState, _actor: &CombatantId, timing: HookTiming) -> BattleState {
                match timing {
                    HookTiming::StartOfTurn => self.starts.fetch_add(1, Ordering::SeqCst),
                    HookTiming::EndOfTurn => self.ends.fetch_add(1, Ordering::SeqCst),
                };
                state
            }
        }

        #[test]
        fn hooks_run_once_per_timing() {
            let starts = Arc::new(AtomicUsize::new(0));
            let ends = Arc::new(AtomicUsize::new(0));
            let mut rules = BattleRules::new();
            rules.add_hook(Box::new(Counting {
                starts: Arc::clone(&starts),
                ends: Arc::clone(&ends),
            }));
            assert_eq!(rules.hook_count(), 1);

            let state = to_awaiting(&rules, duel(0, 6));
            assert_eq!(starts.load(Ordering::SeqCst), 1);
            assert_eq!(ends.load(Ordering::SeqCst), 0);

            let _ = attack_once(&rules, &state, BattleAction::basic_attack(&hero(), &gob()));
            assert_eq!(ends.load(Ordering::SeqCst), 1);
        }

        #[test]
        fn end_of_turn_hook_damage_is_caught_by_death_scan() {
            let mut rules = BattleRules::new();
            rules.add_hook(Box::new(Poison));
            let roster = [
                CombatEntity::new("hero", Allegiance::Player, "Hero", 10, 3, 10)
                    .with_status(StatusEffect::new("poison", 3, 10)),
                CombatEntity::new("gob", Allegiance::Enemy, "Goblin", 6, 2, 5),
            ];
            let state = to_awaiting(&rules, BattleState::new(&roster, "1"));
            let state = attack_once(&rules, &state, BattleAction::basic_attack(&hero(), &gob()));

            let hero_state = state.entity(&hero()).unwrap();
            assert!(!hero_state.alive);
            assert_eq!(state.winner(), Some(Winner::Enemies));
            let messages: Vec<_> = state.log().iter().map(|e| e.message.as_str()).collect();
            assert_eq!(
                messages,
                vec![
                    "Hero attacks Goblin for 3 damage.",
                    "Hero suffers from poison.",
                    "Hero falls in battle.",
                ]
            );
        }
    }
}
