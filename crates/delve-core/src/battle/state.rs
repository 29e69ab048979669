//! Battle snapshot types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Allegiance, BattleAction, CombatEntity, CombatantId};

/// State-machine tag of a battle.
///
/// ```text
/// idle -> startTurn -> awaitingAction -> resolvingAction -> endTurn -+-> startTurn
///                                                                    +-> finished
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Constructed but not started
    Idle,
    /// Selecting the next actor
    StartTurn,
    /// Paused until the caller submits an action
    AwaitingAction,
    /// Applying the pending action
    ResolvingAction,
    /// Cleanup, death checks and win evaluation
    EndTurn,
    /// Terminal
    Finished,
}

/// The side that won.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    /// Every enemy fell
    Players,
    /// Every player fell
    Enemies,
}

/// One line of the battle narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// `"{turn}-{index}"`; unique because the log is append-only
    pub id: String,
    /// Narrative text
    pub message: String,
    /// Round when written
    pub round: u32,
    /// Turn when written
    pub turn: u32,
    /// Wall-clock time when written
    pub timestamp: DateTime<Utc>,
}

/// Full combat snapshot.
///
/// Every transition clones the state and mutates the clone; a `BattleState`
/// value itself is never changed behind the caller's back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleState {
    pub(crate) entities: BTreeMap<CombatantId, CombatEntity>,
    pub(crate) order: Vec<CombatantId>,
    pub(crate) current_index: usize,
    pub(crate) round: u32,
    pub(crate) turn: u32,
    pub(crate) phase: Phase,
    pub(crate) winner: Option<Winner>,
    pub(crate) log: Vec<LogEntry>,
    pub(crate) pending_action: Option<BattleAction>,
    pub(crate) seed: String,
}

impl BattleState {
    /// Builds the opening state of a battle.
    ///
    /// Every roster entry is stored by value. The turn order holds the living
    /// entries sorted by descending speed, ties kept in roster order. Duplicate
    /// ids keep their first occurrence. An entry above its `max_hp` is clamped
    /// down to it.
    #[must_use]
    pub fn new(roster: &[CombatEntity], seed: &str) -> Self {
        let mut entities = BTreeMap::new();
        let mut order = Vec::new();
        for entity in roster {
            if entities.contains_key(&entity.id) {
                warn!(id = %entity.id, "duplicate combatant id in roster; ignoring");
                continue;
            }
            let mut entity = entity.clone();
            if entity.hp > entity.max_hp {
                warn!(
                    id = %entity.id,
                    hp = entity.hp,
                    max_hp = entity.max_hp,
                    "clamping hp to max_hp"
                );
                entity.hp = entity.max_hp;
            }
            if entity.is_living() {
                order.push((entity.id.clone(), entity.speed));
            }
            entities.insert(entity.id.clone(), entity);
        }

        // `sort_by` is stable, so equal speeds keep roster order.
        order.sort_by(|a, b| b.1.cmp(&a.1));
        let order: Vec<CombatantId> = order.into_iter().map(|(id, _)| id).collect();

        let phase = if order.is_empty() {
            Phase::Finished
        } else {
            Phase::StartTurn
        };

        Self {
            entities,
            order,
            current_index: 0,
            round: 1,
            turn: 1,
            phase,
            winner: None,
            log: Vec::new(),
            pending_action: None,
            seed: seed.to_string(),
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Winner, once decided.
    #[must_use]
    pub const fn winner(&self) -> Option<Winner> {
        self.winner
    }

    /// Round counter, starting at 1.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Turn counter, starting at 1.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Index into [`BattleState::turn_order`] of the current actor.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// The fixed turn order.
    #[must_use]
    pub fn turn_order(&self) -> &[CombatantId] {
        &self.order
    }

    /// The seed string.
    #[must_use]
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// The narrative log, oldest first.
    #[must_use]
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// The action awaiting resolution, if any.
    #[must_use]
    pub const fn pending_action(&self) -> Option<&BattleAction> {
        self.pending_action.as_ref()
    }

    /// True once the battle reached its terminal phase.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Looks up a combatant.
    #[must_use]
    pub fn entity(&self, id: &CombatantId) -> Option<&CombatEntity> {
        self.entities.get(id)
    }

    /// Mutable access for status hooks.
    pub fn entity_mut(&mut self, id: &CombatantId) -> Option<&mut CombatEntity> {
        self.entities.get_mut(id)
    }

    /// Every combatant, ordered by id.
    pub fn entities(&self) -> impl Iterator<Item = &CombatEntity> + '_ {
        self.entities.values()
    }

    /// Id of the combatant whose turn it is.
    #[must_use]
    pub fn current_actor_id(&self) -> Option<&CombatantId> {
        self.order.get(self.current_index)
    }

    /// The combatant whose turn it is.
    #[must_use]
    pub fn current_actor(&self) -> Option<&CombatEntity> {
        self.current_actor_id().and_then(|id| self.entities.get(id))
    }

    /// Living combatants of one side.
    pub fn living(&self, team: Allegiance) -> impl Iterator<Item = &CombatEntity> + '_ {
        self.entities
            .values()
            .filter(move |e| e.team == team && e.alive)
    }

    /// Appends a narrative entry stamped with the current round and turn.
    pub fn push_log(&mut self, message: impl Into<String>) {
        let entry = LogEntry {
            id: format!("{}-{}", self.turn, self.log.len()),
            message: message.into(),
            round: self.round,
            turn: self.turn,
            timestamp: Utc::now(),
        };
        self.log.push(entry);
    }

    /// Decides the winner from the `alive` flags.
    pub(crate) fn evaluate_winner(&self) -> Option<Winner> {
        let players_alive = self.living(Allegiance::Player).next().is_some();
        let enemies_alive = self.living(Allegiance::Enemy).next().is_some();
        match (players_alive, enemies_alive) {
            (true, false) => Some(Winner::Players),
            (false, true) => Some(Winner::Enemies),
            _ => None,
        }
    }

    /// Moves to the next slot of the turn order.
    ///
    /// The index wraps modulo the order length; a wrap increments the round.
    /// The turn counter always increments.
    pub(crate) fn advance_to_next_turn(&mut self) {
        if self.order.is_empty() {
            self.phase = Phase::Finished;
            return;
        }
        self.current_index += 1;
        if self.current_index >= self.order.len() {
            self.current_index = 0;
            self.round += 1;
        }
        self.turn += 1;
        self.phase = Phase::StartTurn;
    }
}
