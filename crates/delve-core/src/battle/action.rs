//! Caller-submitted battle intents.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::CombatantId;

/// What an action does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    /// Strike the first target with the actor's attack.
    BasicAttack,
    /// Any action the rules do not know. Resolves to "nothing happens".
    ///
    /// Serialized as the bare kind string, so any unrecognized `kind` in
    /// submitted JSON lands here.
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BasicAttack => write!(f, "basicAttack"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// How the caller chose targets. Informational; resolution only reads the
/// target list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetMode {
    /// One opposing combatant
    #[default]
    SingleEnemy,
    /// One allied combatant
    SingleAlly,
    /// Every opposing combatant
    AllEnemies,
    /// Every allied combatant
    AllAllies,
    /// The actor itself
    Myself,
}

/// Optional overrides carried by an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionEffect {
    /// Replaces the actor's base attack when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<i32>,
}

/// An intent submitted while the battle awaits an action.
///
/// Exists only between [`apply_action`](super::apply_action) and resolution.
/// Only the first entry of `targets` is resolved; additional targets are
/// accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleAction {
    /// What to do
    pub kind: ActionKind,
    /// Who acts
    pub actor: CombatantId,
    /// Who is affected, first entry only
    pub targets: Vec<CombatantId>,
    /// How targets were chosen
    #[serde(default)]
    pub mode: TargetMode,
    /// Overrides
    #[serde(default)]
    pub effect: ActionEffect,
}

impl BattleAction {
    /// A basic attack from `actor` on `target`.
    #[must_use]
    pub fn basic_attack(actor: &CombatantId, target: &CombatantId) -> Self {
        Self {
            kind: ActionKind::BasicAttack,
            actor: actor.clone(),
            targets: vec![target.clone()],
            mode: TargetMode::SingleEnemy,
            effect: ActionEffect::default(),
        }
    }

    /// Replaces the damage of this action.
    #[must_use]
    pub fn with_damage(mut self, damage: i32) -> Self {
        self.effect.damage = Some(damage);
        self
    }

    /// The target that will be resolved, if any.
    #[must_use]
    pub fn primary_target(&self) -> Option<&CombatantId> {
        self.targets.first()
    }
}
