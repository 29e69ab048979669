//! Battle participants.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a battle participant, unique within one roster.
///
/// # Example
///
/// ```
/// use delve_core::battle::CombatantId;
///
/// let id = CombatantId::new("hero");
/// assert_eq!(id.as_str(), "hero");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombatantId(String);

impl CombatantId {
    /// Creates an id from a string.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CombatantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CombatantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Which side a combatant fights for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Allegiance {
    /// The party
    Player,
    /// The opposition
    Enemy,
}

impl Allegiance {
    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

bitflags! {
    /// Descriptive tags carried by a combatant.
    ///
    /// The core rules never branch on tags; status hooks and front ends may.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct CombatTags: u32 {
        /// Encounter leader
        const BOSS = 1 << 0;
        /// Risen dead
        const UNDEAD = 1 << 1;
        /// Animal or monster
        const BEAST = 1 << 2;
        /// Uses spells
        const CASTER = 1 << 3;
        /// Airborne
        const FLYING = 1 << 4;
    }
}

/// A timed condition on a combatant.
///
/// The core machine stores these but never interprets them; a
/// [`StatusHook`](super::StatusHook) gives them meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// Effect name, e.g. `"poison"`
    pub name: String,
    /// Turns until the effect expires
    pub turns_remaining: u32,
    /// Effect strength, interpreted by the owning hook
    pub potency: i32,
}

impl StatusEffect {
    /// Creates a status effect.
    #[must_use]
    pub fn new(name: &str, turns_remaining: u32, potency: i32) -> Self {
        Self {
            name: name.to_string(),
            turns_remaining,
            potency,
        }
    }
}

/// A battle participant.
///
/// [`BattleState::new`](super::BattleState::new) clamps `hp` to `max_hp` when
/// it snapshots a roster, and no rule ever heals past it. `alive == (hp > 0)`
/// is only enforced at end of turn; in between, an entity may sit at zero hp
/// while still flagged alive. Deserialized states are taken as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatEntity {
    /// Unique id within the roster
    pub id: CombatantId,
    /// Side
    pub team: Allegiance,
    /// Display name used in the battle log
    pub name: String,
    /// Current hit points
    pub hp: i32,
    /// Maximum hit points
    pub max_hp: i32,
    /// Flat damage reduction
    pub armor: i32,
    /// Base damage of a basic attack
    pub attack: i32,
    /// Turn-order key, higher acts first
    pub speed: i32,
    /// Descriptive tags
    #[serde(default)]
    pub tags: CombatTags,
    /// Active status effects
    #[serde(default)]
    pub statuses: Vec<StatusEffect>,
    /// False once the entity has fallen
    pub alive: bool,
    /// Actions left this turn
    #[serde(default)]
    pub actions_remaining: u32,
}

impl CombatEntity {
    /// Creates a living combatant at full health with no armor.
    #[must_use]
    pub fn new(id: &str, team: Allegiance, name: &str, max_hp: i32, attack: i32, speed: i32) -> Self {
        Self {
            id: CombatantId::new(id),
            team,
            name: name.to_string(),
            hp: max_hp,
            max_hp,
            armor: 0,
            attack,
            speed,
            tags: CombatTags::empty(),
            statuses: Vec::new(),
            alive: max_hp > 0,
            actions_remaining: 0,
        }
    }

    /// Sets armor.
    #[must_use]
    pub fn with_armor(mut self, armor: i32) -> Self {
        self.armor = armor;
        self
    }

    /// Sets tags.
    #[must_use]
    pub fn with_tags(mut self, tags: CombatTags) -> Self {
        self.tags = tags;
        self
    }

    /// Adds a status effect.
    #[must_use]
    pub fn with_status(mut self, status: StatusEffect) -> Self {
        self.statuses.push(status);
        self
    }

    /// True if flagged alive and above zero hp.
    #[must_use]
    pub const fn is_living(&self) -> bool {
        self.alive && self.hp > 0
    }

    /// True for the party side.
    #[must_use]
    pub fn is_player(&self) -> bool {
        self.team == Allegiance::Player
    }

    /// True for the opposition.
    #[must_use]
    pub fn is_enemy(&self) -> bool {
        self.team == Allegiance::Enemy
    }
}
