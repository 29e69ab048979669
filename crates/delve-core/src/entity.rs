//! Exploration-side entities.
//!
//! Entities are plain value records. The [`Engine`](crate::explore::Engine)
//! exclusively owns and mutates them; everything handed out is a clone.

use serde::{Deserialize, Serialize};
use std::fmt;

use delve_grid::GridPos;

/// Unique identifier for an exploration entity.
///
/// Identifiers are assigned monotonically by the engine and never reused
/// within a game.
///
/// # Example
///
/// ```
/// use delve_core::entity::EntityId;
///
/// let id = EntityId::new(3);
/// assert_eq!(id.as_u64(), 3);
/// assert_eq!(id.to_string(), "3");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// What an entity is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// The player-controlled adventurer
    Player,
    /// A hostile creature that chases the player
    Monster,
    /// A pickup lying on the floor
    Item,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Monster => write!(f, "monster"),
            Self::Item => write!(f, "item"),
        }
    }
}

/// The adventurer archetype chosen when a game starts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerClass {
    /// Sturdy melee fighter
    #[default]
    Warrior,
    /// Nimble skirmisher
    Rogue,
    /// Fragile spellcaster
    Mystic,
}

impl PlayerClass {
    /// Starting hit points for this class.
    #[must_use]
    pub const fn base_hp(self) -> i32 {
        match self {
            Self::Warrior => 12,
            Self::Rogue => 10,
            Self::Mystic => 8,
        }
    }
}

/// A thing on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier
    pub id: EntityId,
    /// Player, monster or item
    pub kind: EntityKind,
    /// Grid cell
    pub pos: GridPos,
    /// Hit points, if the entity can be damaged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<i32>,
}

impl Entity {
    /// Creates an entity.
    #[must_use]
    pub const fn new(id: EntityId, kind: EntityKind, pos: GridPos, hp: Option<i32>) -> Self {
        Self { id, kind, pos, hp }
    }

    /// True for the player.
    #[must_use]
    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }

    /// True for monsters.
    #[must_use]
    pub fn is_monster(&self) -> bool {
        self.kind == EntityKind::Monster
    }

    /// Hit points, treating entities without hp as having none left.
    #[must_use]
    pub fn hp_or_zero(&self) -> i32 {
        self.hp.unwrap_or(0)
    }
}
