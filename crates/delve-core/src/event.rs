//! Exploration events.
//!
//! [`GameEvent`] is the only thing the simulation tells the outside world.
//! Events are serialized as one JSON object per line with a `"type"` tag, for
//! example:
//!
//! ```text
//! {"type":"move","tick":1,"entity":0,"from":[15,15],"to":[16,15]}
//! ```
//!
//! Events are append-only and never mutated after publication.

use serde::{Deserialize, Serialize};
use std::fmt;

use delve_grid::GridPos;

use crate::entity::{Entity, EntityId};

/// A simulation event, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GameEvent {
    /// The game started; carries the full initial entity set.
    Init {
        /// Tick at which the event happened
        tick: u64,
        /// Grid width
        width: i32,
        /// Grid height
        height: i32,
        /// Every entity at game start
        entities: Vec<Entity>,
    },
    /// An entity changed cell.
    Move {
        /// Tick at which the event happened
        tick: u64,
        /// The entity that moved
        entity: EntityId,
        /// Previous cell
        from: GridPos,
        /// New cell
        to: GridPos,
    },
    /// One entity hit another.
    Combat {
        /// Tick at which the event happened
        tick: u64,
        /// Who struck
        attacker: EntityId,
        /// Who was struck
        target: EntityId,
        /// Damage dealt
        damage: i32,
        /// Target hit points after the blow, floored at zero
        target_hp: i32,
    },
    /// An entity died.
    Die {
        /// Tick at which the event happened
        tick: u64,
        /// The entity that died
        entity: EntityId,
    },
    /// The player passed the turn.
    Wait {
        /// Tick at which the event happened
        tick: u64,
        /// The entity that waited
        entity: EntityId,
    },
}

/// Discriminant of [`GameEvent`], for filtering.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`GameEvent::Init`]
    Init,
    /// [`GameEvent::Move`]
    Move,
    /// [`GameEvent::Combat`]
    Combat,
    /// [`GameEvent::Die`]
    Die,
    /// [`GameEvent::Wait`]
    Wait,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Move => write!(f, "move"),
            Self::Combat => write!(f, "combat"),
            Self::Die => write!(f, "die"),
            Self::Wait => write!(f, "wait"),
        }
    }
}

impl GameEvent {
    /// The tick this event belongs to.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        match self {
            Self::Init { tick, .. }
            | Self::Move { tick, .. }
            | Self::Combat { tick, .. }
            | Self::Die { tick, .. }
            | Self::Wait { tick, .. } => *tick,
        }
    }

    /// The kind tag of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Init { .. } => EventKind::Init,
            Self::Move { .. } => EventKind::Move,
            Self::Combat { .. } => EventKind::Combat,
            Self::Die { .. } => EventKind::Die,
            Self::Wait { .. } => EventKind::Wait,
        }
    }

    /// Serializes the event as a single JSON line (no trailing newline).
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parses an event from a JSON line produced by [`GameEvent::to_line`].
    pub fn from_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}
