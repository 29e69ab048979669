//! Exploration engine: the tile-grid half of the game.
//!
//! The [`Engine`] owns a `width x height` grid, the player, the monsters and
//! a tick counter. Each call to [`Engine::step`] is one turn:
//!
//! 1. **PLAYER**: the player's action resolves (move, melee, or wait)
//! 2. **MONSTERS**: every surviving monster takes a naive chase step
//! 3. **SNAPSHOT**: an independent copy of the post-turn state is returned
//!
//! Every observable change is recorded as a [`GameEvent`], kept in the
//! engine's own list and published to the session's [`EventBus`].
//!
//! # Example
//!
//! ```
//! use delve_core::bus::EventBus;
//! use delve_core::explore::{Engine, EngineConfig, ExploreAction};
//! use delve_grid::{Direction, GridPos};
//!
//! let mut engine = Engine::new(&EngineConfig::default(), EventBus::new())?;
//! let start = engine.state();
//! assert_eq!(start.player().unwrap().pos, GridPos::new(15, 15));
//! assert_eq!(start.monsters().next().unwrap().pos, GridPos::new(18, 15));
//!
//! let after = engine.step(ExploreAction::Move { dir: Direction::Right })?;
//! assert_eq!(after.player().unwrap().pos, GridPos::new(16, 15));
//! # Ok::<(), delve_core::Error>(())
//! ```

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, trace, warn};

use delve_grid::{step_toward, Bounds, Direction, GridPos, WallSet};

use crate::bus::EventBus;
use crate::entity::{Entity, EntityId, EntityKind, PlayerClass};
use crate::error::{Error, Result};
use crate::event::GameEvent;
use crate::rng::Lcg;

/// Damage the player deals when bumping into a monster.
pub const PLAYER_MELEE_DAMAGE: i32 = 3;
/// Damage a monster deals when stepping into the player.
pub const MONSTER_MELEE_DAMAGE: i32 = 1;
/// Hit points a freshly spawned monster starts with.
pub const MONSTER_START_HP: i32 = 6;
/// The first monster spawns this many cells to the right of the player.
pub const MONSTER_SPAWN_OFFSET: i32 = 3;

// =============================================================================
// Configuration
// =============================================================================

/// Parameters for a new exploration game.
///
/// All fields have defaults, so partial JSON such as `{"seed": 9}` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grid width in cells
    pub width: i32,
    /// Grid height in cells
    pub height: i32,
    /// Seed for every random decision in the game
    pub seed: u32,
    /// Player archetype
    pub player_class: PlayerClass,
    /// Impassable cells
    pub walls: Vec<GridPos>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 30,
            seed: 1,
            player_class: PlayerClass::Warrior,
            walls: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Config with the given size, seed and class, and no walls.
    #[must_use]
    pub fn new(width: i32, height: i32, seed: u32, player_class: PlayerClass) -> Self {
        Self {
            width,
            height,
            seed,
            player_class,
            walls: Vec::new(),
        }
    }
}

// =============================================================================
// Actions and snapshots
// =============================================================================

/// A player intent for one exploration turn.
///
/// The engine implements `move` and `wait`. The remaining verbs belong to the
/// bot contract and are accepted as turn-consuming no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExploreAction {
    /// Step one cell; bumping a monster attacks it.
    Move {
        /// Direction of travel
        dir: Direction,
    },
    /// Sprint two cells.
    Dash {
        /// Direction of travel
        dir: Direction,
    },
    /// Brace against incoming blows.
    Guard,
    /// Shove an adjacent foe.
    Bash {
        /// Direction of the foe
        dir: Direction,
    },
    /// Hop one cell away.
    Backstep {
        /// Direction of travel
        dir: Direction,
    },
    /// Use whatever is on the current cell.
    Interact,
    /// Pass the turn.
    Wait,
}

impl ExploreAction {
    /// The lowercase verb naming this action.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Dash { .. } => "dash",
            Self::Guard => "guard",
            Self::Bash { .. } => "bash",
            Self::Backstep { .. } => "backstep",
            Self::Interact => "interact",
            Self::Wait => "wait",
        }
    }
}

impl fmt::Display for ExploreAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move { dir } | Self::Dash { dir } | Self::Bash { dir } | Self::Backstep { dir } => {
                write!(f, "{} {dir}", self.verb())
            }
            Self::Guard | Self::Interact | Self::Wait => write!(f, "{}", self.verb()),
        }
    }
}

/// An independent copy of the exploration state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Grid width
    pub width: i32,
    /// Grid height
    pub height: i32,
    /// Impassable cells
    pub walls: Vec<GridPos>,
    /// Every entity, player first
    pub entities: Vec<Entity>,
    /// Turns taken so far
    pub tick: u64,
}

impl GameSnapshot {
    /// The grid extent.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// The player, if present.
    #[must_use]
    pub fn player(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_player())
    }

    /// All monsters in entity order.
    pub fn monsters(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter(|e| e.is_monster())
    }

    /// The entity standing on `pos`, if any.
    #[must_use]
    pub fn entity_at(&self, pos: GridPos) -> Option<&Entity> {
        self.entities.iter().find(|e| e.pos == pos)
    }

    /// True if `pos` is a wall.
    #[must_use]
    pub fn is_wall(&self, pos: GridPos) -> bool {
        self.walls.contains(&pos)
    }
}

// =============================================================================
// Engine
// =============================================================================

/// The exploration simulation.
///
/// The engine exclusively owns its entities. [`Engine::state`] and the return
/// value of [`Engine::step`] are deep copies; nothing handed out can reach
/// back into the engine.
#[derive(Debug)]
pub struct Engine {
    bounds: Bounds,
    walls: WallSet,
    entities: Vec<Entity>,
    tick: u64,
    seed: u32,
    next_id: u64,
    events: Vec<GameEvent>,
    bus: EventBus,
}

impl Engine {
    /// Creates a game and publishes its `init` event.
    ///
    /// The player spawns at the grid center and one monster spawns
    /// [`MONSTER_SPAWN_OFFSET`] cells to its right. If that cell is off the
    /// grid or a wall, the seeded RNG picks a free cell instead. Walls on the
    /// player's spawn cell or outside the grid are discarded.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] if either dimension is not positive.
    pub fn new(config: &EngineConfig, bus: EventBus) -> Result<Self> {
        let bounds = Bounds::new(config.width, config.height);
        if !bounds.is_valid() {
            return Err(Error::InvalidDimensions {
                width: config.width,
                height: config.height,
            });
        }

        let player_pos = bounds.center();
        let walls: WallSet = config
            .walls
            .iter()
            .copied()
            .filter(|&w| {
                let keep = bounds.contains(w) && w != player_pos;
                if !keep {
                    warn!(x = w.x, y = w.y, "discarding wall outside grid or on spawn");
                }
                keep
            })
            .collect();

        let mut engine = Self {
            bounds,
            walls,
            entities: Vec::new(),
            tick: 0,
            seed: config.seed,
            next_id: 0,
            events: Vec::new(),
            bus,
        };

        let hp = config.player_class.base_hp();
        engine.spawn(EntityKind::Player, player_pos, Some(hp));

        let preferred = player_pos + GridPos::new(MONSTER_SPAWN_OFFSET, 0);
        let mut rng = Lcg::new(config.seed);
        match engine.spawn_cell(preferred, &mut rng) {
            Some(pos) => {
                engine.spawn(EntityKind::Monster, pos, Some(MONSTER_START_HP));
            }
            None => warn!("no free cell for the monster; starting without one"),
        }

        engine.emit(GameEvent::Init {
            tick: 0,
            width: bounds.width,
            height: bounds.height,
            entities: engine.entities.clone(),
        });
        info!(
            width = bounds.width,
            height = bounds.height,
            seed = config.seed,
            class = ?config.player_class,
            "exploration game started"
        );
        Ok(engine)
    }

    /// Deep copy of the current state.
    #[must_use]
    pub fn state(&self) -> GameSnapshot {
        GameSnapshot {
            width: self.bounds.width,
            height: self.bounds.height,
            walls: self.walls.as_slice().to_vec(),
            entities: self.entities.clone(),
            tick: self.tick,
        }
    }

    /// Plays one turn and returns the post-turn snapshot.
    ///
    /// Out-of-bounds or wall-blocked moves advance the tick and return at once
    /// (no event, no monster turns). Once the player has died the engine is
    /// over and every further step returns the final snapshot unchanged.
    ///
    /// # Errors
    ///
    /// [`Error::MissingPlayer`] if no player entity exists.
    pub fn step(&mut self, action: ExploreAction) -> Result<GameSnapshot> {
        let player_idx = self.player_index().ok_or(Error::MissingPlayer)?;
        if self.is_over() {
            debug!(%action, "step ignored: the player is dead");
            return Ok(self.state());
        }

        self.tick += 1;
        let tick = self.tick;
        let player_id = self.entities[player_idx].id;
        let player_pos = self.entities[player_idx].pos;

        match action {
            ExploreAction::Move { dir } => {
                let dest = player_pos + dir.delta();
                if !self.is_open(dest) {
                    debug!(tick, %dir, "move blocked; dropped");
                    return Ok(self.state());
                }
                if let Some(target_idx) = self.monster_index_at(dest) {
                    self.player_attack(player_id, target_idx);
                } else {
                    self.entities[player_idx].pos = dest;
                    self.emit(GameEvent::Move {
                        tick,
                        entity: player_id,
                        from: player_pos,
                        to: dest,
                    });
                }
            }
            ExploreAction::Wait => self.emit(GameEvent::Wait { tick, entity: player_id }),
            other => debug!(tick, action = %other, "no exploration rule for action; turn passes"),
        }

        self.run_monster_turns();
        Ok(self.state())
    }

    /// Every event emitted so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Turns taken so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// The seed this game was created with.
    #[must_use]
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    /// The bus this engine publishes to.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// True once the player's hit points have reached zero.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.player_index()
            .is_some_and(|idx| self.entities[idx].hp_or_zero() <= 0)
    }

    /// True once no monsters remain.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        !self.entities.iter().any(Entity::is_monster)
    }

    /// Removes the player. Only used to exercise the missing-player guard.
    #[cfg(test)]
    pub(crate) fn remove_player(&mut self) {
        self.entities.retain(|e| !e.is_player());
    }

    fn spawn(&mut self, kind: EntityKind, pos: GridPos, hp: Option<i32>) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.push(Entity::new(id, kind, pos, hp));
        id
    }

    fn spawn_cell(&self, preferred: GridPos, rng: &mut Lcg) -> Option<GridPos> {
        if self.is_free(preferred) {
            return Some(preferred);
        }
        let candidates: Vec<GridPos> = self.bounds.cells().filter(|&c| self.is_free(c)).collect();
        candidates.choose(rng).copied()
    }

    fn emit(&mut self, event: GameEvent) {
        self.bus.publish(&event);
        self.events.push(event);
    }

    fn player_index(&self) -> Option<usize> {
        self.entities.iter().position(Entity::is_player)
    }

    fn monster_index_at(&self, pos: GridPos) -> Option<usize> {
        self.entities
            .iter()
            .position(|e| e.is_monster() && e.pos == pos)
    }

    fn is_open(&self, pos: GridPos) -> bool {
        self.bounds.contains(pos) && !self.walls.contains(pos)
    }

    fn is_free(&self, pos: GridPos) -> bool {
        self.is_open(pos) && !self.entities.iter().any(|e| e.pos == pos)
    }

    fn player_attack(&mut self, player_id: EntityId, target_idx: usize) {
        let tick = self.tick;
        let target = &mut self.entities[target_idx];
        let remaining = target.hp_or_zero() - PLAYER_MELEE_DAMAGE;
        target.hp = Some(remaining.max(0));
        let target_id = target.id;

        self.emit(GameEvent::Combat {
            tick,
            attacker: player_id,
            target: target_id,
            damage: PLAYER_MELEE_DAMAGE,
            target_hp: remaining.max(0),
        });

        if remaining <= 0 {
            self.entities.remove(target_idx);
            self.emit(GameEvent::Die { tick, entity: target_id });
            debug!(tick, monster = %target_id, "monster slain");
        }
    }

    fn run_monster_turns(&mut self) {
        let tick = self.tick;
        let monster_ids: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|e| e.is_monster())
            .map(|e| e.id)
            .collect();

        for monster_id in monster_ids {
            if self.is_over() {
                break;
            }
            let Some(player_idx) = self.player_index() else {
                break;
            };
            let Some(monster_idx) = self.entities.iter().position(|e| e.id == monster_id) else {
                continue;
            };

            let player_pos = self.entities[player_idx].pos;
            let from = self.entities[monster_idx].pos;
            let dest = step_toward(from, player_pos);

            if dest == player_pos {
                self.monster_attack(monster_id, player_idx);
            } else if self.is_free(dest) {
                self.entities[monster_idx].pos = dest;
                self.emit(GameEvent::Move {
                    tick,
                    entity: monster_id,
                    from,
                    to: dest,
                });
            } else {
                trace!(tick, monster = %monster_id, "monster path blocked; skipping");
            }
        }
    }

    fn monster_attack(&mut self, monster_id: EntityId, player_idx: usize) {
        let tick = self.tick;
        let player = &mut self.entities[player_idx];
        let remaining = (player.hp_or_zero() - MONSTER_MELEE_DAMAGE).max(0);
        player.hp = Some(remaining);
        let player_id = player.id;

        self.emit(GameEvent::Combat {
            tick,
            attacker: monster_id,
            target: player_id,
            damage: MONSTER_MELEE_DAMAGE,
            target_hp: remaining,
        });

        if remaining == 0 {
            self.emit(GameEvent::Die { tick, entity: player_id });
            info!(tick, "the player has fallen");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
