//! Pathfinding bot.

use delve_core::explore::GameSnapshot;
use delve_grid::{bfs_path, Direction, GridPos, WallSet};

/// The action vocabulary a bot may answer with.
///
/// Bots speak the exploration engine's own action type; verbs the engine
/// has no rule for resolve as a passed turn.
pub use delve_core::explore::ExploreAction as BotAction;

/// Walks the shortest path to the nearest reachable monster.
///
/// Moving into the monster's cell is the engine's melee attack, so following
/// the path to the end fights. Walls and other monsters block the path. With
/// no reachable monster the bot waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct BfsBot;

impl BfsBot {
    /// Creates a bot.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Chooses the action for the current turn.
    #[must_use]
    pub fn decide(&self, snapshot: &GameSnapshot) -> BotAction {
        let Some(player) = snapshot.player() else {
            return BotAction::Wait;
        };
        let bounds = snapshot.bounds();
        let walls: WallSet = snapshot.walls.iter().copied().collect();

        let path = snapshot
            .monsters()
            .filter_map(|target| {
                let blocked = |pos: GridPos| {
                    walls.contains(pos)
                        || snapshot.monsters().any(|m| m.id != target.id && m.pos == pos)
                };
                bfs_path(bounds, player.pos, target.pos, blocked)
            })
            .min_by_key(Vec::len);

        path.and_then(|p| p.first().copied())
            .and_then(|next| Direction::from_delta(next - player.pos))
            .map_or(BotAction::Wait, |dir| BotAction::Move { dir })
    }
}
