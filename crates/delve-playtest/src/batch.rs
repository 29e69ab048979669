//! Seeded game runs and their aggregation.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use delve_core::bus::EventBus;
use delve_core::event::GameEvent;
use delve_core::explore::{Engine, EngineConfig};

use crate::bot::BfsBot;
use crate::config::PlaytestConfig;
use crate::error::PlaytestError;

/// How a single game ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Every monster was slain
    Cleared,
    /// The player fell
    Died,
    /// The turn limit was reached first
    TimedOut,
}

/// Result of one bot game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameReport {
    /// Engine seed
    pub seed: u32,
    /// How the game ended
    pub outcome: Outcome,
    /// Turns played
    pub turns: u64,
    /// Monsters slain
    pub kills: usize,
}

/// Aggregate statistics over a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayStats {
    /// Games played
    pub games: usize,
    /// Games that cleared the room
    pub wins: usize,
    /// Games where the player fell
    pub deaths: usize,
    /// Games cut off by the turn limit
    pub timeouts: usize,
    /// Mean turns per game, 0 for an empty batch
    pub mean_turns: f64,
    /// Monsters slain across all games
    pub total_kills: usize,
}

impl PlayStats {
    /// Aggregates reports.
    #[must_use]
    pub fn from_reports(reports: &[GameReport]) -> Self {
        let count = |outcome| reports.iter().filter(|r| r.outcome == outcome).count();
        let turns: u64 = reports.iter().map(|r| r.turns).sum();
        #[allow(clippy::cast_precision_loss)]
        let mean_turns = if reports.is_empty() {
            0.0
        } else {
            turns as f64 / reports.len() as f64
        };

        Self {
            games: reports.len(),
            wins: count(Outcome::Cleared),
            deaths: count(Outcome::Died),
            timeouts: count(Outcome::TimedOut),
            mean_turns,
            total_kills: reports.iter().map(|r| r.kills).sum(),
        }
    }
}

/// Plays one game with `bot` until it is decided or `max_turns` pass.
///
/// # Errors
///
/// Propagates engine errors; a valid config never produces one.
pub fn play_game(
    config: &EngineConfig,
    max_turns: u64,
    bot: &BfsBot,
) -> Result<GameReport, PlaytestError> {
    let mut engine = Engine::new(config, EventBus::new())?;
    let player_id = engine
        .state()
        .player()
        .map(|p| p.id)
        .ok_or(delve_core::Error::MissingPlayer)?;

    let outcome = loop {
        if engine.is_over() {
            break Outcome::Died;
        }
        if engine.is_cleared() {
            break Outcome::Cleared;
        }
        if engine.tick() >= max_turns {
            break Outcome::TimedOut;
        }
        let action = bot.decide(&engine.state());
        engine.step(action)?;
    };

    let kills = engine
        .events()
        .iter()
        .filter(|e| matches!(e, GameEvent::Die { entity, .. } if *entity != player_id))
        .count();

    debug!(seed = config.seed, ?outcome, turns = engine.tick(), kills, "game finished");
    Ok(GameReport {
        seed: config.seed,
        outcome,
        turns: engine.tick(),
        kills,
    })
}

/// Plays every game of the batch in parallel and aggregates the results.
///
/// Each game owns its engine and bus; reports are collected in seed order,
/// so the stats do not depend on scheduling.
///
/// # Errors
///
/// [`PlaytestError::InvalidConfig`] if `config` fails validation, or the
/// first engine error hit by any game.
pub fn run_batch(config: &PlaytestConfig) -> Result<PlayStats, PlaytestError> {
    config.validate()?;
    let bot = BfsBot::new();

    let reports = (0..config.games)
        .into_par_iter()
        .map(|i| play_game(&config.engine_config(config.seed_for(i)), config.max_turns, &bot))
        .collect::<Result<Vec<_>, _>>()?;

    let stats = PlayStats::from_reports(&reports);
    info!(
        games = stats.games,
        wins = stats.wins,
        deaths = stats.deaths,
        timeouts = stats.timeouts,
        mean_turns = stats.mean_turns,
        "batch finished"
    );
    Ok(stats)
}
