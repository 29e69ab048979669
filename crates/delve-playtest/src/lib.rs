//! # Delve Playtest
//!
//! Headless playtesting for the Delve exploration engine.
//!
//! A [`BfsBot`] plays seeded games through the engine's public contract and
//! [`run_batch`] aggregates many such games, in parallel, into [`PlayStats`].
//!
//! ## Usage
//!
//! ```
//! use delve_playtest::{run_batch, PlaytestConfig};
//!
//! let config = PlaytestConfig { games: 4, ..PlaytestConfig::default() };
//! let stats = run_batch(&config)?;
//! assert_eq!(stats.games, 4);
//! assert_eq!(stats.wins + stats.deaths + stats.timeouts, 4);
//! # Ok::<(), delve_playtest::PlaytestError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod bot;
pub mod config;
pub mod error;

pub use batch::{play_game, run_batch, GameReport, Outcome, PlayStats};
pub use bot::{BfsBot, BotAction};
pub use config::PlaytestConfig;
pub use error::PlaytestError;
