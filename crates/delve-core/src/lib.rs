//! # Delve Core
//!
//! Deterministic turn and battle core for the Delve dungeon crawler.
//!
//! This crate owns every rule of the game and nothing about how it is drawn.
//! Front ends drive it through two entry points and observe it through an
//! event log.
//!
//! ## Architecture
//!
//! - **RNG** ([`rng`]): seeded LCG with a bit-exact stream across platforms
//! - **Event Bus** ([`bus`]): append-only NDJSON log plus live subscribers
//! - **Exploration** ([`explore`]): tile-grid engine, one turn per player action
//! - **Battle** ([`battle`]): phase state machine with speed-based turn order
//!
//! ## Usage
//!
//! ```
//! use delve_core::bus::EventBus;
//! use delve_core::explore::{Engine, EngineConfig, ExploreAction};
//! use delve_grid::Direction;
//!
//! let bus = EventBus::new();
//! let mut engine = Engine::new(&EngineConfig::default(), bus.clone())?;
//! let snapshot = engine.step(ExploreAction::Move { dir: Direction::Right })?;
//!
//! assert_eq!(snapshot.tick, 1);
//! assert!(bus.len() >= 2);
//! # Ok::<(), delve_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub use delve_grid;

pub mod battle;
pub mod bus;
pub mod entity;
pub mod error;
pub mod event;
pub mod explore;
pub mod rng;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
