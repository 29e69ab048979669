//! Command-line entry point for batch playtesting.
//!
//! ```text
//! delve-playtest [config.json]
//! ```
//!
//! Without a path the default [`PlaytestConfig`] is used. Statistics are
//! printed to stdout as JSON; logs go to stderr and honour `RUST_LOG`.

use tracing::info;
use tracing_subscriber::EnvFilter;

use delve_playtest::{run_batch, PlaytestConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!(path = %path, "loading playtest config");
            PlaytestConfig::load(&path)?
        }
        None => PlaytestConfig::default(),
    };
    info!(
        games = config.games,
        base_seed = config.base_seed,
        max_turns = config.max_turns,
        width = config.width,
        height = config.height,
        "starting batch"
    );

    let stats = run_batch(&config)?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
