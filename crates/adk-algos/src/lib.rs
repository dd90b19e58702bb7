//! adk-algos
//!
//! Example algorithms written against the lifecycle-adapter contract,
//! plus [`default_registry`] wiring them up by name for the CLI.

mod coarse_universe;
mod message_scalper;
mod rename_watcher;
mod sentiment_follower;

pub use coarse_universe::CoarseLiquidityUniverse;
pub use message_scalper::MessageSentimentScalper;
pub use rename_watcher::RenameWatcher;
pub use sentiment_follower::SentimentFollower;

use adk_algorithm::{AlgoMeta, AlgoRegistry, RegistryError};

/// All bundled algorithms, registered by name.
pub fn default_registry() -> Result<AlgoRegistry, RegistryError> {
    let mut registry = AlgoRegistry::new();
    registry.register(
        AlgoMeta::new(
            "sentiment_follower",
            "0.1.0",
            "Weekly-sentiment entry/exit on a single ticker",
        ),
        || Box::new(SentimentFollower::new()),
    )?;
    registry.register(
        AlgoMeta::new(
            "message_sentiment_scalper",
            "0.1.0",
            "Intraday bull/bear message-sentiment scalper",
        ),
        || Box::new(MessageSentimentScalper::new()),
    )?;
    registry.register(
        AlgoMeta::new(
            "rename_watcher",
            "0.1.0",
            "Tracks a ticker through a rename and fails the run if none occurs",
        ),
        || Box::new(RenameWatcher::new()),
    )?;
    registry.register(
        AlgoMeta::new(
            "coarse_liquidity_universe",
            "0.1.0",
            "Coarse universe: fundamental data, price above $5, top 500 by dollar volume",
        ),
        || Box::new(CoarseLiquidityUniverse::new()),
    )?;
    Ok(registry)
}
