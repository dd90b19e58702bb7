//! adk-data
//!
//! Market data model for the backtest harness:
//! - `Bar` — OHLCV price bars, integer micros
//! - `CustomRecord` — alternative-data records (weekly + message sentiment)
//! - `SymbolChangedEvent` — rename notifications
//! - `Slice` — the immutable per-tick bundle delivered to algorithms
//!
//! All symbol-keyed lookups return `Option`: an absent key is a normal
//! condition, never an error. Keyed state uses `BTreeMap` so iteration
//! order is deterministic.

mod bar;
mod custom;
mod slice;

pub use bar::{Bar, Resolution};
pub use custom::{CustomRecord, MessageSentiment, SentimentRecord, SymbolChangedEvent};
pub use slice::Slice;

/// Price/cash/score scale: micros (1e-6). 0.07 => 70_000; $150 => 150_000_000.
pub const MICROS_SCALE: i64 = 1_000_000;
