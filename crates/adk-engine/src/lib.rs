//! adk-engine
//!
//! The backtest harness: a deterministic host that drives one algorithm
//! through the fixed lifecycle over a time-ordered slice sequence.
//!
//! Per tick the engine settles pending orders from previous ticks (the
//! algorithm never observes same-tick settlement), applies symbol-rename
//! events to host-owned state, runs universe selection at the cadence
//! boundary, delivers the slice, queues returned intents, and records an
//! equity point. Declined intents become recorded rejections, never run
//! failures; a violated end-of-run invariant is the one condition that
//! fails an otherwise-clean run.

mod engine;
mod types;

pub use engine::{BacktestEngine, EngineError};
pub use types::{
    BacktestConfig, BacktestReport, ExecutionRejection, PendingKind, PendingOrder, RejectReason,
    TickInput, UniverseCadence,
};
