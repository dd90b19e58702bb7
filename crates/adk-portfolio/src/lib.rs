//! adk-portfolio
//!
//! Host-owned portfolio accounting:
//! - Fill-driven cash + position state (single writer: the engine)
//! - Signed-quantity netting through zero
//! - Equity computation against a mark map
//! - Rename re-keying for symbol-change events
//!
//! Pure deterministic logic (no IO, no time, no broker wiring).

mod accounting;
mod metrics;
mod types;

pub use accounting::apply_fill;
pub use metrics::compute_equity_micros;
pub use types::{Fill, Holding, PortfolioState, Side};

use std::collections::BTreeMap;

/// Price/cash scale: micros (1e-6).
pub const MICROS_SCALE: i64 = 1_000_000;

/// Canonical mark map type (symbol -> last price_micros).
pub type MarkMap = BTreeMap<String, i64>;

/// Helper to build a MarkMap with minimal boilerplate.
pub fn marks<I, S>(items: I) -> MarkMap
where
    I: IntoIterator<Item = (S, i64)>,
    S: Into<String>,
{
    let mut m = MarkMap::new();
    for (sym, px) in items {
        m.insert(sym.into(), px);
    }
    m
}
