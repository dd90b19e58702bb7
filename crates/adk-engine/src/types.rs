use serde::{Deserialize, Serialize};

use adk_data::{Slice, SymbolChangedEvent};
use adk_portfolio::{Fill, MarkMap, PortfolioState, Side};
use adk_universe::UniverseCandidate;

/// How often the engine re-runs universe selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UniverseCadence {
    /// At the first tick of each new UTC calendar date.
    Daily,
    /// At every tick that carries a candidate snapshot.
    EveryTick,
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Intents accepted from one `on_data` call; the rest are rejected.
    pub max_intents_per_tick: usize,

    /// Ticks a pending order may go unpriced before it is rejected.
    pub max_fill_attempts: u32,

    pub universe_cadence: UniverseCadence,

    /// Hard bound on accepted universe size, applied on top of the
    /// algorithm's declared cap.
    pub max_universe_symbols: usize,
}

impl BacktestConfig {
    /// Reasonable defaults for testing.
    pub fn test_defaults() -> Self {
        Self {
            max_intents_per_tick: 8,
            max_fill_attempts: 5,
            universe_cadence: UniverseCadence::Daily,
            max_universe_symbols: 500,
        }
    }
}

/// One engine tick's input: the slice plus, on selection days, the coarse
/// candidate snapshot supplied by the feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickInput {
    pub slice: Slice,
    pub candidates: Option<Vec<UniverseCandidate>>,
}

impl TickInput {
    pub fn new(slice: Slice) -> Self {
        Self {
            slice,
            candidates: None,
        }
    }

    pub fn with_candidates(slice: Slice, candidates: Vec<UniverseCandidate>) -> Self {
        Self {
            slice,
            candidates: Some(candidates),
        }
    }
}

/// What a queued order does when a price arrives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingKind {
    /// Trade a fixed quantity.
    Fixed { side: Side, qty: i64 },
    /// Close whatever position exists at settlement time.
    Close,
}

/// An intent queued at tick N, settling against a later slice's prices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOrder {
    pub symbol: String,
    pub kind: PendingKind,
    /// Timestamp of the slice that produced the intent.
    pub submitted_ts: i64,
    /// Settlement ticks seen without a usable price.
    pub attempts: u32,
}

/// Why the host declined an intent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Emitted beyond the per-tick intent cap.
    IntentCapExceeded,
    /// Symbol is not subscribed, not in the universe, and has never priced.
    UnknownSymbol,
    /// A weight target needs a mark and none exists yet.
    NoPriceAvailable,
    /// The intent resolves to trading zero shares.
    ZeroQtyTarget,
    /// The order went unpriced for the configured number of ticks.
    FillTimeout { attempts: u32 },
}

/// A recoverable host decline of one intent.
///
/// Recorded on the report; the engine never retries a rejected intent —
/// the algorithm may reassess on a later tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRejection {
    pub end_ts: i64,
    pub symbol: String,
    pub reason: RejectReason,
}

/// Report produced after a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub run_id: String,
    pub algorithm: String,
    /// Ticks delivered to the algorithm (slices inside the window).
    pub ticks: u64,
    /// Equity curve: (end_ts, equity_micros) per delivered tick.
    pub equity_curve: Vec<(i64, i64)>,
    pub fills: Vec<Fill>,
    pub rejections: Vec<ExecutionRejection>,
    /// Orders still pending after the last tick.
    pub unsettled: Vec<PendingOrder>,
    /// Rename events applied to host-owned state, in arrival order.
    pub renames_applied: Vec<SymbolChangedEvent>,
    /// Selections that changed universe membership.
    pub universe_revisions: u32,
    pub final_portfolio: PortfolioState,
    pub last_prices: MarkMap,
}

impl BacktestReport {
    pub fn final_equity_micros(&self) -> i64 {
        self.equity_curve
            .last()
            .map(|(_, eq)| *eq)
            .unwrap_or(self.final_portfolio.cash_micros)
    }
}
