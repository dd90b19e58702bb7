use chrono::{DateTime, Utc};

use adk_diag::DiagSink;
use adk_portfolio::PortfolioState;

/// Read-only view handed to every lifecycle callback.
///
/// Simulated time is an explicit field — algorithms never read an ambient
/// clock. The portfolio reference is host-owned state; mutation happens
/// only through returned intents.
pub struct AlgoContext<'a> {
    /// Current simulated time (UTC).
    pub now: DateTime<Utc>,
    /// Deterministic tick counter (1-based; 0 before the first tick).
    pub tick: u64,
    pub portfolio: &'a PortfolioState,
    /// Orders submitted but not yet settled by the host.
    pub open_orders: usize,
    pub diag: &'a dyn DiagSink,
}
