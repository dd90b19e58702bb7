use std::collections::BTreeSet;

use chrono::NaiveDate;
use uuid::Uuid;

use adk_algorithm::{
    AlgoContext, Algorithm, AlgorithmHost, AlgorithmSetup, HostError, InvariantViolation,
    OrderIntent, SetupError,
};
use adk_data::Slice;
use adk_diag::{DiagSink, NullSink};
use adk_portfolio::{apply_fill, compute_equity_micros, Fill, MarkMap, PortfolioState, Side};
use adk_universe::diff_membership;

use crate::types::{
    BacktestConfig, BacktestReport, ExecutionRejection, PendingKind, PendingOrder, RejectReason,
    TickInput, UniverseCadence,
};

/// Engine error variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// The algorithm's declaration was invalid. Fatal before the first tick.
    Setup(SetupError),
    /// Lifecycle protocol violation (forwarded from the host).
    Host(HostError),
    /// An end-of-run expectation did not hold.
    Invariant(InvariantViolation),
    /// Input slices must arrive in non-decreasing timestamp order.
    NonMonotonicSlice { prev_ts: i64, got_ts: i64 },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Setup(e) => write!(f, "setup: {e}"),
            EngineError::Host(e) => write!(f, "host: {e}"),
            EngineError::Invariant(v) => write!(f, "{v}"),
            EngineError::NonMonotonicSlice { prev_ts, got_ts } => {
                write!(f, "non-monotonic slice: ts={got_ts} after ts={prev_ts}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl From<HostError> for EngineError {
    fn from(e: HostError) -> Self {
        match e {
            HostError::Setup(s) => EngineError::Setup(s),
            other => EngineError::Host(other),
        }
    }
}

/// The backtest harness: drives one algorithm through the lifecycle over a
/// time-ordered slice sequence.
///
/// Per tick: settle pending orders from previous ticks, apply rename
/// events to host-owned state, run universe selection at the cadence
/// boundary, deliver the slice, queue the returned intents, record an
/// equity point. Intents never settle on the tick that produced them.
pub struct BacktestEngine {
    config: BacktestConfig,
    host: AlgorithmHost,
    run_id: Uuid,

    setup: Option<AlgorithmSetup>,
    portfolio: PortfolioState,
    marks: MarkMap,
    pending: Vec<PendingOrder>,
    fills: Vec<Fill>,
    rejections: Vec<ExecutionRejection>,
    equity_curve: Vec<(i64, i64)>,
    renames_applied: Vec<adk_data::SymbolChangedEvent>,
    membership: BTreeSet<String>,
    last_selection_date: Option<NaiveDate>,
    universe_revisions: u32,
    tick_count: u64,
}

impl BacktestEngine {
    pub fn new(config: BacktestConfig) -> Self {
        let host = AlgorithmHost::new(config.max_intents_per_tick);
        Self {
            config,
            host,
            run_id: Uuid::new_v4(),
            setup: None,
            portfolio: PortfolioState::new(0),
            marks: MarkMap::new(),
            pending: Vec::new(),
            fills: Vec::new(),
            rejections: Vec::new(),
            equity_curve: Vec::new(),
            renames_applied: Vec::new(),
            membership: BTreeSet::new(),
            last_selection_date: None,
            universe_revisions: 0,
            tick_count: 0,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Register the algorithm. Must be called before `run`.
    pub fn register_algorithm(&mut self, algorithm: Box<dyn Algorithm>) -> Result<(), EngineError> {
        self.host.register(algorithm).map_err(EngineError::from)
    }

    /// Run without diagnostics.
    pub fn run(&mut self, ticks: &[TickInput]) -> Result<BacktestReport, EngineError> {
        self.run_with_sink(ticks, &NullSink)
    }

    /// Run the full lifecycle over `ticks`.
    ///
    /// Slices outside the declared window are skipped without being
    /// delivered. After the last slice `on_end_of_algorithm` runs; a
    /// violated invariant propagates as `Err`, the explicit run-failure
    /// signal.
    pub fn run_with_sink(
        &mut self,
        ticks: &[TickInput],
        sink: &dyn DiagSink,
    ) -> Result<BacktestReport, EngineError> {
        let setup = self.host.initialize().map_err(EngineError::from)?;
        self.portfolio = PortfolioState::new(setup.cash_micros);
        self.setup = Some(setup);

        let mut prev_ts = i64::MIN;
        let mut last_time = None;
        for tick in ticks {
            let slice = &tick.slice;
            if slice.end_ts < prev_ts {
                return Err(EngineError::NonMonotonicSlice {
                    prev_ts,
                    got_ts: slice.end_ts,
                });
            }
            prev_ts = slice.end_ts;

            let window = self.setup.as_ref().map(|s| (s.start, s.end));
            if let Some((start, end)) = window {
                if slice.time < start || slice.time > end {
                    continue;
                }
            }

            self.tick_count += 1;
            last_time = Some(slice.time);

            self.settle_pending(slice);
            self.apply_renames(slice);

            for (symbol, bar) in slice.bars() {
                if bar.is_complete {
                    self.marks.insert(symbol.clone(), bar.close_micros);
                }
            }

            self.run_universe_selection(tick, sink)?;

            let ctx = AlgoContext {
                now: slice.time,
                tick: self.tick_count,
                portfolio: &self.portfolio,
                open_orders: self.pending.len(),
                diag: sink,
            };
            let actions = self.host.on_data(&ctx, slice).map_err(EngineError::from)?;
            for intent in &actions.overflow {
                self.rejections.push(ExecutionRejection {
                    end_ts: slice.end_ts,
                    symbol: intent.symbol().to_string(),
                    reason: RejectReason::IntentCapExceeded,
                });
            }
            for intent in actions.accepted {
                self.submit(intent, slice.end_ts);
            }

            let equity = compute_equity_micros(
                self.portfolio.cash_micros,
                &self.portfolio.positions,
                &self.marks,
            );
            self.equity_curve.push((slice.end_ts, equity));
        }

        // A run with no delivered ticks still ends; time it at the window end.
        let end_time = last_time
            .or_else(|| self.setup.as_ref().map(|s| s.end))
            .unwrap_or_default();
        let ctx = AlgoContext {
            now: end_time,
            tick: self.tick_count,
            portfolio: &self.portfolio,
            open_orders: self.pending.len(),
            diag: sink,
        };
        self.host
            .end(&ctx)
            .map_err(EngineError::from)?
            .map_err(EngineError::Invariant)?;

        Ok(self.report())
    }

    /// Settle pending orders against this slice's prices.
    ///
    /// Conservative pricing: BUY fills at the bar high, SELL at the bar
    /// low. Incomplete bars do not settle. An order whose symbol carries
    /// no usable bar accrues an attempt and is rejected at the cap.
    fn settle_pending(&mut self, slice: &Slice) {
        let mut still_pending = Vec::new();
        for mut order in std::mem::take(&mut self.pending) {
            let bar = slice.bar(&order.symbol).filter(|b| b.is_complete);
            let Some(bar) = bar else {
                order.attempts += 1;
                if order.attempts >= self.config.max_fill_attempts {
                    self.rejections.push(ExecutionRejection {
                        end_ts: slice.end_ts,
                        symbol: order.symbol,
                        reason: RejectReason::FillTimeout {
                            attempts: order.attempts,
                        },
                    });
                } else {
                    still_pending.push(order);
                }
                continue;
            };

            let (side, qty) = match order.kind {
                PendingKind::Fixed { side, qty } => (side, qty),
                PendingKind::Close => {
                    // Resolved at settlement so fills between submission
                    // and settlement cannot leave a residual position.
                    let held = self.portfolio.qty(&order.symbol);
                    if held == 0 {
                        continue;
                    }
                    if held > 0 {
                        (Side::Sell, held)
                    } else {
                        (Side::Buy, -held)
                    }
                }
            };
            let price = match side {
                Side::Buy => bar.high_micros,
                Side::Sell => bar.low_micros,
            };
            let fill = Fill::new(order.symbol, side, qty, price, 0);
            apply_fill(&mut self.portfolio, &fill);
            self.fills.push(fill);
        }
        self.pending = still_pending;
    }

    /// Re-key host-owned state before the algorithm sees the slice.
    fn apply_renames(&mut self, slice: &Slice) {
        for (_, event) in slice.symbol_changes() {
            self.portfolio
                .rename_position(&event.old_ticker, &event.new_ticker);
            if let Some(mark) = self.marks.remove(&event.old_ticker) {
                self.marks.entry(event.new_ticker.clone()).or_insert(mark);
            }
            for order in &mut self.pending {
                if order.symbol == event.old_ticker {
                    order.symbol = event.new_ticker.clone();
                }
            }
            if self.membership.remove(&event.old_ticker) {
                self.membership.insert(event.new_ticker.clone());
            }
            self.renames_applied.push(event.clone());
        }
    }

    fn selection_due(&self, slice: &Slice) -> bool {
        match self.config.universe_cadence {
            UniverseCadence::EveryTick => true,
            UniverseCadence::Daily => match self.last_selection_date {
                None => true,
                Some(last) => slice.time.date_naive() > last,
            },
        }
    }

    fn run_universe_selection(
        &mut self,
        tick: &TickInput,
        sink: &dyn DiagSink,
    ) -> Result<(), EngineError> {
        let Some(plan) = self.setup.as_ref().and_then(|s| s.universe.clone()) else {
            return Ok(());
        };
        let Some(candidates) = &tick.candidates else {
            // No snapshot this tick (holiday): membership stays as-is.
            return Ok(());
        };
        if !self.selection_due(&tick.slice) {
            return Ok(());
        }

        let mut selected = self
            .host
            .select_universe(candidates)
            .map_err(EngineError::from)?;
        let cap = plan.cap.min(self.config.max_universe_symbols);
        selected.truncate(cap);
        self.last_selection_date = Some(tick.slice.time.date_naive());

        let changes = diff_membership(&self.membership, &selected);
        if changes.is_empty() {
            return Ok(());
        }
        self.membership = selected.into_iter().collect();
        self.universe_revisions += 1;

        // Removals only notify; positions in removed symbols persist and
        // stay marked at their last known price.
        let ctx = AlgoContext {
            now: tick.slice.time,
            tick: self.tick_count,
            portfolio: &self.portfolio,
            open_orders: self.pending.len(),
            diag: sink,
        };
        self.host
            .on_securities_changed(&ctx, &changes)
            .map_err(EngineError::from)
    }

    /// Convert one accepted intent into a pending order, or reject it.
    fn submit(&mut self, intent: OrderIntent, end_ts: i64) {
        let symbol = intent.symbol().to_string();
        let subscribed = self
            .setup
            .as_ref()
            .map(|s| s.equities.iter().any(|e| e == &symbol))
            .unwrap_or(false);
        if !subscribed && !self.membership.contains(&symbol) && !self.marks.contains_key(&symbol) {
            self.reject(end_ts, symbol, RejectReason::UnknownSymbol);
            return;
        }

        match intent {
            OrderIntent::SetHoldingsWeight {
                symbol,
                weight_micros,
            } => {
                let Some(mark) = self.marks.get(&symbol).copied().filter(|m| *m > 0) else {
                    self.reject(end_ts, symbol, RejectReason::NoPriceAvailable);
                    return;
                };
                let equity = compute_equity_micros(
                    self.portfolio.cash_micros,
                    &self.portfolio.positions,
                    &self.marks,
                );
                let target_notional = equity as i128 * weight_micros as i128 / 1_000_000;
                let target_qty = (target_notional / mark as i128) as i64;
                let delta = target_qty - self.portfolio.qty(&symbol);
                if delta == 0 {
                    self.reject(end_ts, symbol, RejectReason::ZeroQtyTarget);
                    return;
                }
                let (side, qty) = if delta > 0 {
                    (Side::Buy, delta)
                } else {
                    (Side::Sell, -delta)
                };
                self.pending.push(PendingOrder {
                    symbol,
                    kind: PendingKind::Fixed { side, qty },
                    submitted_ts: end_ts,
                    attempts: 0,
                });
            }
            OrderIntent::Liquidate { symbol } => {
                if !self.portfolio.invested(&symbol) {
                    self.reject(end_ts, symbol, RejectReason::ZeroQtyTarget);
                    return;
                }
                self.pending.push(PendingOrder {
                    symbol,
                    kind: PendingKind::Close,
                    submitted_ts: end_ts,
                    attempts: 0,
                });
            }
            OrderIntent::MarketOrder { symbol, qty } => {
                if qty == 0 {
                    self.reject(end_ts, symbol, RejectReason::ZeroQtyTarget);
                    return;
                }
                let (side, qty) = if qty > 0 {
                    (Side::Buy, qty)
                } else {
                    (Side::Sell, -qty)
                };
                self.pending.push(PendingOrder {
                    symbol,
                    kind: PendingKind::Fixed { side, qty },
                    submitted_ts: end_ts,
                    attempts: 0,
                });
            }
        }
    }

    fn reject(&mut self, end_ts: i64, symbol: String, reason: RejectReason) {
        self.rejections.push(ExecutionRejection {
            end_ts,
            symbol,
            reason,
        });
    }

    fn report(&self) -> BacktestReport {
        BacktestReport {
            run_id: self.run_id.to_string(),
            algorithm: self.host.algorithm_name().unwrap_or_default(),
            ticks: self.tick_count,
            equity_curve: self.equity_curve.clone(),
            fills: self.fills.clone(),
            rejections: self.rejections.clone(),
            unsettled: self.pending.clone(),
            renames_applied: self.renames_applied.clone(),
            universe_revisions: self.universe_revisions,
            final_portfolio: self.portfolio.clone(),
            last_prices: self.marks.clone(),
        }
    }
}
