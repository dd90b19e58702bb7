use chrono::{TimeZone, Utc};

use adk_algorithm::{AlgoActions, AlgoContext, Algorithm, AlgorithmSetup, SetupError};
use adk_data::{Bar, Slice};
use adk_engine::{BacktestConfig, BacktestEngine, PendingKind, RejectReason, TickInput};

fn usd(x: i64) -> i64 {
    x * 1_000_000
}

fn msft_slice(day: u32) -> Slice {
    let mut s = Slice::new(Utc.with_ymd_and_hms(2020, 1, day, 16, 0, 0).unwrap());
    s.insert_bar(Bar::new(
        "MSFT",
        s.end_ts,
        usd(200),
        usd(200),
        usd(200),
        usd(200),
        500,
    ));
    s
}

/// Orders one share of GHOST (subscribed, but never priced) on tick one.
struct GhostBuyer {
    fired: bool,
}

impl Algorithm for GhostBuyer {
    fn name(&self) -> &str {
        "ghost_buyer"
    }

    fn setup(&mut self) -> Result<AlgorithmSetup, SetupError> {
        AlgorithmSetup::builder()
            .window_ymd((2020, 1, 1), (2020, 2, 1))
            .cash_micros(usd(10_000))
            .add_equity("GHOST")
            .add_equity("MSFT")
            .build()
    }

    fn on_data(&mut self, _ctx: &AlgoContext<'_>, _slice: &Slice) -> AlgoActions {
        if self.fired {
            return AlgoActions::none();
        }
        self.fired = true;
        AlgoActions::none().market_order("GHOST", 1)
    }
}

#[test]
fn scenario_order_unpriced_for_max_attempts_is_rejected() {
    let config = BacktestConfig {
        max_fill_attempts: 2,
        ..BacktestConfig::test_defaults()
    };
    let ticks: Vec<TickInput> = (6..10).map(|d| TickInput::new(msft_slice(d))).collect();

    let mut engine = BacktestEngine::new(config);
    engine
        .register_algorithm(Box::new(GhostBuyer { fired: false }))
        .unwrap();
    let report = engine.run(&ticks).unwrap();

    assert!(report.fills.is_empty());
    assert!(report.unsettled.is_empty());
    assert_eq!(report.rejections.len(), 1);
    let rejection = &report.rejections[0];
    assert_eq!(rejection.symbol, "GHOST");
    assert_eq!(rejection.reason, RejectReason::FillTimeout { attempts: 2 });
}

#[test]
fn scenario_still_pending_orders_are_reported_unsettled() {
    // Generous attempt budget, short run: the order survives to the end.
    let ticks = vec![TickInput::new(msft_slice(6)), TickInput::new(msft_slice(7))];

    let mut engine = BacktestEngine::new(BacktestConfig::test_defaults());
    engine
        .register_algorithm(Box::new(GhostBuyer { fired: false }))
        .unwrap();
    let report = engine.run(&ticks).unwrap();

    assert!(report.rejections.is_empty());
    assert_eq!(report.unsettled.len(), 1);
    let pending = &report.unsettled[0];
    assert_eq!(pending.symbol, "GHOST");
    assert_eq!(pending.attempts, 1);
    assert!(matches!(pending.kind, PendingKind::Fixed { qty: 1, .. }));
}
