use chrono::{TimeZone, Utc};

use adk_algos::SentimentFollower;
use adk_data::{Bar, CustomRecord, SentimentRecord, Slice};
use adk_engine::{BacktestConfig, BacktestEngine, TickInput};
use adk_portfolio::Side;

fn usd(x: i64) -> i64 {
    x * 1_000_000
}

fn tick(day: u32, px: i64, score_micros: Option<i64>) -> TickInput {
    let mut slice = Slice::new(Utc.with_ymd_and_hms(2018, 10, day, 0, 0, 0).unwrap());
    slice.insert_bar(Bar::new("CPRI", slice.end_ts, px, px, px, px, 10_000));
    if let Some(score_micros) = score_micros {
        slice.insert_custom(
            "CPRI",
            CustomRecord::WeeklySentiment(SentimentRecord {
                sector: "Consumer".to_string(),
                score_micros,
            }),
        );
    }
    TickInput::new(slice)
}

fn run(ticks: &[TickInput]) -> adk_engine::BacktestReport {
    let mut engine = BacktestEngine::new(BacktestConfig::test_defaults());
    engine
        .register_algorithm(Box::new(SentimentFollower::new()))
        .unwrap();
    engine.run(ticks).unwrap()
}

#[test]
fn scenario_enter_on_positive_score_liquidate_on_negative() {
    let ticks = vec![
        // Score 0.08, flat, no open orders: enter half of equity.
        tick(8, usd(40), Some(80_000)),
        // Buy settles here; score 0.0 while invested: no action.
        tick(9, usd(40), Some(0)),
        // Score -0.06 while invested: liquidate.
        tick(10, usd(40), Some(-60_000)),
        // Liquidation settles here.
        tick(11, usd(40), None),
    ];
    let report = run(&ticks);

    assert_eq!(report.fills.len(), 2);

    // Half of 100k equity at $40 is 1250 shares.
    let entry = &report.fills[0];
    assert_eq!(entry.side, Side::Buy);
    assert_eq!(entry.qty, 1_250);
    assert_eq!(entry.price_micros, usd(40));

    let exit = &report.fills[1];
    assert_eq!(exit.side, Side::Sell);
    assert_eq!(exit.qty, 1_250);

    assert!(report.final_portfolio.positions.is_empty());
    assert_eq!(report.final_portfolio.cash_micros, usd(100_000));
    assert!(report.rejections.is_empty());
    assert!(report.unsettled.is_empty());
}

#[test]
fn scenario_zero_score_while_invested_is_no_action() {
    let ticks = vec![
        tick(8, usd(40), Some(80_000)),
        tick(9, usd(40), None),
        // Several neutral weeks: position is held untouched.
        tick(10, usd(40), Some(0)),
        tick(11, usd(40), Some(0)),
    ];
    let report = run(&ticks);

    assert_eq!(report.fills.len(), 1);
    assert_eq!(report.final_portfolio.qty("CPRI"), 1_250);
}

#[test]
fn scenario_thresholds_are_strict() {
    let ticks = vec![
        // Exactly at the entry threshold: no entry.
        tick(8, usd(40), Some(70_000)),
        // Negative but above the exit threshold while flat: no action.
        tick(9, usd(40), Some(-60_000)),
    ];
    let report = run(&ticks);

    assert!(report.fills.is_empty());
    assert!(report.unsettled.is_empty());
    assert!(report.final_portfolio.positions.is_empty());
}

#[test]
fn scenario_entry_suppressed_while_an_order_is_open() {
    let ticks = vec![
        // Entry order placed; CPRI never prices again until day 10, so
        // the order is still open on day 9.
        tick(8, usd(40), Some(80_000)),
        {
            let mut slice = Slice::new(Utc.with_ymd_and_hms(2018, 10, 9, 0, 0, 0).unwrap());
            slice.insert_custom(
                "CPRI",
                CustomRecord::WeeklySentiment(SentimentRecord {
                    sector: "Consumer".to_string(),
                    score_micros: 90_000,
                }),
            );
            TickInput::new(slice)
        },
        tick(10, usd(40), None),
    ];
    let report = run(&ticks);

    // One entry only: the day-9 signal found an open order and did nothing.
    assert_eq!(report.fills.len(), 1);
    assert_eq!(report.final_portfolio.qty("CPRI"), 1_250);
}
