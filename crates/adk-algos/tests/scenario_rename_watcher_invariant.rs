use chrono::{TimeZone, Utc};

use adk_algos::RenameWatcher;
use adk_data::{Bar, Slice, SymbolChangedEvent};
use adk_diag::RecordingSink;
use adk_engine::{BacktestConfig, BacktestEngine, EngineError, TickInput};

fn usd(x: i64) -> i64 {
    x * 1_000_000
}

fn slice_on(year: i32, month: u32, day: u32) -> Slice {
    Slice::new(Utc.with_ymd_and_hms(year, month, day, 16, 0, 0).unwrap())
}

fn bar(symbol: &str, slice: &Slice, px: i64) -> Bar {
    Bar::new(symbol, slice.end_ts, px, px, px, px, 1_000)
}

#[test]
fn scenario_rename_is_recorded_and_the_run_succeeds() {
    let mut day1 = slice_on(2001, 6, 1);
    day1.insert_bar(bar("TWX", &day1, usd(50)));
    let mut day2 = slice_on(2001, 6, 4);
    day2.insert_symbol_change(SymbolChangedEvent {
        old_ticker: "TWX".to_string(),
        new_ticker: "AOL".to_string(),
    });
    day2.insert_bar(bar("AOL", &day2, usd(51)));
    let mut day3 = slice_on(2001, 6, 5);
    day3.insert_bar(bar("AOL", &day3, usd(52)));

    let ticks = vec![
        TickInput::new(day1),
        TickInput::new(day2),
        TickInput::new(day3),
    ];

    let sink = RecordingSink::new();
    let mut engine = BacktestEngine::new(BacktestConfig::test_defaults());
    engine
        .register_algorithm(Box::new(RenameWatcher::new()))
        .unwrap();
    let report = engine.run_with_sink(&ticks, &sink).unwrap();

    assert_eq!(report.renames_applied.len(), 1);
    assert_eq!(
        sink.logs_containing("ticker changed from TWX to AOL").len(),
        1
    );
}

#[test]
fn scenario_a_run_without_the_rename_fails_explicitly() {
    let mut day1 = slice_on(2001, 6, 1);
    day1.insert_bar(bar("TWX", &day1, usd(50)));
    let mut day2 = slice_on(2001, 6, 4);
    day2.insert_bar(bar("TWX", &day2, usd(51)));

    let ticks = vec![TickInput::new(day1), TickInput::new(day2)];

    let mut engine = BacktestEngine::new(BacktestConfig::test_defaults());
    engine
        .register_algorithm(Box::new(RenameWatcher::new()))
        .unwrap();

    match engine.run(&ticks) {
        Err(EngineError::Invariant(v)) => assert!(v.what.contains("did not rename")),
        other => panic!("expected invariant failure, got {other:?}"),
    }
}
