use std::fs;

use adk_feed::{load_bars_csv, load_weekly_sentiment_csv, FeedError, SliceAssembler};

#[test]
fn scenario_files_load_and_assemble_into_ticks() {
    let dir = tempfile::tempdir().unwrap();

    let bars_path = dir.path().join("bars.csv");
    fs::write(
        &bars_path,
        "\
symbol,end_ts,open_micros,high_micros,low_micros,close_micros,volume
CPRI,1538984700,40000000,41000000,39000000,40500000,1000
CPRI,1539071100,40500000,41500000,40000000,41000000,1200
",
    )
    .unwrap();

    let sentiment_path = dir.path().join("sentiment.csv");
    fs::write(
        &sentiment_path,
        "\
date,sector,score
20181008,Consumer,0.08
",
    )
    .unwrap();

    let bars = load_bars_csv(&bars_path).unwrap();
    let customs = load_weekly_sentiment_csv(&sentiment_path, Some("CPRI")).unwrap();

    let ticks = SliceAssembler::new()
        .with_bars(bars)
        .with_customs(customs)
        .assemble()
        .unwrap();

    // Sentiment is stamped at midnight, before the first bar of the day.
    assert_eq!(ticks.len(), 3);
    assert!(ticks[0].slice.weekly_sentiment("CPRI").is_some());
    assert!(!ticks[0].slice.contains_bar("CPRI"));
    assert!(ticks[1].slice.contains_bar("CPRI"));
    assert!(ticks[2].slice.contains_bar("CPRI"));
}

#[test]
fn scenario_missing_file_is_an_io_error() {
    let err = load_bars_csv("/definitely/not/here.csv").unwrap_err();
    assert!(matches!(err, FeedError::Io(_)));
}
