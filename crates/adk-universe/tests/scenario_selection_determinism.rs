use adk_universe::{CoarsePipeline, FilterStage, UniverseCandidate};

fn usd(x: i64) -> i64 {
    x * 1_000_000
}

fn candidates() -> Vec<UniverseCandidate> {
    vec![
        UniverseCandidate::new("AAPL", usd(150), usd(9_000_000), true),
        UniverseCandidate::new("MSFT", usd(300), usd(8_000_000), true),
        UniverseCandidate::new("PENNY", usd(2), usd(10_000_000), true),
        UniverseCandidate::new("NOFUND", usd(50), usd(7_000_000), false),
        UniverseCandidate::new("GOOG", usd(120), usd(8_000_000), true),
    ]
}

fn pipeline(cap: usize) -> CoarsePipeline {
    CoarsePipeline::new(vec![
        FilterStage::HasFundamentalData,
        FilterStage::MinPriceMicros(usd(5)),
        FilterStage::TopByDollarVolume(500),
    ])
    .with_cap(cap)
}

#[test]
fn scenario_identical_input_yields_identical_output() {
    let p = pipeline(500);
    let first = p.select(&candidates());
    let second = p.select(&candidates());
    assert_eq!(first, second);

    // Ranked by dollar volume descending, symbol-ascending tie-break.
    assert_eq!(first, ["AAPL", "GOOG", "MSFT"]);
}

#[test]
fn scenario_output_never_exceeds_cap() {
    let p = pipeline(2);
    let selected = p.select(&candidates());
    assert_eq!(selected.len(), 2);
    assert_eq!(selected, ["AAPL", "GOOG"]);
}

#[test]
fn scenario_empty_selection_is_valid() {
    let p = CoarsePipeline::new(vec![FilterStage::MinPriceMicros(usd(10_000))]);
    assert!(p.select(&candidates()).is_empty());
    assert!(p.select(&[]).is_empty());
}

#[test]
fn scenario_dollar_volume_ties_break_by_symbol() {
    // MSFT and GOOG tie on dollar volume; GOOG sorts first.
    let p = CoarsePipeline::new(vec![FilterStage::TopByDollarVolume(3)]);
    let selected = p.select(&candidates());
    assert_eq!(selected, ["PENNY", "AAPL", "GOOG"]);
}

#[test]
fn scenario_stage_counts_track_each_narrowing() {
    let p = pipeline(500);
    let (selected, counts) = p.select_with_counts(&candidates());
    assert_eq!(selected.len(), 3);
    // all -> has fundamental data -> above $5 -> top-K
    assert_eq!(counts, [5, 4, 3, 3]);
}
