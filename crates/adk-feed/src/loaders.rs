//! CSV loaders for the file-backed data feed.
//!
//! Column conventions
//!
//! Bars: `symbol,end_ts,open_micros,high_micros,low_micros,close_micros,volume`
//! with optional `is_complete` (1/0/true/false; default true).
//!
//! Weekly sentiment comes in two layouts, as the upstream data does:
//! a per-symbol "formatted" file (`date,sector,score`, caller supplies the
//! symbol) and a "raw" file carrying a `ticker` column. The layout is
//! detected from the header. Scores are decimal in the file and converted
//! to micros at this boundary; everything downstream is integer.
//!
//! Message sentiment: `end_ts,symbol,bull_intensity,bear_intensity,`
//! `bull_scored_messages,bear_scored_messages`.
//!
//! Renames: `effective_ts,old_ticker,new_ticker`.
//!
//! Universe snapshots: `date,symbol,price_micros,dollar_volume_micros,`
//! `has_fundamental_data`.
//!
//! Dates are `YYYYMMDD` or `YYYY-MM-DD` and stamp records at midnight UTC.
//! All loaders sort their output deterministically.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use adk_data::{Bar, CustomRecord, MessageSentiment, SentimentRecord};
use adk_universe::UniverseCandidate;

use crate::assembler::{RenameSchedule, ScheduledRename, UniverseSnapshots};

/// Loader errors are small, explicit, and test-friendly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedError {
    Io(String),
    Csv(String),
    MissingColumn(&'static str),
    BadRow { line: usize, reason: String },
    BadDate(String),
    BadTimestamp(i64),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Io(e) => write!(f, "io error: {e}"),
            FeedError::Csv(e) => write!(f, "csv error: {e}"),
            FeedError::MissingColumn(c) => write!(f, "missing column: {c}"),
            FeedError::BadRow { line, reason } => write!(f, "bad row at line {line}: {reason}"),
            FeedError::BadDate(v) => write!(f, "unparseable date: {v}"),
            FeedError::BadTimestamp(ts) => write!(f, "timestamp out of range: {ts}"),
        }
    }
}

impl std::error::Error for FeedError {}

impl From<csv::Error> for FeedError {
    fn from(e: csv::Error) -> Self {
        if e.is_io_error() {
            FeedError::Io(e.to_string())
        } else {
            FeedError::Csv(e.to_string())
        }
    }
}

/// One timestamped custom-data record, before slice assembly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomTick {
    pub end_ts: i64,
    pub symbol: String,
    pub record: CustomRecord,
}

fn reader_from<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn require_columns(headers: &csv::StringRecord, needed: &[&'static str]) -> Result<(), FeedError> {
    for name in needed {
        if !headers.iter().any(|h| h == *name) {
            return Err(FeedError::MissingColumn(name));
        }
    }
    Ok(())
}

fn has_column(headers: &csv::StringRecord, name: &str) -> bool {
    headers.iter().any(|h| h == name)
}

fn parse_flex_date(s: &str) -> Result<NaiveDate, FeedError> {
    let t = s.trim();
    let parsed = if t.len() == 8 && t.chars().all(|c| c.is_ascii_digit()) {
        NaiveDate::parse_from_str(t, "%Y%m%d")
    } else {
        NaiveDate::parse_from_str(t, "%Y-%m-%d")
    };
    parsed.map_err(|_| FeedError::BadDate(t.to_string()))
}

fn midnight_ts(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Decimal score/intensity to micros, at the io boundary only.
fn to_micros(value: f64) -> i64 {
    (value * 1_000_000.0).round() as i64
}

fn parse_bool(s: &str, line: usize) -> Result<bool, FeedError> {
    match s.trim() {
        "1" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "false" | "FALSE" | "False" => Ok(false),
        other => Err(FeedError::BadRow {
            line,
            reason: format!("unparseable bool: {other}"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct BarRow {
    symbol: String,
    end_ts: i64,
    open_micros: i64,
    high_micros: i64,
    low_micros: i64,
    close_micros: i64,
    volume: i64,
    #[serde(default)]
    is_complete: Option<String>,
}

/// Parse OHLCV bars, sorted `(end_ts, symbol)`.
pub fn parse_bars_csv<R: Read>(input: R) -> Result<Vec<Bar>, FeedError> {
    let mut rdr = reader_from(input);
    require_columns(
        rdr.headers()?,
        &[
            "symbol",
            "end_ts",
            "open_micros",
            "high_micros",
            "low_micros",
            "close_micros",
            "volume",
        ],
    )?;

    let mut out = Vec::new();
    for (i, row) in rdr.deserialize::<BarRow>().enumerate() {
        let line = i + 2;
        let row = row?;
        if row.symbol.is_empty() {
            return Err(FeedError::BadRow {
                line,
                reason: "symbol is empty".to_string(),
            });
        }
        let mut bar = Bar::new(
            row.symbol,
            row.end_ts,
            row.open_micros,
            row.high_micros,
            row.low_micros,
            row.close_micros,
            row.volume,
        );
        if let Some(flag) = row.is_complete {
            bar.is_complete = parse_bool(&flag, line)?;
        }
        out.push(bar);
    }
    out.sort_by(|a, b| a.end_ts.cmp(&b.end_ts).then_with(|| a.symbol.cmp(&b.symbol)));
    Ok(out)
}

pub fn load_bars_csv(path: impl AsRef<Path>) -> Result<Vec<Bar>, FeedError> {
    let file = File::open(path).map_err(|e| FeedError::Io(e.to_string()))?;
    parse_bars_csv(file)
}

// ---------------------------------------------------------------------------
// Weekly sentiment
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct WeeklyRawRow {
    date: String,
    ticker: String,
    sector: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
struct WeeklyFormattedRow {
    date: String,
    sector: String,
    score: f64,
}

/// Parse weekly sentiment in either layout.
///
/// `default_symbol` keys the formatted (no `ticker` column) layout; it is
/// ignored when the file carries its own tickers.
pub fn parse_weekly_sentiment_csv<R: Read>(
    input: R,
    default_symbol: Option<&str>,
) -> Result<Vec<CustomTick>, FeedError> {
    let mut rdr = reader_from(input);
    let headers = rdr.headers()?.clone();
    require_columns(&headers, &["date", "sector", "score"])?;

    let mut out = Vec::new();
    if has_column(&headers, "ticker") {
        for row in rdr.deserialize::<WeeklyRawRow>() {
            let row = row?;
            out.push(CustomTick {
                end_ts: midnight_ts(parse_flex_date(&row.date)?),
                symbol: row.ticker,
                record: CustomRecord::WeeklySentiment(SentimentRecord {
                    sector: row.sector,
                    score_micros: to_micros(row.score),
                }),
            });
        }
    } else {
        let symbol = default_symbol.ok_or(FeedError::MissingColumn("ticker"))?;
        for row in rdr.deserialize::<WeeklyFormattedRow>() {
            let row = row?;
            out.push(CustomTick {
                end_ts: midnight_ts(parse_flex_date(&row.date)?),
                symbol: symbol.to_string(),
                record: CustomRecord::WeeklySentiment(SentimentRecord {
                    sector: row.sector,
                    score_micros: to_micros(row.score),
                }),
            });
        }
    }
    out.sort_by(|a, b| a.end_ts.cmp(&b.end_ts).then_with(|| a.symbol.cmp(&b.symbol)));
    Ok(out)
}

pub fn load_weekly_sentiment_csv(
    path: impl AsRef<Path>,
    default_symbol: Option<&str>,
) -> Result<Vec<CustomTick>, FeedError> {
    let file = File::open(path).map_err(|e| FeedError::Io(e.to_string()))?;
    parse_weekly_sentiment_csv(file, default_symbol)
}

// ---------------------------------------------------------------------------
// Message sentiment
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MessageRow {
    end_ts: i64,
    symbol: String,
    bull_intensity: f64,
    bear_intensity: f64,
    bull_scored_messages: u32,
    bear_scored_messages: u32,
}

pub fn parse_message_sentiment_csv<R: Read>(input: R) -> Result<Vec<CustomTick>, FeedError> {
    let mut rdr = reader_from(input);
    require_columns(
        rdr.headers()?,
        &[
            "end_ts",
            "symbol",
            "bull_intensity",
            "bear_intensity",
            "bull_scored_messages",
            "bear_scored_messages",
        ],
    )?;

    let mut out = Vec::new();
    for row in rdr.deserialize::<MessageRow>() {
        let row = row?;
        out.push(CustomTick {
            end_ts: row.end_ts,
            symbol: row.symbol,
            record: CustomRecord::MessageSentiment(MessageSentiment {
                bull_intensity_micros: to_micros(row.bull_intensity),
                bear_intensity_micros: to_micros(row.bear_intensity),
                bull_scored_messages: row.bull_scored_messages,
                bear_scored_messages: row.bear_scored_messages,
            }),
        });
    }
    out.sort_by(|a, b| a.end_ts.cmp(&b.end_ts).then_with(|| a.symbol.cmp(&b.symbol)));
    Ok(out)
}

pub fn load_message_sentiment_csv(path: impl AsRef<Path>) -> Result<Vec<CustomTick>, FeedError> {
    let file = File::open(path).map_err(|e| FeedError::Io(e.to_string()))?;
    parse_message_sentiment_csv(file)
}

// ---------------------------------------------------------------------------
// Renames
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RenameRow {
    effective_ts: i64,
    old_ticker: String,
    new_ticker: String,
}

pub fn parse_renames_csv<R: Read>(input: R) -> Result<RenameSchedule, FeedError> {
    let mut rdr = reader_from(input);
    require_columns(rdr.headers()?, &["effective_ts", "old_ticker", "new_ticker"])?;

    let mut events = Vec::new();
    for (i, row) in rdr.deserialize::<RenameRow>().enumerate() {
        let row = row?;
        if row.old_ticker.is_empty() || row.new_ticker.is_empty() {
            return Err(FeedError::BadRow {
                line: i + 2,
                reason: "ticker is empty".to_string(),
            });
        }
        events.push(ScheduledRename {
            effective_ts: row.effective_ts,
            old_ticker: row.old_ticker,
            new_ticker: row.new_ticker,
        });
    }
    Ok(RenameSchedule::new(events))
}

pub fn load_renames_csv(path: impl AsRef<Path>) -> Result<RenameSchedule, FeedError> {
    let file = File::open(path).map_err(|e| FeedError::Io(e.to_string()))?;
    parse_renames_csv(file)
}

// ---------------------------------------------------------------------------
// Universe snapshots
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct UniverseRow {
    date: String,
    symbol: String,
    price_micros: i64,
    dollar_volume_micros: i64,
    has_fundamental_data: String,
}

pub fn parse_universe_csv<R: Read>(input: R) -> Result<UniverseSnapshots, FeedError> {
    let mut rdr = reader_from(input);
    require_columns(
        rdr.headers()?,
        &[
            "date",
            "symbol",
            "price_micros",
            "dollar_volume_micros",
            "has_fundamental_data",
        ],
    )?;

    let mut snapshots = UniverseSnapshots::new();
    for (i, row) in rdr.deserialize::<UniverseRow>().enumerate() {
        let line = i + 2;
        let row = row?;
        let date = parse_flex_date(&row.date)?;
        let has_fundamental = parse_bool(&row.has_fundamental_data, line)?;
        snapshots.push(
            date,
            UniverseCandidate::new(
                row.symbol,
                row.price_micros,
                row.dollar_volume_micros,
                has_fundamental,
            ),
        );
    }
    Ok(snapshots)
}

pub fn load_universe_csv(path: impl AsRef<Path>) -> Result<UniverseSnapshots, FeedError> {
    let file = File::open(path).map_err(|e| FeedError::Io(e.to_string()))?;
    parse_universe_csv(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_sort_by_timestamp_then_symbol() {
        let csv = "\
symbol,end_ts,open_micros,high_micros,low_micros,close_micros,volume
B,60,10,12,9,11,100
A,60,20,22,19,21,200
A,0,1,1,1,1,1
";
        let bars = parse_bars_csv(csv.as_bytes()).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!((bars[0].end_ts, bars[0].symbol.as_str()), (0, "A"));
        assert_eq!((bars[1].end_ts, bars[1].symbol.as_str()), (60, "A"));
        assert_eq!((bars[2].end_ts, bars[2].symbol.as_str()), (60, "B"));
        assert!(bars[0].is_complete);
    }

    #[test]
    fn bars_missing_column_is_explicit() {
        let csv = "symbol,end_ts,open_micros\nA,0,1\n";
        assert_eq!(
            parse_bars_csv(csv.as_bytes()),
            Err(FeedError::MissingColumn("high_micros"))
        );
    }

    #[test]
    fn weekly_sentiment_detects_formatted_layout() {
        let csv = "\
date,sector,score
20181008,Consumer,0.08
20181015,Consumer,-0.06
";
        let ticks = parse_weekly_sentiment_csv(csv.as_bytes(), Some("CPRI")).unwrap();
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].symbol, "CPRI");
        let rec = match &ticks[0].record {
            CustomRecord::WeeklySentiment(r) => r,
            other => panic!("unexpected record {other:?}"),
        };
        assert_eq!(rec.score_micros, 80_000);
        assert!(ticks[0].end_ts < ticks[1].end_ts);
    }

    #[test]
    fn weekly_sentiment_raw_layout_keys_by_ticker_column() {
        let csv = "\
date,ticker,sector,score
2018-10-08,CPRI,Consumer,0.07
2018-10-08,AAPL,Technology,0.01
";
        let ticks = parse_weekly_sentiment_csv(csv.as_bytes(), None).unwrap();
        assert_eq!(ticks.len(), 2);
        // Same stamp: sorted by symbol.
        assert_eq!(ticks[0].symbol, "AAPL");
        assert_eq!(ticks[1].symbol, "CPRI");
    }

    #[test]
    fn formatted_layout_without_a_symbol_is_an_error() {
        let csv = "date,sector,score\n20181008,Consumer,0.08\n";
        assert_eq!(
            parse_weekly_sentiment_csv(csv.as_bytes(), None),
            Err(FeedError::MissingColumn("ticker"))
        );
    }

    #[test]
    fn message_sentiment_converts_intensities_to_micros() {
        let csv = "\
end_ts,symbol,bull_intensity,bear_intensity,bull_scored_messages,bear_scored_messages
1000,AAPL,2.12,-0.5,4,1
";
        let ticks = parse_message_sentiment_csv(csv.as_bytes()).unwrap();
        let rec = match &ticks[0].record {
            CustomRecord::MessageSentiment(m) => m,
            other => panic!("unexpected record {other:?}"),
        };
        assert_eq!(rec.bull_intensity_micros, 2_120_000);
        assert_eq!(rec.bear_intensity_micros, -500_000);
        assert_eq!(rec.bull_scored_messages, 4);
    }

    #[test]
    fn renames_load_in_effective_order() {
        let csv = "\
effective_ts,old_ticker,new_ticker
2000,NWSA,FOXA
1000,TWX,AOL
";
        let schedule = parse_renames_csv(csv.as_bytes()).unwrap();
        let events = schedule.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].old_ticker, "TWX");
        assert_eq!(events[1].old_ticker, "NWSA");
    }

    #[test]
    fn universe_rows_group_by_day() {
        let csv = "\
date,symbol,price_micros,dollar_volume_micros,has_fundamental_data
2014-03-24,AAA,10000000,9000000,true
2014-03-24,BBB,20000000,8000000,0
2014-03-25,AAA,11000000,9500000,1
";
        let snapshots = parse_universe_csv(csv.as_bytes()).unwrap();
        assert_eq!(snapshots.len(), 2);
        let day1 = snapshots
            .get(parse_flex_date("2014-03-24").unwrap())
            .unwrap();
        assert_eq!(day1.len(), 2);
        assert!(day1[0].has_fundamental_data);
        assert!(!day1[1].has_fundamental_data);
    }

    #[test]
    fn bad_dates_and_bools_are_rejected() {
        let csv = "date,sector,score\nnot-a-date,Consumer,0.08\n";
        assert!(matches!(
            parse_weekly_sentiment_csv(csv.as_bytes(), Some("CPRI")),
            Err(FeedError::BadDate(_))
        ));

        let csv = "\
date,symbol,price_micros,dollar_volume_micros,has_fundamental_data
2014-03-24,AAA,1,1,maybe
";
        assert!(matches!(
            parse_universe_csv(csv.as_bytes()),
            Err(FeedError::BadRow { line: 2, .. })
        ));
    }
}
