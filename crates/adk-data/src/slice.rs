use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Bar, CustomRecord, MessageSentiment, SentimentRecord, SymbolChangedEvent};

/// The immutable bundle of data updates delivered in a single engine tick.
///
/// A slice is read-only to the algorithm; the engine owns construction.
/// A given symbol may or may not be present in any of the three maps —
/// every lookup returns `Option` and callers must check presence before
/// acting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    /// Simulated time of this tick (UTC).
    pub time: DateTime<Utc>,
    /// Epoch seconds of `time`; the engine's ordering key.
    pub end_ts: i64,
    bars: BTreeMap<String, Bar>,
    custom: BTreeMap<String, CustomRecord>,
    symbol_changes: BTreeMap<String, SymbolChangedEvent>,
}

impl Slice {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            time,
            end_ts: time.timestamp(),
            bars: BTreeMap::new(),
            custom: BTreeMap::new(),
            symbol_changes: BTreeMap::new(),
        }
    }

    pub fn insert_bar(&mut self, bar: Bar) {
        self.bars.insert(bar.symbol.clone(), bar);
    }

    pub fn insert_custom(&mut self, symbol: impl Into<String>, record: CustomRecord) {
        self.custom.insert(symbol.into(), record);
    }

    pub fn insert_symbol_change(&mut self, event: SymbolChangedEvent) {
        self.symbol_changes.insert(event.old_ticker.clone(), event);
    }

    pub fn bar(&self, symbol: &str) -> Option<&Bar> {
        self.bars.get(symbol)
    }

    pub fn custom(&self, symbol: &str) -> Option<&CustomRecord> {
        self.custom.get(symbol)
    }

    /// Weekly sentiment for `symbol`, if this tick carries one.
    pub fn weekly_sentiment(&self, symbol: &str) -> Option<&SentimentRecord> {
        self.custom.get(symbol).and_then(CustomRecord::as_weekly_sentiment)
    }

    /// Message sentiment for `symbol`, if this tick carries one.
    pub fn message_sentiment(&self, symbol: &str) -> Option<&MessageSentiment> {
        self.custom.get(symbol).and_then(CustomRecord::as_message_sentiment)
    }

    /// Rename event keyed by the ticker the caller currently tracks.
    pub fn symbol_changed(&self, symbol: &str) -> Option<&SymbolChangedEvent> {
        self.symbol_changes.get(symbol)
    }

    pub fn contains_bar(&self, symbol: &str) -> bool {
        self.bars.contains_key(symbol)
    }

    pub fn contains_custom(&self, symbol: &str) -> bool {
        self.custom.contains_key(symbol)
    }

    pub fn bars(&self) -> impl Iterator<Item = (&String, &Bar)> {
        self.bars.iter()
    }

    pub fn customs(&self) -> impl Iterator<Item = (&String, &CustomRecord)> {
        self.custom.iter()
    }

    pub fn symbol_changes(&self) -> impl Iterator<Item = (&String, &SymbolChangedEvent)> {
        self.symbol_changes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty() && self.custom.is_empty() && self.symbol_changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slice_at(ts: i64) -> Slice {
        Slice::new(Utc.timestamp_opt(ts, 0).unwrap())
    }

    #[test]
    fn absent_keys_return_none() {
        let mut s = slice_at(1_000);
        s.insert_bar(Bar::new("AAPL", 1_000, 1, 2, 1, 2, 10));

        assert!(s.bar("AAPL").is_some());
        assert!(s.bar("MSFT").is_none());
        assert!(s.custom("AAPL").is_none());
        assert!(s.symbol_changed("AAPL").is_none());
        assert!(!s.contains_custom("AAPL"));
    }

    #[test]
    fn sentiment_accessor_narrows_by_kind() {
        let mut s = slice_at(1_000);
        s.insert_custom(
            "CPRI",
            CustomRecord::WeeklySentiment(SentimentRecord {
                sector: "Consumer".to_string(),
                score_micros: 80_000,
            }),
        );

        assert_eq!(s.weekly_sentiment("CPRI").unwrap().score_micros, 80_000);
        assert!(s.message_sentiment("CPRI").is_none());
    }

    #[test]
    fn symbol_change_keyed_by_old_ticker() {
        let mut s = slice_at(1_000);
        s.insert_symbol_change(SymbolChangedEvent {
            old_ticker: "TWX".to_string(),
            new_ticker: "AOL".to_string(),
        });

        assert_eq!(s.symbol_changed("TWX").unwrap().new_ticker, "AOL");
        assert!(s.symbol_changed("AOL").is_none());
    }
}
