use serde::{Deserialize, Serialize};

/// Bar resolution granularity for subscriptions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Daily,
    Hour,
    Minute,
}

impl Resolution {
    /// Seconds per bar at this resolution.
    pub fn secs(&self) -> i64 {
        match self {
            Resolution::Daily => 86_400,
            Resolution::Hour => 3_600,
            Resolution::Minute => 60,
        }
    }
}

/// A single OHLCV price bar. Prices are integer micros (1 unit = 1_000_000).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    /// Bar end timestamp (epoch seconds, UTC).
    pub end_ts: i64,
    pub open_micros: i64,
    pub high_micros: i64,
    pub low_micros: i64,
    pub close_micros: i64,
    pub volume: i64,
    /// If false, the bar is still forming and must not drive decisions.
    pub is_complete: bool,
}

impl Bar {
    pub fn new(
        symbol: impl Into<String>,
        end_ts: i64,
        open_micros: i64,
        high_micros: i64,
        low_micros: i64,
        close_micros: i64,
        volume: i64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            end_ts,
            open_micros,
            high_micros,
            low_micros,
            close_micros,
            volume,
            is_complete: true,
        }
    }
}
