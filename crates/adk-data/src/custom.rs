use serde::{Deserialize, Serialize};

/// Weekly aggregated sentiment for a ticker.
///
/// `score_micros` is the sentiment score in micros: +0.07 => 70_000.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentRecord {
    /// Industry sector for the ticker.
    pub sector: String,
    pub score_micros: i64,
}

/// Intraday message-level sentiment for a ticker.
///
/// Intensities are in micros (2.0 => 2_000_000); message counts are raw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSentiment {
    pub bull_intensity_micros: i64,
    pub bear_intensity_micros: i64,
    pub bull_scored_messages: u32,
    pub bear_scored_messages: u32,
}

/// Alternative-data record delivered in a slice, keyed by symbol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum CustomRecord {
    WeeklySentiment(SentimentRecord),
    MessageSentiment(MessageSentiment),
}

impl CustomRecord {
    pub fn as_weekly_sentiment(&self) -> Option<&SentimentRecord> {
        match self {
            CustomRecord::WeeklySentiment(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_message_sentiment(&self) -> Option<&MessageSentiment> {
        match self {
            CustomRecord::MessageSentiment(m) => Some(m),
            _ => None,
        }
    }
}

/// A ticker rename notification.
///
/// Delivered in the slice keyed by the ticker the subscriber currently
/// tracks (`old_ticker`); all data after the event arrives under
/// `new_ticker`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolChangedEvent {
    pub old_ticker: String,
    pub new_ticker: String,
}
