use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};

use adk_data::Resolution;
use adk_universe::DEFAULT_UNIVERSE_CAP;

use crate::errors::SetupError;

/// Kind of alternative-data subscription.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CustomKind {
    WeeklySentiment,
    MessageSentiment,
}

/// One alternative-data subscription declared at setup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomDataSubscription {
    pub symbol: String,
    pub kind: CustomKind,
}

/// Universe selection enabled for the run.
///
/// Cadence is daily (selection runs when the UTC calendar date advances);
/// `cap` bounds the number of symbols the host accepts from a selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniversePlan {
    pub cap: usize,
}

impl Default for UniversePlan {
    fn default() -> Self {
        Self {
            cap: DEFAULT_UNIVERSE_CAP,
        }
    }
}

/// Everything `setup()` declares about a run.
///
/// Built through [`AlgorithmSetup::builder`], which validates the window,
/// cash, and subscription set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlgorithmSetup {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub cash_micros: i64,
    pub equities: Vec<String>,
    pub custom: Vec<CustomDataSubscription>,
    pub resolution: Resolution,
    pub universe: Option<UniversePlan>,
}

impl AlgorithmSetup {
    pub fn builder() -> SetupBuilder {
        SetupBuilder::default()
    }

    /// Re-run the declaration checks. The host validates whatever it is
    /// handed, whether or not it came through the builder.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.start >= self.end {
            return Err(SetupError::WindowOrder {
                start: Some(self.start),
                end: Some(self.end),
            });
        }
        if self.cash_micros <= 0 {
            return Err(SetupError::NonPositiveCash {
                cash_micros: self.cash_micros,
            });
        }

        let mut seen: BTreeSet<(&str, &str)> = BTreeSet::new();
        for symbol in &self.equities {
            if symbol.trim().is_empty() {
                return Err(SetupError::EmptySymbol);
            }
            if !seen.insert(("equity", symbol)) {
                return Err(SetupError::DuplicateSubscription {
                    symbol: symbol.clone(),
                });
            }
        }
        for sub in &self.custom {
            if sub.symbol.trim().is_empty() {
                return Err(SetupError::EmptySymbol);
            }
            let kind = match sub.kind {
                CustomKind::WeeklySentiment => "weekly",
                CustomKind::MessageSentiment => "message",
            };
            if !seen.insert((kind, &sub.symbol)) {
                return Err(SetupError::DuplicateSubscription {
                    symbol: sub.symbol.clone(),
                });
            }
        }

        if self.equities.is_empty() && self.custom.is_empty() && self.universe.is_none() {
            return Err(SetupError::NothingSubscribed);
        }
        Ok(())
    }
}

/// Builder for [`AlgorithmSetup`]; `build()` validates the declaration.
#[derive(Default)]
pub struct SetupBuilder {
    start: Option<Result<DateTime<Utc>, SetupError>>,
    end: Option<Result<DateTime<Utc>, SetupError>>,
    cash_micros: i64,
    equities: Vec<String>,
    custom: Vec<CustomDataSubscription>,
    resolution: Option<Resolution>,
    universe: Option<UniversePlan>,
}

fn midnight_utc(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>, SetupError> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .ok_or(SetupError::InvalidDate { year, month, day })
}

impl SetupBuilder {
    /// Backtest window from calendar dates (midnight UTC, inclusive start,
    /// exclusive end is not implied — the engine runs ticks within
    /// `[start, end]`).
    pub fn window_ymd(mut self, start: (i32, u32, u32), end: (i32, u32, u32)) -> Self {
        self.start = Some(midnight_utc(start.0, start.1, start.2));
        self.end = Some(midnight_utc(end.0, end.1, end.2));
        self
    }

    pub fn window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(Ok(start));
        self.end = Some(Ok(end));
        self
    }

    pub fn cash_micros(mut self, cash_micros: i64) -> Self {
        self.cash_micros = cash_micros;
        self
    }

    pub fn add_equity(mut self, symbol: impl Into<String>) -> Self {
        self.equities.push(symbol.into());
        self
    }

    pub fn add_custom(mut self, symbol: impl Into<String>, kind: CustomKind) -> Self {
        self.custom.push(CustomDataSubscription {
            symbol: symbol.into(),
            kind,
        });
        self
    }

    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn universe(mut self, plan: UniversePlan) -> Self {
        self.universe = Some(plan);
        self
    }

    pub fn build(self) -> Result<AlgorithmSetup, SetupError> {
        let start = match self.start {
            Some(r) => r?,
            None => {
                return Err(SetupError::WindowOrder {
                    start: None,
                    end: None,
                })
            }
        };
        let end = match self.end {
            Some(r) => r?,
            None => {
                return Err(SetupError::WindowOrder {
                    start: Some(start),
                    end: None,
                })
            }
        };

        let setup = AlgorithmSetup {
            start,
            end,
            cash_micros: self.cash_micros,
            equities: self.equities,
            custom: self.custom,
            resolution: self.resolution.unwrap_or(Resolution::Daily),
            universe: self.universe,
        };
        setup.validate()?;
        Ok(setup)
    }
}
