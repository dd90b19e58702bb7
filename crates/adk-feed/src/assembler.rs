use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, TimeZone, Utc};

use adk_data::{Bar, Slice, SymbolChangedEvent};
use adk_engine::TickInput;
use adk_universe::UniverseCandidate;

use crate::loaders::{CustomTick, FeedError};

/// A ticker rename with the time it takes effect.
///
/// The assembler surfaces it in the first slice at or after
/// `effective_ts`, keyed by the old ticker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledRename {
    pub effective_ts: i64,
    pub old_ticker: String,
    pub new_ticker: String,
}

/// Rename events ordered by effective time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenameSchedule {
    events: Vec<ScheduledRename>,
}

impl RenameSchedule {
    pub fn new(mut events: Vec<ScheduledRename>) -> Self {
        events.sort_by(|a, b| {
            a.effective_ts
                .cmp(&b.effective_ts)
                .then_with(|| a.old_ticker.cmp(&b.old_ticker))
        });
        Self { events }
    }

    pub fn events(&self) -> &[ScheduledRename] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Per-day coarse candidate sets for universe selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UniverseSnapshots {
    days: BTreeMap<NaiveDate, Vec<UniverseCandidate>>,
}

impl UniverseSnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, date: NaiveDate, candidate: UniverseCandidate) {
        self.days.entry(date).or_default().push(candidate);
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Vec<UniverseCandidate>> {
        self.days.get(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Merges bar, custom-data, rename, and universe streams into the
/// time-ordered tick sequence the engine consumes.
///
/// Ticks are grouped by exact timestamp. A day's candidate snapshot rides
/// on the first tick of that day; a scheduled rename rides on the first
/// tick at or after its effective time.
#[derive(Default)]
pub struct SliceAssembler {
    bars: Vec<Bar>,
    customs: Vec<CustomTick>,
    renames: RenameSchedule,
    universe: UniverseSnapshots,
}

impl SliceAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bars(mut self, bars: Vec<Bar>) -> Self {
        self.bars.extend(bars);
        self
    }

    pub fn with_customs(mut self, customs: Vec<CustomTick>) -> Self {
        self.customs.extend(customs);
        self
    }

    pub fn with_renames(mut self, renames: RenameSchedule) -> Self {
        self.renames = renames;
        self
    }

    pub fn with_universe(mut self, universe: UniverseSnapshots) -> Self {
        self.universe = universe;
        self
    }

    /// Build the tick sequence. Deterministic given identical inputs.
    pub fn assemble(self) -> Result<Vec<TickInput>, FeedError> {
        let mut stamps: BTreeSet<i64> = BTreeSet::new();
        let mut bars_at: BTreeMap<i64, Vec<Bar>> = BTreeMap::new();
        for bar in self.bars {
            stamps.insert(bar.end_ts);
            bars_at.entry(bar.end_ts).or_default().push(bar);
        }
        let mut customs_at: BTreeMap<i64, Vec<CustomTick>> = BTreeMap::new();
        for custom in self.customs {
            stamps.insert(custom.end_ts);
            customs_at.entry(custom.end_ts).or_default().push(custom);
        }

        let renames = self.renames.events;
        let mut next_rename = 0usize;
        let mut dates_seen: BTreeSet<NaiveDate> = BTreeSet::new();

        let mut ticks = Vec::with_capacity(stamps.len());
        for ts in stamps {
            let time = Utc
                .timestamp_opt(ts, 0)
                .single()
                .ok_or(FeedError::BadTimestamp(ts))?;
            let mut slice = Slice::new(time);

            if let Some(bars) = bars_at.remove(&ts) {
                for bar in bars {
                    slice.insert_bar(bar);
                }
            }
            if let Some(customs) = customs_at.remove(&ts) {
                for custom in customs {
                    slice.insert_custom(custom.symbol, custom.record);
                }
            }
            while next_rename < renames.len() && renames[next_rename].effective_ts <= ts {
                let r = &renames[next_rename];
                slice.insert_symbol_change(SymbolChangedEvent {
                    old_ticker: r.old_ticker.clone(),
                    new_ticker: r.new_ticker.clone(),
                });
                next_rename += 1;
            }

            let date = time.date_naive();
            let candidates = if dates_seen.insert(date) {
                self.universe.get(date).cloned()
            } else {
                None
            };

            ticks.push(match candidates {
                Some(c) => TickInput::with_candidates(slice, c),
                None => TickInput::new(slice),
            });
        }
        Ok(ticks)
    }
}
