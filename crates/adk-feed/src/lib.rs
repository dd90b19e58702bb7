//! adk-feed
//!
//! File-backed data delivery for the backtest harness: CSV loaders for
//! bars, sentiment records, rename schedules, and universe snapshots,
//! plus the [`SliceAssembler`] that merges those streams into the
//! time-ordered tick sequence the engine consumes.
//!
//! Loading is the one place decimal input becomes integer micros; parsing
//! and assembly are deterministic (sorted output, `BTreeMap` grouping).

mod assembler;
mod loaders;

pub use assembler::{RenameSchedule, ScheduledRename, SliceAssembler, UniverseSnapshots};
pub use loaders::{
    load_bars_csv, load_message_sentiment_csv, load_renames_csv, load_universe_csv,
    load_weekly_sentiment_csv, parse_bars_csv, parse_message_sentiment_csv, parse_renames_csv,
    parse_universe_csv, parse_weekly_sentiment_csv, CustomTick, FeedError,
};
