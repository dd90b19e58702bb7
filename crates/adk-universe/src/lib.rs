//! adk-universe
//!
//! Coarse universe selection:
//! - `UniverseCandidate` — read-only per-symbol snapshot used only during
//!   selection
//! - `FilterStage` — declarative predicates applied in a fixed declared
//!   order; each stage narrows its input and is idempotent
//! - `CoarsePipeline` — staged selection with a hard output cap
//! - `SecurityChanges` — added/removed diff between successive selections
//!
//! Selection is a pure function of its input: identical candidate sequences
//! always yield identical output sequences.

mod candidate;
mod changes;
mod pipeline;

pub use candidate::UniverseCandidate;
pub use changes::{diff_membership, SecurityChanges};
pub use pipeline::{CoarsePipeline, FilterStage, DEFAULT_UNIVERSE_CAP};
