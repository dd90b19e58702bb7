//! adk-algorithm
//!
//! The algorithm lifecycle contract and its host-side enforcement:
//!
//! - [`Algorithm`] — the five lifecycle operations a strategy implements
//! - [`AlgorithmHost`] — phase machine wrapping a registered algorithm;
//!   guarantees the strict `Uninitialized -> Initialized -> Running ->
//!   Ended` sequence and enforces the per-tick intent cap
//! - [`AlgorithmSetup`] — everything `setup()` declares, with validation
//! - [`AlgoRegistry`] — catalogue of available algorithms by name
//!
//! Callbacks receive all inputs explicitly ([`AlgoContext`] carries the
//! simulated clock; there is no ambient time) and communicate decisions
//! only through returned [`OrderIntent`]s — the host owns execution.

mod context;
mod errors;
mod host;
mod intents;
mod registry;
mod setup;

pub use context::AlgoContext;
pub use errors::{HostError, InvariantViolation, SetupError};
pub use host::{AlgorithmHost, LifecyclePhase, TickActions};
pub use intents::{AlgoActions, OrderIntent};
pub use registry::{AlgoFactory, AlgoMeta, AlgoRegistry, RegistryError};
pub use setup::{AlgorithmSetup, CustomDataSubscription, CustomKind, SetupBuilder, UniversePlan};

use adk_data::Slice;
use adk_universe::{SecurityChanges, UniverseCandidate};

/// The algorithm lifecycle adapter contract.
///
/// The host invokes exactly one callback at a time, in a fixed sequence,
/// and waits for each to return before advancing simulated time. Callbacks
/// must not block or spin; all data access is synchronous and already
/// resolved when the callback fires.
pub trait Algorithm: Send + Sync {
    /// Short identifier used in reports and host errors.
    fn name(&self) -> &str;

    /// Declare the run: window, cash, subscriptions, resolution, universe.
    ///
    /// Invoked exactly once, before any data. Failure here is fatal to the
    /// run. Returning the declaration (rather than mutating host state)
    /// keeps the call trivially idempotent.
    fn setup(&mut self) -> Result<AlgorithmSetup, SetupError>;

    /// Process one data slice.
    ///
    /// Invoked once per engine tick, in non-decreasing timestamp order,
    /// never concurrently with another callback. Implementations must
    /// check presence before every symbol access and treat absent data as
    /// a no-op, and should consume any rename event for a tracked symbol
    /// by updating their internal references.
    fn on_data(&mut self, ctx: &AlgoContext<'_>, slice: &Slice) -> AlgoActions;

    /// Universe membership changed. React by adjusting tracked state and
    /// logging only; the signature returns nothing, so orders cannot be
    /// issued synchronously from a removal.
    fn on_securities_changed(&mut self, _ctx: &AlgoContext<'_>, _changes: &SecurityChanges) {}

    /// Map a candidate snapshot to a bounded ordered subset of symbols.
    ///
    /// Must be deterministic given identical input. The default selects
    /// nothing, which is valid.
    fn select_universe(&mut self, _candidates: &[UniverseCandidate]) -> Vec<String> {
        Vec::new()
    }

    /// Invoked exactly once after the last tick. A violated end-of-run
    /// expectation must be returned as an error — it surfaces as an
    /// explicit run failure, never a log line.
    fn on_end_of_algorithm(&mut self, _ctx: &AlgoContext<'_>) -> Result<(), InvariantViolation> {
        Ok(())
    }
}
