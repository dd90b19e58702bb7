use chrono::{DateTime, Utc};

use crate::host::LifecyclePhase;

/// Invalid run declaration. Fatal: the run aborts before the first tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetupError {
    /// A window endpoint was not a valid calendar date.
    InvalidDate { year: i32, month: u32, day: u32 },
    /// Window missing or start not strictly before end.
    WindowOrder {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
    NonPositiveCash { cash_micros: i64 },
    EmptySymbol,
    DuplicateSubscription { symbol: String },
    /// Nothing to run on: no equities, no custom data, no universe plan.
    NothingSubscribed,
}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::InvalidDate { year, month, day } => {
                write!(f, "invalid date: {year:04}-{month:02}-{day:02}")
            }
            SetupError::WindowOrder { start, end } => write!(
                f,
                "backtest window must satisfy start < end (start={start:?}, end={end:?})"
            ),
            SetupError::NonPositiveCash { cash_micros } => {
                write!(f, "starting cash must be positive, got {cash_micros} micros")
            }
            SetupError::EmptySymbol => write!(f, "subscription symbol must not be empty"),
            SetupError::DuplicateSubscription { symbol } => {
                write!(f, "duplicate subscription for '{symbol}'")
            }
            SetupError::NothingSubscribed => {
                write!(f, "setup declares no equities, custom data, or universe plan")
            }
        }
    }
}

impl std::error::Error for SetupError {}

/// Host-level protocol errors: phase violations and registration misuse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostError {
    NoAlgorithmRegistered,
    AlgorithmAlreadyRegistered,
    /// A lifecycle operation was invoked out of sequence.
    PhaseViolation {
        operation: &'static str,
        phase: LifecyclePhase,
    },
    Setup(SetupError),
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostError::NoAlgorithmRegistered => write!(f, "no algorithm registered"),
            HostError::AlgorithmAlreadyRegistered => write!(f, "an algorithm is already registered"),
            HostError::PhaseViolation { operation, phase } => {
                write!(f, "operation '{operation}' invoked in phase {phase:?}")
            }
            HostError::Setup(e) => write!(f, "setup failed: {e}"),
        }
    }
}

impl std::error::Error for HostError {}

impl From<SetupError> for HostError {
    fn from(e: SetupError) -> Self {
        HostError::Setup(e)
    }
}

/// An end-of-run expectation that did not hold.
///
/// Propagates out of the harness as an explicit run failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvariantViolation {
    pub what: String,
}

impl InvariantViolation {
    pub fn new(what: impl Into<String>) -> Self {
        Self { what: what.into() }
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "end-of-run invariant violated: {}", self.what)
    }
}

impl std::error::Error for InvariantViolation {}
