use adk_data::Slice;
use adk_universe::{SecurityChanges, UniverseCandidate};

use crate::{
    Algorithm, AlgoContext, AlgorithmSetup, HostError, InvariantViolation, OrderIntent,
};

/// Lifecycle phase of a hosted algorithm.
///
/// Strictly sequential; no phase is ever re-entered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LifecyclePhase {
    Uninitialized,
    Initialized,
    Running,
    Ended,
}

/// Intents from one tick, split at the host's per-tick cap.
///
/// `overflow` holds the intents beyond the cap, in emission order; the
/// engine records them as rejections rather than failing the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickActions {
    pub accepted: Vec<OrderIntent>,
    pub overflow: Vec<OrderIntent>,
}

/// Phase machine around a registered algorithm.
///
/// Guarantees to the algorithm what the lifecycle contract promises:
/// `setup` runs exactly once before any data, callbacks arrive one at a
/// time in the fixed sequence, and `on_end_of_algorithm` runs exactly once
/// after the last tick.
pub struct AlgorithmHost {
    algorithm: Option<Box<dyn Algorithm>>,
    setup: Option<AlgorithmSetup>,
    phase: LifecyclePhase,
    max_intents_per_tick: usize,
}

impl AlgorithmHost {
    pub fn new(max_intents_per_tick: usize) -> Self {
        Self {
            algorithm: None,
            setup: None,
            phase: LifecyclePhase::Uninitialized,
            max_intents_per_tick,
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn max_intents_per_tick(&self) -> usize {
        self.max_intents_per_tick
    }

    /// The validated declaration, available once initialized.
    pub fn setup(&self) -> Option<&AlgorithmSetup> {
        self.setup.as_ref()
    }

    pub fn algorithm_name(&self) -> Option<String> {
        self.algorithm.as_ref().map(|a| a.name().to_string())
    }

    /// Register the algorithm. Exactly one per host.
    pub fn register(&mut self, algorithm: Box<dyn Algorithm>) -> Result<(), HostError> {
        if self.algorithm.is_some() {
            return Err(HostError::AlgorithmAlreadyRegistered);
        }
        self.algorithm = Some(algorithm);
        Ok(())
    }

    /// Run `setup()` once and validate the declaration.
    ///
    /// On success the phase advances to `Initialized`. A setup failure is
    /// fatal: the phase does not advance and the run must abort.
    pub fn initialize(&mut self) -> Result<AlgorithmSetup, HostError> {
        if self.phase != LifecyclePhase::Uninitialized {
            return Err(HostError::PhaseViolation {
                operation: "initialize",
                phase: self.phase,
            });
        }
        let algorithm = self
            .algorithm
            .as_mut()
            .ok_or(HostError::NoAlgorithmRegistered)?;

        let setup = algorithm.setup()?;
        setup.validate()?;
        self.setup = Some(setup.clone());
        self.phase = LifecyclePhase::Initialized;
        Ok(setup)
    }

    fn enter_running(&mut self, operation: &'static str) -> Result<&mut Box<dyn Algorithm>, HostError> {
        match self.phase {
            LifecyclePhase::Initialized => self.phase = LifecyclePhase::Running,
            LifecyclePhase::Running => {}
            phase => return Err(HostError::PhaseViolation { operation, phase }),
        }
        // Registration was checked at initialize; phase gating makes this
        // unreachable without an algorithm.
        self.algorithm
            .as_mut()
            .ok_or(HostError::NoAlgorithmRegistered)
    }

    /// Deliver one slice and collect intents, split at the per-tick cap.
    pub fn on_data(
        &mut self,
        ctx: &AlgoContext<'_>,
        slice: &Slice,
    ) -> Result<TickActions, HostError> {
        let cap = self.max_intents_per_tick;
        let algorithm = self.enter_running("on_data")?;
        let mut intents = algorithm.on_data(ctx, slice).intents;
        let overflow = if intents.len() > cap {
            intents.split_off(cap)
        } else {
            Vec::new()
        };
        Ok(TickActions {
            accepted: intents,
            overflow,
        })
    }

    /// Notify the algorithm of universe membership changes.
    pub fn on_securities_changed(
        &mut self,
        ctx: &AlgoContext<'_>,
        changes: &SecurityChanges,
    ) -> Result<(), HostError> {
        let algorithm = self.enter_running("on_securities_changed")?;
        algorithm.on_securities_changed(ctx, changes);
        Ok(())
    }

    /// Run the algorithm's universe selection over a candidate snapshot.
    pub fn select_universe(
        &mut self,
        candidates: &[UniverseCandidate],
    ) -> Result<Vec<String>, HostError> {
        let algorithm = self.enter_running("select_universe")?;
        Ok(algorithm.select_universe(candidates))
    }

    /// Finish the run.
    ///
    /// The outer `Result` is the host protocol (phase errors); the inner
    /// one is the algorithm's end-of-run verdict.
    pub fn end(
        &mut self,
        ctx: &AlgoContext<'_>,
    ) -> Result<Result<(), InvariantViolation>, HostError> {
        match self.phase {
            LifecyclePhase::Initialized | LifecyclePhase::Running => {}
            phase => {
                return Err(HostError::PhaseViolation {
                    operation: "end",
                    phase,
                })
            }
        }
        let algorithm = self
            .algorithm
            .as_mut()
            .ok_or(HostError::NoAlgorithmRegistered)?;
        self.phase = LifecyclePhase::Ended;
        Ok(algorithm.on_end_of_algorithm(ctx))
    }
}
