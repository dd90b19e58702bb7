use crate::UniverseCandidate;

/// Hard cap on selection output size when none is declared.
pub const DEFAULT_UNIVERSE_CAP: usize = 500;

/// One declarative filter predicate in a coarse-selection pipeline.
///
/// Every stage's output is a subset of its input (monotonic narrowing),
/// and applying the same stage twice yields the same output (idempotent).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterStage {
    /// Keep candidates that carry fundamental data.
    HasFundamentalData,
    /// Keep candidates priced strictly above the floor.
    MinPriceMicros(i64),
    /// Keep the top `k` by dollar volume, descending; ties break by symbol
    /// ascending so the ordering is total.
    TopByDollarVolume(usize),
}

impl FilterStage {
    pub fn apply(&self, input: &[UniverseCandidate]) -> Vec<UniverseCandidate> {
        match self {
            FilterStage::HasFundamentalData => input
                .iter()
                .filter(|c| c.has_fundamental_data)
                .cloned()
                .collect(),
            FilterStage::MinPriceMicros(floor) => input
                .iter()
                .filter(|c| c.price_micros > *floor)
                .cloned()
                .collect(),
            FilterStage::TopByDollarVolume(k) => {
                let mut ranked: Vec<UniverseCandidate> = input.to_vec();
                ranked.sort_by(|a, b| {
                    b.dollar_volume_micros
                        .cmp(&a.dollar_volume_micros)
                        .then_with(|| a.symbol.cmp(&b.symbol))
                });
                ranked.truncate(*k);
                ranked
            }
        }
    }
}

/// A coarse-selection pipeline: stages applied in declared order, then a
/// hard cap on the number of symbols returned.
///
/// Returning an empty set is valid and must not be treated as an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoarsePipeline {
    stages: Vec<FilterStage>,
    cap: usize,
}

impl CoarsePipeline {
    pub fn new(stages: Vec<FilterStage>) -> Self {
        Self {
            stages,
            cap: DEFAULT_UNIVERSE_CAP,
        }
    }

    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    /// Run every stage in order and return the surviving symbols.
    pub fn select(&self, candidates: &[UniverseCandidate]) -> Vec<String> {
        let mut current = candidates.to_vec();
        for stage in &self.stages {
            current = stage.apply(&current);
        }
        current.truncate(self.cap);
        current.into_iter().map(|c| c.symbol).collect()
    }

    /// Like `select`, but also reports the candidate count surviving each
    /// stage (for diagnostics plotting).
    pub fn select_with_counts(
        &self,
        candidates: &[UniverseCandidate],
    ) -> (Vec<String>, Vec<usize>) {
        let mut counts = Vec::with_capacity(self.stages.len() + 1);
        counts.push(candidates.len());
        let mut current = candidates.to_vec();
        for stage in &self.stages {
            current = stage.apply(&current);
            counts.push(current.len());
        }
        current.truncate(self.cap);
        (current.into_iter().map(|c| c.symbol).collect(), counts)
    }
}
