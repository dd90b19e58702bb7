use adk_algorithm::{
    AlgoActions, AlgoContext, Algorithm, AlgorithmSetup, SetupError, UniversePlan,
};
use adk_data::{Resolution, Slice};
use adk_universe::{CoarsePipeline, FilterStage, SecurityChanges, UniverseCandidate};

/// Dollar floor for the price filter (micros).
const PRICE_FLOOR_MICROS: i64 = 5_000_000;
const TOP_BY_DOLLAR_VOLUME: usize = 500;

const STAGE_SERIES: [&str; 4] = ["AllSecurities", "Stocks", "StocksAboveFive", "TopDollarVolume"];

/// Coarse liquidity universe: has fundamental data, price above $5,
/// top 500 by dollar volume.
///
/// Selection is the declared pipeline in fixed stage order; the surviving
/// count after each stage is plotted on the next data tick. Orders are
/// never issued from membership changes.
pub struct CoarseLiquidityUniverse {
    pipeline: CoarsePipeline,
    pending_counts: Option<Vec<usize>>,
}

impl CoarseLiquidityUniverse {
    pub fn new() -> Self {
        Self {
            pipeline: CoarsePipeline::new(vec![
                FilterStage::HasFundamentalData,
                FilterStage::MinPriceMicros(PRICE_FLOOR_MICROS),
                FilterStage::TopByDollarVolume(TOP_BY_DOLLAR_VOLUME),
            ]),
            pending_counts: None,
        }
    }
}

impl Default for CoarseLiquidityUniverse {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for CoarseLiquidityUniverse {
    fn name(&self) -> &str {
        "coarse_liquidity_universe"
    }

    fn setup(&mut self) -> Result<AlgorithmSetup, SetupError> {
        AlgorithmSetup::builder()
            .window_ymd((2020, 6, 1), (2020, 11, 9))
            .cash_micros(10_000 * 1_000_000)
            .universe(UniversePlan::default())
            .resolution(Resolution::Daily)
            .build()
    }

    fn on_data(&mut self, ctx: &AlgoContext<'_>, _slice: &Slice) -> AlgoActions {
        if let Some(counts) = self.pending_counts.take() {
            for (series, count) in STAGE_SERIES.iter().zip(counts) {
                ctx.diag.plot("Strategy Equity", series, count as i64);
            }
        }
        AlgoActions::none()
    }

    fn on_securities_changed(&mut self, ctx: &AlgoContext<'_>, changes: &SecurityChanges) {
        ctx.diag.log(&format!(
            "{} - removed securities: {}",
            ctx.now,
            changes.removed.len()
        ));
    }

    fn select_universe(&mut self, candidates: &[UniverseCandidate]) -> Vec<String> {
        let (selected, counts) = self.pipeline.select_with_counts(candidates);
        self.pending_counts = Some(counts);
        selected
    }
}
