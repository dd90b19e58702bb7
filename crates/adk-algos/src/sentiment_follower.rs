use adk_algorithm::{AlgoActions, AlgoContext, Algorithm, AlgorithmSetup, CustomKind, SetupError};
use adk_data::{Resolution, Slice};

/// Enter long when weekly sentiment clears this score (micros).
const ENTRY_SCORE_MICROS: i64 = 70_000;
/// Liquidate when weekly sentiment drops below this score (micros).
const EXIT_SCORE_MICROS: i64 = -50_000;
/// Fraction of equity targeted on entry (micros).
const ALLOCATION_MICROS: i64 = 500_000;

/// Trades one ticker on weekly aggregated sentiment.
///
/// Flat, no open orders, and score above +0.07: target half of equity.
/// Invested and score below -0.05: liquidate. Anything else, including a
/// tick without sentiment for the ticker, is a no-op.
pub struct SentimentFollower {
    tracked: String,
}

impl SentimentFollower {
    pub fn new() -> Self {
        Self {
            tracked: "CPRI".to_string(),
        }
    }
}

impl Default for SentimentFollower {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for SentimentFollower {
    fn name(&self) -> &str {
        "sentiment_follower"
    }

    fn setup(&mut self) -> Result<AlgorithmSetup, SetupError> {
        AlgorithmSetup::builder()
            .window_ymd((2017, 1, 1), (2019, 8, 1))
            .cash_micros(100_000 * 1_000_000)
            .add_equity(self.tracked.clone())
            .add_custom(self.tracked.clone(), CustomKind::WeeklySentiment)
            .resolution(Resolution::Daily)
            .build()
    }

    fn on_data(&mut self, ctx: &AlgoContext<'_>, slice: &Slice) -> AlgoActions {
        if let Some(event) = slice.symbol_changed(&self.tracked) {
            ctx.diag.log(&format!(
                "{} - renaming from {} to {}",
                ctx.now, event.old_ticker, event.new_ticker
            ));
            self.tracked = event.new_ticker.clone();
        }

        let Some(sentiment) = slice.weekly_sentiment(&self.tracked) else {
            return AlgoActions::none();
        };

        let invested = ctx.portfolio.invested(&self.tracked);
        if !invested && ctx.open_orders == 0 && sentiment.score_micros > ENTRY_SCORE_MICROS {
            ctx.diag
                .log(&format!("{} - order placed for {}", ctx.now, self.tracked));
            return AlgoActions::none().set_holdings(self.tracked.clone(), ALLOCATION_MICROS);
        }
        if invested && sentiment.score_micros < EXIT_SCORE_MICROS {
            ctx.diag.log(&format!(
                "{} - liquidating {} - current qty: {}",
                ctx.now,
                self.tracked,
                ctx.portfolio.qty(&self.tracked)
            ));
            return AlgoActions::none().liquidate(self.tracked.clone());
        }
        AlgoActions::none()
    }
}
