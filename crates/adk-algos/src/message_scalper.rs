use adk_algorithm::{AlgoActions, AlgoContext, Algorithm, AlgorithmSetup, CustomKind, SetupError};
use adk_data::{Resolution, Slice};

const BULL_INTENSITY_MICROS: i64 = 2_000_000;
const BEAR_INTENSITY_MICROS: i64 = -2_000_000;
const MIN_SCORED_MESSAGES: u32 = 3;
/// Entry targets a tenth of equity (micros).
const ALLOCATION_MICROS: i64 = 100_000;

/// Trades one ticker on intraday message-level sentiment.
///
/// Enters a small long when bull intensity spikes on enough scored
/// messages; exits when bear intensity spikes the same way.
pub struct MessageSentimentScalper {
    tracked: String,
}

impl MessageSentimentScalper {
    pub fn new() -> Self {
        Self {
            tracked: "AAPL".to_string(),
        }
    }
}

impl Default for MessageSentimentScalper {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for MessageSentimentScalper {
    fn name(&self) -> &str {
        "message_sentiment_scalper"
    }

    fn setup(&mut self) -> Result<AlgorithmSetup, SetupError> {
        AlgorithmSetup::builder()
            .window_ymd((2011, 1, 1), (2013, 1, 1))
            .cash_micros(100_000 * 1_000_000)
            .add_equity(self.tracked.clone())
            .add_custom(self.tracked.clone(), CustomKind::MessageSentiment)
            .resolution(Resolution::Daily)
            .build()
    }

    fn on_data(&mut self, ctx: &AlgoContext<'_>, slice: &Slice) -> AlgoActions {
        let Some(row) = slice.message_sentiment(&self.tracked) else {
            return AlgoActions::none();
        };
        ctx.diag.debug(&format!(
            "{} - {} - bull: {} ({} msgs), bear: {} ({} msgs)",
            ctx.now,
            self.tracked,
            row.bull_intensity_micros,
            row.bull_scored_messages,
            row.bear_intensity_micros,
            row.bear_scored_messages
        ));

        let invested = ctx.portfolio.invested(&self.tracked);
        if invested
            && row.bear_intensity_micros < BEAR_INTENSITY_MICROS
            && row.bear_scored_messages >= MIN_SCORED_MESSAGES
        {
            return AlgoActions::none().liquidate(self.tracked.clone());
        }
        if !invested
            && ctx.open_orders == 0
            && row.bull_intensity_micros > BULL_INTENSITY_MICROS
            && row.bull_scored_messages >= MIN_SCORED_MESSAGES
        {
            return AlgoActions::none().set_holdings(self.tracked.clone(), ALLOCATION_MICROS);
        }
        AlgoActions::none()
    }
}
