use adk_algorithm::{
    AlgoActions, AlgoContext, Algorithm, AlgorithmSetup, InvariantViolation, SetupError,
};
use adk_data::{Resolution, Slice};

/// Follows a ticker that is expected to rename during the run.
///
/// The rename is recorded when it arrives and checked at end of run: a
/// run in which the ticker never renamed is a failure, not a log line.
pub struct RenameWatcher {
    tracked: String,
    rename_seen: bool,
}

impl RenameWatcher {
    pub fn new() -> Self {
        Self {
            tracked: "TWX".to_string(),
            rename_seen: false,
        }
    }
}

impl Default for RenameWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for RenameWatcher {
    fn name(&self) -> &str {
        "rename_watcher"
    }

    fn setup(&mut self) -> Result<AlgorithmSetup, SetupError> {
        AlgorithmSetup::builder()
            .window_ymd((2001, 1, 1), (2004, 1, 1))
            .cash_micros(100_000 * 1_000_000)
            .add_equity(self.tracked.clone())
            .resolution(Resolution::Daily)
            .build()
    }

    fn on_data(&mut self, ctx: &AlgoContext<'_>, slice: &Slice) -> AlgoActions {
        if let Some(event) = slice.symbol_changed(&self.tracked) {
            ctx.diag.log(&format!(
                "{} - ticker changed from {} to {}",
                ctx.now, event.old_ticker, event.new_ticker
            ));
            self.tracked = event.new_ticker.clone();
            self.rename_seen = true;
        }
        AlgoActions::none()
    }

    fn on_end_of_algorithm(&mut self, _ctx: &AlgoContext<'_>) -> Result<(), InvariantViolation> {
        if !self.rename_seen {
            return Err(InvariantViolation::new(
                "the ticker did not rename throughout the course of its life even though it should have",
            ));
        }
        Ok(())
    }
}
