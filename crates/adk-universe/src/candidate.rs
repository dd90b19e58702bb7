use serde::{Deserialize, Serialize};

/// Per-symbol snapshot evaluated during coarse selection.
///
/// Discarded after each selection call; never retained by algorithms.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseCandidate {
    pub symbol: String,
    pub price_micros: i64,
    /// Traded dollar volume in micros (price * share volume).
    pub dollar_volume_micros: i64,
    pub has_fundamental_data: bool,
}

impl UniverseCandidate {
    pub fn new(
        symbol: impl Into<String>,
        price_micros: i64,
        dollar_volume_micros: i64,
        has_fundamental_data: bool,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price_micros,
            dollar_volume_micros,
            has_fundamental_data,
        }
    }
}
