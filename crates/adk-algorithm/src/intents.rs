/// One order/liquidation request returned from `on_data`.
///
/// Intents, not orders: the host converts, queues, and settles them — the
/// algorithm never observes same-tick settlement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderIntent {
    /// Target a fraction of current equity in `symbol`.
    /// `weight_micros` is the fraction in micros (50% => 500_000).
    SetHoldingsWeight { symbol: String, weight_micros: i64 },
    /// Close out the entire existing position in `symbol`.
    Liquidate { symbol: String },
    /// Trade a fixed signed quantity (+buy, -sell).
    MarketOrder { symbol: String, qty: i64 },
}

impl OrderIntent {
    pub fn symbol(&self) -> &str {
        match self {
            OrderIntent::SetHoldingsWeight { symbol, .. } => symbol,
            OrderIntent::Liquidate { symbol } => symbol,
            OrderIntent::MarketOrder { symbol, .. } => symbol,
        }
    }
}

/// The bounded list of intents produced by one `on_data` call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlgoActions {
    pub intents: Vec<OrderIntent>,
}

impl AlgoActions {
    /// No action this tick. Absent data is a no-op, not an error.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn set_holdings(mut self, symbol: impl Into<String>, weight_micros: i64) -> Self {
        self.intents.push(OrderIntent::SetHoldingsWeight {
            symbol: symbol.into(),
            weight_micros,
        });
        self
    }

    pub fn liquidate(mut self, symbol: impl Into<String>) -> Self {
        self.intents.push(OrderIntent::Liquidate {
            symbol: symbol.into(),
        });
        self
    }

    pub fn market_order(mut self, symbol: impl Into<String>, qty: i64) -> Self {
        self.intents.push(OrderIntent::MarketOrder {
            symbol: symbol.into(),
            qty,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}
