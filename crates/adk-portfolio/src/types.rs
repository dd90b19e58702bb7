use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// An executed fill. Quantity is always positive; `side` carries direction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub symbol: String,
    pub side: Side,
    pub qty: i64,
    pub price_micros: i64,
    pub fee_micros: i64,
}

impl Fill {
    pub fn new(
        symbol: impl Into<String>,
        side: Side,
        qty: i64,
        price_micros: i64,
        fee_micros: i64,
    ) -> Self {
        debug_assert!(qty > 0, "Fill.qty must be > 0");
        Self {
            symbol: symbol.into(),
            side,
            qty,
            price_micros,
            fee_micros,
        }
    }
}

/// Current holding in one symbol. Signed quantity: +long, -short.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub qty: i64,
    pub avg_cost_micros: i64,
}

impl Holding {
    pub fn invested(&self) -> bool {
        self.qty != 0
    }
}

/// Host-owned portfolio state: cash plus positions keyed by symbol.
///
/// Algorithms read through `holding()` (always `Option`); only the engine
/// mutates, by applying fills and renames.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioState {
    pub cash_micros: i64,
    pub positions: BTreeMap<String, Holding>,
}

impl PortfolioState {
    pub fn new(cash_micros: i64) -> Self {
        Self {
            cash_micros,
            positions: BTreeMap::new(),
        }
    }

    pub fn holding(&self, symbol: &str) -> Option<&Holding> {
        self.positions.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.positions.contains_key(symbol)
    }

    /// Signed quantity for `symbol`; 0 when the symbol has no position.
    pub fn qty(&self, symbol: &str) -> i64 {
        self.positions.get(symbol).map(|h| h.qty).unwrap_or(0)
    }

    pub fn invested(&self, symbol: &str) -> bool {
        self.qty(symbol) != 0
    }

    /// Re-key a position when a symbol rename lands.
    ///
    /// If a position already exists under the new ticker the quantities are
    /// netted and the average cost is volume-weighted.
    pub fn rename_position(&mut self, old: &str, new: &str) {
        let Some(moved) = self.positions.remove(old) else {
            return;
        };
        match self.positions.remove(new) {
            None => {
                self.positions.insert(new.to_string(), moved);
            }
            Some(existing) => {
                let qty = existing.qty + moved.qty;
                if qty == 0 {
                    return;
                }
                let w_existing = existing.qty.unsigned_abs() as i128;
                let w_moved = moved.qty.unsigned_abs() as i128;
                let total = w_existing + w_moved;
                let avg = (existing.avg_cost_micros as i128 * w_existing
                    + moved.avg_cost_micros as i128 * w_moved)
                    / total;
                self.positions.insert(
                    new.to_string(),
                    Holding {
                        qty,
                        avg_cost_micros: avg as i64,
                    },
                );
            }
        }
    }
}
