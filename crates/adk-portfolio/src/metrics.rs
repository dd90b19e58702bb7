use std::collections::BTreeMap;

use crate::types::Holding;
use crate::MarkMap;

/// Equity = cash + sum of qty * mark across positions.
///
/// Positions without a mark contribute nothing (their last value is
/// unknown); callers keep marks fresh from bar closes.
pub fn compute_equity_micros(
    cash_micros: i64,
    positions: &BTreeMap<String, Holding>,
    marks: &MarkMap,
) -> i64 {
    let mut equity = cash_micros as i128;
    for (symbol, holding) in positions {
        if let Some(mark) = marks.get(symbol) {
            equity += holding.qty as i128 * *mark as i128;
        }
    }
    if equity > i64::MAX as i128 {
        i64::MAX
    } else if equity < i64::MIN as i128 {
        i64::MIN
    } else {
        equity as i64
    }
}
