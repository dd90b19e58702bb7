use crate::types::{Fill, Holding, PortfolioState, Side};

/// Notional value of `qty` shares at `price_micros`, clamped to i64.
fn notional_micros(qty: i64, price_micros: i64) -> i64 {
    let n = (qty as i128) * (price_micros as i128);
    if n > i64::MAX as i128 {
        i64::MAX
    } else if n < i64::MIN as i128 {
        i64::MIN
    } else {
        n as i64
    }
}

/// Apply a fill to the portfolio: cash moves immediately, the position nets
/// through zero with signed quantities.
///
/// Average cost is volume-weighted while extending a position, preserved
/// while reducing, and reset to the fill price when the position flips sign.
/// A position that nets to exactly zero is removed from the map.
pub fn apply_fill(state: &mut PortfolioState, fill: &Fill) {
    let signed = match fill.side {
        Side::Buy => fill.qty,
        Side::Sell => -fill.qty,
    };

    let notional = notional_micros(fill.qty, fill.price_micros);
    match fill.side {
        Side::Buy => {
            state.cash_micros = state
                .cash_micros
                .saturating_sub(notional)
                .saturating_sub(fill.fee_micros);
        }
        Side::Sell => {
            state.cash_micros = state
                .cash_micros
                .saturating_add(notional)
                .saturating_sub(fill.fee_micros);
        }
    }

    let prev = state
        .positions
        .get(&fill.symbol)
        .cloned()
        .unwrap_or(Holding {
            qty: 0,
            avg_cost_micros: 0,
        });
    let new_qty = prev.qty + signed;

    if new_qty == 0 {
        state.positions.remove(&fill.symbol);
        return;
    }

    let avg_cost_micros = if prev.qty == 0 {
        fill.price_micros
    } else if prev.qty.signum() == signed.signum() {
        // Extending: volume-weighted average cost.
        let w_prev = prev.qty.unsigned_abs() as i128;
        let w_add = signed.unsigned_abs() as i128;
        ((prev.avg_cost_micros as i128 * w_prev + fill.price_micros as i128 * w_add)
            / (w_prev + w_add)) as i64
    } else if new_qty.signum() != prev.qty.signum() {
        // Flipped through zero: the residual lot was opened at this fill.
        fill.price_micros
    } else {
        // Reduced: cost basis of the remaining lot is unchanged.
        prev.avg_cost_micros
    };

    state.positions.insert(
        fill.symbol.clone(),
        Holding {
            qty: new_qty,
            avg_cost_micros,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MICROS_SCALE;

    fn usd(x: i64) -> i64 {
        x * MICROS_SCALE
    }

    #[test]
    fn buy_opens_long_and_debits_cash() {
        let mut p = PortfolioState::new(usd(100_000));
        apply_fill(&mut p, &Fill::new("AAPL", Side::Buy, 100, usd(150), 0));

        assert_eq!(p.cash_micros, usd(100_000) - 100 * usd(150));
        let h = p.holding("AAPL").unwrap();
        assert_eq!(h.qty, 100);
        assert_eq!(h.avg_cost_micros, usd(150));
    }

    #[test]
    fn extending_long_volume_weights_cost() {
        let mut p = PortfolioState::new(usd(100_000));
        apply_fill(&mut p, &Fill::new("AAPL", Side::Buy, 100, usd(100), 0));
        apply_fill(&mut p, &Fill::new("AAPL", Side::Buy, 100, usd(200), 0));

        let h = p.holding("AAPL").unwrap();
        assert_eq!(h.qty, 200);
        assert_eq!(h.avg_cost_micros, usd(150));
    }

    #[test]
    fn selling_to_flat_removes_position() {
        let mut p = PortfolioState::new(usd(100_000));
        apply_fill(&mut p, &Fill::new("AAPL", Side::Buy, 100, usd(100), 0));
        apply_fill(&mut p, &Fill::new("AAPL", Side::Sell, 100, usd(110), 0));

        assert!(p.holding("AAPL").is_none());
        assert_eq!(p.cash_micros, usd(100_000) + 100 * usd(10));
    }

    #[test]
    fn partial_sell_keeps_cost_basis() {
        let mut p = PortfolioState::new(usd(100_000));
        apply_fill(&mut p, &Fill::new("AAPL", Side::Buy, 100, usd(100), 0));
        apply_fill(&mut p, &Fill::new("AAPL", Side::Sell, 40, usd(120), 0));

        let h = p.holding("AAPL").unwrap();
        assert_eq!(h.qty, 60);
        assert_eq!(h.avg_cost_micros, usd(100));
    }

    #[test]
    fn flip_through_zero_resets_cost_basis() {
        let mut p = PortfolioState::new(usd(100_000));
        apply_fill(&mut p, &Fill::new("AAPL", Side::Buy, 100, usd(100), 0));
        apply_fill(&mut p, &Fill::new("AAPL", Side::Sell, 150, usd(90), 0));

        let h = p.holding("AAPL").unwrap();
        assert_eq!(h.qty, -50);
        assert_eq!(h.avg_cost_micros, usd(90));
    }

    #[test]
    fn fees_debit_cash_on_both_sides() {
        let mut p = PortfolioState::new(usd(1_000));
        apply_fill(&mut p, &Fill::new("X", Side::Buy, 1, usd(100), usd(1)));
        apply_fill(&mut p, &Fill::new("X", Side::Sell, 1, usd(100), usd(1)));

        assert_eq!(p.cash_micros, usd(1_000) - 2 * usd(1));
    }

    #[test]
    fn rename_moves_holding_to_new_key() {
        let mut p = PortfolioState::new(usd(1_000));
        apply_fill(&mut p, &Fill::new("TWX", Side::Buy, 10, usd(50), 0));

        p.rename_position("TWX", "AOL");
        assert!(p.holding("TWX").is_none());
        assert_eq!(p.holding("AOL").unwrap().qty, 10);
    }
}
