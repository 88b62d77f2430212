//! Portfolio aggregate and the pure buy/sell reducers that produce its next
//! state. Reducers never modify their input; the caller swaps in the result.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{TradeError, TradeResult};
use crate::risk::{pre_check_buy, pre_check_sell};
use crate::types::{Holding, PlEntry, SharedStock, Side};
use crate::utils::SHARE_EPSILON;

/// Holdings keyed by ticker; at most one entry per ticker.
pub type Holdings = BTreeMap<String, Holding>;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Portfolio {
    cash: f64,
    holdings: Holdings,
    /// Realized P/L entries, one per sell.
    realized: Vec<PlEntry>,
    version: u64,
    last_updated: DateTime<Utc>,
}

/// What a committed command did.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Execution {
    pub ticker: String,
    pub side: Side,
    pub shares: f64,
    pub price: f64,
    pub amount: f64,
    pub cash_after: f64,
    pub version: u64,
}

impl Portfolio {
    pub fn new(initial_cash: f64, at: DateTime<Utc>) -> TradeResult<Self> {
        if !initial_cash.is_finite() || initial_cash < 0.0 {
            return Err(TradeError::InvalidAmount {
                amount: initial_cash,
            });
        }
        Ok(Self {
            cash: initial_cash,
            holdings: Holdings::new(),
            realized: Vec::new(),
            version: 0,
            last_updated: at,
        })
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn holdings(&self) -> &Holdings {
        &self.holdings
    }

    pub fn holding(&self, ticker: &str) -> Option<&Holding> {
        self.holdings.get(ticker)
    }

    pub fn realized(&self) -> &[PlEntry] {
        &self.realized
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Market value of all holdings.
    pub fn portfolio_value(&self) -> f64 {
        self.holdings.values().map(Holding::value).sum()
    }

    /// Cash plus holdings.
    pub fn total_value(&self) -> f64 {
        self.cash + self.portfolio_value()
    }

    pub fn realized_pl_total(&self) -> f64 {
        self.realized.iter().map(|e| e.realized_pl).sum()
    }

    pub fn unrealized_pl_total(&self) -> f64 {
        self.holdings.values().map(Holding::unrealized_pl).sum()
    }

    /// Points a held ticker at a newer quote snapshot. Shares and cost basis
    /// are untouched, so this is not a committed mutation.
    pub(crate) fn relink(&mut self, stock: &SharedStock) -> bool {
        match self.holdings.get_mut(&stock.ticker) {
            Some(h) if !Arc::ptr_eq(&h.stock, stock) => {
                h.stock = Arc::clone(stock);
                true
            }
            _ => false,
        }
    }

    fn stamp(&mut self, at: DateTime<Utc>) {
        self.version += 1;
        self.last_updated = self.last_updated.max(at);
    }
}

/// Adds `dollar_amount` worth of `stock` to `holdings`, merging into an
/// existing position at the dollar-weighted average cost.
///
/// Both the committing buy and the impact preview go through here. Callers
/// must have checked that the amount and price are positive.
pub fn merge_purchase(
    holdings: &mut Holdings,
    stock: &SharedStock,
    dollar_amount: f64,
    at: DateTime<Utc>,
) -> f64 {
    let new_shares = dollar_amount / stock.price;
    match holdings.get_mut(&stock.ticker) {
        Some(h) => {
            let total_shares = h.shares + new_shares;
            h.purchase_price = (h.shares * h.purchase_price + dollar_amount) / total_shares;
            h.shares = total_shares;
            h.stock = Arc::clone(stock);
        }
        None => {
            holdings.insert(
                stock.ticker.clone(),
                Holding {
                    stock: Arc::clone(stock),
                    shares: new_shares,
                    purchase_price: stock.price,
                    purchase_date: at,
                },
            );
        }
    }
    new_shares
}

pub fn apply_buy(
    portfolio: &Portfolio,
    stock: &SharedStock,
    dollar_amount: f64,
    at: DateTime<Utc>,
) -> TradeResult<(Portfolio, Execution)> {
    pre_check_buy(portfolio, stock, dollar_amount)?;

    let mut next = portfolio.clone();
    let shares = merge_purchase(&mut next.holdings, stock, dollar_amount, at);
    next.cash -= dollar_amount;
    next.stamp(at);

    let exec = Execution {
        ticker: stock.ticker.clone(),
        side: Side::Buy,
        shares,
        price: stock.price,
        amount: dollar_amount,
        cash_after: next.cash,
        version: next.version,
    };
    Ok((next, exec))
}

pub fn apply_sell(
    portfolio: &Portfolio,
    ticker: &str,
    shares: f64,
    at: DateTime<Utc>,
) -> TradeResult<(Portfolio, Execution)> {
    let held = pre_check_sell(portfolio, ticker, shares)?;
    // an overshoot within SHARE_EPSILON liquidates exactly what is held
    let qty = shares.min(held.shares);
    let price = held.stock.price;
    let proceeds = qty * price;
    let realized_pl = (price - held.purchase_price) * qty;
    let remaining = held.shares - qty;

    let mut next = portfolio.clone();
    if remaining < SHARE_EPSILON {
        next.holdings.remove(ticker);
    } else if let Some(h) = next.holdings.get_mut(ticker) {
        h.shares = remaining;
    }
    next.cash += proceeds;
    next.realized.push(PlEntry {
        date: at.date_naive(),
        ticker: ticker.to_string(),
        shares: qty,
        realized_pl,
    });
    next.stamp(at);

    let exec = Execution {
        ticker: ticker.to_string(),
        side: Side::Sell,
        shares: qty,
        price,
        amount: proceeds,
        cash_after: next.cash,
        version: next.version,
    };
    Ok((next, exec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::fixtures::{at, stock};

    fn must_buy(p: &Portfolio, s: &SharedStock, amount: f64, t: i64) -> Portfolio {
        apply_buy(p, s, amount, at(t))
            .unwrap_or_else(|e| panic!("buy should succeed: {e}"))
            .0
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn new_rejects_negative_cash() {
        assert_eq!(
            Portfolio::new(-1.0, at(0)).unwrap_err().kind(),
            ErrorKind::InvalidAmount
        );
        assert!(Portfolio::new(0.0, at(0)).is_ok());
    }

    #[test]
    fn buy_deducts_cash_exactly_and_stamps() {
        let p = Portfolio::new(1000.0, at(0)).unwrap();
        let a = stock("A", "Tech", 37.0, [50.0; 4]);
        let (next, exec) = apply_buy(&p, &a, 123.45, at(5)).unwrap();
        assert_eq!(next.cash(), 1000.0 - 123.45);
        assert_eq!(next.version(), 1);
        assert_eq!(next.last_updated(), at(5));
        assert_eq!(exec.side, Side::Buy);
        assert!(approx(exec.shares, 123.45 / 37.0));
        // input untouched
        assert_eq!(p.cash(), 1000.0);
        assert!(p.is_empty());
    }

    #[test]
    fn rebuy_merges_at_dollar_weighted_cost() {
        let p = Portfolio::new(1000.0, at(0)).unwrap();
        let p = must_buy(&p, &stock("A", "Tech", 10.0, [50.0; 4]), 50.0, 1);
        let p = must_buy(&p, &stock("A", "Tech", 20.0, [50.0; 4]), 50.0, 2);
        let h = p.holding("A").unwrap();
        assert_eq!(p.holdings().len(), 1);
        assert!(approx(h.shares, 7.5));
        assert!(approx(h.purchase_price, (50.0 + 50.0) / (50.0 / 10.0 + 50.0 / 20.0)));
        // relinked to the latest snapshot, first purchase date kept
        assert_eq!(h.stock.price, 20.0);
        assert_eq!(h.purchase_date, at(1));
    }

    #[test]
    fn sell_credits_cash_and_records_pl() {
        let p = Portfolio::new(100.0, at(0)).unwrap();
        let p = must_buy(&p, &stock("A", "Tech", 10.0, [50.0; 4]), 50.0, 1);
        let p = {
            let mut q = p.clone();
            q.relink(&stock("A", "Tech", 12.0, [50.0; 4]));
            q
        };
        let (next, exec) = apply_sell(&p, "A", 2.0, at(2)).unwrap();
        assert_eq!(next.cash(), p.cash() + 2.0 * 12.0);
        assert!(approx(next.holding("A").unwrap().shares, 3.0));
        assert_eq!(exec.amount, 24.0);
        assert_eq!(next.realized().len(), 1);
        assert!(approx(next.realized_pl_total(), 4.0));
        assert_eq!(next.version(), 2);
    }

    #[test]
    fn sell_within_epsilon_liquidates() {
        let p = Portfolio::new(100.0, at(0)).unwrap();
        let p = must_buy(&p, &stock("A", "Tech", 3.0, [50.0; 4]), 10.0, 1);
        let held = p.holding("A").unwrap().shares;
        let (next, exec) = apply_sell(&p, "A", held + SHARE_EPSILON / 2.0, at(2)).unwrap();
        assert!(next.is_empty());
        assert_eq!(exec.shares, held);
    }

    #[test]
    fn dust_remainder_is_removed() {
        let p = Portfolio::new(100.0, at(0)).unwrap();
        let p = must_buy(&p, &stock("A", "Tech", 10.0, [50.0; 4]), 50.0, 1);
        let (next, _) = apply_sell(&p, "A", 5.0 - SHARE_EPSILON / 2.0, at(2)).unwrap();
        assert!(next.holding("A").is_none());
    }

    #[test]
    fn failed_commands_leave_input_unchanged() {
        let p = Portfolio::new(100.0, at(0)).unwrap();
        let p = must_buy(&p, &stock("A", "Tech", 10.0, [50.0; 4]), 50.0, 1);
        let before = p.clone();
        assert!(apply_buy(&p, &stock("B", "Tech", 10.0, [50.0; 4]), 51.0, at(2)).is_err());
        assert!(apply_sell(&p, "A", 6.0, at(2)).is_err());
        assert!(apply_sell(&p, "B", 1.0, at(2)).is_err());
        assert_eq!(p, before);
    }

    #[test]
    fn last_updated_never_moves_backwards() {
        let p = Portfolio::new(100.0, at(10)).unwrap();
        let p = must_buy(&p, &stock("A", "Tech", 10.0, [50.0; 4]), 10.0, 3);
        assert_eq!(p.last_updated(), at(10));
        assert_eq!(p.version(), 1);
    }
}
