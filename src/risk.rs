//! Pre-trade checks. Run before any reducer writes so a rejected command
//! leaves the portfolio exactly as it was.

use crate::error::{TradeError, TradeResult};
use crate::state::Portfolio;
use crate::types::{Holding, Stock};
use crate::utils::SHARE_EPSILON;

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

pub fn pre_check_buy(portfolio: &Portfolio, stock: &Stock, dollar_amount: f64) -> TradeResult<()> {
    if !positive(dollar_amount) {
        return Err(TradeError::InvalidAmount {
            amount: dollar_amount,
        });
    }
    if !positive(stock.price) {
        return Err(TradeError::InvalidPrice {
            ticker: stock.ticker.clone(),
            price: stock.price,
        });
    }
    if dollar_amount > portfolio.cash() {
        return Err(TradeError::InsufficientFunds {
            requested: dollar_amount,
            available: portfolio.cash(),
        });
    }
    Ok(())
}

/// Returns the holding being sold from.
pub fn pre_check_sell<'a>(
    portfolio: &'a Portfolio,
    ticker: &str,
    shares: f64,
) -> TradeResult<&'a Holding> {
    let Some(held) = portfolio.holding(ticker) else {
        return Err(TradeError::StockNotFound {
            ticker: ticker.to_string(),
        });
    };
    if !positive(shares) {
        return Err(TradeError::InvalidAmount { amount: shares });
    }
    if shares > held.shares + SHARE_EPSILON {
        return Err(TradeError::InsufficientShares {
            ticker: ticker.to_string(),
            requested: shares,
            held: held.shares,
        });
    }
    if !positive(held.stock.price) {
        return Err(TradeError::InvalidPrice {
            ticker: ticker.to_string(),
            price: held.stock.price,
        });
    }
    Ok(held)
}
