//! Holding ledger: sole owner of the portfolio. Commands run the reducers in
//! `state` and swap in the result only on success.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregator::{portfolio_metrics, CategoryScoreSet};
use crate::error::TradeResult;
use crate::market::Market;
use crate::simulator::{self, ImpactResult};
use crate::state::{apply_buy, apply_sell, Execution, Portfolio};
use crate::types::{Holding, PlEntry, SharedStock};
use crate::utils::sanitize_symbol;

pub type Clock = fn() -> DateTime<Utc>;

/// Read view handed to observers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PortfolioSnapshot {
    pub cash: f64,
    pub holdings: Vec<Holding>,
    pub portfolio_value: f64,
    pub total_value: f64,
    pub version: u64,
    pub last_updated: DateTime<Utc>,
    pub portfolio_metrics: CategoryScoreSet,
    pub realized: Vec<PlEntry>,
    pub realized_pl_total: f64,
    pub unrealized_pl_total: f64,
}

#[derive(Debug)]
pub struct Ledger {
    portfolio: Portfolio,
    clock: Clock,
}

impl Ledger {
    pub fn new(initial_cash: f64) -> TradeResult<Self> {
        Self::with_clock(initial_cash, Utc::now)
    }

    pub fn with_clock(initial_cash: f64, clock: Clock) -> TradeResult<Self> {
        Ok(Self {
            portfolio: Portfolio::new(initial_cash, clock())?,
            clock,
        })
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// `(version, last_updated)`; changes on every committed command.
    pub fn change_stamp(&self) -> (u64, DateTime<Utc>) {
        (self.portfolio.version(), self.portfolio.last_updated())
    }

    pub fn buy(&mut self, stock: &SharedStock, dollar_amount: f64) -> TradeResult<Execution> {
        match apply_buy(&self.portfolio, stock, dollar_amount, (self.clock)()) {
            Ok((next, exec)) => {
                self.portfolio = next;
                info!(
                    "BUY {} ${:.2} -> {:.4} sh @ {:.2}, cash ${:.2} (v{})",
                    exec.ticker, exec.amount, exec.shares, exec.price, exec.cash_after, exec.version
                );
                Ok(exec)
            }
            Err(e) => {
                warn!(kind = ?e.kind(), "buy {} rejected: {}", stock.ticker, e);
                Err(e)
            }
        }
    }

    pub fn sell(&mut self, ticker: &str, shares: f64) -> TradeResult<Execution> {
        let ticker = sanitize_symbol(ticker);
        match apply_sell(&self.portfolio, &ticker, shares, (self.clock)()) {
            Ok((next, exec)) => {
                self.portfolio = next;
                info!(
                    "SELL {} {:.4} sh @ {:.2} -> ${:.2}, cash ${:.2} (v{})",
                    exec.ticker, exec.shares, exec.price, exec.amount, exec.cash_after, exec.version
                );
                Ok(exec)
            }
            Err(e) => {
                warn!(kind = ?e.kind(), "sell {} rejected: {}", ticker, e);
                Err(e)
            }
        }
    }

    /// Sells the entire position in `ticker`.
    pub fn sell_all(&mut self, ticker: &str) -> TradeResult<Execution> {
        let shares = self
            .portfolio
            .holding(&sanitize_symbol(ticker))
            .map(|h| h.shares)
            .unwrap_or(0.0);
        // an unheld ticker still reports StockNotFound from sell
        self.sell(ticker, shares)
    }

    pub fn preview(&self, stock: &SharedStock, dollar_amount: f64) -> ImpactResult {
        simulator::preview(&self.portfolio, stock, dollar_amount, (self.clock)())
    }

    /// Relinks held tickers to the market's latest snapshots. Returns how many
    /// holdings picked up a new quote.
    pub fn apply_quotes(&mut self, market: &Market) -> usize {
        let tickers: Vec<String> = self.portfolio.holdings().keys().cloned().collect();
        tickers
            .iter()
            .filter_map(|t| market.get(t))
            .filter(|s| self.portfolio.relink(s))
            .count()
    }

    pub fn metrics(&self) -> CategoryScoreSet {
        portfolio_metrics(self.portfolio.holdings().values())
    }

    pub fn snapshot(&self) -> PortfolioSnapshot {
        let p = &self.portfolio;
        PortfolioSnapshot {
            cash: p.cash(),
            holdings: p.holdings().values().cloned().collect(),
            portfolio_value: p.portfolio_value(),
            total_value: p.total_value(),
            version: p.version(),
            last_updated: p.last_updated(),
            portfolio_metrics: self.metrics(),
            realized: p.realized().to_vec(),
            realized_pl_total: p.realized_pl_total(),
            unrealized_pl_total: p.unrealized_pl_total(),
        }
    }
}
