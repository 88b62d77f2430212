//! Ledger command failures. Every variant is detected before any state is
//! touched.

use serde::Serialize;
use thiserror::Error;

pub type TradeResult<T> = Result<T, TradeError>;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidAmount,
    InvalidPrice,
    InsufficientFunds,
    InsufficientShares,
    StockNotFound,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TradeError {
    #[error("amount must be a positive number, got {amount}")]
    InvalidAmount { amount: f64 },

    #[error("{ticker}: price must be a positive number, got {price}")]
    InvalidPrice { ticker: String, price: f64 },

    #[error("buy of ${requested:.2} exceeds available cash ${available:.2}")]
    InsufficientFunds { requested: f64, available: f64 },

    #[error("cannot sell {requested:.4} shares of {ticker}: holding {held:.4}")]
    InsufficientShares {
        ticker: String,
        requested: f64,
        held: f64,
    },

    #[error("no holding for {ticker}")]
    StockNotFound { ticker: String },
}

impl TradeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount { .. } => ErrorKind::InvalidAmount,
            Self::InvalidPrice { .. } => ErrorKind::InvalidPrice,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::InsufficientShares { .. } => ErrorKind::InsufficientShares,
            Self::StockNotFound { .. } => ErrorKind::StockNotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_message() {
        let e = TradeError::InsufficientShares {
            ticker: "A".into(),
            requested: 8.5,
            held: 7.5,
        };
        assert_eq!(e.kind(), ErrorKind::InsufficientShares);
        assert_eq!(
            e.to_string(),
            "cannot sell 8.5000 shares of A: holding 7.5000"
        );
        let e = TradeError::InsufficientFunds {
            requested: 150.0,
            available: 100.0,
        };
        assert_eq!(e.to_string(), "buy of $150.00 exceeds available cash $100.00");
    }
}
