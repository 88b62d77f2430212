//! Core domain types for stocks, metric inputs, holdings and realized P/L.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One of the four scoring dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Performance,
    Stability,
    Value,
    Momentum,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Performance,
        Category::Stability,
        Category::Value,
        Category::Momentum,
    ];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

/// Raw per-category input as supplied by the market data provider.
///
/// A YAML/JSON number deserializes as `Numeric`, a string as `Qualitative`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetricInput {
    /// Already on a 0-100 scale.
    Numeric(f64),
    /// A label such as "High", "Fair" or "Unstable".
    Qualitative(String),
}

impl From<f64> for MetricInput {
    fn from(v: f64) -> Self {
        MetricInput::Numeric(v)
    }
}

impl From<&str> for MetricInput {
    fn from(s: &str) -> Self {
        MetricInput::Qualitative(s.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metrics {
    pub performance: MetricInput,
    pub stability: MetricInput,
    pub value: MetricInput,
    pub momentum: MetricInput,
}

impl Metrics {
    pub fn get(&self, category: Category) -> &MetricInput {
        match category {
            Category::Performance => &self.performance,
            Category::Stability => &self.stability,
            Category::Value => &self.value,
            Category::Momentum => &self.momentum,
        }
    }
}

/// A quote snapshot. Read-only to the engine; price changes arrive as whole
/// replacement snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stock {
    pub ticker: String,
    pub name: String,
    pub industry: String,
    pub price: f64,
    pub metrics: Metrics,
}

pub type SharedStock = Arc<Stock>;

/// Position in one stock with volume-weighted average cost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holding {
    pub stock: SharedStock,
    pub shares: f64,
    pub purchase_price: f64,
    pub purchase_date: DateTime<Utc>,
}

impl Holding {
    pub fn ticker(&self) -> &str {
        &self.stock.ticker
    }

    /// Current market value at the linked snapshot's price.
    pub fn value(&self) -> f64 {
        self.shares * self.stock.price
    }

    pub fn cost_basis(&self) -> f64 {
        self.shares * self.purchase_price
    }

    pub fn unrealized_pl(&self) -> f64 {
        self.value() - self.cost_basis()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlEntry {
    pub date: NaiveDate,
    pub ticker: String,
    pub shares: f64,
    pub realized_pl: f64, // USD, (sell price - avg cost) * shares
}
