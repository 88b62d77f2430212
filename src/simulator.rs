//! Impact preview: how a candidate buy would move every score and the
//! industry mix. Works on a private copy of the holdings and never fails.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::aggregator::{portfolio_metrics, CategoryScoreSet};
use crate::state::{merge_purchase, Holdings, Portfolio};
use crate::types::SharedStock;
use crate::utils::{round1, VALUE_EPSILON};

/// `new - current` per category, one decimal.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct ScoreDelta {
    pub performance: f64,
    pub stability: f64,
    pub value: f64,
    pub momentum: f64,
    pub quality_score: f64,
}

impl ScoreDelta {
    pub fn between(current: &CategoryScoreSet, new: &CategoryScoreSet) -> Self {
        let d = |a: u8, b: u8| round1(b as f64 - a as f64);
        Self {
            performance: d(current.performance, new.performance),
            stability: d(current.stability, new.stability),
            value: d(current.value, new.value),
            momentum: d(current.momentum, new.momentum),
            quality_score: d(current.quality_score, new.quality_score),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct AllocationShift {
    pub current_percent: f64,
    pub new_percent: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImpactResult {
    pub current_metrics: CategoryScoreSet,
    pub new_metrics: CategoryScoreSet,
    pub delta: ScoreDelta,
    pub industry_allocation: BTreeMap<String, AllocationShift>,
}

fn simulatable(stock: &SharedStock, dollar_amount: f64) -> bool {
    dollar_amount.is_finite() && dollar_amount > 0.0 && stock.price.is_finite() && stock.price > 0.0
}

fn industry_values(holdings: &Holdings) -> BTreeMap<&str, f64> {
    let mut out: BTreeMap<&str, f64> = BTreeMap::new();
    for h in holdings.values() {
        *out.entry(h.stock.industry.as_str()).or_default() += h.value();
    }
    out
}

fn percent(part: f64, total: f64) -> f64 {
    if total <= VALUE_EPSILON {
        return 0.0;
    }
    round1(part / total * 100.0)
}

/// Per-industry share of holdings value before and after, over the union of
/// industries present in either set.
pub fn allocation_shift(
    current: &Holdings,
    projected: &Holdings,
) -> BTreeMap<String, AllocationShift> {
    let before = industry_values(current);
    let after = industry_values(projected);
    let total_before: f64 = before.values().sum();
    let total_after: f64 = after.values().sum();

    before
        .keys()
        .chain(after.keys())
        .map(|industry| {
            let shift = AllocationShift {
                current_percent: percent(before.get(industry).copied().unwrap_or(0.0), total_before),
                new_percent: percent(after.get(industry).copied().unwrap_or(0.0), total_after),
            };
            (industry.to_string(), shift)
        })
        .collect()
}

/// Previews buying `dollar_amount` of `stock` against `portfolio`.
///
/// An empty portfolio previews as the candidate's own scorecard with its
/// industry at 100%. A non-positive amount or price simulates no purchase.
/// Cash is not checked.
pub fn preview(
    portfolio: &Portfolio,
    stock: &SharedStock,
    dollar_amount: f64,
    at: DateTime<Utc>,
) -> ImpactResult {
    let current = portfolio.holdings();
    let first_trade = current.is_empty();
    let current_metrics = if first_trade {
        CategoryScoreSet::ZERO
    } else {
        portfolio_metrics(current.values())
    };

    if !simulatable(stock, dollar_amount) {
        debug!(ticker = %stock.ticker, dollar_amount, "preview: nothing to simulate");
        return ImpactResult {
            current_metrics,
            new_metrics: current_metrics,
            delta: ScoreDelta::default(),
            industry_allocation: allocation_shift(current, current),
        };
    }

    let (new_metrics, industry_allocation) = if first_trade {
        let mut alloc = BTreeMap::new();
        alloc.insert(
            stock.industry.clone(),
            AllocationShift {
                current_percent: 0.0,
                new_percent: 100.0,
            },
        );
        (CategoryScoreSet::for_stock(stock), alloc)
    } else {
        let mut projected = current.clone();
        merge_purchase(&mut projected, stock, dollar_amount, at);
        (
            portfolio_metrics(projected.values()),
            allocation_shift(current, &projected),
        )
    };

    let delta = ScoreDelta::between(&current_metrics, &new_metrics);
    debug!(
        ticker = %stock.ticker,
        dollar_amount,
        first_trade,
        quality_delta = delta.quality_score,
        "preview computed"
    );
    ImpactResult {
        current_metrics,
        new_metrics,
        delta,
        industry_allocation,
    }
}
