//! Value-weighted portfolio scoring across holdings.

use serde::Serialize;

use crate::normalizer::normalize;
use crate::types::{Category, Holding, Stock};
use crate::utils::{clamp_score, VALUE_EPSILON};

/// Four category scores plus the composite quality score, all in [0, 100].
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct CategoryScoreSet {
    pub performance: u8,
    pub stability: u8,
    pub value: u8,
    pub momentum: u8,
    pub quality_score: u8,
}

impl CategoryScoreSet {
    pub const ZERO: CategoryScoreSet = CategoryScoreSet {
        performance: 0,
        stability: 0,
        value: 0,
        momentum: 0,
        quality_score: 0,
    };

    /// Builds the set and derives `quality_score` as the equal-weighted mean
    /// of the four categories.
    pub fn from_categories(performance: u8, stability: u8, value: u8, momentum: u8) -> Self {
        let sum = performance as f64 + stability as f64 + value as f64 + momentum as f64;
        Self {
            performance,
            stability,
            value,
            momentum,
            quality_score: clamp_score(sum / 4.0),
        }
    }

    /// A single stock's own normalized scorecard.
    pub fn for_stock(stock: &Stock) -> Self {
        let m = &stock.metrics;
        Self::from_categories(
            normalize(&m.performance),
            normalize(&m.stability),
            normalize(&m.value),
            normalize(&m.momentum),
        )
    }

    pub fn get(&self, category: Category) -> u8 {
        match category {
            Category::Performance => self.performance,
            Category::Stability => self.stability,
            Category::Value => self.value,
            Category::Momentum => self.momentum,
        }
    }
}

/// Weighted average of each holding's normalized score for `category`,
/// weighted by current dollar value. Zero when there is no value to weight.
pub fn category_score<'a>(
    category: Category,
    holdings: impl IntoIterator<Item = &'a Holding>,
) -> u8 {
    let (weighted, total) = holdings.into_iter().fold((0.0, 0.0), |(w, t), h| {
        let v = h.value();
        let s = normalize(h.stock.metrics.get(category)) as f64;
        (w + s * v, t + v)
    });
    if total <= VALUE_EPSILON {
        return 0;
    }
    clamp_score(weighted / total)
}

pub fn portfolio_metrics<'a, I>(holdings: I) -> CategoryScoreSet
where
    I: IntoIterator<Item = &'a Holding>,
    I::IntoIter: Clone,
{
    let it = holdings.into_iter();
    CategoryScoreSet::from_categories(
        category_score(Category::Performance, it.clone()),
        category_score(Category::Stability, it.clone()),
        category_score(Category::Value, it.clone()),
        category_score(Category::Momentum, it),
    )
}

pub fn quality_score<'a, I>(holdings: I) -> u8
where
    I: IntoIterator<Item = &'a Holding>,
    I::IntoIter: Clone,
{
    portfolio_metrics(holdings).quality_score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::{at, stock};
    use crate::types::{MetricInput, SharedStock};
    use std::sync::Arc;

    fn holding(stock: SharedStock, shares: f64) -> Holding {
        Holding {
            purchase_price: stock.price,
            stock,
            shares,
            purchase_date: at(0),
        }
    }

    #[test]
    fn empty_holdings_score_zero() {
        let none: Vec<Holding> = Vec::new();
        for c in Category::ALL {
            assert_eq!(category_score(c, &none), 0);
        }
        assert_eq!(quality_score(&none), 0);
        assert_eq!(portfolio_metrics(&none), CategoryScoreSet::ZERO);
    }

    #[test]
    fn zero_value_holdings_score_zero() {
        let hs = vec![holding(stock("A", "Tech", 0.0, [80.0; 4]), 10.0)];
        assert_eq!(portfolio_metrics(&hs), CategoryScoreSet::ZERO);
    }

    #[test]
    fn weights_by_dollar_value() {
        // $300 at 80, $100 at 40 -> 70
        let hs = vec![
            holding(stock("A", "Tech", 10.0, [80.0, 80.0, 80.0, 80.0]), 30.0),
            holding(stock("B", "Energy", 20.0, [40.0, 40.0, 40.0, 40.0]), 5.0),
        ];
        assert_eq!(category_score(Category::Performance, &hs), 70);
        assert_eq!(quality_score(&hs), 70);
    }

    #[test]
    fn categories_weighted_independently() {
        let hs = vec![
            holding(stock("A", "Tech", 10.0, [100.0, 0.0, 50.0, 20.0]), 1.0),
            holding(stock("B", "Tech", 10.0, [0.0, 100.0, 50.0, 40.0]), 1.0),
        ];
        let m = portfolio_metrics(&hs);
        assert_eq!(m.performance, 50);
        assert_eq!(m.stability, 50);
        assert_eq!(m.value, 50);
        assert_eq!(m.momentum, 30);
        assert_eq!(m.quality_score, 45);
    }

    #[test]
    fn single_holding_matches_own_scorecard() {
        let mut s = (*stock("A", "Tech", 3.3, [0.0; 4])).clone();
        s.metrics.performance = MetricInput::from("High");
        s.metrics.stability = MetricInput::from("Unstable");
        s.metrics.value = MetricInput::from(61.7);
        s.metrics.momentum = MetricInput::from("Good");
        let s = Arc::new(s);
        let hs = vec![holding(s.clone(), 7.0 / 3.0)];
        let own = CategoryScoreSet::for_stock(&s);
        assert_eq!(portfolio_metrics(&hs), own);
        assert_eq!(own.quality_score, 64); // (90 + 30 + 62 + 75) / 4 = 64.25
    }
}
