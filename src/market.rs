//! In-memory stock universe loaded from a YAML fixture. Stands in for the
//! external market data provider: it only hands out quote snapshots.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path, sync::Arc};

use crate::types::{SharedStock, Stock};
use crate::utils::sanitize_symbol;

#[derive(Debug, Deserialize)]
struct UniverseFile {
    stocks: Vec<Stock>,
}

#[derive(Debug, Default, Clone)]
pub struct Market {
    stocks: BTreeMap<String, SharedStock>,
}

fn check_price(ticker: &str, price: f64) -> anyhow::Result<()> {
    if !price.is_finite() || price <= 0.0 {
        bail!("{ticker}: price must be a positive number, got {price}");
    }
    Ok(())
}

impl Market {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading stock universe {}", path.display()))?;
        Self::from_yaml_str(&s).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_yaml_str(s: &str) -> anyhow::Result<Self> {
        let file: UniverseFile = serde_yaml::from_str(s)?;
        let mut market = Self::default();
        for mut stock in file.stocks {
            stock.ticker = sanitize_symbol(&stock.ticker);
            if stock.ticker.is_empty() {
                bail!("stock with empty ticker ({})", stock.name);
            }
            check_price(&stock.ticker, stock.price)?;
            if market.stocks.contains_key(&stock.ticker) {
                bail!("duplicate ticker {}", stock.ticker);
            }
            market.stocks.insert(stock.ticker.clone(), Arc::new(stock));
        }
        Ok(market)
    }

    pub fn get(&self, ticker: &str) -> Option<&SharedStock> {
        self.stocks.get(&sanitize_symbol(ticker))
    }

    pub fn stocks(&self) -> impl Iterator<Item = &SharedStock> {
        self.stocks.values()
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    /// Publishes a new snapshot for `ticker` at `price`. Existing snapshots
    /// held elsewhere keep their old price until relinked.
    pub fn update_price(&mut self, ticker: &str, price: f64) -> anyhow::Result<SharedStock> {
        let key = sanitize_symbol(ticker);
        check_price(&key, price)?;
        let Some(current) = self.stocks.get(&key) else {
            bail!("unknown ticker {key}");
        };
        let next = Arc::new(Stock {
            price,
            ..Stock::clone(current)
        });
        self.stocks.insert(key, Arc::clone(&next));
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetricInput;

    const UNIVERSE: &str = r#"
stocks:
  - ticker: aapl
    name: Apple
    industry: Tech
    price: 190.5
    metrics: { performance: 82, stability: High, value: Fair, momentum: 71.5 }
  - ticker: XOM
    name: Exxon Mobil
    industry: Energy
    price: 110
    metrics: { performance: Good, stability: Strong, value: 68, momentum: Weak }
"#;

    #[test]
    fn loads_and_sanitizes() {
        let m = Market::from_yaml_str(UNIVERSE).unwrap();
        assert_eq!(m.len(), 2);
        let a = m.get("aapl").expect("AAPL present");
        assert_eq!(a.ticker, "AAPL");
        assert_eq!(a.metrics.stability, MetricInput::Qualitative("High".into()));
        assert_eq!(m.get("XOM").unwrap().price, 110.0);
    }

    #[test]
    fn rejects_bad_price_and_duplicates() {
        let bad = UNIVERSE.replace("price: 110", "price: 0");
        assert!(Market::from_yaml_str(&bad).is_err());
        let dup = UNIVERSE.replace("ticker: XOM", "ticker: AAPL");
        assert!(Market::from_yaml_str(&dup).is_err());
    }

    #[test]
    fn update_price_replaces_snapshot() {
        let mut m = Market::from_yaml_str(UNIVERSE).unwrap();
        let old = Arc::clone(m.get("AAPL").unwrap());
        let new = m.update_price("aapl", 200.0).unwrap();
        assert_eq!(old.price, 190.5);
        assert_eq!(new.price, 200.0);
        assert!(Arc::ptr_eq(m.get("AAPL").unwrap(), &new));
        assert!(m.update_price("AAPL", -1.0).is_err());
        assert!(m.update_price("MSFT", 1.0).is_err());
    }
}
