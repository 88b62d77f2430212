//! Paper portfolio engine: a cash-plus-equities ledger, value-weighted
//! category scoring, and side-effect-free impact previews for candidate buys.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod ledger;
pub mod market;
pub mod normalizer;
pub mod parser;
pub mod risk;
pub mod simulator;
pub mod state;
pub mod types;
pub mod utils;

pub use aggregator::CategoryScoreSet;
pub use error::{ErrorKind, TradeError, TradeResult};
pub use ledger::{Ledger, PortfolioSnapshot};
pub use simulator::ImpactResult;
