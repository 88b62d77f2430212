//! Parse session script lines into ledger commands.
//! Supported: BUY / SELL / PREVIEW / PRICE / SNAPSHOT.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq)]
pub enum SellQty {
    Shares(f64),
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Buy { ticker: String, dollars: f64 },
    Sell { ticker: String, qty: SellQty },
    Preview { ticker: String, dollars: f64 },
    Price { ticker: String, price: f64 },
    Snapshot,
}

// "BUY AAPL 500", "PREVIEW AAPL $250.50", "PRICE AAPL 191.2"
fn re_amount() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(BUY|PREVIEW|PRICE)\s+([A-Z][A-Z0-9.]{0,9})\s+\$?(\d+(?:\.\d+)?)$")
            .unwrap()
    })
}

// "SELL AAPL 2.5" or "SELL AAPL ALL"
fn re_sell() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^SELL\s+([A-Z][A-Z0-9.]{0,9})\s+(ALL|\d+(?:\.\d+)?)$").unwrap()
    })
}

/// Blank lines and `#` comments.
pub fn is_ignorable(line: &str) -> bool {
    let t = line.trim();
    t.is_empty() || t.starts_with('#')
}

pub fn parse_command(text: &str) -> Option<Command> {
    let t = text.trim();

    if t.eq_ignore_ascii_case("SNAPSHOT") {
        return Some(Command::Snapshot);
    }

    if let Some(c) = re_amount().captures(t) {
        let ticker = c[2].to_uppercase();
        let n: f64 = c[3].parse().ok()?;
        return match &c[1].to_uppercase()[..] {
            "BUY" => Some(Command::Buy { ticker, dollars: n }),
            "PREVIEW" => Some(Command::Preview { ticker, dollars: n }),
            "PRICE" => Some(Command::Price { ticker, price: n }),
            _ => None,
        };
    }

    if let Some(c) = re_sell().captures(t) {
        let ticker = c[1].to_uppercase();
        let qty = if c[2].eq_ignore_ascii_case("all") {
            SellQty::All
        } else {
            SellQty::Shares(c[2].parse().ok()?)
        };
        return Some(Command::Sell { ticker, qty });
    }

    None
}
