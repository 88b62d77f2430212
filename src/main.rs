//! Entry point. Wires config -> market fixture -> ledger, then replays a
//! session script of BUY/SELL/PREVIEW/PRICE/SNAPSHOT commands.

use anyhow::Context;
use dotenvy::dotenv;
use serde::Serialize;
use std::{fs, path::Path};
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use portfolio_impact::aggregator::CategoryScoreSet;
use portfolio_impact::config::{self, AppConfig};
use portfolio_impact::market::Market;
use portfolio_impact::parser::{is_ignorable, parse_command, Command, SellQty};
use portfolio_impact::Ledger;

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // `--config <path>` overrides env/default lookup
    let args: Vec<String> = std::env::args().collect();
    let explicit = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str);
    let cfg_path = config::resolve_path(explicit);
    let cfg = AppConfig::load(&cfg_path)
        .with_context(|| format!("loading config {}", cfg_path.display()))?;

    let level: Level = cfg.log.level.parse()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    // relative paths in the config are relative to the config file
    let base = cfg_path.parent().unwrap_or_else(|| Path::new("."));
    let mut market = Market::load(base.join(&cfg.market.universe_path))?;
    let mut ledger = Ledger::new(cfg.portfolio.initial_cash)?;
    info!(
        "Session started. Cash=${:.2}, Universe={} stocks, PreviewBeforeBuy={}",
        cfg.portfolio.initial_cash,
        market.len(),
        cfg.session.preview_before_buy
    );

    let script_path = base.join(&cfg.session.script_path);
    let script = fs::read_to_string(&script_path)
        .with_context(|| format!("reading session script {}", script_path.display()))?;

    for (idx, line) in script.lines().enumerate() {
        if is_ignorable(line) {
            continue;
        }
        let Some(cmd) = parse_command(line) else {
            warn!("line {}: unrecognized command: {}", idx + 1, line.trim());
            continue;
        };
        if let Err(e) = run_command(&cmd, &mut ledger, &mut market, &cfg) {
            error!("line {}: {:#}", idx + 1, e);
        }
    }

    print_json("final snapshot", &ledger.snapshot())?;
    Ok(())
}

fn run_command(
    cmd: &Command,
    ledger: &mut Ledger,
    market: &mut Market,
    cfg: &AppConfig,
) -> anyhow::Result<()> {
    match cmd {
        Command::Buy { ticker, dollars } => {
            let stock = market
                .get(ticker)
                .with_context(|| format!("unknown ticker {ticker}"))?;
            if cfg.session.preview_before_buy {
                print_json(&format!("preview BUY {ticker} ${dollars:.2}"), &ledger.preview(stock, *dollars))?;
            }
            // rejections are already logged by the ledger; the session goes on
            let _ = ledger.buy(stock, *dollars);
        }
        Command::Sell { ticker, qty } => {
            let _ = match qty {
                SellQty::Shares(n) => ledger.sell(ticker, *n),
                SellQty::All => ledger.sell_all(ticker),
            };
        }
        Command::Preview { ticker, dollars } => {
            let stock = market
                .get(ticker)
                .with_context(|| format!("unknown ticker {ticker}"))?;
            print_json(
                &format!("scorecard {ticker}"),
                &CategoryScoreSet::for_stock(stock),
            )?;
            print_json(&format!("preview BUY {ticker} ${dollars:.2}"), &ledger.preview(stock, *dollars))?;
        }
        Command::Price { ticker, price } => {
            market.update_price(ticker, *price)?;
            let relinked = ledger.apply_quotes(market);
            info!("PRICE {} -> {:.2} ({} holding(s) revalued)", ticker, price, relinked);
        }
        Command::Snapshot => print_json("snapshot", &ledger.snapshot())?,
    }
    Ok(())
}

fn print_json<T: Serialize>(label: &str, value: &T) -> anyhow::Result<()> {
    println!("===== {label} =====");
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
