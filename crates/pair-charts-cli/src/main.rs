mod term;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pair_charts_core::chart::{ChartLifecycle, watermark_label};
use pair_charts_core::currency::{Currency, DEFAULT_CHAIN_ID, KUNI_ADDRESS};
use pair_charts_core::links;
use pair_charts_core::pair::{Pair, PairState};
use pair_charts_core::view::{ChartEffect, Field, ViewEvent, ViewState};
use pair_charts_core::window::TimeWindow;
use pair_charts_providers::rates::RateHistory;
use pair_charts_providers::resolver::PairResolver;
use pair_charts_providers::subgraph::SubgraphProvider;
use term::{TermChartFactory, TermSurface};
use tracing::info;

#[derive(Parser)]
#[command(name = "pair-charts", about = "Candlestick charts for DEX trading pairs")]
struct Cli {
    /// Subgraph endpoint override
    #[arg(long)]
    endpoint: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch hourly rates and render a candlestick chart in the terminal
    Chart {
        /// Base currency: token address, or ETH/KCS for the native asset
        #[arg(long, default_value = KUNI_ADDRESS)]
        base: String,

        /// Quote currency
        #[arg(long, default_value = "ETH")]
        quote: String,

        /// History window: day, week, month
        #[arg(long, default_value = "week")]
        window: String,

        /// Chart width in columns
        #[arg(long, default_value_t = 80)]
        width: u32,

        /// Chart height in rows
        #[arg(long, default_value_t = 24)]
        height: u32,
    },

    /// Resolve a pair and print its canonical token ordering
    Pair {
        #[arg(long, default_value = KUNI_ADDRESS)]
        base: String,

        #[arg(long, default_value = "ETH")]
        quote: String,
    },

    /// Print swap and add-liquidity URLs for a selection
    Links {
        #[arg(long, default_value = KUNI_ADDRESS)]
        base: String,

        #[arg(long, default_value = "ETH")]
        quote: String,
    },
}

fn parse_window(name: &str) -> Result<TimeWindow> {
    match name {
        "day" => Ok(TimeWindow::Day),
        "week" => Ok(TimeWindow::Week),
        "month" => Ok(TimeWindow::Month),
        other => anyhow::bail!("unknown window: {other}. Expected: day, week, month"),
    }
}

/// A currency argument: ETH/KCS/native for the native asset, anything else
/// is a token address. Symbol and decimals are backfilled from the resolved
/// pair.
fn parse_currency(arg: &str) -> Currency {
    if arg.eq_ignore_ascii_case("eth")
        || arg.eq_ignore_ascii_case("kcs")
        || arg.eq_ignore_ascii_case("native")
    {
        Currency::native(DEFAULT_CHAIN_ID)
    } else {
        Currency::token(DEFAULT_CHAIN_ID, arg, 18, "")
    }
}

/// Replace a placeholder token identity with the matching resolved token.
fn with_pair_symbol(currency: Currency, pair: &Pair) -> Currency {
    let Currency::Token(token) = currency else {
        return currency;
    };
    let address = token.address.to_lowercase();
    if pair.token0.address.to_lowercase() == address {
        Currency::Token(pair.token0.clone())
    } else if pair.token1.address.to_lowercase() == address {
        Currency::Token(pair.token1.clone())
    } else {
        Currency::Token(token)
    }
}

async fn resolve_or_report(
    provider: &SubgraphProvider,
    currency0: &Currency,
    currency1: &Currency,
) -> Result<Option<Pair>> {
    let (state, pair) = provider
        .resolve_pair(currency0, currency1)
        .await
        .context("pair resolution failed")?;

    match (state, pair) {
        (PairState::Exists, Some(pair)) => Ok(Some(pair)),
        (PairState::Invalid, _) => {
            println!("Selection cannot form a pair.");
            Ok(None)
        }
        _ => {
            println!("No pair exists for this selection.");
            Ok(None)
        }
    }
}

async fn cmd_chart(
    provider: &SubgraphProvider,
    base: &str,
    quote: &str,
    window: TimeWindow,
    width: u32,
    height: u32,
) -> Result<()> {
    let currency0 = parse_currency(base);
    let currency1 = parse_currency(quote);

    let Some(pair) = resolve_or_report(provider, &currency0, &currency1).await? else {
        return Ok(());
    };
    let currency0 = with_pair_symbol(currency0, &pair);
    let currency1 = with_pair_symbol(currency1, &pair);

    let mut view = ViewState::new();
    view.apply(ViewEvent::CurrencySelected {
        field: Field::Token0,
        currency: currency0.clone(),
    });
    view.apply(ViewEvent::CurrencySelected {
        field: Field::Token1,
        currency: currency1.clone(),
    });
    view.apply(ViewEvent::WindowChanged(window));
    view.apply(ViewEvent::PairResolved {
        state: PairState::Exists,
        pair: Some(pair.clone()),
    });

    let rates = provider
        .fetch_hourly_rates(&pair.address, window)
        .await
        .with_context(|| format!("rate fetch failed for {}", pair.address))?;
    let effect = view.apply(ViewEvent::RatesArrived {
        pair_address: pair.address.clone(),
        rates,
    });

    let surface = TermSurface::new(width, height);
    let mut lifecycle = ChartLifecycle::new(TermChartFactory);
    match effect {
        ChartEffect::Create(candles) => {
            if let Err(e) = lifecycle.create(&surface, &currency0, &currency1, &candles) {
                view.chart_creation_failed();
                return Err(e.into());
            }
        }
        ChartEffect::Refresh(candles) => lifecycle.refresh(&candles),
        ChartEffect::Teardown => lifecycle.teardown(),
        ChartEffect::None => {}
    }

    match lifecycle.chart() {
        Some(chart) => print!("{}", chart.render()),
        None => println!(
            "No hourly data for {} over the last {}.",
            watermark_label(&currency0, &currency1),
            window.label()
        ),
    }

    println!();
    println!("Swap:          {}", links::swap_url(&currency0, &currency1));
    println!(
        "Add liquidity: {}",
        links::add_liquidity_url(&currency0, &currency1)
    );
    Ok(())
}

async fn cmd_pair(provider: &SubgraphProvider, base: &str, quote: &str) -> Result<()> {
    let currency0 = parse_currency(base);
    let currency1 = parse_currency(quote);
    info!(
        resolver = PairResolver::name(provider),
        "resolving pair"
    );

    let Some(pair) = resolve_or_report(provider, &currency0, &currency1).await? else {
        return Ok(());
    };

    println!("Pair:   {}", pair.address);
    println!(
        "token0: {} ({}, {} decimals)",
        pair.token0.symbol, pair.token0.address, pair.token0.decimals
    );
    println!(
        "token1: {} ({}, {} decimals)",
        pair.token1.symbol, pair.token1.address, pair.token1.decimals
    );
    Ok(())
}

fn cmd_links(base: &str, quote: &str) {
    let currency0 = parse_currency(base);
    let currency1 = parse_currency(quote);
    println!("Swap:          {}", links::swap_url(&currency0, &currency1));
    println!(
        "Add liquidity: {}",
        links::add_liquidity_url(&currency0, &currency1)
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .init();

    let provider = match &cli.endpoint {
        Some(endpoint) => SubgraphProvider::with_base_url(endpoint.clone()),
        None => SubgraphProvider::new(),
    };

    match &cli.command {
        Commands::Chart {
            base,
            quote,
            window,
            width,
            height,
        } => {
            let window = parse_window(window)?;
            cmd_chart(&provider, base, quote, window, *width, *height).await?;
        }
        Commands::Pair { base, quote } => {
            cmd_pair(&provider, base, quote).await?;
        }
        Commands::Links { base, quote } => {
            cmd_links(base, quote);
        }
    }

    Ok(())
}
