//! Loads an OHLCV CSV, computes the indicators and prints the commentary
//! for the latest bar.

use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Value, json};
use ta_commentary::{Commentary, EnrichedRow, EnrichedSeries, IndicatorEngine, load_csv};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ta-commentary")]
#[command(about = "Technical indicator commentary for an OHLCV CSV", long_about = None)]
struct Cli {
    /// CSV file with Date/Open/High/Low/Close[/Volume] columns
    #[arg(short, long)]
    input: PathBuf,

    /// Lookback period for SMA, EMA and RSI
    #[arg(short, long, default_value_t = 20)]
    period: usize,

    /// Also print the last N enriched rows
    #[arg(short, long)]
    tail: Option<usize>,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let series = load_csv(&cli.input)
        .with_context(|| format!("loading {}", cli.input.display()))?;
    info!(bars = series.len(), "series loaded");

    let engine = IndicatorEngine::with_period(series, cli.period)
        .with_context(|| format!("computing indicators with period {}", cli.period))?;

    let commentary = engine.commentary();
    let tail = tail_rows(engine.enriched(), cli.tail);

    let mut out = std::io::stdout().lock();

    if cli.json {
        let document = json_document(&engine, &commentary, &tail);
        serde_json::to_writer_pretty(&mut out, &document).context("writing JSON")?;
        writeln!(out)?;
    } else {
        write_text(&mut out, &commentary, &tail)?;
    }

    Ok(())
}

/// The last `count` rows, all rows when `count` exceeds the series.
fn tail_rows(enriched: &EnrichedSeries, count: Option<usize>) -> Vec<EnrichedRow> {
    match count {
        Some(count) => enriched
            .rows()
            .skip(enriched.len().saturating_sub(count))
            .collect(),
        None => Vec::new(),
    }
}

fn json_document(
    engine: &IndicatorEngine,
    commentary: &Commentary,
    tail: &[EnrichedRow],
) -> Value {
    json!({
        "period": engine.period(),
        "latest": engine.latest(),
        "commentary": commentary,
        "messages": commentary.messages(),
        "tail": tail,
    })
}

fn write_text(
    out: &mut impl Write,
    commentary: &Commentary,
    tail: &[EnrichedRow],
) -> Result<()> {
    if !tail.is_empty() {
        writeln!(
            out,
            "{:>15} {:>12} {:>12} {:>12} {:>8} {:>10} {:>10} {:>10}",
            "open_time", "close", "sma", "ema", "rsi", "macd", "signal", "hist"
        )?;
        for row in tail {
            writeln!(
                out,
                "{:>15} {:>12.4} {:>12} {:>12.4} {:>8} {:>10.4} {:>10.4} {:>10.4}",
                row.bar.open_time,
                row.bar.close,
                row.sma.map_or_else(|| "-".to_owned(), |v| format!("{v:.4}")),
                row.ema,
                row.rsi.map_or_else(|| "-".to_owned(), |v| v.to_string()),
                row.macd,
                row.signal,
                row.hist,
            )?;
        }
        writeln!(out)?;
    }

    for message in commentary.messages() {
        writeln!(out, "{message}")?;
    }

    Ok(())
}
