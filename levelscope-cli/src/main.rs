//! LevelScope CLI: levels, zones and strategy scores from CSV bars.
//!
//! Commands:
//! - `levels`: swing-cluster reaction levels with confidence labels
//! - `zones`: demand/supply zones and the nearest ones around price
//! - `swing-levels`: consolidated wide-window pivot levels
//! - `score`: score one strategy on the newest bar
//! - `insights`: candle observations, regime and heuristic assist readings
//! - `batch`: score many files in parallel
//!
//! Every command prints pretty JSON on stdout; logs go to stderr.

mod bars;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use levelscope_core::assist::{analyze_market, select_breakout_classifier};
use levelscope_core::domain::{Bar, SectorState, StrategyKind, StructureBias, Timeframe};
use levelscope_core::engine::zone_levels;
use levelscope_core::indicators::structure_bias;
use levelscope_core::insights::trade_signal;
use levelscope_core::regime::detect_regime;
use levelscope_core::{
    compute_reaction_levels, compute_structural_zones, compute_swing_levels, market_insights,
    score_strategy, strategy_context, EngineConfig,
};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "levelscope",
    about = "LevelScope: support/resistance, demand/supply zones and setup scoring"
)]
struct Cli {
    /// Engine configuration (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Swing-cluster reaction levels around the last close.
    Levels {
        /// Bars CSV (timestamp,open,high,low,close,volume).
        #[arg(long)]
        bars: PathBuf,

        /// Timeframe of the bars (5m, 15m, 1h, 2h, 4h, 1d, 1w, 1M, 3M).
        #[arg(long, default_value = "1d")]
        timeframe: Timeframe,
    },
    /// Demand/supply zones.
    Zones {
        #[arg(long)]
        bars: PathBuf,

        /// Zones listed per side around price.
        #[arg(long, default_value_t = 4)]
        nearest: usize,
    },
    /// Consolidated wide-window pivot levels.
    SwingLevels {
        #[arg(long)]
        bars: PathBuf,
    },
    /// Score one strategy on the newest bar.
    Score {
        #[arg(long)]
        bars: PathBuf,

        /// Strategy: sr, swing or demand-supply.
        #[arg(long)]
        strategy: StrategyKind,

        /// Sector state: leading, improving, weakening, lagging or neutral.
        #[arg(long, default_value = "neutral")]
        sector: SectorState,

        /// Higher-timeframe bars; their structure bias feeds the score.
        #[arg(long, conflicts_with = "htf_bias")]
        htf_bars: Option<PathBuf>,

        /// Higher-timeframe structure bias given directly.
        #[arg(long)]
        htf_bias: Option<StructureBias>,
    },
    /// Candle insights, regime and heuristic assist readings.
    Insights {
        #[arg(long)]
        bars: PathBuf,
    },
    /// Score many bar files in parallel.
    Batch {
        #[arg(long)]
        strategy: StrategyKind,

        #[arg(long, default_value = "neutral")]
        sector: SectorState,

        /// Bars CSV files, one per symbol.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Levels { bars, timeframe } => {
            let bars = bars::load_bars(&bars)?;
            print_json(&compute_reaction_levels(&bars, timeframe, &cfg))
        }
        Commands::Zones { bars, nearest } => run_zones(&bars, nearest, &cfg),
        Commands::SwingLevels { bars } => {
            let bars = bars::load_bars(&bars)?;
            print_json(&compute_swing_levels(&bars, &cfg))
        }
        Commands::Score {
            bars,
            strategy,
            sector,
            htf_bars,
            htf_bias,
        } => run_score(&bars, strategy, sector, htf_bars.as_deref(), htf_bias, &cfg),
        Commands::Insights { bars } => run_insights(&bars, &cfg),
        Commands::Batch {
            strategy,
            sector,
            files,
        } => run_batch(&files, strategy, sector, &cfg),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "levelscope=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let cfg = EngineConfig::from_file(path)?;
    tracing::info!(path = %path.display(), "loaded engine config");
    Ok(cfg)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct ZonesReport {
    zones: Vec<levelscope_core::domain::StructuralZone>,
    #[serde(flatten)]
    nearest: levelscope_core::engine::ZoneLevels,
}

fn run_zones(path: &Path, nearest: usize, cfg: &EngineConfig) -> Result<()> {
    let bars = bars::load_bars(path)?;
    let zones = compute_structural_zones(&bars, cfg);
    let cmp = bars.last().map_or(0.0, |b| b.close);
    let nearest = zone_levels(&zones, cmp, nearest);
    print_json(&ZonesReport { zones, nearest })
}

fn run_score(
    path: &Path,
    kind: StrategyKind,
    sector: SectorState,
    htf_bars: Option<&Path>,
    htf_bias: Option<StructureBias>,
    cfg: &EngineConfig,
) -> Result<()> {
    let bars = bars::load_bars(path)?;
    let htf_structure = match (htf_bars, htf_bias) {
        (Some(htf), _) => {
            let htf = bars::load_bars(htf)?;
            structure_bias(&htf, cfg.indicators.structure_lookback)
        }
        (None, Some(bias)) => bias,
        (None, None) => StructureBias::Neutral,
    };

    let ctx = strategy_context(kind, &bars, sector, htf_structure, cfg);
    let result = score_strategy(kind, &bars, &ctx, cfg);
    tracing::info!(
        strategy = %kind,
        confidence = result.confidence,
        status = ?result.entry_status,
        "scored"
    );
    print_json(&result)
}

#[derive(Serialize)]
struct InsightsReport {
    regime: levelscope_core::domain::MarketRegime,
    insights: levelscope_core::insights::MarketInsights,
    signal: levelscope_core::insights::TradeSignal,
    analysis: Option<levelscope_core::assist::MarketAnalysis>,
}

fn run_insights(path: &Path, cfg: &EngineConfig) -> Result<()> {
    let bars = bars::load_bars(path)?;
    print_json(&insights_report(&bars, cfg))
}

fn insights_report(bars: &[Bar], cfg: &EngineConfig) -> InsightsReport {
    let insights = market_insights(bars, cfg);

    let kind = StrategyKind::Reaction;
    let ctx = strategy_context(kind, bars, SectorState::Neutral, StructureBias::Neutral, cfg);
    let result = score_strategy(kind, bars, &ctx, cfg);
    let rr = (result.risk_reward > 0.0).then_some(result.risk_reward);

    let classifier = select_breakout_classifier(None);
    let analysis = analyze_market(bars, result.confidence, classifier.as_ref());
    if analysis.is_none() {
        tracing::info!(bars = bars.len(), "too few bars for assist readings");
    }

    InsightsReport {
        regime: detect_regime(bars, cfg),
        signal: trade_signal(insights.ema_bias, rr),
        insights,
        analysis,
    }
}

#[derive(Serialize)]
struct BatchEntry {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<levelscope_core::domain::StrategyResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn run_batch(
    files: &[PathBuf],
    kind: StrategyKind,
    sector: SectorState,
    cfg: &EngineConfig,
) -> Result<()> {
    if files.is_empty() {
        bail!("no bar files given");
    }

    let entries: Vec<BatchEntry> = files
        .par_iter()
        .map(|path| {
            let scored = bars::load_bars(path).map(|bars| {
                let ctx = strategy_context(kind, &bars, sector, StructureBias::Neutral, cfg);
                score_strategy(kind, &bars, &ctx, cfg)
            });
            match scored {
                Ok(result) => BatchEntry {
                    file: path.display().to_string(),
                    result: Some(result),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "skipped");
                    BatchEntry {
                        file: path.display().to_string(),
                        result: None,
                        error: Some(format!("{e:#}")),
                    }
                }
            }
        })
        .collect();

    let failed = entries.iter().filter(|e| e.error.is_some()).count();
    tracing::info!(files = files.len(), failed, "batch complete");
    print_json(&entries).context("write batch output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use levelscope_core::domain::EmaBias;
    use levelscope_core::indicators::ema_bias;
    use levelscope_core::insights::SignalAction;

    /// 60 bars rising 1.0 per bar, then a six-bar pullback: still above EMA(50)
    /// but already under EMA(20).
    fn rally_then_pullback() -> Vec<Bar> {
        let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + i as f64)
            .chain([156.0, 153.0, 150.0, 147.0, 145.0, 144.0])
            .collect();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                Bar {
                    timestamp: base + chrono::Duration::days(i as i64),
                    open,
                    high: open.max(close) + 1.0,
                    low: open.min(close) - 1.0,
                    close,
                    volume: 1_000_000,
                }
            })
            .collect()
    }

    #[test]
    fn signal_follows_reported_ema_bias() {
        let bars = rally_then_pullback();
        let cfg = EngineConfig::default();
        let ind = &cfg.indicators;
        assert_eq!(ema_bias(&bars, ind.ema_fast, ind.ema_bias_band), EmaBias::Caution);

        let report = insights_report(&bars, &cfg);
        assert_eq!(report.insights.ema_bias, EmaBias::Bullish);
        assert_ne!(report.signal.action, SignalAction::Sell);
        assert!(report.analysis.is_some());
    }
}
