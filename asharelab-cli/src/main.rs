//! AShareLab CLI — indicator, signal, limit-up, and calendar reports.
//!
//! Commands:
//! - `indicators` — compute the configured indicator panel over a bars CSV
//! - `signals` — run a classification rule over a bars CSV
//! - `limitup` — tag counts, streak ranking, and promotion rates for a
//!   day's limit-up pool (optionally against the previous day)
//! - `calendar` — trading-day queries against a calendar CSV

use anyhow::{bail, Context, Result};
use asharelab_core::config::AnalysisConfig;
use asharelab_core::data::{
    load_calendar, load_limit_up_table, load_price_bars, validate_series,
};
use asharelab_core::domain::{PriceBar, SignalKind};
use asharelab_core::engine::IndicatorPanel;
use asharelab_core::limitup::{promotion_table, rank_by_streak, tag_count_delta};
use asharelab_core::signals::classify_series;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "asharelab",
    about = "AShareLab CLI — A-share indicator, signal, and limit-up reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the configured indicator panel over a bars CSV.
    Indicators {
        /// Bars CSV (vendor export; Chinese or English headers).
        #[arg(long)]
        bars: PathBuf,

        /// Symbol code the bars belong to (e.g. 600519).
        #[arg(long)]
        symbol: String,

        /// TOML analysis config. Defaults to conventional parameters.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Calendar CSV; when given, the series is validated against it.
        #[arg(long)]
        calendar: Option<PathBuf>,

        /// Print only the last N rows.
        #[arg(long, default_value_t = 10)]
        last: usize,

        /// Emit JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run a classification rule over a bars CSV.
    Signals {
        /// Bars CSV (vendor export; Chinese or English headers).
        #[arg(long)]
        bars: PathBuf,

        /// Symbol code the bars belong to.
        #[arg(long)]
        symbol: String,

        /// TOML analysis config. Defaults to conventional parameters.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Rule name override: ma_cross, macd_trend, rsi_ma, bollinger_rsi,
        /// adx_trend, macd_rsi_ma, kdj_cross.
        #[arg(long)]
        rule: Option<String>,

        /// Calendar CSV; when given, the series is validated against it.
        #[arg(long)]
        calendar: Option<PathBuf>,

        /// Emit JSON instead of a report.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Analyze a day's limit-up pool CSV.
    Limitup {
        /// Today's screener export.
        #[arg(long)]
        pool: PathBuf,

        /// Trading day the pool belongs to (YYYY-MM-DD or YYYYMMDD).
        #[arg(long)]
        date: String,

        /// Previous trading day's screener export (enables deltas and
        /// promotion rates).
        #[arg(long)]
        prev: Option<PathBuf>,

        /// Previous trading day (required with --prev).
        #[arg(long)]
        prev_date: Option<String>,

        /// Rows to show in the ranking and tag tables.
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Emit JSON instead of a report.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Trading-day queries against a calendar CSV.
    Calendar {
        /// Calendar CSV (cal_date, is_open).
        #[arg(long)]
        calendar: PathBuf,

        /// Query date (YYYY-MM-DD or YYYYMMDD).
        #[arg(long)]
        date: String,

        /// Which resolution to perform.
        #[arg(long, value_enum)]
        query: CalendarQuery,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CalendarQuery {
    /// Is the date a trading day?
    Check,
    /// Latest trading day strictly before the date.
    Prev,
    /// Earliest trading day strictly after the date.
    Next,
    /// Latest trading day on or before the date.
    Latest,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Indicators {
            bars,
            symbol,
            config,
            calendar,
            last,
            json,
        } => run_indicators(&bars, &symbol, config.as_deref(), calendar.as_deref(), last, json),
        Commands::Signals {
            bars,
            symbol,
            config,
            rule,
            calendar,
            json,
        } => run_signals(
            &bars,
            &symbol,
            config.as_deref(),
            rule.as_deref(),
            calendar.as_deref(),
            json,
        ),
        Commands::Limitup {
            pool,
            date,
            prev,
            prev_date,
            top,
            json,
        } => run_limitup(&pool, &date, prev.as_deref(), prev_date.as_deref(), top, json),
        Commands::Calendar {
            calendar,
            date,
            query,
        } => run_calendar(&calendar, &date, query),
    }
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y%m%d"))
        .with_context(|| format!("unparseable date '{text}' (expected YYYY-MM-DD or YYYYMMDD)"))
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn load_validated_bars(
    bars_path: &Path,
    symbol: &str,
    calendar_path: Option<&Path>,
) -> Result<Vec<PriceBar>> {
    let bars = load_price_bars(bars_path, symbol)
        .with_context(|| format!("loading bars {}", bars_path.display()))?;
    if let Some(calendar_path) = calendar_path {
        let calendar = load_calendar(calendar_path)
            .with_context(|| format!("loading calendar {}", calendar_path.display()))?;
        validate_series(&bars, &calendar).context("bar series failed calendar validation")?;
    }
    Ok(bars)
}

fn run_indicators(
    bars_path: &Path,
    symbol: &str,
    config_path: Option<&Path>,
    calendar_path: Option<&Path>,
    last: usize,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let bars = load_validated_bars(bars_path, symbol, calendar_path)?;
    let indicators = config.panel_indicators();
    let panel = IndicatorPanel::compute(&bars, &indicators)?;

    let names: Vec<String> = indicators.iter().map(|i| i.name().to_string()).collect();
    let start = panel.len().saturating_sub(last);

    if json {
        let rows: Vec<serde_json::Value> = (start..panel.len())
            .map(|i| {
                let values: serde_json::Map<String, serde_json::Value> = names
                    .iter()
                    .map(|name| (name.clone(), serde_json::json!(panel.at(name, i))))
                    .collect();
                serde_json::json!({
                    "date": panel.dates()[i],
                    "close": bars[i].close,
                    "values": values,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Indicator panel: {symbol} ({} bars)", panel.len());
    print!("{:<12} {:>10}", "Date", "Close");
    for name in &names {
        print!(" {name:>18}");
    }
    println!();

    for i in start..panel.len() {
        print!("{:<12} {:>10.2}", panel.dates()[i], bars[i].close);
        for name in &names {
            match panel.at(name, i) {
                Some(value) => print!(" {value:>18.3}"),
                None => print!(" {:>18}", "-"),
            }
        }
        println!();
    }
    Ok(())
}

fn run_signals(
    bars_path: &Path,
    symbol: &str,
    config_path: Option<&Path>,
    rule_override: Option<&str>,
    calendar_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(rule_name) = rule_override {
        config.rule = rule_name.to_string();
    }
    let rule = config.build_rule()?;
    let bars = load_validated_bars(bars_path, symbol, calendar_path)?;
    let signals = classify_series(&bars, rule.as_ref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&signals)?);
        return Ok(());
    }

    let buys = signals.iter().filter(|s| s.kind == SignalKind::Buy).count();
    let sells = signals.iter().filter(|s| s.kind == SignalKind::Sell).count();

    println!("=== Signal Report ===");
    println!("Symbol:  {symbol}");
    println!("Rule:    {}", rule.name());
    println!(
        "Period:  {} to {}",
        bars[0].date,
        bars[bars.len() - 1].date
    );
    println!("Bars:    {}", bars.len());
    println!("Buys:    {buys}");
    println!("Sells:   {sells}");
    println!();

    for signal in &signals {
        match signal.kind {
            SignalKind::Buy => println!("{}  BUY", signal.date),
            SignalKind::Sell => println!("{}  SELL", signal.date),
            SignalKind::Neutral => {}
        }
    }
    Ok(())
}

fn run_limitup(
    pool_path: &Path,
    date_text: &str,
    prev_path: Option<&Path>,
    prev_date_text: Option<&str>,
    top: usize,
    json: bool,
) -> Result<()> {
    let date = parse_date(date_text)?;
    let table = load_limit_up_table(pool_path, date)
        .with_context(|| format!("loading pool {}", pool_path.display()))?;
    for warning in &table.warnings {
        eprintln!("WARNING: {warning}");
    }

    let previous = match (prev_path, prev_date_text) {
        (Some(path), Some(prev_date)) => {
            let prev_date = parse_date(prev_date)?;
            let prev_table = load_limit_up_table(path, prev_date)
                .with_context(|| format!("loading pool {}", path.display()))?;
            for warning in &prev_table.warnings {
                eprintln!("WARNING: {warning}");
            }
            Some((prev_date, prev_table.records))
        }
        (Some(_), None) => bail!("--prev requires --prev-date"),
        (None, Some(_)) => bail!("--prev-date requires --prev"),
        (None, None) => None,
    };

    let ranked = rank_by_streak(&table.records);
    let deltas = previous
        .as_ref()
        .map(|(_, prev)| tag_count_delta(&table.records, prev));
    let promotions = previous
        .as_ref()
        .map(|(_, prev)| promotion_table(&table.records, prev));

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "date": date,
                "count": table.records.len(),
                "ranking": ranked,
                "tag_deltas": deltas,
                "promotions": promotions,
            }))?
        );
        return Ok(());
    }

    println!("=== Limit-up Pool: {date} ===");
    println!("Stocks:  {}", table.records.len());
    if let Some((prev_date, prev)) = &previous {
        println!("Against: {prev_date} ({} stocks)", prev.len());
    }
    println!();

    println!("--- Streak Ranking (top {top}) ---");
    println!("{:<8} {:<10} {:<12} Reasons", "Streak", "Symbol", "Name");
    for record in ranked.iter().take(top) {
        let reasons: Vec<&str> = record.reason_tags.iter().map(String::as_str).collect();
        println!(
            "{:<8} {:<10} {:<12} {}",
            record.streak_length,
            record.symbol,
            record.display_name,
            reasons.join("+")
        );
    }

    if let Some(deltas) = &deltas {
        println!();
        println!("--- Reason Tags (today vs previous, top {top}) ---");
        println!("{:<16} {:>6} {:>6} {:>7}", "Tag", "Today", "Prev", "Change");
        for row in deltas.iter().take(top) {
            println!(
                "{:<16} {:>6} {:>6} {:>+7}",
                row.tag, row.today, row.yesterday, row.change
            );
        }
    }

    if let Some(promotions) = &promotions {
        println!();
        println!("--- Promotion Rates ---");
        for level in promotions {
            match level.rate {
                Some(rate) => println!(
                    "{}板{}: {}/{} = {:.0}%",
                    level.level,
                    level.level + 1,
                    level.promoted,
                    level.base,
                    rate * 100.0
                ),
                None => println!(
                    "{}板{}: undefined (no stocks at level {} yesterday)",
                    level.level,
                    level.level + 1,
                    level.level
                ),
            }
        }
    }
    Ok(())
}

fn run_calendar(calendar_path: &Path, date_text: &str, query: CalendarQuery) -> Result<()> {
    let calendar = load_calendar(calendar_path)
        .with_context(|| format!("loading calendar {}", calendar_path.display()))?;
    let date = parse_date(date_text)?;

    match query {
        CalendarQuery::Check => {
            let open = calendar.is_trading_day(date)?;
            println!("{date}: {}", if open { "trading day" } else { "closed" });
        }
        CalendarQuery::Prev => {
            println!("{}", calendar.previous_trading_day(date)?);
        }
        CalendarQuery::Next => {
            println!("{}", calendar.next_trading_day(date)?);
        }
        CalendarQuery::Latest => {
            println!("{}", calendar.most_recent_trading_day(date)?);
        }
    }
    Ok(())
}
