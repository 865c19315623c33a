//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report::TextReport;
use crate::domain::backtest::{self as backtest_engine, BacktestOutcome};
use crate::domain::config_validation::{parse_date, validate_config_except};
use crate::domain::error::DripError;
use crate::domain::strategy::{parse_weekday, Cadence, Strategy};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::{ReportContext, ReportPort};

/// Exit code for a backtest that filled no contributions.
const EXIT_EMPTY: u8 = 5;

#[derive(Parser, Debug)]
#[command(
    name = "dripback",
    about = "Dollar-cost averaging backtester with lump-sum comparison"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CadenceKind {
    Weekly,
    Monthly,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a DRIP backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long, value_enum)]
        cadence: Option<CadenceKind>,
        /// 0-6 (Monday = 0) or a day name
        #[arg(long)]
        weekday: Option<String>,
        #[arg(long)]
        day_of_month: Option<u8>,
        /// Skip the lump-sum comparison
        #[arg(long)]
        no_compare: bool,
        /// List every contribution in the report
        #[arg(long)]
        records: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the stored price range for a symbol
    Info {
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub symbol: Option<String>,
    pub amount: Option<f64>,
    pub cadence: Option<CadenceKind>,
    pub weekday: Option<String>,
    pub day_of_month: Option<u8>,
    pub no_compare: bool,
}

impl Overrides {
    /// Config keys whose value these overrides replace or make irrelevant.
    pub fn replaced_keys(&self) -> Vec<(&'static str, &'static str)> {
        let mut keys = Vec::new();
        if self.amount.is_some() {
            keys.push(("backtest", "amount"));
        }
        if self.cadence.is_some() {
            keys.push(("strategy", "cadence"));
        }
        if self.weekday.is_some() || self.cadence == Some(CadenceKind::Monthly) {
            keys.push(("strategy", "weekday"));
        }
        if self.day_of_month.is_some() || self.cadence == Some(CadenceKind::Weekly) {
            keys.push(("strategy", "day_of_month"));
        }
        keys
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            amount,
            cadence,
            weekday,
            day_of_month,
            no_compare,
            records,
            dry_run,
        } => {
            let overrides = Overrides {
                symbol,
                amount,
                cadence,
                weekday,
                day_of_month,
                no_compare,
            };
            if dry_run {
                run_dry_run(&config, &overrides)
            } else {
                run_backtest(&config, &overrides, records)
            }
        }
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Validate { config } => run_dry_run(&config, &Overrides::default()),
        Command::Info { symbol, config } => run_info(symbol.as_deref(), &config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn fail(err: DripError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

fn data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, DripError> {
    let path = config
        .get_string("data", "path")
        .ok_or_else(|| DripError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(path)))
}

pub fn resolve_symbol(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<String, DripError> {
    symbol_override
        .map(str::to_string)
        .or_else(|| config.get_string("backtest", "symbol"))
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DripError::ConfigMissing {
            section: "backtest".into(),
            key: "symbol".into(),
        })
}

fn resolve_cadence(config: &dyn ConfigPort, overrides: &Overrides) -> Result<Cadence, DripError> {
    let kind = match overrides.cadence {
        Some(kind) => kind,
        None => match config.get_string("strategy", "cadence").as_deref() {
            None => CadenceKind::Weekly,
            Some(s) if s.eq_ignore_ascii_case("weekly") => CadenceKind::Weekly,
            Some(s) if s.eq_ignore_ascii_case("monthly") => CadenceKind::Monthly,
            Some(_) => {
                return Err(DripError::ConfigInvalid {
                    section: "strategy".into(),
                    key: "cadence".into(),
                    reason: "cadence must be weekly or monthly".into(),
                });
            }
        },
    };

    let cadence = match kind {
        CadenceKind::Weekly => {
            let raw = overrides
                .weekday
                .clone()
                .or_else(|| config.get_string("strategy", "weekday"));
            let weekday = match raw {
                None => 0,
                Some(raw) => parse_weekday(&raw).ok_or_else(|| {
                    DripError::invalid_parameter("weekday", &raw, "expected 0-6 or a day name")
                })?,
            };
            Cadence::Weekly { weekday }
        }
        CadenceKind::Monthly => {
            let day_of_month = match overrides.day_of_month {
                Some(day) => day,
                None => {
                    let day = config.get_int("strategy", "day_of_month", 1);
                    u8::try_from(day).map_err(|_| {
                        DripError::invalid_parameter("day_of_month", day, "must be between 1 and 31")
                    })?
                }
            };
            Cadence::Monthly { day_of_month }
        }
    };
    cadence.validate()?;
    Ok(cadence)
}

/// Build the backtest request from config, with command-line overrides.
pub fn build_strategy(
    config: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<Strategy, DripError> {
    let strategy = Strategy {
        cadence: resolve_cadence(config, overrides)?,
        amount: overrides
            .amount
            .unwrap_or_else(|| config.get_double("backtest", "amount", 100.0)),
        start_date: parse_date(config, "start_date")?,
        end_date: parse_date(config, "end_date")?,
        compare_to_lump_sum: !overrides.no_compare
            && config.get_bool("backtest", "compare_lump_sum", true),
    };
    strategy.validate()?;
    Ok(strategy)
}

/// Fetch prices, optionally align the start to the data, run and report.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report: &dyn ReportPort,
    symbol: &str,
    strategy: &Strategy,
    align_start_to_data: bool,
    out: &mut dyn Write,
) -> Result<BacktestOutcome, DripError> {
    info!(
        symbol,
        start = %strategy.start_date,
        end = %strategy.end_date,
        "loading price history"
    );
    let series = data_port.fetch_closes(symbol, strategy.start_date, strategy.end_date)?;

    let Some((first, last, count)) = series.date_range() else {
        warn!(symbol, "no price data in the requested window");
        let outcome = BacktestOutcome::Empty;
        let ctx = ReportContext { symbol, strategy };
        report.write(&outcome, &ctx, out)?;
        return Ok(outcome);
    };
    info!(symbol, %first, %last, bars = count, "loaded price history");

    let mut strategy = strategy.clone();
    if align_start_to_data && first > strategy.start_date {
        info!(
            requested = %strategy.start_date,
            aligned = %first,
            "price data starts later than requested, moving start date"
        );
        strategy.start_date = first;
    }

    let outcome = backtest_engine::run_backtest(&series, &strategy)?;
    let ctx = ReportContext {
        symbol,
        strategy: &strategy,
    };
    report.write(&outcome, &ctx, out)?;
    Ok(outcome)
}

fn run_backtest(config_path: &PathBuf, overrides: &Overrides, show_records: bool) -> ExitCode {
    info!(path = %config_path.display(), "loading config");
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_config_except(&config, &overrides.replaced_keys()) {
        return fail(e);
    }

    let symbol = match resolve_symbol(overrides.symbol.as_deref(), &config) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let strategy = match build_strategy(&config, overrides) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let data_port = match data_adapter(&config) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };

    let align = config.get_bool("backtest", "align_start_to_data", true);
    let show_records = show_records || config.get_bool("backtest", "show_records", false);
    let report = TextReport::new(show_records);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match run_backtest_pipeline(&data_port, &report, &symbol, &strategy, align, &mut out) {
        Ok(BacktestOutcome::Empty) => ExitCode::from(EXIT_EMPTY),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

pub fn run_dry_run(config_path: &PathBuf, overrides: &Overrides) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_config_except(&config, &overrides.replaced_keys()) {
        return fail(e);
    }
    let symbol = resolve_symbol(overrides.symbol.as_deref(), &config);
    let strategy = match build_strategy(&config, overrides) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    eprintln!("\nStrategy:");
    match &symbol {
        Ok(s) => eprintln!("  symbol:    {}", s),
        Err(_) => eprintln!("  symbol:    (set with --symbol)"),
    }
    eprintln!("  schedule:  {}", strategy.cadence);
    eprintln!("  amount:    {:.2}", strategy.amount);
    eprintln!("  window:    {} to {}", strategy.start_date, strategy.end_date);
    eprintln!(
        "  lump sum:  {}",
        if strategy.compare_to_lump_sum { "compare" } else { "skip" }
    );
    match strategy.schedule() {
        Ok(dates) => eprintln!("  periods:   {} scheduled", dates.len()),
        Err(e) => return fail(e),
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let adapter = match data_adapter(&config) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };

    let symbols = match adapter.list_symbols() {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_info(symbol: Option<&str>, config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let symbol = match resolve_symbol(symbol, &config) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let adapter = match data_adapter(&config) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };

    match adapter.get_data_range(&symbol) {
        Ok(Some((min_date, max_date, count))) => {
            println!("{}: {} bars, {} to {}", symbol, count, min_date, max_date);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", symbol);
            ExitCode::from(EXIT_EMPTY)
        }
        Err(e) => fail(e),
    }
}
