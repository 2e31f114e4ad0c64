use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use backtest_common::data::{read_json_file, JsonFileSource};
use backtest_core::{
    backtest::{
        list_strategies, BacktestError, BacktestRequest, BacktestRunner, BaselineParams,
        MetricsCalculator, MetricsRequest, PortfolioSimulator, SimulateRequest, StrategyParams,
    },
    config::Settings,
};

#[derive(Parser)]
#[command(name = "backtest")]
#[command(about = "Backtest buy-signal strategies against a buy-and-hold baseline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available strategies
    Strategies,
    /// Simulate a portfolio from a JSON request of prices and signals
    Simulate {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Compute metrics for one or more labeled value series
    Metrics {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Run a strategy and the buy-and-hold baseline over a price file
    Run {
        #[arg(long)]
        prices: PathBuf,
        #[arg(long)]
        dividends: Option<PathBuf>,
        #[arg(short, long)]
        ticker: String,
        #[arg(short, long)]
        strategy: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        threshold: Option<f64>,
        #[arg(long)]
        lookback: Option<String>,
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        end_date: Option<NaiveDate>,
        #[arg(long)]
        initial_capital: Option<f64>,
        #[arg(long)]
        investment_per_trade: Option<f64>,
        #[arg(long)]
        transaction_cost_pct: Option<f64>,
        #[arg(long)]
        cash_interest_rate_pct: Option<f64>,
        #[arg(long)]
        no_reinvest: bool,
        #[arg(long)]
        baseline_capital: Option<f64>,
        #[arg(long)]
        risk_free_rate: Option<f64>,
    },
}

fn main() -> ExitCode {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", error_line(&err));
            ExitCode::FAILURE
        }
    }
}

/// The single stderr line reported for a failed command.
fn error_line(err: &anyhow::Error) -> String {
    let code = err
        .downcast_ref::<BacktestError>()
        .map(BacktestError::code)
        .unwrap_or("ERROR");
    format!("error [{}]: {:#}", code, err)
}

fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Strategies => print_json(&list_strategies()),

        Commands::Simulate { input } => {
            let request: SimulateRequest = read_json_file(&input)
                .map_err(BacktestError::from)
                .with_context(|| format!("Failed to read simulation request {}", input.display()))?;
            let result = PortfolioSimulator::new(request.config).run(
                &request.price_data,
                &request.signals,
                &request.dividend_data,
            )?;
            print_json(&result)
        }

        Commands::Metrics { input } => {
            let request: MetricsRequest = read_json_file(&input)
                .map_err(BacktestError::from)
                .with_context(|| format!("Failed to read metrics request {}", input.display()))?;
            let report = MetricsCalculator::new()
                .with_risk_free_rate(request.risk_free_rate_annual)
                .with_period(request.start_date, request.end_date)
                .calculate_portfolios(&request.portfolios)?;
            print_json(&report)
        }

        Commands::Run {
            prices,
            dividends,
            ticker,
            strategy,
            threshold,
            lookback,
            start_date,
            end_date,
            initial_capital,
            investment_per_trade,
            transaction_cost_pct,
            cash_interest_rate_pct,
            no_reinvest,
            baseline_capital,
            risk_free_rate,
        } => {
            let settings = Settings::new().context("Failed to load settings")?;

            let mut portfolio = settings.simulation.to_config();
            if let Some(v) = initial_capital {
                portfolio.initial_capital = v;
            }
            if let Some(v) = investment_per_trade {
                portfolio.investment_per_trade = v;
            }
            if let Some(v) = transaction_cost_pct {
                portfolio.transaction_cost_pct = v;
            }
            if let Some(v) = cash_interest_rate_pct {
                portfolio.cash_interest_rate_pct = v;
            }
            if no_reinvest {
                portfolio.reinvest_dividends = false;
            }

            let reinvest_dividends = portfolio.reinvest_dividends;

            let mut strategy_config = settings.strategy.to_config();
            if threshold.is_some() {
                strategy_config.price_change_threshold = threshold;
            }
            if lookback.is_some() {
                strategy_config.lookback_period = lookback;
            }

            let request = BacktestRequest {
                ticker,
                start_date,
                end_date,
                strategy: StrategyParams {
                    strategy_type: strategy.unwrap_or(settings.strategy.default_strategy),
                    config: strategy_config,
                },
                portfolio,
                baseline: BaselineParams {
                    initial_capital: baseline_capital
                        .unwrap_or(settings.simulation.baseline_initial_capital),
                    reinvest_dividends,
                },
                risk_free_rate_annual: risk_free_rate
                    .unwrap_or(settings.metrics.risk_free_rate_annual),
            };

            let mut source = JsonFileSource::new(prices);
            if let Some(path) = dividends {
                source = source.with_dividends(path);
            }

            let report = BacktestRunner::new(&source).run(&request)?;

            info!("Backtest Results ({}):", report.metadata.ticker);
            info!(
                "Total Return: {}% (baseline {}%)",
                report.active.metrics.total_return_pct, report.baseline.metrics.total_return_pct
            );
            info!("Total Trades: {}", report.active.total_trades);
            info!("Sharpe Ratio: {}", report.active.metrics.sharpe_ratio);
            info!("Max Drawdown: {}%", report.active.metrics.max_drawdown_pct);

            print_json(&report)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}
