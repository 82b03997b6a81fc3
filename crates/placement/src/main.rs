use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{WrapErr, bail, eyre};
use placement::export::{
    export_to_path, history_csv, monte_carlo_csv, results_csv,
};
use placement::report::{comparison_report, monte_carlo_report, single_report};
use placement::storage::{ParametersFile, load_quotes};
use placement::{
    ParameterOverrides, SimulationRequest, SimulationResponse, SimulationWorker, init_logging,
};
use placement_core::market_data::resolve_quote;
use placement_core::model::{AccountType, DividendPolicy, TaxScenario, TaxTiming};
use placement_core::projection::{dca_projection, lump_sum_projection};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Parser, Debug)]
#[command(name = "placement")]
#[command(about = "Simulate equity growth and taxation in a French PEA or CTO")]
struct Cli {
    /// Log level (debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Single seeded run for one account
    Simulate(InputArgs),
    /// Tax one seeded path as PEA and as CTO
    Compare(InputArgs),
    /// Run many independent trials and summarize their net values
    MonteCarlo {
        #[command(flatten)]
        input: InputArgs,

        /// Number of trials
        #[arg(long)]
        trials: Option<usize>,

        /// Confidence level for Value-at-Risk, in percent
        #[arg(long)]
        confidence: Option<f64>,

        /// Seed of trial 0; trial i uses base seed + i
        #[arg(long)]
        base_seed: Option<u64>,

        /// Risk-free rate for the Sharpe-like ratio, in percent
        #[arg(long)]
        risk_free: Option<f64>,
    },
    /// Deterministic projection without volatility
    Project {
        #[arg(value_enum, default_value = "dca")]
        kind: ProjectionKind,

        #[command(flatten)]
        input: InputArgs,
    },
    /// Look up a ticker in a quotes file
    Quote {
        symbol: String,

        /// YAML list of quotes
        #[arg(long)]
        quotes: PathBuf,
    },
    /// Write a parameters file with the default values
    InitParams {
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ProjectionKind {
    /// Initial investment compounded yearly, no contributions
    LumpSum,
    /// Monthly contributions at the compounded monthly rate
    Dca,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AccountArg {
    Pea,
    Cto,
}

impl From<AccountArg> for AccountType {
    fn from(arg: AccountArg) -> Self {
        match arg {
            AccountArg::Pea => AccountType::Pea,
            AccountArg::Cto => AccountType::Cto,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScenarioArg {
    Current,
    Optimistic,
    Pessimistic,
}

impl From<ScenarioArg> for TaxScenario {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::Current => TaxScenario::Current,
            ScenarioArg::Optimistic => TaxScenario::Optimistic,
            ScenarioArg::Pessimistic => TaxScenario::Pessimistic,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TimingArg {
    AtExit,
    Annual,
}

impl From<TimingArg> for TaxTiming {
    fn from(arg: TimingArg) -> Self {
        match arg {
            TimingArg::AtExit => TaxTiming::AtExit,
            TimingArg::Annual => TaxTiming::Annual,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DividendArg {
    Accrued,
    Distributed,
}

impl From<DividendArg> for DividendPolicy {
    fn from(arg: DividendArg) -> Self {
        match arg {
            DividendArg::Accrued => DividendPolicy::Accrued,
            DividendArg::Distributed => DividendPolicy::Distributed,
        }
    }
}

/// Simulation inputs shared by every simulating subcommand
#[derive(Args, Debug)]
struct InputArgs {
    /// YAML parameters file (see `init-params`)
    #[arg(long)]
    params: Option<PathBuf>,

    /// Ticker whose quote sets the initial price and dividend yield
    #[arg(long)]
    ticker: Option<String>,

    /// YAML list of quotes used to resolve --ticker
    #[arg(long)]
    quotes: Option<PathBuf>,

    /// Initial share price in euros
    #[arg(long)]
    price: Option<f64>,

    /// Initial investment in euros
    #[arg(long)]
    investment: Option<f64>,

    /// Monthly contribution in euros
    #[arg(long)]
    monthly: Option<f64>,

    /// Horizon in years (1, 3, 5, 10, 15, 20 or 30 unless --any-horizon)
    #[arg(long)]
    years: Option<u32>,

    /// Expected annual return, in percent
    #[arg(long = "return", allow_negative_numbers = true)]
    annual_return: Option<f64>,

    /// Annual volatility, in percent
    #[arg(long)]
    volatility: Option<f64>,

    /// Annual dividend yield, in percent
    #[arg(long)]
    dividend_yield: Option<f64>,

    /// Annual inflation, in percent
    #[arg(long, allow_negative_numbers = true)]
    inflation: Option<f64>,

    #[arg(long, value_enum)]
    account: Option<AccountArg>,

    #[arg(long, value_enum)]
    scenario: Option<ScenarioArg>,

    #[arg(long, value_enum)]
    tax_timing: Option<TimingArg>,

    #[arg(long, value_enum)]
    dividends: Option<DividendArg>,

    /// Seed of the price path (default 42)
    #[arg(long, conflicts_with = "random")]
    seed: Option<u64>,

    /// Draw a fresh, non-reproducible path
    #[arg(long)]
    random: bool,

    /// Allow horizons outside the standard set
    #[arg(long)]
    any_horizon: bool,

    /// Export results to a .csv or .json file
    #[arg(long)]
    export: Option<PathBuf>,
}

impl InputArgs {
    fn overrides(&self) -> ParameterOverrides {
        ParameterOverrides {
            params_file: self.params.clone(),
            ticker: self.ticker.clone(),
            quotes_file: self.quotes.clone(),
            initial_price: self.price,
            initial_investment: self.investment,
            monthly_contribution: self.monthly,
            years: self.years,
            annual_return_pct: self.annual_return,
            volatility_pct: self.volatility,
            dividend_yield_pct: self.dividend_yield,
            inflation_pct: self.inflation,
            account: self.account.map(Into::into),
            tax_scenario: self.scenario.map(Into::into),
            tax_timing: self.tax_timing.map(Into::into),
            dividend_policy: self.dividends.map(Into::into),
            seed: self.seed,
            random: self.random,
            any_horizon: self.any_horizon,
        }
    }
}

/// Send `request` and block until the worker answers, logging batch progress
fn run_on_worker(
    worker: &SimulationWorker,
    request: SimulationRequest,
    trials: Option<usize>,
) -> color_eyre::Result<SimulationResponse> {
    if !worker.send(request) {
        bail!("Simulation worker is not running");
    }

    let mut last_decile = 0;
    loop {
        match worker.recv_timeout(POLL_INTERVAL) {
            Ok(Some(SimulationResponse::Error(msg))) => bail!(msg),
            Ok(Some(SimulationResponse::Cancelled)) => bail!("Simulation cancelled"),
            Ok(Some(response)) => return Ok(response),
            Ok(None) => {
                if let Some(total) = trials.filter(|t| *t > 0) {
                    let decile = worker.get_progress() * 10 / total;
                    if decile > last_decile {
                        last_decile = decile;
                        tracing::info!(
                            completed = worker.get_progress(),
                            total,
                            "Monte Carlo {}% done",
                            decile * 10
                        );
                    }
                }
            }
            Err(_) => bail!("Simulation worker stopped unexpectedly"),
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), &cli.log_level)?;

    let today = jiff::Zoned::now().date();

    match cli.command {
        Command::Simulate(input) => {
            let resolved = input.overrides().resolve()?;
            let worker = SimulationWorker::new();
            let response = run_on_worker(
                &worker,
                SimulationRequest::Single {
                    params: resolved.params.clone(),
                },
                None,
            )?;
            let SimulationResponse::SingleComplete(result) = response else {
                return Err(eyre!("Unexpected worker response"));
            };

            println!("{}", single_report(&resolved.params, &result, today));
            if let Some(path) = &input.export {
                export_to_path(path, &*result, &history_csv(&result))?;
            }
        }

        Command::Compare(input) => {
            let resolved = input.overrides().resolve()?;
            let worker = SimulationWorker::new();
            let response = run_on_worker(
                &worker,
                SimulationRequest::Compare {
                    params: resolved.params.clone(),
                },
                None,
            )?;
            let SimulationResponse::CompareComplete(comparison) = response else {
                return Err(eyre!("Unexpected worker response"));
            };

            println!("{}", comparison_report(&resolved.params, &comparison, today));
            if let Some(path) = &input.export {
                let csv = results_csv(&[&comparison.pea, &comparison.cto]);
                export_to_path(path, &*comparison, &csv)?;
            }
        }

        Command::MonteCarlo {
            input,
            trials,
            confidence,
            base_seed,
            risk_free,
        } => {
            let resolved = input.overrides().resolve()?;
            let mut config = resolved.monte_carlo;
            if let Some(trials) = trials {
                config.trials = trials;
            }
            if let Some(confidence) = confidence {
                config.confidence_level = confidence / 100.0;
            }
            if let Some(base_seed) = base_seed {
                config.base_seed = base_seed;
            }
            if let Some(rate) = risk_free {
                config.risk_free_rate = rate / 100.0;
            }

            let worker = SimulationWorker::new();
            let total = config.trials;
            let response = run_on_worker(
                &worker,
                SimulationRequest::MonteCarlo {
                    params: resolved.params.clone(),
                    config,
                },
                Some(total),
            )?;
            let SimulationResponse::MonteCarloComplete(batch) = response else {
                return Err(eyre!("Unexpected worker response"));
            };

            println!("{}", monte_carlo_report(&resolved.params, &batch, today));
            if let Some(path) = &input.export {
                export_to_path(path, &*batch, &monte_carlo_csv(&batch))?;
            }
        }

        Command::Project { kind, input } => {
            let resolved = input.overrides().resolve()?;
            let result = match kind {
                ProjectionKind::LumpSum => lump_sum_projection(&resolved.params),
                ProjectionKind::Dca => dca_projection(&resolved.params),
            };

            println!("{}", single_report(&resolved.params, &result, today));
            if let Some(path) = &input.export {
                export_to_path(path, &result, &history_csv(&result))?;
            }
        }

        Command::Quote { symbol, quotes } => {
            let provider = load_quotes(&quotes)
                .wrap_err_with(|| format!("Could not load quotes from {}", quotes.display()))?;
            let quote = resolve_quote(&provider, &symbol)?;

            println!("{}", quote.symbol);
            if let Some(name) = &quote.name {
                println!("  Name            {name}");
            }
            println!(
                "  Last price      {}",
                placement::util::format::format_currency(quote.last_price)
            );
            println!(
                "  Dividend yield  {}{}",
                placement::util::format::format_percentage(quote.dividend_yield_or_default()),
                if quote.dividend_yield.is_none() {
                    " (default)"
                } else {
                    ""
                }
            );
        }

        Command::InitParams { path, force } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            ParametersFile::default().save(&path)?;
            println!("Wrote default parameters to {}", path.display());
        }
    }

    tracing::debug!("placement finished");
    Ok(())
}
