use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::accumulation::{AccumulationPlan, accumulate};
use crate::analysis::{median_index, summarize};
use crate::error::{Result, SimulationError};
use crate::model::{
    AccountComparison, AccountDistribution, AccountType, MonteCarloBatch, MonteCarloConfig,
    MonteCarloProgress, PricePath, SimulationParameters, SimulationResult, TaxTiming,
};
use crate::price_path::seeded_price_path;
use crate::taxes::{
    apply_exit_taxation, liquidation_value, real_value, settled_outcome, tax_rate,
};

/// Generate the price path described by `params` with an explicit seed
pub fn generate_path(params: &SimulationParameters, seed: Option<u64>) -> Result<PricePath> {
    seeded_price_path(
        params.initial_price,
        params.months(),
        &params.monthly_rates(),
        seed,
    )
}

/// Accumulate and tax an existing path for `account`.
///
/// `params.account` is ignored; the same path can be replayed for each wrapper.
#[must_use]
pub fn simulate_path(
    params: &SimulationParameters,
    path: &PricePath,
    account: AccountType,
) -> SimulationResult {
    let params = params.with_account(account);
    let plan = AccumulationPlan::from_parameters(&params);
    let acc = accumulate(path, &plan);

    let final_value = acc.final_value();
    let invested = acc.total_contributed;
    let annual = plan.annual_tax_rate.is_some();

    let outcome = if annual {
        settled_outcome(
            final_value,
            invested,
            &acc.yearly_taxes,
            &acc.yearly_gains,
            account,
            params.years,
            params.tax_scenario,
        )
    } else {
        apply_exit_taxation(
            final_value,
            invested,
            account,
            params.years,
            params.tax_scenario,
        )
    };

    // annual tax already left the portfolio
    let gross_gain = if annual {
        outcome.net_gain + outcome.tax_paid
    } else {
        final_value - invested
    };

    let net_history = if annual {
        acc.value_history.clone()
    } else {
        let rate = tax_rate(account, params.years, params.tax_scenario);
        acc.value_history
            .iter()
            .zip(&acc.contributed_history)
            .map(|(value, contributed)| liquidation_value(*value, *contributed, rate))
            .collect()
    };

    SimulationResult {
        account,
        tax_scenario: params.tax_scenario,
        tax_timing: if annual {
            TaxTiming::Annual
        } else {
            TaxTiming::AtExit
        },
        years: params.years,
        final_value,
        total_invested: invested,
        gross_gain,
        tax_rate: outcome.tax_rate,
        tax_paid: outcome.tax_paid,
        effective_tax_rate: outcome.effective_tax_rate,
        net_value: outcome.net_value,
        net_gain: outcome.net_gain,
        cagr: outcome.cagr,
        real_net_value: real_value(outcome.net_value, params.inflation_rate, params.years),
        total_dividends: acc.total_dividends,
        final_shares: acc.final_shares(),
        price_history: path.prices()[1..].to_vec(),
        share_history: acc.share_history,
        value_history: acc.value_history,
        net_history,
        yearly_taxes: acc.yearly_taxes,
    }
}

/// Single run for `params.account`, seeded with `params.seed`
pub fn run_simulation(params: &SimulationParameters) -> Result<SimulationResult> {
    params.validate()?;
    let path = generate_path(params, params.seed)?;
    let result = simulate_path(params, &path, params.account);
    debug!(
        account = %params.account,
        seed = ?params.seed,
        net_value = result.net_value,
        "simulation complete"
    );
    Ok(result)
}

/// Tax one seeded path under both wrappers
pub fn compare_accounts(params: &SimulationParameters) -> Result<AccountComparison> {
    params.validate()?;
    let path = generate_path(params, params.seed)?;
    let comparison = AccountComparison::new(
        simulate_path(params, &path, AccountType::Pea),
        simulate_path(params, &path, AccountType::Cto),
    );
    debug!(
        seed = ?params.seed,
        value_advantage = comparison.value_advantage,
        "account comparison complete"
    );
    Ok(comparison)
}

pub fn monte_carlo_simulate(
    params: &SimulationParameters,
    config: &MonteCarloConfig,
) -> Result<MonteCarloBatch> {
    monte_carlo_simulate_with_progress(params, config, &MonteCarloProgress::new())
}

/// Run `config.trials` independent trials, each taxed as PEA and CTO.
///
/// Trial `i` uses seed `config.base_seed + i`, so the batch is reproducible and
/// does not depend on how trials are scheduled. The cancel flag is checked
/// before every trial.
pub fn monte_carlo_simulate_with_progress(
    params: &SimulationParameters,
    config: &MonteCarloConfig,
    progress: &MonteCarloProgress,
) -> Result<MonteCarloBatch> {
    params.validate()?;
    config.validate()?;

    info!(
        trials = config.trials,
        years = params.years,
        base_seed = config.base_seed,
        "starting Monte Carlo batch"
    );

    let run_trial = |trial: usize| -> Result<(f64, f64)> {
        if progress.is_cancelled() {
            return Err(SimulationError::Cancelled);
        }
        let path = generate_path(params, Some(config.seed_for_trial(trial)))?;
        let pea = simulate_path(params, &path, AccountType::Pea).net_value;
        let cto = simulate_path(params, &path, AccountType::Cto).net_value;
        progress.record_trial();
        Ok((pea, cto))
    };

    #[cfg(feature = "parallel")]
    let outcomes = (0..config.trials)
        .into_par_iter()
        .map(run_trial)
        .collect::<Result<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let outcomes = (0..config.trials)
        .map(run_trial)
        .collect::<Result<Vec<_>>>()?;

    let (pea_values, cto_values): (Vec<f64>, Vec<f64>) = outcomes.into_iter().unzip();

    let total_invested = params.total_contributions();
    let median_price_path = match median_index(&pea_values) {
        Some(trial) => generate_path(params, Some(config.seed_for_trial(trial)))?
            .prices()
            .to_vec(),
        None => Vec::new(),
    };

    let pea = AccountDistribution {
        account: AccountType::Pea,
        stats: summarize(&pea_values, total_invested, params.years, config),
        net_values: pea_values,
    };
    let cto = AccountDistribution {
        account: AccountType::Cto,
        stats: summarize(&cto_values, total_invested, params.years, config),
        net_values: cto_values,
    };

    info!(
        trials = config.trials,
        pea_mean = pea.stats.mean,
        cto_mean = cto.stats.mean,
        "Monte Carlo batch complete"
    );

    Ok(MonteCarloBatch {
        trials: config.trials,
        years: params.years,
        total_invested,
        confidence_level: config.confidence_level,
        pea,
        cto,
        median_price_path,
    })
}
