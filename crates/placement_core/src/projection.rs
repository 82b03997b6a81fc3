//! Closed-form projections with a constant return
//!
//! These mirror the quick console estimates: a lump sum compounded yearly,
//! and a monthly DCA plan compounded at the equivalent monthly rate.

use crate::model::{
    SimulationParameters, SimulationResult, TaxTiming, compounded_monthly_rate,
};
use crate::taxes::{
    annual_tax, apply_exit_taxation, liquidation_value, real_value, settled_outcome, tax_rate,
};

/// `capital × (1 + r)^years`
#[must_use]
#[inline]
pub fn compound_lump_sum(capital: f64, annual_return: f64, years: u32) -> f64 {
    capital * (1.0 + annual_return).powi(years as i32)
}

/// Lump sum compounded once a year, taxed at exit.
///
/// Monthly contributions, volatility and dividends are ignored.
#[must_use]
pub fn lump_sum_projection(params: &SimulationParameters) -> SimulationResult {
    let capital = params.initial_investment;
    let rate = tax_rate(params.account, params.years, params.tax_scenario);
    let final_value = compound_lump_sum(capital, params.annual_return, params.years);

    let value_history: Vec<f64> = (1..=params.months())
        .map(|m| capital * (1.0 + params.annual_return).powf(m as f64 / 12.0))
        .collect();
    let net_history = value_history
        .iter()
        .map(|v| liquidation_value(*v, capital, rate))
        .collect();

    let outcome = apply_exit_taxation(
        final_value,
        capital,
        params.account,
        params.years,
        params.tax_scenario,
    );

    SimulationResult {
        account: params.account,
        tax_scenario: params.tax_scenario,
        tax_timing: TaxTiming::AtExit,
        years: params.years,
        final_value,
        total_invested: capital,
        gross_gain: final_value - capital,
        tax_rate: outcome.tax_rate,
        tax_paid: outcome.tax_paid,
        effective_tax_rate: outcome.effective_tax_rate,
        net_value: outcome.net_value,
        net_gain: outcome.net_gain,
        cagr: outcome.cagr,
        real_net_value: real_value(outcome.net_value, params.inflation_rate, params.years),
        total_dividends: 0.0,
        final_shares: 0.0,
        value_history,
        share_history: Vec::new(),
        price_history: Vec::new(),
        net_history,
        yearly_taxes: Vec::new(),
    }
}

/// Monthly DCA at the compounded monthly rate: `value = value × (1 + rate) + monthly`.
///
/// Annual timing (accounts taxed on realization only) takes each year's gain
/// out of the portfolio at every twelfth month.
#[must_use]
pub fn dca_projection(params: &SimulationParameters) -> SimulationResult {
    let monthly_rate = compounded_monthly_rate(params.annual_return);
    let rate = tax_rate(params.account, params.years, params.tax_scenario);
    let annual = params.tax_timing == TaxTiming::Annual && params.account.taxed_on_realization();

    let months = params.months();
    let mut value = params.initial_investment;
    let mut invested = params.initial_investment;
    let mut year_start_value = value;
    let mut year_contributions = 0.0;

    let mut value_history = Vec::with_capacity(months);
    let mut net_history = Vec::with_capacity(months);
    let mut yearly_taxes = Vec::new();
    let mut yearly_gains = Vec::new();

    for month in 1..=months {
        value = value * (1.0 + monthly_rate) + params.monthly_contribution;
        invested += params.monthly_contribution;
        year_contributions += params.monthly_contribution;

        if annual && month % 12 == 0 {
            let year_gain = value - year_start_value - year_contributions;
            let tax = annual_tax(year_gain, rate);
            value -= tax;
            yearly_taxes.push(tax);
            yearly_gains.push(year_gain);
            year_start_value = value;
            year_contributions = 0.0;
        }

        value_history.push(value);
        net_history.push(if annual {
            value
        } else {
            liquidation_value(value, invested, rate)
        });
    }

    let outcome = if annual {
        settled_outcome(
            value,
            invested,
            &yearly_taxes,
            &yearly_gains,
            params.account,
            params.years,
            params.tax_scenario,
        )
    } else {
        apply_exit_taxation(
            value,
            invested,
            params.account,
            params.years,
            params.tax_scenario,
        )
    };

    // annual tax already left the portfolio
    let gross_gain = if annual {
        outcome.net_gain + outcome.tax_paid
    } else {
        value - invested
    };

    SimulationResult {
        account: params.account,
        tax_scenario: params.tax_scenario,
        tax_timing: if annual {
            TaxTiming::Annual
        } else {
            TaxTiming::AtExit
        },
        years: params.years,
        final_value: value,
        total_invested: invested,
        gross_gain,
        tax_rate: outcome.tax_rate,
        tax_paid: outcome.tax_paid,
        effective_tax_rate: outcome.effective_tax_rate,
        net_value: outcome.net_value,
        net_gain: outcome.net_gain,
        cagr: outcome.cagr,
        real_net_value: real_value(outcome.net_value, params.inflation_rate, params.years),
        total_dividends: 0.0,
        final_shares: 0.0,
        value_history,
        share_history: Vec::new(),
        price_history: Vec::new(),
        net_history,
        yearly_taxes,
    }
}
