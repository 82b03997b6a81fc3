//! Taxation of capital gains under the PEA and CTO wrappers
//!
//! Rates come from a small policy table keyed by tax scenario. Gains are taxed
//! either once at exit or, for accounts taxed on realization, year by year.

use crate::model::{AccountType, TaxOutcome, TaxScenario};

/// Minimum holding period (years) before PEA gains are taxed at all
pub const PEA_HOLDING_PERIOD_YEARS: u32 = 5;

/// Statutory rates on gains for one scenario
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxRates {
    pub pea: f64,
    pub cto: f64,
}

impl TaxRates {
    #[must_use]
    pub const fn for_scenario(scenario: TaxScenario) -> Self {
        match scenario {
            TaxScenario::Current => Self {
                pea: 0.172,
                cto: 0.30,
            },
            TaxScenario::Optimistic => Self {
                pea: 0.15,
                cto: 0.25,
            },
            TaxScenario::Pessimistic => Self {
                pea: 0.20,
                cto: 0.35,
            },
        }
    }

    /// Highest rate any account can be charged in this scenario
    #[must_use]
    pub fn max_rate(&self) -> f64 {
        self.pea.max(self.cto)
    }
}

/// Rate on positive gains for `account` held `years` years.
///
/// PEA gains are untaxed before the holding period; exactly five years
/// already qualifies for the scenario rate.
#[must_use]
pub fn tax_rate(account: AccountType, years: u32, scenario: TaxScenario) -> f64 {
    let rates = TaxRates::for_scenario(scenario);
    match account {
        AccountType::Pea if years < PEA_HOLDING_PERIOD_YEARS => 0.0,
        AccountType::Pea => rates.pea,
        AccountType::Cto => rates.cto,
    }
}

/// Tax on a gain. Losses are neither taxed nor credited.
#[must_use]
#[inline]
pub fn exit_tax(gain: f64, rate: f64) -> f64 {
    gain.max(0.0) * rate
}

/// Tax on one year's incremental gain
#[must_use]
#[inline]
pub fn annual_tax(year_gain: f64, rate: f64) -> f64 {
    exit_tax(year_gain, rate)
}

/// Compound annual growth rate of `net_value` over `invested`.
///
/// Returns 0 when nothing was invested or the horizon is empty, and -1 when
/// the whole capital was lost.
#[must_use]
pub fn cagr(net_value: f64, invested: f64, years: u32) -> f64 {
    if invested <= 0.0 || years == 0 {
        return 0.0;
    }
    let ratio = net_value / invested;
    if ratio <= 0.0 {
        return -1.0;
    }
    ratio.powf(1.0 / f64::from(years)) - 1.0
}

/// Share of the gross gain paid as tax, 0 when there was no gain
#[must_use]
pub fn effective_rate(tax_paid: f64, gross_gain: f64) -> f64 {
    if gross_gain > 0.0 {
        tax_paid / gross_gain
    } else {
        0.0
    }
}

/// Tax a final value once, at the end of the horizon
#[must_use]
pub fn apply_exit_taxation(
    final_value: f64,
    total_invested: f64,
    account: AccountType,
    years: u32,
    scenario: TaxScenario,
) -> TaxOutcome {
    let rate = tax_rate(account, years, scenario);
    let gross_gain = final_value - total_invested;
    let tax_paid = exit_tax(gross_gain, rate);
    let net_value = final_value - tax_paid;

    TaxOutcome {
        account,
        tax_rate: rate,
        tax_paid,
        net_value,
        net_gain: net_value - total_invested,
        effective_tax_rate: effective_rate(tax_paid, gross_gain),
        cagr: cagr(net_value, total_invested, years),
    }
}

/// Outcome when tax was already settled year by year out of the portfolio.
///
/// The final market value is the net value; `tax_paid` is the sum of the
/// yearly amounts. A gaining year stays taxed even when later years lose, so
/// the effective rate is measured against the positive yearly gains only.
#[must_use]
pub fn settled_outcome(
    final_value: f64,
    total_invested: f64,
    yearly_taxes: &[f64],
    yearly_gains: &[f64],
    account: AccountType,
    years: u32,
    scenario: TaxScenario,
) -> TaxOutcome {
    let tax_paid: f64 = yearly_taxes.iter().sum();
    let net_value = final_value;
    let net_gain = net_value - total_invested;
    let taxed_gains: f64 = yearly_gains.iter().map(|gain| gain.max(0.0)).sum();

    TaxOutcome {
        account,
        tax_rate: tax_rate(account, years, scenario),
        tax_paid,
        net_value,
        net_gain,
        effective_tax_rate: effective_rate(tax_paid, taxed_gains),
        cagr: cagr(net_value, total_invested, years),
    }
}

/// After-tax value if the position were closed with `value` against `invested`
#[must_use]
#[inline]
pub fn liquidation_value(value: f64, invested: f64, rate: f64) -> f64 {
    value - exit_tax(value - invested, rate)
}

/// Deflate a nominal value to today's money
#[must_use]
pub fn real_value(nominal: f64, inflation_rate: f64, years: u32) -> f64 {
    nominal / (1.0 + inflation_rate).powi(years as i32)
}
