use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::MonthlyRates;

/// Seed used for single deterministic runs when none is given explicitly.
pub const DEFAULT_SEED: u64 = 42;

/// French equity account wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Plan d'Epargne en Actions: gains taxed on withdrawal, reduced rate after 5 years
    #[default]
    Pea,
    /// Compte-Titres Ordinaire: gains taxed at a flat rate on each realization
    Cto,
}

impl AccountType {
    pub const ALL: [AccountType; 2] = [AccountType::Pea, AccountType::Cto];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Pea => "PEA",
            AccountType::Cto => "CTO",
        }
    }

    /// Whether gains are taxed on each realization rather than deferred to exit.
    #[must_use]
    pub fn taxed_on_realization(&self) -> bool {
        matches!(self, AccountType::Cto)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tax law assumption used to pick the PEA / CTO rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxScenario {
    #[default]
    Current,
    Optimistic,
    Pessimistic,
}

impl TaxScenario {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            TaxScenario::Current => "current",
            TaxScenario::Optimistic => "optimistic",
            TaxScenario::Pessimistic => "pessimistic",
        }
    }
}

impl fmt::Display for TaxScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// When gains are taxed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxTiming {
    /// Single tax on the total gain at the end of the horizon
    #[default]
    AtExit,
    /// Tax each year's incremental gain (accounts taxed on realization only)
    Annual,
}

/// How dividends reach the portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DividendPolicy {
    /// Dividends are folded into price growth only
    #[default]
    Accrued,
    /// Dividends are also paid per share and bought back as new shares
    Distributed,
}

/// Investment horizon in whole years
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Horizon {
    years: u32,
}

impl Horizon {
    /// Horizons offered by the interactive tools
    pub const STANDARD_YEARS: [u32; 7] = [1, 3, 5, 10, 15, 20, 30];

    pub fn from_years(years: u32) -> Result<Self, ValidationError> {
        if years == 0 {
            return Err(ValidationError::ZeroHorizon);
        }
        Ok(Self { years })
    }

    /// Like `from_years` but restricted to `STANDARD_YEARS`
    pub fn standard(years: u32) -> Result<Self, ValidationError> {
        let horizon = Self::from_years(years)?;
        if !Self::STANDARD_YEARS.contains(&years) {
            return Err(ValidationError::NonStandardHorizon(years));
        }
        Ok(horizon)
    }

    #[must_use]
    pub fn years(&self) -> u32 {
        self.years
    }

    #[must_use]
    pub fn months(&self) -> usize {
        self.years as usize * 12
    }
}

fn default_initial_price() -> f64 {
    150.0
}

fn default_initial_investment() -> f64 {
    10_000.0
}

fn default_monthly_contribution() -> f64 {
    500.0
}

fn default_years() -> u32 {
    10
}

fn default_annual_return() -> f64 {
    0.08
}

fn default_volatility() -> f64 {
    0.20
}

fn default_dividend_yield() -> f64 {
    0.015
}

fn default_inflation_rate() -> f64 {
    0.02
}

fn default_seed() -> Option<u64> {
    Some(DEFAULT_SEED)
}

/// Everything needed to run one simulation. Immutable per run.
///
/// Rates are fractions (`0.08` = 8 %). Monthly contributions are invested at
/// the end of each month starting with month 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    #[serde(default = "default_initial_price")]
    pub initial_price: f64,

    #[serde(default = "default_initial_investment")]
    pub initial_investment: f64,

    #[serde(default = "default_monthly_contribution")]
    pub monthly_contribution: f64,

    #[serde(default = "default_years")]
    pub years: u32,

    #[serde(default = "default_annual_return")]
    pub annual_return: f64,

    #[serde(default = "default_volatility")]
    pub volatility: f64,

    #[serde(default = "default_dividend_yield")]
    pub dividend_yield: f64,

    /// Only used to express the net result in today's money
    #[serde(default = "default_inflation_rate")]
    pub inflation_rate: f64,

    #[serde(default)]
    pub account: AccountType,

    #[serde(default)]
    pub tax_scenario: TaxScenario,

    #[serde(default)]
    pub tax_timing: TaxTiming,

    #[serde(default)]
    pub dividend_policy: DividendPolicy,

    /// `None` draws a fresh, non-reproducible path
    #[serde(default = "default_seed")]
    pub seed: Option<u64>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            initial_price: default_initial_price(),
            initial_investment: default_initial_investment(),
            monthly_contribution: default_monthly_contribution(),
            years: default_years(),
            annual_return: default_annual_return(),
            volatility: default_volatility(),
            dividend_yield: default_dividend_yield(),
            inflation_rate: default_inflation_rate(),
            account: AccountType::default(),
            tax_scenario: TaxScenario::default(),
            tax_timing: TaxTiming::default(),
            dividend_policy: DividendPolicy::default(),
            seed: default_seed(),
        }
    }
}

impl SimulationParameters {
    /// Reject inputs that would make the simulation meaningless.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let finite_fields = [
            ("initial_price", self.initial_price),
            ("initial_investment", self.initial_investment),
            ("monthly_contribution", self.monthly_contribution),
            ("annual_return", self.annual_return),
            ("volatility", self.volatility),
            ("dividend_yield", self.dividend_yield),
            ("inflation_rate", self.inflation_rate),
        ];
        for (field, value) in finite_fields {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { field });
            }
        }

        if self.initial_price <= 0.0 {
            return Err(ValidationError::NonPositivePrice(self.initial_price));
        }
        if self.initial_investment <= 0.0 {
            return Err(ValidationError::NonPositiveInvestment(
                self.initial_investment,
            ));
        }
        if self.monthly_contribution < 0.0 {
            return Err(ValidationError::NegativeContribution(
                self.monthly_contribution,
            ));
        }
        if self.volatility < 0.0 {
            return Err(ValidationError::NegativeVolatility(self.volatility));
        }
        if self.dividend_yield < 0.0 {
            return Err(ValidationError::NegativeDividendYield(self.dividend_yield));
        }
        Horizon::from_years(self.years)?;

        Ok(())
    }

    #[must_use]
    pub fn months(&self) -> usize {
        self.years as usize * 12
    }

    #[must_use]
    pub fn monthly_rates(&self) -> MonthlyRates {
        MonthlyRates::from_annual(self.annual_return, self.volatility, self.dividend_yield)
    }

    /// Capital paid in over the whole horizon
    #[must_use]
    pub fn total_contributions(&self) -> f64 {
        self.initial_investment + self.monthly_contribution * self.months() as f64
    }

    #[must_use]
    pub fn with_account(&self, account: AccountType) -> Self {
        Self {
            account,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_seed(&self, seed: Option<u64>) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }
}
