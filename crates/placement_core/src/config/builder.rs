//! Fluent construction of `SimulationParameters`

use crate::error::ValidationError;
use crate::model::{
    AccountType, DividendPolicy, Horizon, SimulationParameters, TaxScenario, TaxTiming,
};

/// Builder starting from the default parameters.
///
/// Rates are fractions. `build` validates the result.
#[derive(Debug, Clone, Default)]
pub struct ParametersBuilder {
    params: SimulationParameters,
    standard_horizon: bool,
}

impl ParametersBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing parameters
    #[must_use]
    pub fn from_parameters(params: SimulationParameters) -> Self {
        Self {
            params,
            standard_horizon: false,
        }
    }

    #[must_use]
    pub fn initial_price(mut self, price: f64) -> Self {
        self.params.initial_price = price;
        self
    }

    #[must_use]
    pub fn initial_investment(mut self, amount: f64) -> Self {
        self.params.initial_investment = amount;
        self
    }

    #[must_use]
    pub fn monthly_contribution(mut self, amount: f64) -> Self {
        self.params.monthly_contribution = amount;
        self
    }

    #[must_use]
    pub fn years(mut self, years: u32) -> Self {
        self.params.years = years;
        self
    }

    /// Only accept horizons from `Horizon::STANDARD_YEARS`
    #[must_use]
    pub fn standard_horizon(mut self) -> Self {
        self.standard_horizon = true;
        self
    }

    #[must_use]
    pub fn annual_return(mut self, rate: f64) -> Self {
        self.params.annual_return = rate;
        self
    }

    #[must_use]
    pub fn volatility(mut self, volatility: f64) -> Self {
        self.params.volatility = volatility;
        self
    }

    #[must_use]
    pub fn dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.params.dividend_yield = dividend_yield;
        self
    }

    #[must_use]
    pub fn inflation_rate(mut self, rate: f64) -> Self {
        self.params.inflation_rate = rate;
        self
    }

    #[must_use]
    pub fn account(mut self, account: AccountType) -> Self {
        self.params.account = account;
        self
    }

    #[must_use]
    pub fn tax_scenario(mut self, scenario: TaxScenario) -> Self {
        self.params.tax_scenario = scenario;
        self
    }

    #[must_use]
    pub fn tax_timing(mut self, timing: TaxTiming) -> Self {
        self.params.tax_timing = timing;
        self
    }

    #[must_use]
    pub fn dividend_policy(mut self, policy: DividendPolicy) -> Self {
        self.params.dividend_policy = policy;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.params.seed = Some(seed);
        self
    }

    /// Draw a fresh path on every run
    #[must_use]
    pub fn unseeded(mut self) -> Self {
        self.params.seed = None;
        self
    }

    pub fn build(self) -> Result<SimulationParameters, ValidationError> {
        self.params.validate()?;
        if self.standard_horizon {
            Horizon::standard(self.params.years)?;
        }
        Ok(self.params)
    }
}
