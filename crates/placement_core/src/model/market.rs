use serde::{Deserialize, Serialize};

/// Annual assumptions converted to a monthly step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRates {
    /// Mean of the monthly return shock (`annual_return / 12`)
    pub expected_return: f64,
    /// Standard deviation of the monthly shock (`annual_volatility / sqrt(12)`)
    pub volatility: f64,
    /// Fraction of the previous price paid out each month (`dividend_yield / 12`)
    pub dividend_rate: f64,
}

impl MonthlyRates {
    #[must_use]
    pub fn from_annual(annual_return: f64, annual_volatility: f64, dividend_yield: f64) -> Self {
        Self {
            expected_return: annual_return / 12.0,
            volatility: annual_volatility / 12f64.sqrt(),
            dividend_rate: dividend_yield / 12.0,
        }
    }

    /// Deterministic rates with no volatility
    #[must_use]
    pub fn deterministic(monthly_return: f64, dividend_rate: f64) -> Self {
        Self {
            expected_return: monthly_return,
            volatility: 0.0,
            dividend_rate,
        }
    }
}

/// Monthly rate that compounds to `annual_rate` over twelve months
#[must_use]
#[inline]
pub fn compounded_monthly_rate(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / 12.0) - 1.0
}

/// Monthly prices over the horizon, index 0 being the initial price.
///
/// When present, `dividends[m]` is the dividend paid per share during month `m`
/// (always 0 at index 0). Only built through [`PricePath::new`], so it always
/// holds the initial price. Never mutated once generated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePath {
    prices: Vec<f64>,
    dividends: Option<Vec<f64>>,
}

impl PricePath {
    /// Path starting at `initial_price` followed by one price per monthly step.
    #[must_use]
    pub fn new(initial_price: f64, steps: Vec<f64>) -> Self {
        let mut prices = Vec::with_capacity(steps.len() + 1);
        prices.push(initial_price);
        prices.extend(steps);
        Self {
            prices,
            dividends: None,
        }
    }

    /// Attach the dividend paid per share during each monthly step.
    ///
    /// Month 0 pays nothing. Missing steps pay 0 and extra ones are dropped.
    #[must_use]
    pub fn with_dividends(mut self, step_dividends: Vec<f64>) -> Self {
        let mut dividends = Vec::with_capacity(self.prices.len());
        dividends.push(0.0);
        dividends.extend(step_dividends);
        dividends.resize(self.prices.len(), 0.0);
        self.dividends = Some(dividends);
        self
    }

    /// Number of monthly steps (prices minus the initial one)
    #[must_use]
    pub fn months(&self) -> usize {
        self.prices.len().saturating_sub(1)
    }

    #[must_use]
    pub fn initial_price(&self) -> f64 {
        self.prices[0]
    }

    #[must_use]
    pub fn final_price(&self) -> f64 {
        self.prices[self.prices.len() - 1]
    }

    #[must_use]
    pub fn price(&self, month: usize) -> f64 {
        self.prices[month]
    }

    #[must_use]
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Dividend per share for `month`, if the path carries dividend data
    #[must_use]
    pub fn dividend(&self, month: usize) -> Option<f64> {
        self.dividends
            .as_ref()
            .map(|divs| divs.get(month).copied().unwrap_or(0.0))
    }

    #[must_use]
    pub fn dividends(&self) -> Option<&[f64]> {
        self.dividends.as_deref()
    }

    #[must_use]
    pub fn has_dividends(&self) -> bool {
        self.dividends.is_some()
    }

    /// Same prices without the dividend series
    #[must_use]
    pub fn without_dividends(self) -> Self {
        Self {
            prices: self.prices,
            dividends: None,
        }
    }
}
