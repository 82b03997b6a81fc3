//! Resolution of simulation inputs from defaults, files, quotes and flags
//!
//! Later sources win: defaults < `--params` file < ticker quote < explicit flags.

use std::path::PathBuf;

use color_eyre::eyre::{WrapErr, eyre};
use placement_core::config::ParametersBuilder;
use placement_core::market_data::{Quote, QuoteProvider, StaticQuotes, resolve_quote};
use placement_core::model::{
    AccountType, DividendPolicy, MonteCarloConfig, SimulationParameters, TaxScenario, TaxTiming,
};

use crate::storage::{ParametersFile, load_quotes};

/// Values given on the command line. Rates are in percent (`8` = 8 %).
#[derive(Debug, Clone, Default)]
pub struct ParameterOverrides {
    pub params_file: Option<PathBuf>,
    pub ticker: Option<String>,
    pub quotes_file: Option<PathBuf>,

    pub initial_price: Option<f64>,
    pub initial_investment: Option<f64>,
    pub monthly_contribution: Option<f64>,
    pub years: Option<u32>,
    pub annual_return_pct: Option<f64>,
    pub volatility_pct: Option<f64>,
    pub dividend_yield_pct: Option<f64>,
    pub inflation_pct: Option<f64>,

    pub account: Option<AccountType>,
    pub tax_scenario: Option<TaxScenario>,
    pub tax_timing: Option<TaxTiming>,
    pub dividend_policy: Option<DividendPolicy>,

    pub seed: Option<u64>,
    /// Draw a fresh path instead of the seeded one
    pub random: bool,
    /// Accept any positive number of years
    pub any_horizon: bool,
}

/// Validated inputs ready for the core
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInputs {
    pub params: SimulationParameters,
    pub monte_carlo: MonteCarloConfig,
    pub quote: Option<Quote>,
}

fn percent(value: f64) -> f64 {
    value / 100.0
}

impl ParameterOverrides {
    fn load_file(&self) -> color_eyre::Result<ParametersFile> {
        match &self.params_file {
            Some(path) => ParametersFile::load(path)
                .wrap_err_with(|| format!("Could not load parameters from {}", path.display())),
            None => Ok(ParametersFile::default()),
        }
    }

    /// Resolve against the provider given by `--quotes`
    pub fn resolve(&self) -> color_eyre::Result<ResolvedInputs> {
        match &self.quotes_file {
            Some(path) => {
                let quotes = load_quotes(path)
                    .wrap_err_with(|| format!("Could not load quotes from {}", path.display()))?;
                self.resolve_with(Some(&quotes))
            }
            None => self.resolve_with::<StaticQuotes>(None),
        }
    }

    pub fn resolve_with<P: QuoteProvider + ?Sized>(
        &self,
        provider: Option<&P>,
    ) -> color_eyre::Result<ResolvedInputs> {
        let file = self.load_file()?;
        let mut builder = ParametersBuilder::from_parameters(file.simulation);

        let ticker = self.ticker.as_deref().or(file.ticker.as_deref());
        let quote = match ticker {
            Some(symbol) => {
                let provider = provider
                    .ok_or_else(|| eyre!("Ticker {symbol} needs a --quotes file to look up its price"))?;
                let quote = resolve_quote(provider, symbol)
                    .wrap_err_with(|| format!("Could not resolve ticker {symbol}"))?;
                tracing::info!(
                    symbol = %quote.symbol,
                    price = quote.last_price,
                    "using quote for initial price"
                );
                builder = builder
                    .initial_price(quote.last_price)
                    .dividend_yield(quote.dividend_yield_or_default());
                Some(quote)
            }
            None => None,
        };

        if let Some(price) = self.initial_price {
            builder = builder.initial_price(price);
        }
        if let Some(amount) = self.initial_investment {
            builder = builder.initial_investment(amount);
        }
        if let Some(amount) = self.monthly_contribution {
            builder = builder.monthly_contribution(amount);
        }
        if let Some(years) = self.years {
            builder = builder.years(years);
        }
        if let Some(rate) = self.annual_return_pct {
            builder = builder.annual_return(percent(rate));
        }
        if let Some(vol) = self.volatility_pct {
            builder = builder.volatility(percent(vol));
        }
        if let Some(dividend_yield) = self.dividend_yield_pct {
            builder = builder.dividend_yield(percent(dividend_yield));
        }
        if let Some(rate) = self.inflation_pct {
            builder = builder.inflation_rate(percent(rate));
        }
        if let Some(account) = self.account {
            builder = builder.account(account);
        }
        if let Some(scenario) = self.tax_scenario {
            builder = builder.tax_scenario(scenario);
        }
        if let Some(timing) = self.tax_timing {
            builder = builder.tax_timing(timing);
        }
        if let Some(policy) = self.dividend_policy {
            builder = builder.dividend_policy(policy);
        }
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        if self.random {
            builder = builder.unseeded();
        }
        if !self.any_horizon {
            builder = builder.standard_horizon();
        }

        let params = builder.build().wrap_err("Invalid simulation parameters")?;
        tracing::debug!(?params, "parameters resolved");

        Ok(ResolvedInputs {
            params,
            monte_carlo: file.monte_carlo,
            quote,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placement_core::ValidationError;
    use tempfile::tempdir;

    fn quotes() -> StaticQuotes {
        StaticQuotes::new().with_quote(Quote {
            symbol: "AI.PA".to_string(),
            name: Some("Air Liquide".to_string()),
            last_price: 170.0,
            dividend_yield: None,
        })
    }

    #[test]
    fn test_defaults_without_overrides() {
        let inputs = ParameterOverrides::default()
            .resolve_with::<StaticQuotes>(None)
            .unwrap();
        assert_eq!(inputs.params, SimulationParameters::default());
        assert_eq!(inputs.monte_carlo, MonteCarloConfig::default());
        assert!(inputs.quote.is_none());
    }

    #[test]
    fn test_resolve_without_quotes_file() {
        let overrides = ParameterOverrides {
            years: Some(5),
            ..Default::default()
        };
        let inputs = overrides.resolve().unwrap();
        assert_eq!(inputs.params.years, 5);
        assert!(inputs.quote.is_none());

        let with_ticker = ParameterOverrides {
            ticker: Some("AI".to_string()),
            ..Default::default()
        };
        assert!(with_ticker.resolve().is_err());
    }

    #[test]
    fn test_percent_flags_become_fractions() {
        let overrides = ParameterOverrides {
            annual_return_pct: Some(7.0),
            volatility_pct: Some(15.0),
            dividend_yield_pct: Some(2.5),
            inflation_pct: Some(0.0),
            ..Default::default()
        };
        let params = overrides.resolve_with::<StaticQuotes>(None).unwrap().params;
        assert!((params.annual_return - 0.07).abs() < 1e-12);
        assert!((params.volatility - 0.15).abs() < 1e-12);
        assert!((params.dividend_yield - 0.025).abs() < 1e-12);
        assert_eq!(params.inflation_rate, 0.0);
    }

    #[test]
    fn test_quote_sets_price_and_default_yield() {
        let overrides = ParameterOverrides {
            ticker: Some("ai".to_string()),
            ..Default::default()
        };
        let inputs = overrides.resolve_with(Some(&quotes())).unwrap();
        assert_eq!(inputs.params.initial_price, 170.0);
        assert_eq!(inputs.params.dividend_yield, 0.015);
        assert_eq!(inputs.quote.unwrap().symbol, "AI.PA");
    }

    #[test]
    fn test_explicit_price_beats_quote() {
        let overrides = ParameterOverrides {
            ticker: Some("AI".to_string()),
            initial_price: Some(99.0),
            ..Default::default()
        };
        let inputs = overrides.resolve_with(Some(&quotes())).unwrap();
        assert_eq!(inputs.params.initial_price, 99.0);
    }

    #[test]
    fn test_ticker_without_provider_fails() {
        let overrides = ParameterOverrides {
            ticker: Some("AI".to_string()),
            ..Default::default()
        };
        assert!(overrides.resolve_with::<StaticQuotes>(None).is_err());
    }

    #[test]
    fn test_unknown_ticker_fails() {
        let overrides = ParameterOverrides {
            ticker: Some("NOPE".to_string()),
            ..Default::default()
        };
        assert!(overrides.resolve_with(Some(&quotes())).is_err());
    }

    #[test]
    fn test_horizon_restriction() {
        let overrides = ParameterOverrides {
            years: Some(7),
            ..Default::default()
        };
        let err = overrides.resolve_with::<StaticQuotes>(None).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::NonStandardHorizon(7))
        );

        let overrides = ParameterOverrides {
            years: Some(7),
            any_horizon: true,
            ..Default::default()
        };
        assert_eq!(
            overrides.resolve_with::<StaticQuotes>(None).unwrap().params.years,
            7
        );
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("params.yaml");
        std::fs::write(
            &path,
            "simulation:\n  years: 20\n  monthly_contribution: 300.0\nmonte_carlo:\n  trials: 250\n",
        )
        .unwrap();

        let overrides = ParameterOverrides {
            params_file: Some(path),
            monthly_contribution: Some(800.0),
            random: true,
            ..Default::default()
        };
        let inputs = overrides.resolve_with::<StaticQuotes>(None).unwrap();
        assert_eq!(inputs.params.years, 20);
        assert_eq!(inputs.params.monthly_contribution, 800.0);
        assert_eq!(inputs.params.seed, None);
        assert_eq!(inputs.monte_carlo.trials, 250);
    }
}
