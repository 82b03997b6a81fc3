//! Monthly price path generation
//!
//! Each month draws a normal return shock, applies it to the previous price
//! and adds the dividend drift `previous × dividend_rate`. Prices are not
//! floored at zero.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::error::{Result, SimulationError};
use crate::model::{MonthlyRates, PricePath};

/// Generate `months + 1` prices starting at `initial_price` using `rng`.
///
/// The path also carries the per-share dividend paid each month so the
/// accumulation engine can distribute it when asked to.
pub fn generate_price_path<R: Rng + ?Sized>(
    initial_price: f64,
    months: usize,
    rates: &MonthlyRates,
    rng: &mut R,
) -> Result<PricePath> {
    // `Normal::new` accepts a negative standard deviation
    if !(rates.volatility >= 0.0) || !rates.expected_return.is_finite() {
        return Err(SimulationError::InvalidDistribution {
            mean: rates.expected_return,
            std_dev: rates.volatility,
        });
    }
    let shock = Normal::new(rates.expected_return, rates.volatility).map_err(|_| {
        SimulationError::InvalidDistribution {
            mean: rates.expected_return,
            std_dev: rates.volatility,
        }
    })?;

    let mut prices = Vec::with_capacity(months);
    let mut dividends = Vec::with_capacity(months);

    let mut previous = initial_price;
    for _ in 0..months {
        let dividend = previous * rates.dividend_rate;
        let price = previous * (1.0 + shock.sample(rng)) + dividend;
        prices.push(price);
        dividends.push(dividend);
        previous = price;
    }

    Ok(PricePath::new(initial_price, prices).with_dividends(dividends))
}

/// Generate a path from an explicit seed. `None` seeds from the OS and is not
/// reproducible.
pub fn seeded_price_path(
    initial_price: f64,
    months: usize,
    rates: &MonthlyRates,
    seed: Option<u64>,
) -> Result<PricePath> {
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    generate_price_path(initial_price, months, rates, &mut rng)
}

/// Deterministic compound growth `initial × (1 + monthly_return)^m`
#[must_use]
pub fn deterministic_price_path(initial_price: f64, months: usize, monthly_return: f64) -> PricePath {
    let steps = (1..=months)
        .map(|m| initial_price * (1.0 + monthly_return).powi(m as i32))
        .collect();
    PricePath::new(initial_price, steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_length_and_start() {
        let rates = MonthlyRates::from_annual(0.08, 0.20, 0.015);
        let path = seeded_price_path(150.0, 120, &rates, Some(42)).unwrap();
        assert_eq!(path.prices().len(), 121);
        assert_eq!(path.initial_price(), 150.0);
        assert_eq!(path.dividend(0), Some(0.0));
    }

    #[test]
    fn test_same_seed_same_path() {
        let rates = MonthlyRates::from_annual(0.08, 0.20, 0.015);
        let a = seeded_price_path(100.0, 60, &rates, Some(7)).unwrap();
        let b = seeded_price_path(100.0, 60, &rates, Some(7)).unwrap();
        let c = seeded_price_path(100.0, 60, &rates, Some(8)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_zero_volatility_is_compound_growth_plus_dividend_drift() {
        let rates = MonthlyRates::from_annual(0.12, 0.0, 0.06);
        let path = seeded_price_path(100.0, 24, &rates, Some(1)).unwrap();
        for m in 0..=24 {
            let expected = 100.0 * 1.015_f64.powi(m as i32);
            assert!((path.price(m) - expected).abs() < 1e-9, "month {m}");
        }
        assert!((path.dividend(1).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_negative_volatility_is_rejected() {
        let rates = MonthlyRates {
            expected_return: 0.01,
            volatility: -0.1,
            dividend_rate: 0.0,
        };
        let err = seeded_price_path(100.0, 12, &rates, Some(0)).unwrap_err();
        assert_eq!(
            err,
            SimulationError::InvalidDistribution {
                mean: 0.01,
                std_dev: -0.1
            }
        );
    }

    #[test]
    fn test_non_finite_mean_is_rejected() {
        let rates = MonthlyRates {
            expected_return: f64::NAN,
            volatility: 0.05,
            dividend_rate: 0.0,
        };
        assert!(matches!(
            seeded_price_path(100.0, 12, &rates, Some(0)),
            Err(SimulationError::InvalidDistribution { .. })
        ));

        let rates = MonthlyRates {
            volatility: f64::NAN,
            ..MonthlyRates::deterministic(0.01, 0.0)
        };
        assert!(seeded_price_path(100.0, 12, &rates, Some(0)).is_err());
    }

    #[test]
    fn test_deterministic_path_matches_zero_volatility_generator() {
        let rates = MonthlyRates::deterministic(0.005, 0.0);
        let generated = seeded_price_path(80.0, 36, &rates, Some(3)).unwrap();
        let closed_form = deterministic_price_path(80.0, 36, 0.005);
        for (a, b) in generated.prices().iter().zip(closed_form.prices()) {
            assert!((a - b).abs() < 1e-9);
        }
    }
}
