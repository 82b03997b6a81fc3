use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{AccountType, TaxScenario, TaxTiming};

/// Taxation applied to one final portfolio value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxOutcome {
    pub account: AccountType,
    /// Statutory rate on positive gains
    pub tax_rate: f64,
    pub tax_paid: f64,
    pub net_value: f64,
    pub net_gain: f64,
    /// `tax_paid / gross_gain`, 0 when there is no gain
    pub effective_tax_rate: f64,
    /// Annualized growth of the net value over the contributed capital
    pub cagr: f64,
}

/// Outcome of a single simulation for one account. Read-only once derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub account: AccountType,
    pub tax_scenario: TaxScenario,
    pub tax_timing: TaxTiming,
    pub years: u32,

    /// Market value at the horizon, before any exit tax
    pub final_value: f64,
    pub total_invested: f64,
    pub gross_gain: f64,
    pub tax_rate: f64,
    pub tax_paid: f64,
    pub effective_tax_rate: f64,
    pub net_value: f64,
    pub net_gain: f64,
    pub cagr: f64,
    /// Net value deflated to today's money
    pub real_net_value: f64,
    pub total_dividends: f64,
    pub final_shares: f64,

    /// Portfolio value at the end of each month
    pub value_history: Vec<f64>,
    /// Shares held at the end of each month (empty for projections)
    pub share_history: Vec<f64>,
    /// Price at the end of each month (empty for projections)
    pub price_history: Vec<f64>,
    /// After-tax value at the end of each month, as if the position were closed then
    pub net_history: Vec<f64>,
    /// Tax settled at each yearly checkpoint (empty for exit taxation)
    pub yearly_taxes: Vec<f64>,
}

impl SimulationResult {
    #[must_use]
    pub fn months(&self) -> usize {
        self.value_history.len()
    }
}

/// Same path taxed under both wrappers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountComparison {
    pub pea: SimulationResult,
    pub cto: SimulationResult,
    /// PEA net value minus CTO net value
    pub value_advantage: f64,
    /// PEA net gain minus CTO net gain
    pub gain_advantage: f64,
    /// CTO tax minus PEA tax
    pub tax_savings: f64,
    /// PEA CAGR minus CTO CAGR
    pub cagr_difference: f64,
}

impl AccountComparison {
    #[must_use]
    pub fn new(pea: SimulationResult, cto: SimulationResult) -> Self {
        Self {
            value_advantage: pea.net_value - cto.net_value,
            gain_advantage: pea.net_gain - cto.net_gain,
            tax_savings: cto.tax_paid - pea.tax_paid,
            cagr_difference: pea.cagr - cto.cagr,
            pea,
            cto,
        }
    }

    /// Whether the PEA ends with at least as much net value as the CTO
    #[must_use]
    pub fn pea_preferred(&self) -> bool {
        self.value_advantage >= 0.0
    }
}

fn default_trials() -> usize {
    1000
}

fn default_confidence_level() -> f64 {
    0.95
}

fn default_risk_free_rate() -> f64 {
    0.02
}

/// Monte Carlo batch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    #[serde(default = "default_trials")]
    pub trials: usize,
    /// Confidence level for Value-at-Risk (0.95 = 5th percentile)
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
    /// Annual risk-free rate used by the Sharpe-like ratio
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Trial `i` is seeded with `base_seed + i`
    #[serde(default)]
    pub base_seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            confidence_level: default_confidence_level(),
            risk_free_rate: default_risk_free_rate(),
            base_seed: 0,
        }
    }
}

impl MonteCarloConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.trials == 0 {
            return Err(ValidationError::ZeroTrials);
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ValidationError::InvalidConfidenceLevel(
                self.confidence_level,
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(ValidationError::NonFinite {
                field: "risk_free_rate",
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn seed_for_trial(&self, trial: usize) -> u64 {
        self.base_seed.wrapping_add(trial as u64)
    }
}

/// Shared progress counter and cancel flag for a running batch
#[derive(Debug, Clone, Default)]
pub struct MonteCarloProgress {
    completed: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
}

impl MonteCarloProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap atomics owned by a caller (e.g. a background worker)
    #[must_use]
    pub fn from_atomics(completed: Arc<AtomicUsize>, cancelled: Arc<AtomicBool>) -> Self {
        Self {
            completed,
            cancelled,
        }
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn record_trial(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Summary statistics of per-trial net final values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloStats {
    pub trials: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// (percentile 0-100, value), at 5 / 25 / 50 / 75 / 95
    pub percentiles: Vec<(u8, f64)>,
    pub sharpe_ratio: f64,
    /// Net value at the `1 - confidence_level` quantile
    pub value_at_risk: f64,
    /// Shortfall of `value_at_risk` below the contributed capital (never negative)
    pub var_loss: f64,
    /// Fraction of trials ending below the contributed capital
    pub loss_probability: f64,
}

impl MonteCarloStats {
    #[must_use]
    pub fn percentile(&self, percentile: u8) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|(p, _)| *p == percentile)
            .map(|(_, v)| *v)
    }

    #[must_use]
    pub fn median(&self) -> Option<f64> {
        self.percentile(50)
    }
}

/// Per-trial results for one account and their statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDistribution {
    pub account: AccountType,
    /// Net final value of every trial, in trial order
    pub net_values: Vec<f64>,
    pub stats: MonteCarloStats,
}

/// Aggregated results of independent, identically parameterized trials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloBatch {
    pub trials: usize,
    pub years: u32,
    pub total_invested: f64,
    pub confidence_level: f64,
    pub pea: AccountDistribution,
    pub cto: AccountDistribution,
    /// Price path of the trial whose PEA outcome is the median
    pub median_price_path: Vec<f64>,
}

impl MonteCarloBatch {
    #[must_use]
    pub fn distribution(&self, account: AccountType) -> &AccountDistribution {
        match account {
            AccountType::Pea => &self.pea,
            AccountType::Cto => &self.cto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(account: AccountType, net_value: f64, tax_paid: f64, cagr: f64) -> SimulationResult {
        SimulationResult {
            account,
            tax_scenario: TaxScenario::Current,
            tax_timing: TaxTiming::AtExit,
            years: 5,
            final_value: net_value + tax_paid,
            total_invested: 5_000.0,
            gross_gain: net_value + tax_paid - 5_000.0,
            tax_rate: 0.0,
            tax_paid,
            effective_tax_rate: 0.0,
            net_value,
            net_gain: net_value - 5_000.0,
            cagr,
            real_net_value: net_value,
            total_dividends: 0.0,
            final_shares: 0.0,
            value_history: vec![],
            share_history: vec![],
            price_history: vec![],
            net_history: vec![],
            yearly_taxes: vec![],
        }
    }

    #[test]
    fn test_comparison_differences() {
        let cmp = AccountComparison::new(
            result(AccountType::Pea, 6_943.02, 403.62, 0.0685),
            result(AccountType::Cto, 6_642.64, 704.0, 0.0585),
        );
        assert!((cmp.value_advantage - 300.38).abs() < 1e-9);
        assert!((cmp.gain_advantage - 300.38).abs() < 1e-9);
        assert!((cmp.tax_savings - 300.38).abs() < 1e-9);
        assert!((cmp.cagr_difference - 0.01).abs() < 1e-12);
        assert!(cmp.pea_preferred());
    }

    #[test]
    fn test_monte_carlo_config_validation() {
        assert!(MonteCarloConfig::default().validate().is_ok());

        let zero = MonteCarloConfig {
            trials: 0,
            ..Default::default()
        };
        assert_eq!(zero.validate(), Err(ValidationError::ZeroTrials));

        let bad_confidence = MonteCarloConfig {
            confidence_level: 1.0,
            ..Default::default()
        };
        assert_eq!(
            bad_confidence.validate(),
            Err(ValidationError::InvalidConfidenceLevel(1.0))
        );
    }

    #[test]
    fn test_seed_for_trial_offsets_base() {
        let config = MonteCarloConfig {
            base_seed: 100,
            ..Default::default()
        };
        assert_eq!(config.seed_for_trial(0), 100);
        assert_eq!(config.seed_for_trial(7), 107);
    }

    #[test]
    fn test_progress_shared_between_clones() {
        let progress = MonteCarloProgress::new();
        let handle = progress.clone();
        handle.record_trial();
        handle.record_trial();
        assert_eq!(progress.completed(), 2);

        assert!(!progress.is_cancelled());
        handle.cancel();
        assert!(progress.is_cancelled());
    }

    #[test]
    fn test_stats_percentile_lookup() {
        let stats = MonteCarloStats {
            percentiles: vec![(5, 1.0), (50, 2.0), (95, 3.0)],
            ..Default::default()
        };
        assert_eq!(stats.median(), Some(2.0));
        assert_eq!(stats.percentile(95), Some(3.0));
        assert_eq!(stats.percentile(25), None);
    }
}
