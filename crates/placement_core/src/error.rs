use thiserror::Error;

/// Rejected simulation inputs. Raised before any computation starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("initial price must be positive (got {0})")]
    NonPositivePrice(f64),

    #[error("initial investment must be positive (got {0})")]
    NonPositiveInvestment(f64),

    #[error("monthly contribution cannot be negative (got {0})")]
    NegativeContribution(f64),

    #[error("investment horizon must be at least one year")]
    ZeroHorizon,

    #[error("horizon of {0} years is not one of 1, 3, 5, 10, 15, 20, 30")]
    NonStandardHorizon(u32),

    #[error("volatility cannot be negative (got {0})")]
    NegativeVolatility(f64),

    #[error("dividend yield cannot be negative (got {0})")]
    NegativeDividendYield(f64),

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("Monte Carlo needs at least one trial")]
    ZeroTrials,

    #[error("confidence level must be strictly between 0 and 1 (got {0})")]
    InvalidConfidenceLevel(f64),
}

/// A single failed lookup against a quote provider.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupAttempt {
    pub symbol: String,
    pub reason: String,
}

/// Failures from the external market-data collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketDataError {
    #[error("no ticker symbol given")]
    EmptySymbol,

    #[error("could not find a price for {symbol} ({} candidates tried)", attempts.len())]
    NotFound {
        symbol: String,
        attempts: Vec<LookupAttempt>,
    },

    #[error("provider error: {0}")]
    Provider(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid return distribution (mean={mean}, std_dev={std_dev})")]
    InvalidDistribution { mean: f64, std_dev: f64 },

    /// Monte Carlo batch was cancelled between trials
    #[error("simulation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, SimulationError>;
