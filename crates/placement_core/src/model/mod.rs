mod market;
mod params;
mod portfolio;
mod results;

pub use market::{MonthlyRates, PricePath, compounded_monthly_rate};
pub use params::{
    AccountType, DEFAULT_SEED, DividendPolicy, Horizon, SimulationParameters, TaxScenario,
    TaxTiming,
};
pub use portfolio::{Accumulation, PortfolioState};
pub use results::{
    AccountComparison, AccountDistribution, MonteCarloBatch, MonteCarloConfig,
    MonteCarloProgress, MonteCarloStats, SimulationResult, TaxOutcome,
};
