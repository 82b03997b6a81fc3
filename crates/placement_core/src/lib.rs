//! Equity growth simulation under the French PEA and CTO wrappers
//!
//! This crate provides the calculation core of the `placement` tool:
//! - Monthly price paths from a normal return process plus dividend drift
//! - Dollar-cost-averaging accumulation with optional dividend distribution
//! - Capital gains taxation at exit or year by year, per tax scenario
//! - Monte Carlo batches with percentiles, Sharpe-like ratio, VaR and loss probability
//! - Closed-form lump-sum and DCA projections
//!
//! # Example
//!
//! ```ignore
//! use placement_core::config::ParametersBuilder;
//! use placement_core::simulation::{compare_accounts, monte_carlo_simulate};
//! use placement_core::model::MonteCarloConfig;
//!
//! let params = ParametersBuilder::new()
//!     .initial_price(150.0)
//!     .initial_investment(10_000.0)
//!     .monthly_contribution(500.0)
//!     .years(10)
//!     .build()?;
//!
//! let comparison = compare_accounts(&params)?;
//! let batch = monte_carlo_simulate(&params, &MonteCarloConfig::default())?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod accumulation;
pub mod analysis;
pub mod error;
pub mod market_data;
pub mod price_path;
pub mod projection;
pub mod simulation;
pub mod taxes;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::ParametersBuilder;
pub use error::{MarketDataError, Result, SimulationError, ValidationError};
pub use simulation::{compare_accounts, monte_carlo_simulate, run_simulation};
