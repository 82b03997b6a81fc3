//! Simulation configuration
//!
//! `SimulationParameters` holds everything a run needs and can be loaded from
//! any serde format. For code, the fluent builder is usually shorter:
//!
//! ```ignore
//! use placement_core::config::ParametersBuilder;
//! use placement_core::model::AccountType;
//!
//! let params = ParametersBuilder::new()
//!     .initial_price(72.5)
//!     .initial_investment(5_000.0)
//!     .monthly_contribution(250.0)
//!     .years(15)
//!     .annual_return(0.07)
//!     .account(AccountType::Cto)
//!     .build()?;
//! ```

mod builder;

pub use crate::model::{MonteCarloConfig, SimulationParameters};
pub use builder::ParametersBuilder;
