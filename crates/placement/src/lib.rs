//! Command-line front end for the PEA / CTO simulator
//!
//! Wraps `placement_core` with:
//! - Parameter resolution from YAML files, quote files and flags
//! - A background worker with progress and cancellation for Monte Carlo batches
//! - Text reports and CSV / JSON export
//! - Logging to stderr or a rotating log file

pub mod export;
pub mod inputs;
pub mod logging;
pub mod report;
pub mod storage;
pub mod util;
pub mod worker;

pub use inputs::{ParameterOverrides, ResolvedInputs};
pub use logging::init_logging;
pub use worker::{SimulationRequest, SimulationResponse, SimulationWorker};
