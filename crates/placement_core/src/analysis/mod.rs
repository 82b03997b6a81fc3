//! Distribution statistics over Monte Carlo outcomes.
//!
//! Every statistic is computed from the sorted sample, so the result does not
//! depend on the order in which trials finished.

mod metrics;

pub use metrics::*;
