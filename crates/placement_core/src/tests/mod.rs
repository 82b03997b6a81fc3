//! Scenario tests for the placement simulation engine
//!
//! Tests are organized by topic:
//! - `single_run` - Seeded single runs and PEA / CTO comparison
//! - `tax_timing` - Exit versus annual taxation on the same path
//! - `monte_carlo` - Batch reproducibility, degenerate batches, progress
//! - `projections` - Closed-form reference scenarios
//! - `properties` - Property-based invariants

mod projections;
