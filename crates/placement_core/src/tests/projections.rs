//! Reference scenarios for the closed-form projections

use crate::config::ParametersBuilder;
use crate::model::{AccountType, TaxScenario, TaxTiming};
use crate::projection::{dca_projection, lump_sum_projection};

#[test]
fn test_lump_sum_reference_values() {
    let builder = ParametersBuilder::new()
        .initial_investment(5_000.0)
        .monthly_contribution(0.0)
        .years(5)
        .annual_return(0.08);

    let pea = lump_sum_projection(&builder.clone().account(AccountType::Pea).build().unwrap());
    assert!((pea.final_value - 7_346.64).abs() < 0.01);
    assert!((pea.gross_gain - 2_346.64).abs() < 0.01);
    assert!((pea.tax_paid - 403.62).abs() < 0.01);
    assert!((pea.net_value - 6_943.02).abs() < 0.01);

    let cto = lump_sum_projection(&builder.account(AccountType::Cto).build().unwrap());
    assert!((cto.tax_paid - 704.00).abs() < 0.01);
    assert!((cto.net_value - 6_642.64).abs() < 0.01);
}

#[test]
fn test_optimistic_scenario_lowers_tax() {
    let params = ParametersBuilder::new()
        .initial_investment(5_000.0)
        .years(5)
        .annual_return(0.08)
        .tax_scenario(TaxScenario::Optimistic)
        .account(AccountType::Cto)
        .build()
        .unwrap();
    let result = lump_sum_projection(&params);
    assert_eq!(result.tax_rate, 0.25);
    assert!((result.tax_paid - 2_346.64 * 0.25).abs() < 0.01);
}

#[test]
fn test_dca_projection_history_and_taxes() {
    let params = ParametersBuilder::new()
        .initial_investment(1_000.0)
        .monthly_contribution(100.0)
        .years(10)
        .annual_return(0.07)
        .account(AccountType::Cto)
        .tax_timing(TaxTiming::Annual)
        .build()
        .unwrap();

    let annual = dca_projection(&params);
    assert_eq!(annual.value_history.len(), 120);
    assert_eq!(annual.yearly_taxes.len(), 10);
    assert_eq!(annual.total_invested, 13_000.0);
    assert_eq!(annual.net_history, annual.value_history);

    let exit_params = ParametersBuilder::from_parameters(params)
        .tax_timing(TaxTiming::AtExit)
        .build()
        .unwrap();
    let exit = dca_projection(&exit_params);
    assert!(exit.yearly_taxes.is_empty());
    assert!(exit.net_value > annual.net_value);
}
