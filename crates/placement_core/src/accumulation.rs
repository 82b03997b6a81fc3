//! Dollar-cost-averaging accumulation over a price path

use crate::model::{
    Accumulation, DividendPolicy, PortfolioState, PricePath, SimulationParameters, TaxTiming,
};
use crate::taxes::{annual_tax, tax_rate};

/// Contribution schedule and tax hook applied while walking a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccumulationPlan {
    pub initial_investment: f64,
    pub monthly_contribution: f64,
    pub dividend_policy: DividendPolicy,
    /// Rate applied to each year's gain when taxes are settled annually
    pub annual_tax_rate: Option<f64>,
}

impl AccumulationPlan {
    #[must_use]
    pub fn from_parameters(params: &SimulationParameters) -> Self {
        let annual_tax_rate = (params.tax_timing == TaxTiming::Annual
            && params.account.taxed_on_realization())
        .then(|| tax_rate(params.account, params.years, params.tax_scenario));

        Self {
            initial_investment: params.initial_investment,
            monthly_contribution: params.monthly_contribution,
            dividend_policy: params.dividend_policy,
            annual_tax_rate,
        }
    }
}

/// Walk `path` month by month: dividends, then contribution, then valuation.
///
/// The lump sum is bought at the initial price. With annual taxation every
/// twelfth month taxes the year's gain and sells shares to pay it.
#[must_use]
pub fn accumulate(path: &PricePath, plan: &AccumulationPlan) -> Accumulation {
    let months = path.months();
    let mut state = PortfolioState::open(plan.initial_investment, path.initial_price());

    let mut acc = Accumulation {
        value_history: Vec::with_capacity(months),
        share_history: Vec::with_capacity(months),
        contributed_history: Vec::with_capacity(months),
        ..Default::default()
    };

    let mut year_start_value = plan.initial_investment;
    let mut year_contributions = 0.0;

    for month in 1..=months {
        let price = path.price(month);

        if let Some(dividend) = path.dividend(month) {
            let paid = state.shares * dividend;
            acc.total_dividends += paid;
            if plan.dividend_policy == DividendPolicy::Distributed {
                state.buy(paid, price);
            }
        }

        if plan.monthly_contribution > 0.0 {
            state.contribute(plan.monthly_contribution, price);
            year_contributions += plan.monthly_contribution;
        }

        let mut value = state.value(price);

        if let Some(rate) = plan.annual_tax_rate.filter(|_| month % 12 == 0) {
            let year_gain = value - year_start_value - year_contributions;
            let tax = annual_tax(year_gain, rate);
            if tax > 0.0 {
                state.sell_value(tax, price);
                value = state.value(price);
            }
            acc.yearly_taxes.push(tax);
            acc.yearly_gains.push(year_gain);
            year_start_value = value;
            year_contributions = 0.0;
        }

        acc.value_history.push(value);
        acc.share_history.push(state.shares);
        acc.contributed_history.push(state.contributed);
    }

    acc.total_contributed = state.contributed;
    acc
}
