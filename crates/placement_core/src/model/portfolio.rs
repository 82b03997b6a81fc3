use serde::{Deserialize, Serialize};

/// Running holdings while a price path is walked.
///
/// Shares only grow through purchases; the one exception is `sell_value`,
/// used to settle annual tax.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioState {
    pub shares: f64,
    /// External capital paid in so far
    pub contributed: f64,
}

impl PortfolioState {
    /// Open the position with a lump sum bought at `price`
    #[must_use]
    pub fn open(initial_investment: f64, price: f64) -> Self {
        Self {
            shares: initial_investment / price,
            contributed: initial_investment,
        }
    }

    /// Convert `amount` into shares at `price`, returning the shares bought.
    /// Nothing is bought at a non-positive price.
    pub fn buy(&mut self, amount: f64, price: f64) -> f64 {
        if price <= 0.0 || amount <= 0.0 {
            return 0.0;
        }
        let bought = amount / price;
        self.shares += bought;
        bought
    }

    /// Pay in new capital and invest it at `price`
    pub fn contribute(&mut self, amount: f64, price: f64) -> f64 {
        self.contributed += amount;
        self.buy(amount, price)
    }

    /// Sell enough shares to raise `amount`, capped at the current holding.
    pub fn sell_value(&mut self, amount: f64, price: f64) -> f64 {
        if price <= 0.0 || amount <= 0.0 {
            return 0.0;
        }
        let sold = (amount / price).min(self.shares);
        self.shares -= sold;
        sold
    }

    #[must_use]
    pub fn value(&self, price: f64) -> f64 {
        self.shares * price
    }
}

/// Month-by-month trajectory produced by the accumulation engine.
///
/// Every history holds one entry per simulated month (month 1 to horizon).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Accumulation {
    pub value_history: Vec<f64>,
    pub share_history: Vec<f64>,
    /// Cumulative contributed capital at the end of each month
    pub contributed_history: Vec<f64>,
    pub total_contributed: f64,
    pub total_dividends: f64,
    /// Tax settled at each yearly checkpoint (empty unless taxed annually)
    pub yearly_taxes: Vec<f64>,
    /// Gain measured at each yearly checkpoint, losses included
    pub yearly_gains: Vec<f64>,
}

impl Accumulation {
    #[must_use]
    pub fn final_value(&self) -> f64 {
        self.value_history.last().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn final_shares(&self) -> f64 {
        self.share_history.last().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn annual_tax_paid(&self) -> f64 {
        self.yearly_taxes.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_contribute() {
        let mut state = PortfolioState::open(1_000.0, 50.0);
        assert_eq!(state.shares, 20.0);

        let bought = state.contribute(100.0, 25.0);
        assert_eq!(bought, 4.0);
        assert_eq!(state.shares, 24.0);
        assert_eq!(state.contributed, 1_100.0);
        assert_eq!(state.value(25.0), 600.0);
    }

    #[test]
    fn test_no_purchase_at_non_positive_price() {
        let mut state = PortfolioState::open(1_000.0, 10.0);
        assert_eq!(state.contribute(100.0, -5.0), 0.0);
        assert_eq!(state.shares, 100.0);
        assert_eq!(state.contributed, 1_100.0);
    }

    #[test]
    fn test_sell_value_is_capped() {
        let mut state = PortfolioState::open(100.0, 10.0);
        assert_eq!(state.sell_value(50.0, 10.0), 5.0);
        assert_eq!(state.sell_value(1_000.0, 10.0), 5.0);
        assert_eq!(state.shares, 0.0);
    }

    #[test]
    fn test_empty_accumulation() {
        let acc = Accumulation::default();
        assert_eq!(acc.final_value(), 0.0);
        assert_eq!(acc.final_shares(), 0.0);
        assert_eq!(acc.annual_tax_paid(), 0.0);
    }
}
