use crate::model::{MonteCarloConfig, MonteCarloStats};

/// Percentiles reported for every distribution
pub const STANDARD_PERCENTILES: [u8; 5] = [5, 25, 50, 75, 95];

/// Copy of `values` sorted ascending (NaN last)
#[must_use]
pub fn sorted_values(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    sorted
}

/// Percentile `p` (0.0 to 1.0) of an ascending sample, interpolated linearly
/// between the closest ranks. Empty samples give 0.
#[must_use]
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let weight = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}

#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation around `mean`
#[must_use]
pub fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Annualized excess return over `risk_free_rate` divided by the coefficient
/// of variation. Degenerate inputs (no spread, non-positive mean or capital)
/// give 0.
#[must_use]
pub fn sharpe_like_ratio(
    mean: f64,
    std_dev: f64,
    total_invested: f64,
    years: u32,
    risk_free_rate: f64,
) -> f64 {
    if std_dev <= 0.0 || mean <= 0.0 || total_invested <= 0.0 || years == 0 {
        return 0.0;
    }
    let annualized = (mean / total_invested).powf(1.0 / f64::from(years)) - 1.0;
    let coefficient_of_variation = std_dev / mean;
    (annualized - risk_free_rate) / coefficient_of_variation
}

/// Fraction of outcomes strictly below `threshold`
#[must_use]
pub fn loss_probability(values: &[f64], threshold: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|v| **v < threshold).count() as f64 / values.len() as f64
}

/// Summary statistics of net final values against the contributed capital
#[must_use]
pub fn summarize(
    values: &[f64],
    total_invested: f64,
    years: u32,
    config: &MonteCarloConfig,
) -> MonteCarloStats {
    let sorted = sorted_values(values);
    if sorted.is_empty() {
        return MonteCarloStats::default();
    }

    let mean = mean(&sorted);
    // identical outcomes have no spread; rounding in `mean` must not invent one
    let std_dev = if sorted[0] == sorted[sorted.len() - 1] {
        0.0
    } else {
        std_dev(&sorted, mean)
    };
    let value_at_risk = percentile(&sorted, 1.0 - config.confidence_level);

    MonteCarloStats {
        trials: sorted.len(),
        mean,
        std_dev,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        percentiles: STANDARD_PERCENTILES
            .iter()
            .map(|p| (*p, percentile(&sorted, f64::from(*p) / 100.0)))
            .collect(),
        sharpe_ratio: sharpe_like_ratio(
            mean,
            std_dev,
            total_invested,
            years,
            config.risk_free_rate,
        ),
        value_at_risk,
        var_loss: (total_invested - value_at_risk).max(0.0),
        loss_probability: loss_probability(&sorted, total_invested),
    }
}

/// Index of the trial whose value sits at the median of `values`
#[must_use]
pub fn median_index(values: &[f64]) -> Option<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|a, b| values[*a].total_cmp(&values[*b]).then(a.cmp(b)));
    order.get(values.len() / 2).copied()
}
