//! Plain-text reports printed by the CLI

use std::fmt::Write as _;

use jiff::ToSpan;
use jiff::civil::Date;
use placement_core::model::{
    AccountComparison, AccountDistribution, MonteCarloBatch, SimulationParameters,
    SimulationResult,
};
use placement_core::taxes::PEA_HOLDING_PERIOD_YEARS;

use crate::util::format::{
    format_compact_currency, format_currency, format_currency_short, format_percentage,
    format_signed_currency,
};

const RULE: &str = "------------------------------------------------------------";

/// Performance tier of a net CAGR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceTier {
    Excellent,
    Fair,
    Moderate,
}

impl PerformanceTier {
    pub fn from_cagr(cagr: f64) -> Self {
        if cagr > 0.10 {
            PerformanceTier::Excellent
        } else if cagr > 0.05 {
            PerformanceTier::Fair
        } else {
            PerformanceTier::Moderate
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PerformanceTier::Excellent => "Excellent performance (CAGR above 10 %)",
            PerformanceTier::Fair => "Fair performance (CAGR between 5 % and 10 %)",
            PerformanceTier::Moderate => "Moderate performance (CAGR at or below 5 %)",
        }
    }
}

/// Recommendations derived from a PEA / CTO comparison
pub fn recommendations(comparison: &AccountComparison) -> Vec<String> {
    let mut lines = Vec::new();

    if comparison.value_advantage > 0.0 {
        lines.push(format!(
            "Prefer the PEA: {} more net value than the CTO",
            format_currency(comparison.value_advantage)
        ));
    } else if comparison.value_advantage < 0.0 {
        lines.push(format!(
            "Prefer the CTO: {} more net value than the PEA",
            format_currency(-comparison.value_advantage)
        ));
    } else {
        lines.push("PEA and CTO end with the same net value".to_string());
    }

    lines.push(PerformanceTier::from_cagr(comparison.pea.cagr).description().to_string());

    if comparison.pea.years >= PEA_HOLDING_PERIOD_YEARS {
        lines.push(format!(
            "Holding period of {} years qualifies for the PEA tax benefit",
            comparison.pea.years
        ));
    } else {
        lines.push(format!(
            "Holding period below {PEA_HOLDING_PERIOD_YEARS} years: withdrawals before then close the PEA"
        ));
    }

    lines
}

fn header(out: &mut String, title: &str, today: Date) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "Generated on {today}");
    let _ = writeln!(out, "{RULE}");
}

/// Inputs of a run, with the horizon end computed from `today`
pub fn parameters_section(params: &SimulationParameters, today: Date) -> String {
    let mut out = String::new();
    let horizon_end = today
        .checked_add((params.years as i64).years())
        .map(|d| d.to_string())
        .unwrap_or_else(|_| "-".to_string());

    let _ = writeln!(out, "Parameters");
    let _ = writeln!(out, "  Initial price         {}", format_currency(params.initial_price));
    let _ = writeln!(out, "  Initial investment    {}", format_currency(params.initial_investment));
    let _ = writeln!(out, "  Monthly contribution  {}", format_currency(params.monthly_contribution));
    let _ = writeln!(out, "  Horizon               {} years (until {horizon_end})", params.years);
    let _ = writeln!(out, "  Expected return       {}", format_percentage(params.annual_return));
    let _ = writeln!(out, "  Volatility            {}", format_percentage(params.volatility));
    let _ = writeln!(out, "  Dividend yield        {}", format_percentage(params.dividend_yield));
    let _ = writeln!(out, "  Tax scenario          {}", params.tax_scenario);
    match params.seed {
        Some(seed) => {
            let _ = writeln!(out, "  Seed                  {seed}");
        }
        None => {
            let _ = writeln!(out, "  Seed                  random");
        }
    }
    out
}

/// Figures of one simulated account
pub fn result_section(result: &SimulationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({:?} taxation)", result.account, result.tax_timing);
    let _ = writeln!(out, "  Total invested        {}", format_currency(result.total_invested));
    let _ = writeln!(out, "  Final value           {}", format_currency(result.final_value));
    let _ = writeln!(out, "  Gross gain            {}", format_signed_currency(result.gross_gain));
    let _ = writeln!(
        out,
        "  Tax paid              {} (rate {}, effective {})",
        format_currency(result.tax_paid),
        format_percentage(result.tax_rate),
        format_percentage(result.effective_tax_rate)
    );
    let _ = writeln!(out, "  Net value             {}", format_currency(result.net_value));
    let _ = writeln!(out, "  Net gain              {}", format_signed_currency(result.net_gain));
    let _ = writeln!(out, "  Net CAGR              {}", format_percentage(result.cagr));
    let _ = writeln!(out, "  Net value (real)      {}", format_currency(result.real_net_value));
    if result.total_dividends > 0.0 {
        let _ = writeln!(out, "  Dividends             {}", format_currency(result.total_dividends));
    }
    if result.final_shares > 0.0 {
        let _ = writeln!(out, "  Shares held           {:.4}", result.final_shares);
    }
    if !result.yearly_taxes.is_empty() {
        let years: Vec<String> = result
            .yearly_taxes
            .iter()
            .map(|tax| format_compact_currency(*tax))
            .collect();
        let _ = writeln!(out, "  Yearly taxes          {}", years.join(", "));
    }
    out
}

pub fn single_report(params: &SimulationParameters, result: &SimulationResult, today: Date) -> String {
    let mut out = String::new();
    header(&mut out, "Simulation report", today);
    out.push_str(&parameters_section(params, today));
    out.push('\n');
    out.push_str(&result_section(result));
    out
}

pub fn comparison_report(
    params: &SimulationParameters,
    comparison: &AccountComparison,
    today: Date,
) -> String {
    let mut out = String::new();
    header(&mut out, "PEA vs CTO comparison", today);
    out.push_str(&parameters_section(params, today));
    out.push('\n');
    out.push_str(&result_section(&comparison.pea));
    out.push('\n');
    out.push_str(&result_section(&comparison.cto));
    out.push('\n');

    let _ = writeln!(out, "PEA advantage");
    let _ = writeln!(out, "  Net value             {}", format_signed_currency(comparison.value_advantage));
    let _ = writeln!(out, "  Net gain              {}", format_signed_currency(comparison.gain_advantage));
    let _ = writeln!(out, "  Tax savings           {}", format_signed_currency(comparison.tax_savings));
    let _ = writeln!(
        out,
        "  CAGR difference       {:+.2} pts",
        comparison.cagr_difference * 100.0
    );
    out.push('\n');

    let _ = writeln!(out, "Recommendations");
    for line in recommendations(comparison) {
        let _ = writeln!(out, "  - {line}");
    }
    out
}

fn distribution_section(out: &mut String, dist: &AccountDistribution, confidence: f64) {
    let stats = &dist.stats;
    let _ = writeln!(out, "{}", dist.account);
    let _ = writeln!(out, "  Mean                  {}", format_currency(stats.mean));
    let _ = writeln!(out, "  Std deviation         {}", format_currency(stats.std_dev));
    let _ = writeln!(
        out,
        "  Range                 {} .. {}",
        format_currency_short(stats.min),
        format_currency_short(stats.max)
    );
    for (p, value) in &stats.percentiles {
        let _ = writeln!(out, "  P{p:<2}                   {}", format_currency(*value));
    }
    let _ = writeln!(out, "  Sharpe-like ratio     {:.3}", stats.sharpe_ratio);
    let _ = writeln!(
        out,
        "  VaR ({})         {} (loss {})",
        format_percentage(confidence),
        format_currency(stats.value_at_risk),
        format_currency(stats.var_loss)
    );
    let _ = writeln!(out, "  Loss probability      {}", format_percentage(stats.loss_probability));
}

pub fn monte_carlo_report(params: &SimulationParameters, batch: &MonteCarloBatch, today: Date) -> String {
    let mut out = String::new();
    header(&mut out, "Monte Carlo simulation", today);
    out.push_str(&parameters_section(params, today));
    let _ = writeln!(out, "  Trials                {}", batch.trials);
    let _ = writeln!(out, "  Total invested        {}", format_currency(batch.total_invested));
    out.push('\n');

    distribution_section(&mut out, &batch.pea, batch.confidence_level);
    out.push('\n');
    distribution_section(&mut out, &batch.cto, batch.confidence_level);
    out.push('\n');

    let _ = writeln!(
        out,
        "Mean PEA advantage      {}",
        format_signed_currency(batch.pea.stats.mean - batch.cto.stats.mean)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use placement_core::model::MonteCarloConfig;
    use placement_core::simulation::{compare_accounts, monte_carlo_simulate, run_simulation};

    fn today() -> Date {
        date(2025, 1, 1)
    }

    #[test]
    fn test_performance_tiers() {
        assert_eq!(PerformanceTier::from_cagr(0.12), PerformanceTier::Excellent);
        assert_eq!(PerformanceTier::from_cagr(0.10), PerformanceTier::Fair);
        assert_eq!(PerformanceTier::from_cagr(0.07), PerformanceTier::Fair);
        assert_eq!(PerformanceTier::from_cagr(0.05), PerformanceTier::Moderate);
        assert_eq!(PerformanceTier::from_cagr(-0.02), PerformanceTier::Moderate);
    }

    #[test]
    fn test_recommendations_follow_advantage() {
        let comparison = compare_accounts(&SimulationParameters::default()).unwrap();
        let lines = recommendations(&comparison);
        assert_eq!(lines.len(), 3);
        if comparison.value_advantage > 0.0 {
            assert!(lines[0].starts_with("Prefer the PEA"));
        }
        assert!(lines[2].contains("qualifies for the PEA tax benefit"));
    }

    #[test]
    fn test_short_horizon_recommendation() {
        let params = SimulationParameters {
            years: 3,
            ..Default::default()
        };
        let comparison = compare_accounts(&params).unwrap();
        let lines = recommendations(&comparison);
        assert!(lines[2].starts_with("Holding period below 5 years"));
    }

    #[test]
    fn test_parameters_section_shows_horizon_end() {
        let section = parameters_section(&SimulationParameters::default(), today());
        assert!(section.contains("10 years (until 2035-01-01)"));
        assert!(section.contains("Seed                  42"));
        assert!(section.contains("8.00 %"));
    }

    #[test]
    fn test_single_report() {
        let params = SimulationParameters::default();
        let result = run_simulation(&params).unwrap();
        let report = single_report(&params, &result, today());
        assert!(report.starts_with("Simulation report\nGenerated on 2025-01-01\n"));
        assert!(report.contains("PEA (AtExit taxation)"));
        assert!(report.contains(&format_currency(result.net_value)));
    }

    #[test]
    fn test_comparison_report_sections() {
        let params = SimulationParameters::default();
        let comparison = compare_accounts(&params).unwrap();
        let report = comparison_report(&params, &comparison, today());
        for section in ["Parameters", "PEA (", "CTO (", "PEA advantage", "Recommendations"] {
            assert!(report.contains(section), "missing {section}");
        }
    }

    #[test]
    fn test_monte_carlo_report_lists_percentiles() {
        let params = SimulationParameters {
            years: 5,
            ..Default::default()
        };
        let batch = monte_carlo_simulate(
            &params,
            &MonteCarloConfig {
                trials: 50,
                ..Default::default()
            },
        )
        .unwrap();
        let report = monte_carlo_report(&params, &batch, today());
        assert!(report.contains("Trials                50"));
        for p in ["P5 ", "P25", "P50", "P75", "P95"] {
            assert!(report.contains(p), "missing {p}");
        }
        assert!(report.contains("VaR (95.00 %)"));
    }
}
