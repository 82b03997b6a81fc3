//! CSV and JSON export of simulation results
//!
//! CSV files use `;` as separator so they open directly in spreadsheet
//! software configured for French locales.

use std::fmt::Write as _;
use std::path::Path;

use placement_core::model::{MonteCarloBatch, SimulationResult};
use serde::Serialize;

use crate::storage::StorageError;
use crate::util::io::atomic_write;

const SEP: char = ';';

/// Output format, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

fn push_row(out: &mut String, fields: &[String]) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(SEP);
        }
        out.push_str(field);
        first = false;
    }
    out.push('\n');
}

fn num(value: f64) -> String {
    format!("{value:.2}")
}

/// One summary row per result
pub fn results_csv(results: &[&SimulationResult]) -> String {
    let mut out = String::new();
    out.push_str(
        "account;final_value;net_value;total_invested;gross_gain;net_gain;tax_paid;tax_rate;cagr;total_dividends;final_shares\n",
    );
    for result in results {
        push_row(
            &mut out,
            &[
                result.account.label().to_string(),
                num(result.final_value),
                num(result.net_value),
                num(result.total_invested),
                num(result.gross_gain),
                num(result.net_gain),
                num(result.tax_paid),
                format!("{:.4}", result.tax_rate),
                format!("{:.6}", result.cagr),
                num(result.total_dividends),
                format!("{:.6}", result.final_shares),
            ],
        );
    }
    out
}

/// Month-by-month trajectory of one result. Months are numbered from 1.
pub fn history_csv(result: &SimulationResult) -> String {
    let mut out = String::from("month;price;shares;value\n");
    for (i, value) in result.value_history.iter().enumerate() {
        // projections carry no price or share series
        let price = result.price_history.get(i).map(|p| num(*p)).unwrap_or_default();
        let shares = result
            .share_history
            .get(i)
            .map(|s| format!("{s:.6}"))
            .unwrap_or_default();
        push_row(&mut out, &[(i + 1).to_string(), price, shares, num(*value)]);
    }
    out
}

/// Net final value of every trial under both wrappers
pub fn monte_carlo_csv(batch: &MonteCarloBatch) -> String {
    let mut out = String::from("trial;pea;cto\n");
    for (trial, (pea, cto)) in batch
        .pea
        .net_values
        .iter()
        .zip(&batch.cto.net_values)
        .enumerate()
    {
        let _ = writeln!(out, "{trial}{SEP}{}{SEP}{}", num(*pea), num(*cto));
    }
    out
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| StorageError::Serialize(format!("Failed to serialize results: {}", e)))
}

/// Write `value` to `path` as JSON, or as `csv` when the extension asks for it.
pub fn export_to_path<T: Serialize>(path: &Path, value: &T, csv: &str) -> Result<(), StorageError> {
    let content = match ExportFormat::from_path(path) {
        Some(ExportFormat::Csv) => csv.to_string(),
        Some(ExportFormat::Json) => to_json(value)?,
        None => {
            return Err(StorageError::Io(format!(
                "Unsupported export format for {} (use .csv or .json)",
                path.display()
            )));
        }
    };

    atomic_write(path, &content)
        .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    tracing::info!(path = %path.display(), "results exported");
    Ok(())
}
