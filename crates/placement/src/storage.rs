//! YAML parameter and quote files

use std::path::Path;

use placement_core::market_data::{Quote, StaticQuotes};
use placement_core::model::{MonteCarloConfig, SimulationParameters};
use serde::{Deserialize, Serialize};

use crate::util::io::atomic_write;

#[derive(Debug)]
pub enum StorageError {
    Io(String),
    Parse(String),
    Serialize(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "IO error: {}", msg),
            StorageError::Parse(msg) => write!(f, "Parse error: {}", msg),
            StorageError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Contents of a `--params` file. Every section and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParametersFile {
    /// Ticker whose quote seeds the initial price and dividend yield
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,

    #[serde(default)]
    pub simulation: SimulationParameters,

    #[serde(default)]
    pub monte_carlo: MonteCarloConfig,
}

impl ParametersFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, StorageError> {
        serde_saphyr::from_str(yaml).map_err(|e| StorageError::Parse(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, StorageError> {
        serde_saphyr::to_string(self).map_err(|e| {
            StorageError::Serialize(format!("Failed to serialize parameters: {}", e))
        })
    }

    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Write the file atomically
    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        let yaml = self.to_yaml()?;
        atomic_write(path, &yaml).map_err(|e| {
            StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "parameters saved");
        Ok(())
    }
}

/// Load a list of quotes (`- symbol: MC.PA ...`) into an in-memory provider
pub fn load_quotes(path: &Path) -> Result<StaticQuotes, StorageError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    let quotes: Vec<Quote> =
        serde_saphyr::from_str(&content).map_err(|e| StorageError::Parse(e.to_string()))?;
    tracing::debug!(count = quotes.len(), path = %path.display(), "quotes loaded");
    Ok(quotes.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use placement_core::market_data::{QuoteProvider, resolve_quote};
    use placement_core::model::{AccountType, TaxTiming};
    use tempfile::tempdir;

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "ticker: MC\nsimulation:\n  years: 5\n  account: cto\n  tax_timing: annual\n";
        let file = ParametersFile::from_yaml(yaml).unwrap();
        assert_eq!(file.ticker.as_deref(), Some("MC"));
        assert_eq!(file.simulation.years, 5);
        assert_eq!(file.simulation.account, AccountType::Cto);
        assert_eq!(file.simulation.tax_timing, TaxTiming::Annual);
        assert_eq!(file.simulation.initial_price, 150.0);
        assert_eq!(file.monte_carlo, MonteCarloConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("params.yaml");

        let mut file = ParametersFile::default();
        file.simulation.monthly_contribution = 250.0;
        file.monte_carlo.trials = 200;
        file.save(&path).unwrap();

        let loaded = ParametersFile::load(&path).unwrap();
        assert_eq!(loaded, file);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = ParametersFile::load(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[test]
    fn test_invalid_yaml_is_a_parse_error() {
        let err = ParametersFile::from_yaml("simulation: [1, 2").unwrap_err();
        assert!(matches!(err, StorageError::Parse(_)));
    }

    #[test]
    fn test_load_quotes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quotes.yaml");
        std::fs::write(
            &path,
            "- symbol: MC.PA\n  name: LVMH\n  last_price: 702.4\n  dividend_yield: 0.018\n- symbol: SAP.DE\n  last_price: 181.0\n",
        )
        .unwrap();

        let quotes = load_quotes(&path).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes.quote("sap.de").unwrap().last_price, 181.0);

        let lvmh = resolve_quote(&quotes, "MC").unwrap();
        assert_eq!(lvmh.name.as_deref(), Some("LVMH"));
        assert_eq!(lvmh.dividend_yield_or_default(), 0.018);
    }
}
