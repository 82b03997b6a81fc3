//! Contract with the external quote source
//!
//! The simulator only needs a starting price and a dividend yield for a
//! ticker. Symbols without an exchange suffix are retried on Paris and Xetra.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LookupAttempt, MarketDataError};

/// Yield assumed when the provider has no estimate
pub const DEFAULT_DIVIDEND_YIELD: f64 = 0.015;

/// Suffixes that already pin a listing exchange
pub const KNOWN_SUFFIXES: [&str; 4] = [".PA", ".DE", ".AS", ".MI"];

/// Suffixes tried, in order, for a bare symbol
pub const FALLBACK_SUFFIXES: [&str; 3] = ["", ".PA", ".DE"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub last_price: f64,
    /// Trailing annual yield as a fraction
    #[serde(default)]
    pub dividend_yield: Option<f64>,
}

impl Quote {
    #[must_use]
    pub fn dividend_yield_or_default(&self) -> f64 {
        self.dividend_yield.unwrap_or(DEFAULT_DIVIDEND_YIELD)
    }
}

pub trait QuoteProvider {
    /// Look up a single, exact symbol
    fn quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;
}

/// Symbols to try for user input, most specific first
#[must_use]
pub fn candidate_symbols(symbol: &str) -> Vec<String> {
    let symbol = symbol.trim().to_uppercase();
    if KNOWN_SUFFIXES.iter().any(|suffix| symbol.ends_with(suffix)) {
        return vec![symbol];
    }
    FALLBACK_SUFFIXES
        .iter()
        .map(|suffix| format!("{symbol}{suffix}"))
        .collect()
}

/// Resolve `symbol` against `provider`, falling back through exchange suffixes.
///
/// Each failed candidate is logged and recorded; exhausting them all yields
/// `MarketDataError::NotFound` with the full attempt list.
pub fn resolve_quote<P: QuoteProvider + ?Sized>(
    provider: &P,
    symbol: &str,
) -> Result<Quote, MarketDataError> {
    if symbol.trim().is_empty() {
        return Err(MarketDataError::EmptySymbol);
    }

    let mut attempts = Vec::new();
    for candidate in candidate_symbols(symbol) {
        match provider.quote(&candidate) {
            Ok(quote) if quote.last_price > 0.0 && quote.last_price.is_finite() => {
                debug!(symbol = %candidate, price = quote.last_price, "quote resolved");
                return Ok(quote);
            }
            Ok(quote) => {
                warn!(symbol = %candidate, price = quote.last_price, "quote has no usable price");
                attempts.push(LookupAttempt {
                    symbol: candidate,
                    reason: format!("unusable price {}", quote.last_price),
                });
            }
            Err(err) => {
                warn!(symbol = %candidate, error = %err, "quote lookup failed");
                attempts.push(LookupAttempt {
                    symbol: candidate,
                    reason: err.to_string(),
                });
            }
        }
    }

    Err(MarketDataError::NotFound {
        symbol: symbol.trim().to_uppercase(),
        attempts,
    })
}

/// In-memory quotes keyed by exact upper-case symbol
#[derive(Debug, Clone, Default)]
pub struct StaticQuotes {
    quotes: FxHashMap<String, Quote>,
}

impl StaticQuotes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.insert(quote);
        self
    }

    pub fn insert(&mut self, quote: Quote) {
        self.quotes.insert(quote.symbol.to_uppercase(), quote);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl FromIterator<Quote> for StaticQuotes {
    fn from_iter<I: IntoIterator<Item = Quote>>(iter: I) -> Self {
        let mut quotes = Self::new();
        for quote in iter {
            quotes.insert(quote);
        }
        quotes
    }
}

impl QuoteProvider for StaticQuotes {
    fn quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        self.quotes
            .get(&symbol.to_uppercase())
            .cloned()
            .ok_or_else(|| MarketDataError::Provider(format!("unknown symbol {symbol}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(symbol: &str, price: f64) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            name: None,
            last_price: price,
            dividend_yield: None,
        }
    }

    #[test]
    fn test_candidate_symbols() {
        assert_eq!(candidate_symbols(" mc "), vec!["MC", "MC.PA", "MC.DE"]);
        assert_eq!(candidate_symbols("sap.de"), vec!["SAP.DE"]);
        assert_eq!(candidate_symbols("ASML.AS"), vec!["ASML.AS"]);
    }

    #[test]
    fn test_resolve_falls_back_to_paris() {
        let provider = StaticQuotes::new().with_quote(quote("MC.PA", 700.0));
        let resolved = resolve_quote(&provider, "mc").unwrap();
        assert_eq!(resolved.symbol, "MC.PA");
        assert_eq!(resolved.dividend_yield_or_default(), DEFAULT_DIVIDEND_YIELD);
    }

    #[test]
    fn test_resolve_skips_unusable_price() {
        let provider: StaticQuotes = [quote("AIR", 0.0), quote("AIR.DE", 150.0)]
            .into_iter()
            .collect();
        let resolved = resolve_quote(&provider, "AIR").unwrap();
        assert_eq!(resolved.symbol, "AIR.DE");
    }

    #[test]
    fn test_resolve_reports_every_attempt() {
        let provider = StaticQuotes::new();
        let err = resolve_quote(&provider, "nope").unwrap_err();
        match err {
            MarketDataError::NotFound { symbol, attempts } => {
                assert_eq!(symbol, "NOPE");
                let tried: Vec<_> = attempts.iter().map(|a| a.symbol.as_str()).collect();
                assert_eq!(tried, vec!["NOPE", "NOPE.PA", "NOPE.DE"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_rejects_empty_symbol() {
        assert_eq!(
            resolve_quote(&StaticQuotes::new(), "   "),
            Err(MarketDataError::EmptySymbol)
        );
    }
}
