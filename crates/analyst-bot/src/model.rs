//! Data carried between pipeline stages

use crate::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Normalised ticker symbol: trimmed and uppercased, never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Normalise raw user input into a ticker
    ///
    /// No validation beyond non-emptiness; unknown symbols are only detected by
    /// the quote provider.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(DomainError::EmptyTicker);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quote snapshot as returned by the market-data provider
///
/// Numeric fields keep the provider's own text so they reach the prompt exactly
/// as quoted; they accept JSON strings or numbers. Absent, null and blank values
/// all become `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub exchange: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub currency: Option<String>,
    /// Current (last close) price
    #[serde(default, deserialize_with = "lenient_text")]
    pub close: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub change: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub percent_change: Option<String>,
    /// Day low
    #[serde(default, deserialize_with = "lenient_text")]
    pub low: Option<String>,
    /// Day high
    #[serde(default, deserialize_with = "lenient_text")]
    pub high: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub volume: Option<String>,
    #[serde(default, deserialize_with = "lenient_range")]
    pub fifty_two_week: Option<PriceRange>,
}

/// Low/high pair, e.g. the 52-week range
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default, deserialize_with = "lenient_text")]
    pub low: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub high: Option<String>,
}

impl MarketSnapshot {
    /// Whether the provider resolved the ticker to a listing
    pub fn has_exchange(&self) -> bool {
        self.exchange.is_some()
    }

    /// Company name, or the ticker itself when the provider gave none
    pub fn company_name<'a>(&'a self, ticker: &'a Ticker) -> &'a str {
        self.name.as_deref().unwrap_or(ticker.as_str())
    }

    pub fn week_52_low(&self) -> Option<&str> {
        self.fifty_two_week.as_ref()?.low.as_deref()
    }

    pub fn week_52_high(&self) -> Option<&str> {
        self.fifty_two_week.as_ref()?.high.as_deref()
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_range<'de, D>(deserializer: D) -> Result<Option<PriceRange>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Chart image bytes, never decoded
#[derive(Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub bytes: Vec<u8>,
    /// MIME type reported by the provider
    pub content_type: String,
}

impl ChartImage {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File name used when uploading, derived from the content type
    pub fn file_name(&self) -> String {
        let ext = match self.content_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "png",
        };
        format!("chart.{ext}")
    }
}

impl fmt::Debug for ChartImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartImage")
            .field("len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Composed request text for the language model; immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPrompt(String);

impl AnalysisPrompt {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnalysisPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Narrative returned by the language model; non-blank by construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub ticker: Ticker,
    narrative: String,
}

impl AnalysisResult {
    /// Wrap a narrative, rejecting blank text
    pub fn new(ticker: Ticker, narrative: &str) -> Result<Self, DomainError> {
        let narrative = narrative.trim();
        if narrative.is_empty() {
            return Err(DomainError::EmptyNarrative);
        }
        Ok(Self {
            ticker,
            narrative: narrative.to_string(),
        })
    }

    pub fn narrative(&self) -> &str {
        &self.narrative
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ticker_normalization() {
        assert_eq!(Ticker::parse("  aapl \n").unwrap().as_str(), "AAPL");
        assert_eq!(Ticker::parse("brk.b").unwrap().to_string(), "BRK.B");
    }

    #[test]
    fn test_blank_ticker_rejected() {
        assert_eq!(Ticker::parse(""), Err(DomainError::EmptyTicker));
        assert_eq!(Ticker::parse(" \t "), Err(DomainError::EmptyTicker));
    }

    #[test]
    fn test_snapshot_from_provider_json() {
        let snapshot: MarketSnapshot = serde_json::from_value(json!({
            "symbol": "AAPL",
            "name": "Apple Inc.",
            "exchange": "NASDAQ",
            "currency": "USD",
            "close": "150.00",
            "change": "1.25",
            "percent_change": "0.84",
            "low": "148.10",
            "high": "151.20",
            "volume": "51234567",
            "fifty_two_week": { "low": "124.17", "high": "199.62", "range": "124.17 - 199.62" },
            "is_market_open": false
        }))
        .unwrap();

        assert_eq!(snapshot.exchange.as_deref(), Some("NASDAQ"));
        assert_eq!(snapshot.close.as_deref(), Some("150.00"));
        assert_eq!(snapshot.week_52_low(), Some("124.17"));
        assert_eq!(snapshot.week_52_high(), Some("199.62"));
    }

    #[test]
    fn test_snapshot_accepts_numbers_and_nulls() {
        let snapshot: MarketSnapshot = serde_json::from_value(json!({
            "exchange": "NASDAQ",
            "close": 150.0,
            "volume": 1000,
            "change": null,
            "fifty_two_week": "n/a"
        }))
        .unwrap();

        assert_eq!(snapshot.close.as_deref(), Some("150.0"));
        assert_eq!(snapshot.volume.as_deref(), Some("1000"));
        assert_eq!(snapshot.change, None);
        assert_eq!(snapshot.fifty_two_week, None);
    }

    #[test]
    fn test_provider_error_body_has_no_exchange() {
        let snapshot: MarketSnapshot = serde_json::from_value(json!({
            "code": 404,
            "message": "**symbol** not found: ZZZZ",
            "status": "error"
        }))
        .unwrap();
        assert!(!snapshot.has_exchange());
    }

    #[test]
    fn test_blank_exchange_counts_as_missing() {
        let snapshot: MarketSnapshot =
            serde_json::from_value(json!({ "exchange": "  " })).unwrap();
        assert!(!snapshot.has_exchange());
    }

    #[test]
    fn test_company_name_falls_back_to_ticker() {
        let ticker = Ticker::parse("tsla").unwrap();
        let snapshot = MarketSnapshot::default();
        assert_eq!(snapshot.company_name(&ticker), "TSLA");
    }

    #[test]
    fn test_chart_file_name() {
        assert_eq!(ChartImage::new(vec![1], "image/png").file_name(), "chart.png");
        assert_eq!(ChartImage::new(vec![1], "image/jpeg").file_name(), "chart.jpg");
        assert_eq!(ChartImage::new(vec![1], "").file_name(), "chart.png");
    }

    #[test]
    fn test_blank_narrative_rejected() {
        let ticker = Ticker::parse("AAPL").unwrap();
        assert_eq!(
            AnalysisResult::new(ticker.clone(), " \n\t"),
            Err(DomainError::EmptyNarrative)
        );
        let result = AnalysisResult::new(ticker, "  Hold.  ").unwrap();
        assert_eq!(result.narrative(), "Hold.");
    }
}
