//! Prompt composition for the narrative stage
//!
//! [`PromptComposer::compose`] performs no I/O, and the same ticker and
//! snapshot always produce byte-identical text. The instruction template is
//! parsed when the composer is built, so no snapshot can make it fail.

mod builder;
mod template;

pub use builder::PromptBuilder;

use crate::error::{AnalystError, Result};
use crate::model::{AnalysisPrompt, MarketSnapshot, Ticker};
use template::InstructionTemplate;

/// Shown in place of every absent snapshot field
pub const MISSING_VALUE: &str = "N/A";

/// Turns a ticker and its snapshot into the analysis request
#[derive(Debug, Clone)]
pub struct PromptComposer {
    instructions: InstructionTemplate,
}

impl PromptComposer {
    pub fn new() -> Result<Self> {
        let instructions = InstructionTemplate::new().map_err(template_error)?;
        Ok(Self { instructions })
    }

    /// Build the analysis request for a ticker and its market snapshot
    pub fn compose(&self, ticker: &Ticker, snapshot: &MarketSnapshot) -> Result<AnalysisPrompt> {
        let instructions = self
            .instructions
            .render(snapshot.company_name(ticker), ticker.as_str())
            .map_err(template_error)?;

        let text = PromptBuilder::new()
            .text(instructions)
            .blank_line()
            .line("Here is the real-time market data for your analysis:")
            .bullet(format!(
                "Current Price: {} {}",
                or_missing(snapshot.close.as_deref()),
                or_missing(snapshot.currency.as_deref())
            ))
            .bullet(format!(
                "Change: {} ({})",
                or_missing(snapshot.change.as_deref()),
                percent(snapshot.percent_change.as_deref())
            ))
            .bullet(format!(
                "Day's Range: {} - {}",
                or_missing(snapshot.low.as_deref()),
                or_missing(snapshot.high.as_deref())
            ))
            .bullet(format!("Volume: {}", or_missing(snapshot.volume.as_deref())))
            .bullet(format!(
                "52-Week Range: {} - {}",
                or_missing(snapshot.week_52_low()),
                or_missing(snapshot.week_52_high())
            ))
            .build();

        Ok(AnalysisPrompt::new(text))
    }
}

fn template_error(err: minijinja::Error) -> AnalystError {
    AnalystError::Config(format!("prompt template: {err}"))
}

fn or_missing(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING_VALUE)
}

fn percent(value: Option<&str>) -> String {
    value.map_or_else(|| MISSING_VALUE.to_string(), |v| format!("{v}%"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PriceRange;

    fn compose(ticker: &Ticker, snapshot: &MarketSnapshot) -> AnalysisPrompt {
        PromptComposer::new().unwrap().compose(ticker, snapshot).unwrap()
    }

    fn ticker() -> Ticker {
        Ticker::parse("AAPL").unwrap()
    }

    fn full_snapshot() -> MarketSnapshot {
        MarketSnapshot {
            name: Some("Apple Inc".to_string()),
            exchange: Some("NASDAQ".to_string()),
            currency: Some("USD".to_string()),
            close: Some("150.0".to_string()),
            change: Some("1.25".to_string()),
            percent_change: Some("0.84".to_string()),
            low: Some("148.10".to_string()),
            high: Some("151.20".to_string()),
            volume: Some("51234567".to_string()),
            fifty_two_week: Some(PriceRange {
                low: Some("124.17".to_string()),
                high: Some("199.62".to_string()),
            }),
        }
    }

    #[test]
    fn test_compose_full_snapshot() {
        let prompt = compose(&ticker(), &full_snapshot());
        let text = prompt.as_str();

        assert!(text.contains("Stock Analysis: Apple Inc (AAPL)"));
        assert!(text.ends_with(
            "Here is the real-time market data for your analysis:\n\
             - Current Price: 150.0 USD\n\
             - Change: 1.25 (0.84%)\n\
             - Day's Range: 148.10 - 151.20\n\
             - Volume: 51234567\n\
             - 52-Week Range: 124.17 - 199.62\n"
        ));
        assert!(!text.contains(MISSING_VALUE));
    }

    #[test]
    fn test_compose_all_fields_absent() {
        let prompt = compose(&ticker(), &MarketSnapshot::default());
        let text = prompt.as_str();

        assert!(text.contains("Stock Analysis: AAPL (AAPL)"));
        assert!(text.contains("- Current Price: N/A N/A\n"));
        assert!(text.contains("- Change: N/A (N/A)\n"));
        assert!(text.contains("- Day's Range: N/A - N/A\n"));
        assert!(text.contains("- Volume: N/A\n"));
        assert!(text.contains("- 52-Week Range: N/A - N/A\n"));
        assert!(!text.contains("N/A%"));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let snapshot = full_snapshot();
        let first = compose(&ticker(), &snapshot);
        for _ in 0..5 {
            assert_eq!(compose(&ticker(), &snapshot), first);
        }

        let empty = MarketSnapshot::default();
        assert_eq!(compose(&ticker(), &empty), compose(&ticker(), &empty));
    }

    #[test]
    fn test_instructions_and_digest_separated_by_blank_line() {
        let text = compose(&ticker(), &full_snapshot()).to_string();
        assert!(text.contains("[A concise reason]\n\nHere is the real-time market data"));
    }
}
