//! Pipeline outcome types

use crate::model::{AnalysisResult, ChartImage, MarketSnapshot, Ticker};

/// Everything gathered for one ticker, ready for delivery
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub snapshot: MarketSnapshot,
    pub chart: ChartImage,
    pub result: AnalysisResult,
}

impl AnalysisReport {
    pub fn ticker(&self) -> &Ticker {
        &self.result.ticker
    }
}

/// Terminal state of one handled message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryState {
    /// No ticker in the message; a usage hint was sent and no placeholder posted
    Rejected,
    /// Chart and narrative sent, placeholder deleted
    ResultDelivered,
    /// Placeholder edited to show the failure
    ErrorShown {
        /// Diagnostic line included in the notice
        detail: String,
    },
}

impl DeliveryState {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryState::ResultDelivered)
    }
}
