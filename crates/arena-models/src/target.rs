use serde::{Deserialize, Serialize};

/// Broad-market instrument used when nothing more specific can be identified.
pub const DEFAULT_TICKER: &str = "SPY";

/// The instrument a research document should be traded through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TradeTarget {
    /// True for sector/macro/theme reports, false for single-name reports.
    pub is_sector_report: bool,
    pub primary_ticker: String,
    pub instrument_name: String,
    pub reasoning: String,
    pub confidence: u32,
}

impl TradeTarget {
    /// Substituted whenever target selection fails.
    pub fn fallback() -> Self {
        Self {
            is_sector_report: true,
            primary_ticker: DEFAULT_TICKER.to_string(),
            instrument_name: "S&P 500".to_string(),
            reasoning: "Fallback: Could not identify specific target.".to_string(),
            confidence: 1,
        }
    }

    /// True when the selection carries no information beyond the market default.
    pub fn is_default(&self) -> bool {
        self.primary_ticker.trim().eq_ignore_ascii_case(DEFAULT_TICKER)
    }
}

/// Where the ticker used for the debate came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TargetSource {
    /// Supplied explicitly by the caller.
    Override,
    Selector,
    Filename,
    Default,
}

/// The ticker the debate is framed around, after applying source precedence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub ticker: String,
    pub source: TargetSource,
    pub is_sector_report: bool,
    pub reasoning: String,
}
