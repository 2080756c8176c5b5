//! Output shapes the oracle is asked to produce, with the checks a
//! response must pass before any component accepts it.

use arena_models::{CioVerdict, PmAnalysis, TradeTarget};
use serde::de::DeserializeOwned;

use crate::oracle::SchemaSpec;

/// A record the oracle can be asked to produce.
pub trait StructuredOutput: DeserializeOwned + Send {
    /// Schema name shown to the oracle and in errors.
    const NAME: &'static str;

    /// Example instance describing every field, shown to the oracle.
    fn example() -> serde_json::Value;

    /// Range and content checks serde cannot express.
    fn validate(&self) -> Result<(), String>;

    /// Canonicalize fields after validation.
    fn normalize(&mut self) {}

    fn schema() -> SchemaSpec {
        SchemaSpec {
            name: Self::NAME,
            example: Self::example(),
        }
    }
}

impl StructuredOutput for TradeTarget {
    const NAME: &'static str = "TradeTarget";

    fn example() -> serde_json::Value {
        serde_json::json!({
            "is_sector_report": "<true if macro/theme report, false if single stock>",
            "primary_ticker": "<the single best ticker to trade, e.g. XBI>",
            "instrument_name": "<full instrument name>",
            "reasoning": "<why this instrument expresses the document's view>",
            "confidence": "<integer 1-100>"
        })
    }

    fn validate(&self) -> Result<(), String> {
        let ticker = self.primary_ticker.trim();
        if ticker.is_empty() {
            return Err("primary_ticker is empty".to_string());
        }
        if ticker.chars().any(char::is_whitespace) {
            return Err(format!("primary_ticker {ticker:?} is not a single symbol"));
        }
        Ok(())
    }

    fn normalize(&mut self) {
        self.primary_ticker = self.primary_ticker.trim().to_ascii_uppercase();
    }
}

impl StructuredOutput for PmAnalysis {
    const NAME: &'static str = "PMAnalysis";

    fn example() -> serde_json::Value {
        serde_json::json!({
            "role": "<\"Long PM\" or \"Short PM\">",
            "analytical_process": "<step-by-step reasoning trace: start from a baseline view and \
                                   explain how specific evidence in the text moved it>",
            "thesis_summary": "<5-10 bullet points summarizing the core view>",
            "key_drivers": ["<driver>"],
            "risk_sizing": {
                "risk_units": "<number, 1-10 scale>",
                "role_in_book": "<one of \"Core\", \"Tactical\", \"Hedge\", \"Pair Leg\">",
                "max_drawdown_tolerance": "<at what drawdown do you cut?>"
            },
            "conviction_levers": [{
                "lever_name": "<e.g. Margins, FDA Approval>",
                "impact_description": "<how this lever changes sizing/conviction>",
                "sensitivity_score": "<integer 1-5: how sensitive the thesis is to this lever>"
            }],
            "event_path": ["<milestone to watch over 6-18 months>"],
            "confidence_score": "<integer 1-100>"
        })
    }

    fn validate(&self) -> Result<(), String> {
        if !(1..=100).contains(&self.confidence_score) {
            return Err(format!(
                "confidence_score {} outside 1..=100",
                self.confidence_score
            ));
        }

        let units = self.risk_sizing.risk_units;
        if !units.is_finite() || units <= 0.0 {
            return Err(format!("risk_units {units} must be a positive number"));
        }

        if let Some(lever) = self
            .conviction_levers
            .iter()
            .find(|l| !(1..=5).contains(&l.sensitivity_score))
        {
            return Err(format!(
                "lever {:?} sensitivity_score {} outside 1..=5",
                lever.lever_name, lever.sensitivity_score
            ));
        }

        if self.thesis_summary.trim().is_empty() {
            return Err("thesis_summary is empty".to_string());
        }
        Ok(())
    }
}

impl StructuredOutput for CioVerdict {
    const NAME: &'static str = "CIOVerdict";

    fn example() -> serde_json::Value {
        serde_json::json!({
            "winner": "<\"Long PM\", \"Short PM\", or \"Undecided\">",
            "net_risk_units": "<signed number: long units minus short units, adjusted for conviction>",
            "executive_summary": "<synthesis of both pitches into a trading decision>",
            "deciding_factor": "<why you sided with one over the other>",
            "pre_mortem": "<optional: what would kill the winning thesis>"
        })
    }

    fn validate(&self) -> Result<(), String> {
        if self.winner.trim().is_empty() {
            return Err("winner is empty".to_string());
        }
        if !self.net_risk_units.is_finite() {
            return Err(format!(
                "net_risk_units {} is not finite",
                self.net_risk_units
            ));
        }
        Ok(())
    }
}
