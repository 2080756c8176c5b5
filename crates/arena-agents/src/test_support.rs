//! Test doubles for the reasoning service.
//!
//! `ScriptedOracle` returns canned responses (or failures) per request label
//! and records every request it sees. `ScenarioOracle` reads the request
//! content and applies the same policies the prompts describe, so pipeline
//! tests can assert on outcomes that depend on the document text.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use arena_models::{
    BookRole, CioVerdict, ConvictionLever, PmAnalysis, RiskSizing, Side, TradeTarget,
};
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

use crate::error::AgentError;
use crate::oracle::{pm_label, Oracle, OracleRequest, CIO_LABEL, SELECTOR_LABEL};
use crate::prompts::PromptStore;

pub fn test_prompts() -> PromptStore {
    PromptStore::from_texts(
        "You are the Long PM. Argue the bull case.",
        "You are the Short PM. Argue the bear case.",
    )
}

pub fn sample_target(ticker: &str, is_sector_report: bool) -> TradeTarget {
    TradeTarget {
        is_sector_report,
        primary_ticker: ticker.to_string(),
        instrument_name: format!("{ticker} instrument"),
        reasoning: format!("{ticker} is the cleanest expression of the report"),
        confidence: 85,
    }
}

pub fn sample_target_json(ticker: &str, is_sector_report: bool) -> Value {
    to_json(&sample_target(ticker, is_sector_report))
}

pub fn sample_analysis(side: Side) -> PmAnalysis {
    match side {
        Side::Long => PmAnalysis {
            role: side.role(),
            analytical_process: "Baseline neutral. Energy storage doubling to 15% of revenue \
                                 outweighs the auto margin hit."
                .to_string(),
            thesis_summary: "- Energy storage +100% YoY\n- Mix shift supports margins".to_string(),
            key_drivers: vec!["Energy storage growth".to_string(), "Mix shift".to_string()],
            risk_sizing: RiskSizing {
                risk_units: 6.0,
                role_in_book: BookRole::Core,
                max_drawdown_tolerance: "Cut at -15%".to_string(),
            },
            conviction_levers: vec![ConvictionLever {
                lever_name: "Energy storage growth".to_string(),
                impact_description: "Sustained triple-digit growth adds two units".to_string(),
                sensitivity_score: 4,
            }],
            event_path: vec!["Q3 deliveries".to_string(), "Robotaxi relaunch".to_string()],
            confidence_score: 72,
        },
        Side::Short => PmAnalysis {
            role: side.role(),
            analytical_process: "Baseline neutral. 200bps of auto margin compression and a \
                                 $1B insider sale move me short."
                .to_string(),
            thesis_summary: "- Auto margins -200bps YoY\n- Robotaxi delayed 6 months".to_string(),
            key_drivers: vec!["Margins".to_string(), "Robotaxi delay".to_string()],
            risk_sizing: RiskSizing {
                risk_units: 4.5,
                role_in_book: BookRole::PairLeg,
                max_drawdown_tolerance: "Cover at +12%".to_string(),
            },
            conviction_levers: vec![ConvictionLever {
                lever_name: "Margins".to_string(),
                impact_description: "Another 100bps of compression doubles the size".to_string(),
                sensitivity_score: 5,
            }],
            event_path: vec!["Q3 earnings".to_string()],
            confidence_score: 68,
        },
    }
}

pub fn sample_analysis_json(side: Side) -> Value {
    to_json(&sample_analysis(side))
}

pub fn sample_verdict(winner: &str, net_risk_units: f64) -> CioVerdict {
    CioVerdict {
        winner: winner.to_string(),
        net_risk_units,
        executive_summary: format!("{winner} made the better-supported case"),
        deciding_factor: "Quantified evidence beat narrative".to_string(),
        pre_mortem: Some("Storage growth decelerates below 30%".to_string()),
    }
}

pub fn sample_verdict_json(winner: &str, net_risk_units: f64) -> Value {
    to_json(&sample_verdict(winner, net_risk_units))
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// How a scripted request fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// CLI missing or exited non-zero.
    Unreachable,
    Timeout,
    /// Responds with a JSON object of the wrong shape.
    Malformed,
    /// Responds with nothing.
    Empty,
}

#[derive(Debug, Clone)]
enum Script {
    Respond(Value),
    Fail(Failure),
}

/// Canned oracle keyed by request label. Unscripted labels behave as unreachable.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    scripts: HashMap<String, Script>,
    // One-shot failures consumed before the label's script applies.
    pending: Mutex<HashMap<String, Failure>>,
    requests: Mutex<Vec<OracleRequest>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if the CLI were missing.
    pub fn unreachable() -> Self {
        Self::new()
    }

    /// Both debate agents answer; selector and CIO are unscripted.
    pub fn debate_only() -> Self {
        Self::new()
            .respond(&pm_label(Side::Long), sample_analysis_json(Side::Long))
            .respond(&pm_label(Side::Short), sample_analysis_json(Side::Short))
    }

    /// Every stage answers.
    pub fn happy(ticker: &str, is_sector_report: bool) -> Self {
        Self::debate_only()
            .respond(SELECTOR_LABEL, sample_target_json(ticker, is_sector_report))
            .respond(CIO_LABEL, sample_verdict_json("Long PM", 1.5))
    }

    pub fn respond(mut self, label: &str, value: Value) -> Self {
        self.scripts.insert(label.to_string(), Script::Respond(value));
        self
    }

    pub fn fail(mut self, label: &str, failure: Failure) -> Self {
        self.scripts.insert(label.to_string(), Script::Fail(failure));
        self
    }

    /// Fail the next call for `label` only; later calls follow its script.
    pub fn fail_first(self, label: &str, failure: Failure) -> Self {
        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(label.to_string(), failure);
        }
        self
    }

    pub fn requests(&self) -> Vec<OracleRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn requests_for(&self, label: &str) -> Vec<OracleRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.label == label)
            .collect()
    }
}

fn failure_error(failure: Failure, label: &str) -> Result<Value, AgentError> {
    match failure {
        Failure::Unreachable => Err(AgentError::Cli(format!(
            "Failed to spawn claude for {label}: No such file or directory"
        ))),
        Failure::Timeout => Err(AgentError::Timeout(30)),
        Failure::Malformed => Ok(serde_json::json!({"unexpected": "shape"})),
        Failure::Empty => Err(AgentError::Parse(
            "Claude returned empty response".to_string(),
        )),
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn complete(&self, request: &OracleRequest) -> Result<Value, AgentError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let one_shot = self
            .pending
            .lock()
            .ok()
            .and_then(|mut pending| pending.remove(&request.label));
        if let Some(failure) = one_shot {
            return failure_error(failure, &request.label);
        }

        match self.scripts.get(&request.label) {
            Some(Script::Respond(value)) => Ok(value.clone()),
            Some(Script::Fail(failure)) => failure_error(*failure, &request.label),
            None => failure_error(Failure::Unreachable, &request.label),
        }
    }
}

// "Acme Corp (ACME)"
static NAMED_ISSUER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][\w&.]*(?: [A-Z][\w&.]*)*) \(([A-Z]{1,5})\)").expect("valid regex")
});
static TRADING_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"TRADING TARGET: (\S+)").expect("valid regex"));
static RISK_UNITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Risk Units: (-?[0-9.]+)").expect("valid regex"));

const SECTOR_PROXIES: &[(&[&str], &str, &str)] = &[
    (&["biotech"], "XBI", "SPDR S&P Biotech ETF"),
    (
        &["semiconductor", "ai hardware"],
        "SMH",
        "VanEck Semiconductor ETF",
    ),
    (
        &["rates", "treasury", "treasuries"],
        "TLT",
        "iShares 20+ Year Treasury Bond ETF",
    ),
];

const BULLISH_TERMS: &[&str] = &["grew", "growth", "beat", "record", "expanding", "upgrade"];
const BEARISH_TERMS: &[&str] = &[
    "delay",
    "compress",
    "sold",
    "miss",
    "decline",
    "higher for longer",
];

fn count_terms(text: &str, terms: &[&str]) -> usize {
    terms.iter().map(|t| text.matches(t).count()).sum()
}

/// Sizing rule: 2 units base, 2 more per supporting term, capped to 1..=10.
fn units_for(hits: usize) -> f64 {
    (2 + 2 * hits).clamp(1, 10) as f64
}

/// A deterministic oracle that answers from the request content, following
/// the policies written into the prompts.
#[derive(Debug, Default)]
pub struct ScenarioOracle;

impl ScenarioOracle {
    pub fn new() -> Self {
        Self
    }

    fn select(content: &str) -> Result<Value, AgentError> {
        if let Some(caps) = NAMED_ISSUER.captures(content) {
            let ticker = &caps[2];
            return Ok(to_json(&TradeTarget {
                is_sector_report: false,
                primary_ticker: ticker.to_string(),
                instrument_name: caps[1].to_string(),
                reasoning: format!("Single-name report on {}", &caps[1]),
                confidence: 90,
            }));
        }

        let lower = content.to_lowercase();
        SECTOR_PROXIES
            .iter()
            .find(|(keywords, _, _)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(_, ticker, name)| {
                to_json(&TradeTarget {
                    is_sector_report: true,
                    primary_ticker: ticker.to_string(),
                    instrument_name: name.to_string(),
                    reasoning: format!("{ticker} is the most liquid proxy for the theme"),
                    confidence: 70,
                })
            })
            .ok_or_else(|| AgentError::Parse("No identifiable instrument".to_string()))
    }

    fn argue(side: Side, content: &str) -> Value {
        let lower = content.to_lowercase();
        let (terms, role_in_book) = match side {
            Side::Long => (BULLISH_TERMS, BookRole::Core),
            Side::Short => (BEARISH_TERMS, BookRole::Tactical),
        };
        let hits = count_terms(&lower, terms);
        let vehicle = TRADING_TARGET
            .captures(content)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| "the name".to_string());

        to_json(&PmAnalysis {
            role: side.role(),
            analytical_process: format!(
                "Started neutral on {vehicle}; found {hits} supporting data points."
            ),
            thesis_summary: format!("- {side} {vehicle}: {hits} supporting data points"),
            key_drivers: terms
                .iter()
                .filter(|t| lower.contains(*t))
                .map(|t| t.to_string())
                .collect(),
            risk_sizing: RiskSizing {
                risk_units: units_for(hits),
                role_in_book,
                max_drawdown_tolerance: "10%".to_string(),
            },
            conviction_levers: vec![ConvictionLever {
                lever_name: format!("{side} evidence count"),
                impact_description: "Each data point adds two units".to_string(),
                sensitivity_score: 3,
            }],
            event_path: vec![format!("{vehicle} next earnings")],
            confidence_score: (40 + 10 * hits).min(100) as u32,
        })
    }

    fn judge(content: &str) -> Result<Value, AgentError> {
        let units: Vec<f64> = RISK_UNITS
            .captures_iter(content)
            .filter_map(|c| c[1].parse().ok())
            .collect();
        let &[long, short] = units.as_slice() else {
            return Err(AgentError::Parse(format!(
                "Expected two pitches, found {}",
                units.len()
            )));
        };

        let net = long - short;
        let winner = if net > 0.0 {
            "Long PM"
        } else if net < 0.0 {
            "Short PM"
        } else {
            "Undecided"
        };
        Ok(to_json(&CioVerdict {
            winner: winner.to_string(),
            net_risk_units: net,
            executive_summary: format!("Long {long} units versus Short {short} units"),
            deciding_factor: "Weight of quantified evidence".to_string(),
            pre_mortem: None,
        }))
    }
}

#[async_trait]
impl Oracle for ScenarioOracle {
    async fn complete(&self, request: &OracleRequest) -> Result<Value, AgentError> {
        match request.label.as_str() {
            SELECTOR_LABEL => Self::select(&request.content),
            CIO_LABEL => Self::judge(&request.content),
            label if label == pm_label(Side::Long) => Ok(Self::argue(Side::Long, &request.content)),
            label if label == pm_label(Side::Short) => {
                Ok(Self::argue(Side::Short, &request.content))
            }
            other => Err(AgentError::Cli(format!("Unknown request label: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_issuer_is_single_name() {
        let value = ScenarioOracle::select("Initiating on Acme Corp (ACME) at Buy.").unwrap();
        assert_eq!(value["primary_ticker"], "ACME");
        assert_eq!(value["instrument_name"], "Acme Corp");
        assert_eq!(value["is_sector_report"], false);
    }

    #[test]
    fn sector_theme_maps_to_liquid_proxy() {
        let value = ScenarioOracle::select("A biotech primer on the funding cycle.").unwrap();
        assert_eq!(value["primary_ticker"], "XBI");
        assert_eq!(value["is_sector_report"], true);

        let value = ScenarioOracle::select("Rates are falling faster than expected.").unwrap();
        assert_eq!(value["primary_ticker"], "TLT");
    }

    #[test]
    fn unknown_theme_fails() {
        assert!(ScenarioOracle::select("Nothing tradable here.").is_err());
    }

    #[test]
    fn sizing_follows_evidence() {
        let text = "TRADING TARGET: TSLA\nMargins compressed. Robotaxi delay. CEO sold stock.";
        let short: PmAnalysis = serde_json::from_value(ScenarioOracle::argue(Side::Short, text)).unwrap();
        let long: PmAnalysis = serde_json::from_value(ScenarioOracle::argue(Side::Long, text)).unwrap();
        assert_eq!(short.risk_sizing.risk_units, 8.0);
        assert_eq!(long.risk_sizing.risk_units, 2.0);
        assert!(short.thesis_summary.contains("TSLA"));
    }

    #[test]
    fn judge_nets_long_minus_short() {
        let value = ScenarioOracle::judge("Risk Units: 2\n...\nRisk Units: 8\n").unwrap();
        assert_eq!(value["winner"], "Short PM");
        assert_eq!(value["net_risk_units"], -6.0);
    }

    #[test]
    fn units_are_capped() {
        assert_eq!(units_for(0), 2.0);
        assert_eq!(units_for(10), 10.0);
    }

    #[tokio::test]
    async fn scripted_oracle_records_requests() {
        let oracle = ScriptedOracle::happy("ACME", false);
        let request = OracleRequest {
            label: SELECTOR_LABEL.to_string(),
            instructions: "pick".to_string(),
            content: "doc".to_string(),
            schema: <TradeTarget as crate::schema::StructuredOutput>::schema(),
        };
        let value = oracle.complete(&request).await.unwrap();
        assert_eq!(value["primary_ticker"], "ACME");
        assert_eq!(oracle.requests(), vec![request]);
    }

    #[tokio::test]
    async fn first_failure_is_consumed() {
        let oracle =
            ScriptedOracle::happy("ACME", false).fail_first(SELECTOR_LABEL, Failure::Timeout);
        let request = OracleRequest {
            label: SELECTOR_LABEL.to_string(),
            instructions: String::new(),
            content: "doc".to_string(),
            schema: <TradeTarget as crate::schema::StructuredOutput>::schema(),
        };

        assert!(matches!(
            oracle.complete(&request).await,
            Err(AgentError::Timeout(_))
        ));
        let value = oracle.complete(&request).await.unwrap();
        assert_eq!(value["primary_ticker"], "ACME");
    }

    #[tokio::test]
    async fn unscripted_label_is_unreachable() {
        let oracle = ScriptedOracle::new();
        let request = OracleRequest {
            label: CIO_LABEL.to_string(),
            instructions: String::new(),
            content: String::new(),
            schema: <CioVerdict as crate::schema::StructuredOutput>::schema(),
        };
        let err = oracle.complete(&request).await.unwrap_err();
        assert!(err.is_service_failure());
    }
}
