use std::sync::Arc;
use std::time::Instant;

use arena_models::{PmAnalysis, Side};
use tracing::{info, warn};

use crate::error::AgentError;
use crate::oracle::{pm_label, structured_complete, Oracle};
use crate::prompts::PromptStore;

/// Result of one debate round: each side independently succeeded or failed.
#[derive(Debug)]
pub struct DebateRound {
    pub long: Result<PmAnalysis, AgentError>,
    pub short: Result<PmAnalysis, AgentError>,
}

impl DebateRound {
    pub fn side(&self, side: Side) -> &Result<PmAnalysis, AgentError> {
        match side {
            Side::Long => &self.long,
            Side::Short => &self.short,
        }
    }

    /// Both sides produced an analysis.
    pub fn is_complete(&self) -> bool {
        self.long.is_ok() && self.short.is_ok()
    }

    pub fn pair(&self) -> (Option<&PmAnalysis>, Option<&PmAnalysis>) {
        (self.long.as_ref().ok(), self.short.as_ref().ok())
    }

    /// Drop the errors, keeping only which sides are present.
    pub fn into_pair(self) -> (Option<PmAnalysis>, Option<PmAnalysis>) {
        (self.long.ok(), self.short.ok())
    }
}

/// Prefix the scenario with the instrument both agents must frame their thesis around.
pub fn enrich_scenario(scenario: &str, target: Option<&str>) -> String {
    match target.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => format!(
            "\n\nTRADING TARGET: {t}\n\
             Focus your thesis specifically on {t} as the vehicle to express this view.\n\
             {scenario}"
        ),
        None => scenario.to_string(),
    }
}

/// Runs the Long and Short PM agents against the same scenario.
pub struct Arena {
    oracle: Arc<dyn Oracle>,
    prompts: PromptStore,
}

impl Arena {
    pub fn new(oracle: Arc<dyn Oracle>, prompts: PromptStore) -> Self {
        Self { oracle, prompts }
    }

    /// Run both agents concurrently. Never fails as a whole; each side
    /// carries its own outcome.
    pub async fn fight(&self, scenario: &str, target: Option<&str>) -> DebateRound {
        let start = Instant::now();
        info!(
            ticker = target.unwrap_or("-"),
            scenario_chars = scenario.len(),
            "Starting debate"
        );

        let full_scenario = enrich_scenario(scenario, target);
        let (long, short) = tokio::join!(
            self.run_agent(Side::Long, &full_scenario),
            self.run_agent(Side::Short, &full_scenario),
        );

        let round = DebateRound { long, short };
        info!(
            long_ok = round.long.is_ok(),
            short_ok = round.short.is_ok(),
            elapsed_ms = start.elapsed().as_millis(),
            "Debate round finished"
        );
        round
    }

    /// Run a single agent. The returned analysis is guaranteed to carry the
    /// role of `side`.
    pub async fn run_agent(&self, side: Side, scenario: &str) -> Result<PmAnalysis, AgentError> {
        let start = Instant::now();
        let content = format!("Here is the market scenario:\n\n{scenario}");

        let result = structured_complete::<PmAnalysis>(
            self.oracle.as_ref(),
            &pm_label(side),
            self.prompts.get(side),
            &content,
        )
        .await
        .and_then(|analysis| {
            if analysis.role == side.role() {
                Ok(analysis)
            } else {
                Err(AgentError::RoleMismatch {
                    expected: side.role(),
                    actual: analysis.role,
                })
            }
        });

        let elapsed_ms = start.elapsed().as_millis();
        match &result {
            Ok(analysis) => info!(
                side = %side,
                risk_units = analysis.risk_sizing.risk_units,
                confidence = analysis.confidence_score,
                elapsed_ms,
                "Agent succeeded"
            ),
            Err(e) => warn!(side = %side, error = %e, elapsed_ms, "Agent failed"),
        }
        result
    }
}
