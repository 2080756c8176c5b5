use std::fmt::Write;
use std::sync::Arc;
use std::time::Instant;

use arena_models::{CioVerdict, PmAnalysis, Side};
use tracing::info;

use crate::error::AgentError;
use crate::oracle::{structured_complete, Oracle, CIO_LABEL};
use crate::prompts::cio_system_prompt;

/// Renders one PM's pitch for the CIO.
fn write_pitch(out: &mut String, heading: &str, pitch: &PmAnalysis) {
    let sizing = &pitch.risk_sizing;
    let _ = writeln!(out, "{heading}");
    let _ = writeln!(out, "Risk Units: {}", sizing.risk_units);
    let _ = writeln!(out, "Role in Book: {}", sizing.role_in_book);
    let _ = writeln!(out, "Confidence: {}/100", pitch.confidence_score);
    let _ = writeln!(out, "Thesis: {}", pitch.thesis_summary.trim());
    let _ = writeln!(out, "Key Drivers: {}", pitch.key_drivers.join("; "));
    if !pitch.conviction_levers.is_empty() {
        let levers: Vec<String> = pitch
            .conviction_levers
            .iter()
            .map(|l| format!("{} (sensitivity {}/5)", l.lever_name, l.sensitivity_score))
            .collect();
        let _ = writeln!(out, "Conviction Levers: {}", levers.join("; "));
    }
}

/// The user content the CIO sees: both pitches, long first.
pub fn adjudication_content(long: &PmAnalysis, short: &PmAnalysis) -> String {
    let mut out = String::new();
    write_pitch(&mut out, "LONG PM PITCH:", long);
    out.push('\n');
    write_pitch(&mut out, "SHORT PM PITCH:", short);
    out
}

/// The CIO: weighs both pitches and renders a verdict.
pub struct Adjudicator {
    oracle: Arc<dyn Oracle>,
}

impl Adjudicator {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    /// Adjudicate a complete debate. Oracle failures are returned to the
    /// caller, not replaced with a placeholder verdict.
    pub async fn adjudicate(
        &self,
        long: &PmAnalysis,
        short: &PmAnalysis,
    ) -> Result<CioVerdict, AgentError> {
        for (side, pitch) in [(Side::Long, long), (Side::Short, short)] {
            if pitch.role != side.role() {
                return Err(AgentError::RoleMismatch {
                    expected: side.role(),
                    actual: pitch.role,
                });
            }
        }

        let start = Instant::now();
        let verdict: CioVerdict = structured_complete(
            self.oracle.as_ref(),
            CIO_LABEL,
            &cio_system_prompt(),
            &adjudication_content(long, short),
        )
        .await?;

        info!(
            winner = %verdict.winner,
            net_risk_units = verdict.net_risk_units,
            elapsed_ms = start.elapsed().as_millis(),
            "Verdict rendered"
        );
        Ok(verdict)
    }
}
