use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{PmAnalysis, Side};
use crate::target::{ResolvedTarget, TradeTarget};
use crate::verdict::CioVerdict;

/// Everything a completed debate produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebateReport {
    pub id: Uuid,
    /// Raw output of target selection (possibly the fallback).
    pub selection: TradeTarget,
    pub target: ResolvedTarget,
    pub long: PmAnalysis,
    pub short: PmAnalysis,
    pub verdict: CioVerdict,
    pub decided_at: DateTime<Utc>,
    pub processing_time_ms: u64,
}

/// Why the pipeline stopped before adjudication.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HaltReason {
    /// Both sides failed and every failure was the reasoning service itself
    /// (unreachable, misconfigured, timed out).
    ServiceUnavailable,
    /// Both sides failed; the service answered but nothing usable came back.
    NoUsableContent,
    /// Exactly one side produced an analysis.
    PartialDebate { failed: Side },
}

/// A debate that tripped the circuit breaker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebateHalt {
    pub id: Uuid,
    pub selection: TradeTarget,
    pub target: ResolvedTarget,
    pub reason: HaltReason,
    /// User-facing explanation including what to do next.
    pub message: String,
    pub long: Option<PmAnalysis>,
    pub short: Option<PmAnalysis>,
    pub long_error: Option<String>,
    pub short_error: Option<String>,
    pub halted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DebateOutcome {
    Completed(DebateReport),
    Halted(DebateHalt),
}

impl DebateOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, DebateOutcome::Completed(_))
    }

    pub fn target(&self) -> &ResolvedTarget {
        match self {
            DebateOutcome::Completed(report) => &report.target,
            DebateOutcome::Halted(halt) => &halt.target,
        }
    }
}
