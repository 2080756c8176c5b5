use std::time::Instant;

use arena_cache::TargetCache;
use arena_models::{
    DebateHalt, DebateOutcome, DebateReport, HaltReason, PmAnalysis, ResolvedTarget, Side,
    TradeTarget,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::adjudicator::Adjudicator;
use crate::arena::Arena;
use crate::error::AgentError;
use crate::selector::Selector;
use crate::text::truncate_chars;
use crate::ticker::{guess_ticker_from_names, resolve_target};

/// One document submitted for debate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebateInput {
    /// Combined text of every source document.
    pub text: String,
    /// File names the text came from, used to guess a ticker.
    pub source_names: Vec<String>,
    /// Ticker chosen by the caller, bypassing selection results.
    pub ticker_override: Option<String>,
}

impl DebateInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Sequences target selection, the debate and adjudication.
pub struct DebatePipeline {
    selector: Selector,
    arena: Arena,
    adjudicator: Adjudicator,
    cache: Option<TargetCache>,
    debate_max_chars: usize,
}

impl DebatePipeline {
    pub fn new(
        selector: Selector,
        arena: Arena,
        adjudicator: Adjudicator,
        debate_max_chars: usize,
    ) -> Self {
        Self {
            selector,
            arena,
            adjudicator,
            cache: None,
            debate_max_chars,
        }
    }

    /// Memoize target selection per document.
    pub fn with_cache(mut self, cache: TargetCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Target selection for `text`, served from the cache when one is attached.
    /// Only successful selections are cached; a failure yields the fallback
    /// for this run and selection is retried on the next.
    pub async fn select(&self, text: &str) -> TradeTarget {
        match &self.cache {
            Some(cache) => Selector::or_fallback(
                cache
                    .try_get_or_select(text, self.selector.try_select(text))
                    .await,
            ),
            None => self.selector.select_target(text).await,
        }
    }

    /// Run the whole pipeline.
    ///
    /// A debate missing either side halts before adjudication and comes back
    /// as [`DebateOutcome::Halted`]. Adjudication failures are returned as errors.
    pub async fn run(&self, input: &DebateInput) -> Result<DebateOutcome, AgentError> {
        let start = Instant::now();
        if input.text.trim().is_empty() {
            return Err(AgentError::EmptyInput);
        }

        let selection = self.select(&input.text).await;
        let filename_guess = guess_ticker_from_names(&input.source_names);
        let target = resolve_target(
            Some(&selection),
            filename_guess.as_ref(),
            input.ticker_override.as_deref(),
        );
        info!(ticker = %target.ticker, source = ?target.source, "Debate target resolved");

        let scenario = truncate_chars(&input.text, self.debate_max_chars);
        let round = self.arena.fight(scenario, Some(&target.ticker)).await;

        let (long, short) = match (round.long, round.short) {
            (Ok(long), Ok(short)) => (long, short),
            (long, short) => {
                let halt = build_halt(selection, target, long, short);
                warn!(reason = ?halt.reason, "Debate halted before adjudication");
                return Ok(DebateOutcome::Halted(halt));
            }
        };

        let verdict = self.adjudicator.adjudicate(&long, &short).await?;

        let report = DebateReport {
            id: Uuid::new_v4(),
            selection,
            target,
            long,
            short,
            verdict,
            decided_at: chrono::Utc::now(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            ticker = %report.target.ticker,
            winner = %report.verdict.winner,
            elapsed_ms = report.processing_time_ms,
            "Debate complete"
        );
        Ok(DebateOutcome::Completed(report))
    }
}

/// Classify an incomplete debate.
pub fn halt_reason(
    long: &Result<PmAnalysis, AgentError>,
    short: &Result<PmAnalysis, AgentError>,
) -> HaltReason {
    match (long, short) {
        (Ok(_), Err(_)) => HaltReason::PartialDebate {
            failed: Side::Short,
        },
        (Err(_), Ok(_)) => HaltReason::PartialDebate { failed: Side::Long },
        (Err(a), Err(b)) if a.is_service_failure() && b.is_service_failure() => {
            HaltReason::ServiceUnavailable
        }
        _ => HaltReason::NoUsableContent,
    }
}

/// User-facing explanation for a halted debate, with the next step to take.
pub fn halt_message(reason: HaltReason, ticker: &str) -> String {
    match reason {
        HaltReason::ServiceUnavailable => format!(
            "Both PM agents failed to reach the reasoning service while debating {ticker}. \
             Check that the `claude` CLI is installed, on PATH and authenticated, and that \
             the configured model name is valid."
        ),
        HaltReason::NoUsableContent => format!(
            "The reasoning service ran but neither PM returned a usable analysis of {ticker}. \
             Re-run the debate; if it keeps failing, see the per-side errors or try another model."
        ),
        HaltReason::PartialDebate { failed } => format!(
            "The {failed} PM failed to produce an analysis of {ticker}, so the debate was not \
             adjudicated. Re-run the debate; the {failed} error has the details."
        ),
    }
}

fn build_halt(
    selection: TradeTarget,
    target: ResolvedTarget,
    long: Result<PmAnalysis, AgentError>,
    short: Result<PmAnalysis, AgentError>,
) -> DebateHalt {
    let reason = halt_reason(&long, &short);
    let message = halt_message(reason, &target.ticker);
    let (long, long_error) = split(long);
    let (short, short_error) = split(short);

    DebateHalt {
        id: Uuid::new_v4(),
        selection,
        target,
        reason,
        message,
        long,
        short,
        long_error,
        short_error,
        halted_at: chrono::Utc::now(),
    }
}

fn split(result: Result<PmAnalysis, AgentError>) -> (Option<PmAnalysis>, Option<String>) {
    match result {
        Ok(analysis) => (Some(analysis), None),
        Err(e) => (None, Some(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_analysis;

    fn cli_err() -> Result<PmAnalysis, AgentError> {
        Err(AgentError::Cli("spawn failed".to_string()))
    }

    fn parse_err() -> Result<PmAnalysis, AgentError> {
        Err(AgentError::Parse("no JSON".to_string()))
    }

    #[test]
    fn one_missing_side_is_partial() {
        assert_eq!(
            halt_reason(&Ok(sample_analysis(Side::Long)), &cli_err()),
            HaltReason::PartialDebate {
                failed: Side::Short
            }
        );
        assert_eq!(
            halt_reason(&parse_err(), &Ok(sample_analysis(Side::Short))),
            HaltReason::PartialDebate { failed: Side::Long }
        );
    }

    #[test]
    fn two_transport_failures_mean_service_unavailable() {
        assert_eq!(
            halt_reason(&cli_err(), &Err(AgentError::Timeout(30))),
            HaltReason::ServiceUnavailable
        );
    }

    #[test]
    fn any_content_failure_means_no_usable_content() {
        assert_eq!(
            halt_reason(&cli_err(), &parse_err()),
            HaltReason::NoUsableContent
        );
        assert_eq!(
            halt_reason(&parse_err(), &parse_err()),
            HaltReason::NoUsableContent
        );
    }

    #[test]
    fn messages_distinguish_failure_kinds() {
        let unavailable = halt_message(HaltReason::ServiceUnavailable, "ACME");
        let unusable = halt_message(HaltReason::NoUsableContent, "ACME");
        let partial = halt_message(
            HaltReason::PartialDebate {
                failed: Side::Short,
            },
            "ACME",
        );

        assert!(unavailable.contains("reach the reasoning service"));
        assert!(unavailable.contains("claude"));
        assert!(unusable.contains("ran but neither PM"));
        assert!(partial.contains("The Short PM failed"));
        assert!(partial.contains("ACME"));
    }

    #[test]
    fn halt_keeps_the_surviving_side_and_errors() {
        let halt = build_halt(
            TradeTarget::fallback(),
            resolve_target(None, None, Some("ACME")),
            Ok(sample_analysis(Side::Long)),
            cli_err(),
        );
        assert!(halt.long.is_some());
        assert!(halt.short.is_none());
        assert!(halt.long_error.is_none());
        assert!(halt.short_error.unwrap().contains("spawn failed"));
        assert_eq!(halt.target.ticker, "ACME");
    }
}
