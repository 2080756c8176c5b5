use std::fmt;
use std::sync::Arc;

use arena_models::{SelectorConfig, TradeTarget};
use tracing::{info, warn};

use crate::error::AgentError;
use crate::oracle::{structured_complete, Oracle, SELECTOR_LABEL};
use crate::prompts::selector_system_prompt;
use crate::text::truncate_chars;

/// Picks the instrument a research document should be traded through.
pub struct Selector {
    oracle: Arc<dyn Oracle>,
    max_chars: usize,
}

impl Selector {
    pub fn new(oracle: Arc<dyn Oracle>, config: &SelectorConfig) -> Self {
        Self {
            oracle,
            max_chars: config.max_chars,
        }
    }

    /// Select a target. Never fails: any error yields [`TradeTarget::fallback`].
    pub async fn select_target(&self, text: &str) -> TradeTarget {
        Self::or_fallback(self.try_select(text).await)
    }

    /// Settle a selection attempt, substituting [`TradeTarget::fallback`] for an error.
    pub fn or_fallback<E: fmt::Display>(result: Result<TradeTarget, E>) -> TradeTarget {
        match result {
            Ok(target) => {
                info!(
                    ticker = %target.primary_ticker,
                    sector = target.is_sector_report,
                    confidence = target.confidence,
                    "Target selected"
                );
                target
            }
            Err(e) => {
                warn!(error = %e, "Target selection failed, using fallback");
                TradeTarget::fallback()
            }
        }
    }

    /// Select a target, surfacing oracle failures.
    pub async fn try_select(&self, text: &str) -> Result<TradeTarget, AgentError> {
        let prefix = truncate_chars(text, self.max_chars);
        let content = format!("Analyze this research:\n\n{prefix}");
        structured_complete(
            self.oracle.as_ref(),
            SELECTOR_LABEL,
            &selector_system_prompt(),
            &content,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_target, sample_target_json, Failure, ScriptedOracle};

    fn selector(oracle: &Arc<ScriptedOracle>, max_chars: usize) -> Selector {
        Selector::new(
            Arc::clone(oracle) as Arc<dyn Oracle>,
            &SelectorConfig { max_chars },
        )
    }

    #[tokio::test]
    async fn returns_oracle_selection() {
        let oracle =
            Arc::new(ScriptedOracle::new().respond(SELECTOR_LABEL, sample_target_json("XBI", true)));
        let target = selector(&oracle, 20_000)
            .select_target("Biotech primer: funding cycle is turning.")
            .await;

        assert_eq!(target.primary_ticker, "XBI");
        assert!(target.is_sector_report);
    }

    #[tokio::test]
    async fn oracle_failure_yields_fallback() {
        for failure in [Failure::Unreachable, Failure::Timeout, Failure::Malformed] {
            let oracle = Arc::new(ScriptedOracle::new().fail(SELECTOR_LABEL, failure));
            let target = selector(&oracle, 20_000).select_target("anything").await;
            assert_eq!(target, TradeTarget::fallback(), "failure {failure:?}");
        }
    }

    #[test]
    fn or_fallback_passes_success_through() {
        let target = sample_target("ACME", false);
        assert_eq!(Selector::or_fallback(Ok::<_, AgentError>(target.clone())), target);
        assert_eq!(
            Selector::or_fallback(Err::<TradeTarget, _>(AgentError::Timeout(30))),
            TradeTarget::fallback()
        );
    }

    #[tokio::test]
    async fn try_select_surfaces_the_error() {
        let oracle = Arc::new(ScriptedOracle::unreachable());
        let result = selector(&oracle, 20_000).try_select("anything").await;
        assert!(result.unwrap_err().is_service_failure());
    }

    #[tokio::test]
    async fn document_is_truncated_before_sending() {
        let oracle =
            Arc::new(ScriptedOracle::new().respond(SELECTOR_LABEL, sample_target_json("ACME", false)));
        let text = format!("{}{}", "a".repeat(50), "TAIL_MARKER");
        selector(&oracle, 50).select_target(&text).await;

        let requests = oracle.requests_for(SELECTOR_LABEL);
        assert_eq!(requests.len(), 1);
        assert!(requests[0].content.starts_with("Analyze this research:\n\n"));
        assert!(requests[0].content.ends_with(&"a".repeat(50)));
        assert!(!requests[0].content.contains("TAIL_MARKER"));
        assert!(requests[0].instructions.contains("LIQUID PROXY"));
    }
}
