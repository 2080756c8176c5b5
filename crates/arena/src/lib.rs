//! Arena - adversarial Long/Short debate over research documents
//!
//! Picks the instrument a document should be traded through, has a Long PM
//! and a Short PM agent argue it, and lets a CIO agent rule on the debate.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use arena::models::{ArenaConfig, DebateOutcome};
//! use arena::agents::{DebateInput, DebatePipeline};
//! ```

pub use arena_agents as agents;
pub use arena_cache as cache;
pub use arena_models as models;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use arena_agents::{
    Adjudicator, AgentError, Arena, ClaudeOracle, DebateInput, DebatePipeline, Oracle,
    PromptStore, Selector,
};
use arena_cache::TargetCache;
use arena_models::{ArenaConfig, DebateOutcome};
use tracing::info;

/// Read and parse a TOML configuration file.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<ArenaConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Build a pipeline backed by the `claude` CLI.
pub fn build_pipeline(config: &ArenaConfig) -> anyhow::Result<DebatePipeline> {
    let oracle: Arc<dyn Oracle> = Arc::new(ClaudeOracle::new(&config.oracle));
    build_pipeline_with(config, oracle)
}

/// Build a pipeline around any oracle.
pub fn build_pipeline_with(
    config: &ArenaConfig,
    oracle: Arc<dyn Oracle>,
) -> anyhow::Result<DebatePipeline> {
    let prompts = PromptStore::load(&config.debate.prompts_dir)
        .context("Failed to load PM instruction documents")?;

    let pipeline = DebatePipeline::new(
        Selector::new(Arc::clone(&oracle), &config.selector),
        Arena::new(Arc::clone(&oracle), prompts),
        Adjudicator::new(oracle),
        config.debate.max_chars,
    );

    if !config.cache.enabled {
        return Ok(pipeline);
    }
    Ok(pipeline.with_cache(TargetCache::new(
        config.cache.max_capacity,
        Duration::from_secs(config.cache.ttl_seconds),
    )))
}

/// Read source documents into one debate input.
///
/// Texts are joined with a blank line; base file names are kept for the
/// ticker heuristic.
pub fn load_documents<P: AsRef<Path>>(paths: &[P]) -> anyhow::Result<DebateInput> {
    let mut texts = Vec::with_capacity(paths.len());
    let mut names = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input: {}", path.display()))?;
        texts.push(text);
        names.push(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        );
    }

    Ok(DebateInput {
        text: texts.join("\n\n"),
        source_names: names,
        ticker_override: None,
    })
}

/// Write the outcome as pretty JSON for later inspection.
pub fn write_dump(path: impl AsRef<Path>, outcome: &DebateOutcome) -> anyhow::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(outcome)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write dump: {}", path.display()))?;
    info!(path = %path.display(), "Debate dump written");
    Ok(())
}

/// Run one debate with the given pipeline.
pub async fn debate(
    pipeline: &DebatePipeline,
    input: &DebateInput,
) -> Result<DebateOutcome, AgentError> {
    pipeline.run(input).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_agents::test_support::ScriptedOracle;
    use arena_models::HaltReason;

    fn shipped_prompts() -> String {
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../prompts").to_string()
    }

    #[test]
    fn shipped_config_parses() {
        let config = load_config(concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/arena.toml"))
            .unwrap();
        assert_eq!(config, ArenaConfig::default());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arena.toml");
        std::fs::write(&path, "[oracle]\nmodel = \"claude-opus-4-1\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.oracle.model, "claude-opus-4-1");
        assert_eq!(config.oracle.timeout_seconds, 180);
        assert_eq!(config.debate.max_chars, 60_000);
    }

    #[test]
    fn missing_config_is_an_error() {
        let err = load_config("/nonexistent/arena.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn documents_are_joined_with_names() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("CRWV_Report.txt");
        let second = dir.path().join("appendix.txt");
        std::fs::write(&first, "Page one.").unwrap();
        std::fs::write(&second, "Page two.").unwrap();

        let input = load_documents(&[&first, &second]).unwrap();
        assert_eq!(input.text, "Page one.\n\nPage two.");
        assert_eq!(input.source_names, vec!["CRWV_Report.txt", "appendix.txt"]);
        assert!(input.ticker_override.is_none());
    }

    #[test]
    fn unreadable_document_is_an_error() {
        let err = load_documents(&["/nonexistent/report.txt"]).unwrap_err();
        assert!(err.to_string().contains("report.txt"));
    }

    #[test]
    fn pipeline_requires_prompts() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ArenaConfig::default();
        config.debate.prompts_dir = dir.path().display().to_string();

        let result = build_pipeline(&config);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn halted_outcome_is_dumped() {
        let mut config = ArenaConfig::default();
        config.debate.prompts_dir = shipped_prompts();
        config.cache.enabled = false;
        let pipeline =
            build_pipeline_with(&config, Arc::new(ScriptedOracle::unreachable())).unwrap();

        let outcome = debate(&pipeline, &DebateInput::new("Some research."))
            .await
            .unwrap();
        assert!(!outcome.is_completed());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        write_dump(&path, &outcome).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let restored: DebateOutcome = serde_json::from_str(&text).unwrap();
        match restored {
            DebateOutcome::Halted(halt) => {
                assert_eq!(halt.reason, HaltReason::ServiceUnavailable);
                assert_eq!(halt.target.ticker, "SPY");
            }
            DebateOutcome::Completed(_) => panic!("expected a halted debate"),
        }
    }
}
