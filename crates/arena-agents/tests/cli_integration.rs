//! Integration tests that invoke the real Claude CLI.
//!
//! These tests are `#[ignore]` by default. They require:
//! - The `claude` CLI installed and on PATH
//! - Valid Anthropic credentials configured
//!
//! Run explicitly with:
//! ```bash
//! cargo test -p arena-agents --test cli_integration -- --ignored
//! ```

use std::sync::Arc;
use std::time::Duration;

use arena_agents::claude_cli::{check_cli_available, invoke_claude, ClaudeCliConfig};
use arena_agents::parser::extract_json;
use arena_agents::{AgentError, Arena, ClaudeOracle, Oracle, PromptStore, Selector};
use arena_models::{OracleConfig, SelectorConfig};

const FAST_MODEL: &str = "claude-3-5-haiku-latest";

fn fast_config() -> ClaudeCliConfig {
    ClaudeCliConfig {
        model: FAST_MODEL.to_string(),
        timeout: Duration::from_secs(60),
        ..ClaudeCliConfig::default()
    }
}

fn fast_oracle() -> Arc<dyn Oracle> {
    Arc::new(ClaudeOracle::new(&OracleConfig {
        model: FAST_MODEL.to_string(),
        timeout_seconds: 120,
        ..OracleConfig::default()
    }))
}

#[tokio::test]
#[ignore]
async fn cli_is_available() {
    assert!(
        check_cli_available("claude").await,
        "claude CLI not found on PATH"
    );
}

/// Catches CLI output format changes that would break JSON extraction.
#[tokio::test]
#[ignore]
async fn cli_output_is_parseable_json() {
    if !check_cli_available("claude").await {
        eprintln!("Skipping: claude CLI not available");
        return;
    }

    let system_prompt = concat!(
        "You are a test agent. Respond ONLY with a JSON object, no other text.\n",
        "The JSON must have exactly these fields:\n",
        "- \"status\": the string \"ok\"\n",
        "- \"echo\": repeat back the user's message exactly\n",
    );

    let raw = invoke_claude(system_prompt, "ping", &fast_config())
        .await
        .expect("Claude CLI invocation failed");

    let parsed = extract_json(&raw).unwrap_or_else(|e| {
        panic!("Failed to extract JSON from CLI output ({e}).\nRaw output:\n---\n{raw}\n---")
    });
    assert_eq!(parsed["status"], "ok", "Unexpected response: {parsed}");
}

#[tokio::test]
#[ignore]
async fn cli_reports_errors_for_invalid_model() {
    if !check_cli_available("claude").await {
        eprintln!("Skipping: claude CLI not available");
        return;
    }

    let config = ClaudeCliConfig {
        model: "not-a-real-model".to_string(),
        ..fast_config()
    };
    let result = invoke_claude("Respond with {}", "ping", &config).await;
    assert!(
        matches!(result, Err(AgentError::Cli(_))),
        "Expected a CLI error for an invalid model, got {result:?}"
    );
}

#[tokio::test]
#[ignore]
async fn live_selection_finds_the_issuer() {
    if !check_cli_available("claude").await {
        eprintln!("Skipping: claude CLI not available");
        return;
    }

    let selector = Selector::new(fast_oracle(), &SelectorConfig::default());
    let target = selector
        .try_select(
            "Initiating coverage of NVIDIA Corporation (NVDA) at Buy. Data center revenue \
             grew 150% year over year on accelerator demand.",
        )
        .await
        .expect("selection failed");

    assert_eq!(target.primary_ticker, "NVDA");
    assert!(!target.is_sector_report);
}

#[tokio::test]
#[ignore]
async fn live_debate_produces_both_sides() {
    if !check_cli_available("claude").await {
        eprintln!("Skipping: claude CLI not available");
        return;
    }

    let prompts = PromptStore::load(concat!(env!("CARGO_MANIFEST_DIR"), "/../../prompts"))
        .expect("shipped prompts");
    let arena = Arena::new(fast_oracle(), prompts);
    let round = arena
        .fight(
            "Tesla Q3: auto gross margin down 200bps YoY, energy storage revenue up 100%, \
             robotaxi launch delayed six months.",
            Some("TSLA"),
        )
        .await;

    assert!(round.long.is_ok(), "Long PM failed: {:?}", round.long);
    assert!(round.short.is_ok(), "Short PM failed: {:?}", round.short);
}
