use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use arena_models::OracleConfig;
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};
use tracing::{debug, warn};

use crate::error::AgentError;

/// Configuration for a Claude CLI invocation.
#[derive(Debug, Clone)]
pub struct ClaudeCliConfig {
    pub command: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for ClaudeCliConfig {
    fn default() -> Self {
        Self::from(&OracleConfig::default())
    }
}

impl From<&OracleConfig> for ClaudeCliConfig {
    fn from(config: &OracleConfig) -> Self {
        Self {
            command: config.command.clone(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

/// Invoke the `claude` CLI in print mode with a system prompt.
///
/// The user prompt is written to stdin. Returns the raw stdout text.
pub async fn invoke_claude(
    system_prompt: &str,
    user_prompt: &str,
    config: &ClaudeCliConfig,
) -> Result<String, AgentError> {
    debug!(
        command = %config.command,
        model = %config.model,
        prompt_chars = user_prompt.len(),
        "Invoking claude CLI"
    );

    let mut child = Command::new(&config.command)
        .args([
            "-p",
            "--system-prompt",
            system_prompt,
            "--model",
            &config.model,
            "--output-format",
            "text",
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| AgentError::Cli(format!("Failed to spawn {}: {e}", config.command)))?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| AgentError::Cli("claude stdin was not captured".to_string()))?;
    let prompt = user_prompt.to_string();

    let result = tokio::time::timeout(config.timeout, async move {
        write_prompt(stdin, prompt.as_bytes()).await?;
        child.wait_with_output().await
    })
    .await
    .map_err(|_| AgentError::Timeout(config.timeout.as_secs()))?
    .map_err(|e| AgentError::Cli(format!("claude I/O failed: {e}")))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        warn!(status = %result.status, stderr = %stderr, "Claude CLI failed");
        return Err(AgentError::Cli(format!(
            "claude exited {}: {}",
            result.status,
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&result.stdout).to_string();
    if stdout.trim().is_empty() {
        return Err(AgentError::Parse(
            "Claude returned empty response".to_string(),
        ));
    }

    Ok(stdout)
}

/// Write the prompt and close stdin.
///
/// A CLI that exits before reading (bad model, auth failure) breaks the pipe;
/// that is not an error here, so its exit status and stderr get reported.
async fn write_prompt(mut stdin: ChildStdin, prompt: &[u8]) -> std::io::Result<()> {
    let written = async {
        stdin.write_all(prompt).await?;
        stdin.shutdown().await
    };
    match written.await {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {
            debug!("claude closed stdin before reading the prompt");
            Ok(())
        }
        other => other,
    }
}

/// Check if the configured CLI is available on the system.
pub async fn check_cli_available(command: &str) -> bool {
    match Command::new(command).arg("--version").output().await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}
