use std::time::Instant;

use arena_models::{OracleConfig, Side};
use async_trait::async_trait;
use tracing::debug;

use crate::claude_cli::{invoke_claude, ClaudeCliConfig};
use crate::error::AgentError;
use crate::parser::extract_json;
use crate::prompts::with_output_schema;
use crate::schema::StructuredOutput;

pub const SELECTOR_LABEL: &str = "selector";
pub const CIO_LABEL: &str = "cio";

/// Request label for one side of the debate: the role name, e.g. "Long PM".
pub fn pm_label(side: Side) -> String {
    side.role().to_string()
}

/// The output shape a request must conform to.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSpec {
    pub name: &'static str,
    pub example: serde_json::Value,
}

/// One structured-completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleRequest {
    /// Which component is asking (`selector`, `Long PM`, `Short PM`, `cio`).
    pub label: String,
    /// Role-specific system instructions.
    pub instructions: String,
    /// User content: the document, scenario or pitches.
    pub content: String,
    pub schema: SchemaSpec,
}

/// The external reasoning service. Mockable for testing.
///
/// Implementations return the raw JSON object they produced; shape and
/// range validation happen in [`structured_complete`].
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn complete(&self, request: &OracleRequest) -> Result<serde_json::Value, AgentError>;
}

/// Ask the oracle for a `T`, rejecting anything that does not deserialize
/// into `T` or fails `T::validate`.
pub async fn structured_complete<T: StructuredOutput>(
    oracle: &dyn Oracle,
    label: &str,
    instructions: &str,
    content: &str,
) -> Result<T, AgentError> {
    let request = OracleRequest {
        label: label.to_string(),
        instructions: instructions.to_string(),
        content: content.to_string(),
        schema: T::schema(),
    };

    let start = Instant::now();
    let raw = oracle.complete(&request).await?;
    debug!(
        label,
        schema = T::NAME,
        elapsed_ms = start.elapsed().as_millis(),
        "Oracle responded"
    );

    let mut parsed: T = serde_json::from_value(raw)?;
    parsed.validate().map_err(|reason| AgentError::Schema {
        schema: T::NAME,
        reason,
    })?;
    parsed.normalize();
    Ok(parsed)
}

/// An oracle backed by the `claude` CLI.
pub struct ClaudeOracle {
    pub cli_config: ClaudeCliConfig,
}

impl ClaudeOracle {
    pub fn new(config: &OracleConfig) -> Self {
        Self {
            cli_config: ClaudeCliConfig::from(config),
        }
    }
}

#[async_trait]
impl Oracle for ClaudeOracle {
    async fn complete(&self, request: &OracleRequest) -> Result<serde_json::Value, AgentError> {
        let system_prompt = with_output_schema(&request.instructions, &request.schema);
        let raw_output = invoke_claude(&system_prompt, &request.content, &self.cli_config).await?;
        extract_json(&raw_output)
    }
}
