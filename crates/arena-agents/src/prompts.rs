use std::path::Path;

use arena_models::Side;
use tracing::debug;

use crate::error::AgentError;
use crate::oracle::SchemaSpec;

pub const LONG_PROMPT_FILE: &str = "long_pm.md";
pub const SHORT_PROMPT_FILE: &str = "short_pm.md";

/// Append the required output shape to a set of instructions.
pub fn with_output_schema(instructions: &str, schema: &SchemaSpec) -> String {
    let example = serde_json::to_string_pretty(&schema.example).unwrap_or_default();
    format!(
        "{instructions}\n\n\
         ## OUTPUT FORMAT\n\n\
         Respond with a single JSON object of type `{name}` with exactly these fields \
         (values below describe what each field must contain):\n\
         {example}\n\n\
         Numbers and booleans MUST be JSON numbers and booleans, not strings.\n\
         Respond with ONLY the JSON object, no other text.",
        instructions = instructions.trim_end(),
        name = schema.name,
    )
}

pub fn selector_system_prompt() -> String {
    "You are a Senior Research Analyst at a hedge fund.\n\n\
     ## TASK\n\n\
     Read the research document and identify the SINGLE BEST tradable instrument \
     to express the views it contains.\n\n\
     ## SELECTION RULES\n\n\
     1. Single-name report (one issuer is the subject): return that issuer's ticker \
     and set is_sector_report to false.\n\
     2. Sector, theme or macro report: pick the best LIQUID PROXY, either an ETF or a \
     bellwether stock, and set is_sector_report to true.\n\
     - \"The Future of AI Hardware\" -> NVDA or SMH\n\
     - \"Biotech Primer\" -> XBI (SPDR S&P Biotech ETF)\n\
     - \"Rates are falling\" -> TLT\n\n\
     ## CONSTRAINTS\n\n\
     - Never pick obscure or illiquid instruments.\n\
     - If several instruments fit, pick the one with the highest beta to the theme.\n\
     - primary_ticker is the bare exchange symbol, e.g. \"SMH\", with no exchange prefix."
        .to_string()
}

pub fn cio_system_prompt() -> String {
    "You are the Chief Investment Officer (CIO) of a multi-manager hedge fund. \
     Two of your senior PMs, one Long and one Short, have just pitched you on the same name.\n\n\
     ## GOAL\n\n\
     1. Synthesize both pitches into a final trading decision.\n\
     2. Determine net_risk_units: Long risk units minus Short risk units, adjusted for the \
     conviction behind each pitch. Positive favors the Long, negative favors the Short.\n\
     3. State the deciding factor: why you sided with one PM over the other.\n\
     4. Write a short pre-mortem: what would kill the winning thesis.\n\n\
     ## TIE-BREAK RULES\n\n\
     - If the Long thesis relies on hope while the Short thesis relies on math, side with the Short.\n\
     - If the Short thesis ignores a material upcoming catalyst, side with the Long.\n\
     - If neither pitch is convincing, name the winner \"Undecided\" and keep net_risk_units near zero."
        .to_string()
}

/// Role-specific instruction documents for the two debate agents.
///
/// Both documents are required; a store cannot exist with either missing.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptStore {
    long: String,
    short: String,
}

impl PromptStore {
    /// Load `long_pm.md` and `short_pm.md` from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, AgentError> {
        let dir = dir.as_ref();
        let store = Self {
            long: read_prompt(dir, Side::Long)?,
            short: read_prompt(dir, Side::Short)?,
        };
        debug!(dir = %dir.display(), "Loaded PM instruction documents");
        Ok(store)
    }

    pub fn from_texts(long: impl Into<String>, short: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            short: short.into(),
        }
    }

    pub fn file_name(side: Side) -> &'static str {
        match side {
            Side::Long => LONG_PROMPT_FILE,
            Side::Short => SHORT_PROMPT_FILE,
        }
    }

    pub fn get(&self, side: Side) -> &str {
        match side {
            Side::Long => &self.long,
            Side::Short => &self.short,
        }
    }
}

fn read_prompt(dir: &Path, side: Side) -> Result<String, AgentError> {
    let path = dir.join(PromptStore::file_name(side));
    let text = std::fs::read_to_string(&path).map_err(|e| {
        AgentError::Config(format!(
            "{side} PM instruction document not readable at {}: {e}",
            path.display()
        ))
    })?;

    if text.trim().is_empty() {
        return Err(AgentError::Config(format!(
            "{side} PM instruction document is empty: {}",
            path.display()
        )));
    }
    Ok(text)
}
