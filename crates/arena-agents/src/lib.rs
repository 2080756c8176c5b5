pub mod adjudicator;
pub mod arena;
pub mod claude_cli;
pub mod error;
pub mod oracle;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod schema;
pub mod selector;
pub mod text;
pub mod ticker;

pub mod test_support;

pub use adjudicator::Adjudicator;
pub use arena::{Arena, DebateRound};
pub use error::AgentError;
pub use oracle::{structured_complete, ClaudeOracle, Oracle, OracleRequest, SchemaSpec};
pub use pipeline::{DebateInput, DebatePipeline};
pub use prompts::PromptStore;
pub use selector::Selector;
pub use ticker::{guess_ticker_from_names, resolve_target, FilenameGuess};
