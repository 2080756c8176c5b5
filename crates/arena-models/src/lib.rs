pub mod analysis;
pub mod config;
pub mod report;
pub mod target;
pub mod verdict;

pub use analysis::{BookRole, ConvictionLever, PmAnalysis, PmRole, RiskSizing, Side};
pub use config::{ArenaConfig, CacheConfig, DebateConfig, OracleConfig, SelectorConfig};
pub use report::{DebateHalt, DebateOutcome, DebateReport, HaltReason};
pub use target::{ResolvedTarget, TargetSource, TradeTarget, DEFAULT_TICKER};
pub use verdict::CioVerdict;
