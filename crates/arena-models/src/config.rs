use serde::{Deserialize, Serialize};

/// Top-level configuration for the debate arena.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArenaConfig {
    pub oracle: OracleConfig,
    pub selector: SelectorConfig,
    pub debate: DebateConfig,
    pub cache: CacheConfig,
}

/// How the reasoning service is reached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OracleConfig {
    /// Executable invoked for each oracle call.
    pub command: String,
    /// Model passed to the `claude` CLI.
    pub model: String,
    /// Per-call timeout in seconds. The only latency bound in the pipeline.
    pub timeout_seconds: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            command: "claude".to_string(),
            model: "claude-sonnet-4-5-20250929".to_string(),
            timeout_seconds: 180,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectorConfig {
    /// Only this many leading characters of the document are sent for target selection.
    pub max_chars: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self { max_chars: 20_000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebateConfig {
    /// Leading characters of the document used as the debate scenario.
    pub max_chars: usize,
    /// Directory holding `long_pm.md` and `short_pm.md`.
    pub prompts_dir: String,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            max_chars: 60_000,
            prompts_dir: "prompts".to_string(),
        }
    }
}

/// Memoization of target selection per document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_capacity: u64,
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_capacity: 256,
            ttl_seconds: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_arena_config() {
        let config = ArenaConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: ArenaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn default_truncation_bounds() {
        let config = ArenaConfig::default();
        assert_eq!(config.selector.max_chars, 20_000);
        assert_eq!(config.debate.max_chars, 60_000);
    }

    #[test]
    fn config_from_toml() {
        let toml_str = r#"
[oracle]
model = "claude-3-5-haiku-latest"
timeout_seconds = 30

[debate]
prompts_dir = "/etc/arena/prompts"

[cache]
enabled = false
"#;

        let config: ArenaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.oracle.model, "claude-3-5-haiku-latest");
        assert_eq!(config.oracle.timeout_seconds, 30);
        assert_eq!(config.oracle.command, "claude");
        assert_eq!(config.debate.prompts_dir, "/etc/arena/prompts");
        assert_eq!(config.debate.max_chars, 60_000);
        assert_eq!(config.selector, SelectorConfig::default());
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.max_capacity, 256);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let config: ArenaConfig = toml::from_str("").unwrap();
        assert_eq!(config, ArenaConfig::default());
    }
}
