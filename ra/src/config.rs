//! Configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Agent loop configuration
    pub agent: AgentConfig,

    /// Tool execution configuration
    pub tools: ToolsConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        if self.agent.max_steps == 0 {
            return Err(eyre::eyre!("agent.max-steps must be at least 1"));
        }
        if self.agent.instructor_variant == InstructorVariant::Custom && self.agent.instructor_text.is_none() {
            return Err(eyre::eyre!(
                "agent.instructor-variant is 'custom' but agent.instructor-text is not set"
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .reagent.yml
        let local_config = PathBuf::from(".reagent.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/reagent/reagent.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("reagent").join("reagent.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("openai" or "anthropic")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-5-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 16384,
            timeout_ms: 300_000,
        }
    }
}

/// Which instructor prompt seeds the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructorVariant {
    /// Built-in test-driven workflow instructions
    #[default]
    Default,
    /// Text supplied via `instructor-text` / `--instructor`
    Custom,
}

/// Agent loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Step budget for one run
    #[serde(rename = "max-steps")]
    pub max_steps: u32,

    /// Maximum backtracks (model-invoked plus automatic) before the run
    /// goes fatal
    #[serde(rename = "max-backtracks")]
    pub max_backtracks: u32,

    /// Auto-backtrack after this many consecutive parse failures
    /// (absent = never)
    #[serde(rename = "auto-backtrack-after")]
    pub auto_backtrack_after: Option<u32>,

    /// Register the add_instructions_and_backtrack tool
    #[serde(rename = "backtracking-enabled")]
    pub backtracking_enabled: bool,

    /// Register the optional file/search/test tools
    #[serde(rename = "optional-tools-enabled")]
    pub optional_tools_enabled: bool,

    /// Reject finish calls whose patch is empty
    #[serde(rename = "guard-empty-diff")]
    pub guard_empty_diff: bool,

    /// Instructor prompt selection
    #[serde(rename = "instructor-variant")]
    pub instructor_variant: InstructorVariant,

    /// Instructor text used with the custom variant
    #[serde(rename = "instructor-text")]
    pub instructor_text: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: 100,
            max_backtracks: 5,
            auto_backtrack_after: None,
            backtracking_enabled: false,
            optional_tools_enabled: false,
            guard_empty_diff: false,
            instructor_variant: InstructorVariant::Default,
            instructor_text: None,
        }
    }
}

/// Tool execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Per-tool timeout in milliseconds, enforced by the execution bridge
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Observation size cap before truncation
    #[serde(rename = "max-output-chars")]
    pub max_output_chars: usize,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 120_000,
            max_output_chars: 30_000,
        }
    }
}
