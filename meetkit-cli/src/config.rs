use anyhow::{Context, Result};
use meetkit_agent::{LlmAgent, scheduler_agent};
use meetkit_model::{DEFAULT_MODEL, GeminiConfig, GeminiModel};
use meetkit_tool::{ConvertToIsoTool, ScheduleMeetingTool};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Agent settings read from `agent.toml`. Every field has a default, so
/// an empty file yields the stock scheduler.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Replaces the built-in scheduling instruction when set.
    #[serde(default)]
    pub instruction: Option<String>,
}

fn default_name() -> String {
    "scheduler".to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            model: default_model(),
            description: None,
            instruction: None,
        }
    }
}

impl AgentConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// `GOOGLE_API_KEY`, with `GEMINI_API_KEY` as fallback.
pub fn google_api_key() -> Result<String> {
    std::env::var("GOOGLE_API_KEY").or_else(|_| std::env::var("GEMINI_API_KEY")).map_err(|_| {
        anyhow::anyhow!("GOOGLE_API_KEY or GEMINI_API_KEY environment variable not set")
    })
}

/// Assembles the agent: the stock scheduler, unless the config carries a
/// custom instruction.
pub fn build_agent(config: &AgentConfig, api_base: &str) -> Result<Arc<LlmAgent>> {
    let model =
        Arc::new(GeminiModel::new(GeminiConfig::new(google_api_key()?, config.model.as_str()))?);

    let agent = match &config.instruction {
        None => scheduler_agent(model, api_base)?,
        Some(instruction) => LlmAgent::builder(config.name.as_str())
            .description(config.description.clone().unwrap_or_default())
            .model(model)
            .instruction(instruction.clone())
            .tool(Arc::new(ScheduleMeetingTool::new(api_base)?))
            .tool(Arc::new(ConvertToIsoTool))
            .build()?,
    };
    Ok(Arc::new(agent))
}
