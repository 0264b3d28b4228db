use anyhow::{bail, Context, Result};

/// Which completion backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
}

/// Provider configuration loaded from environment variables.
///
/// `USE_OPENAI` (true/1/yes) selects the OpenAI-compatible backend, which has
/// a default endpoint and model. Otherwise the Anthropic-style backend is
/// used and `LLM_BASE_URL` is required.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: f32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let use_openai = std::env::var("USE_OPENAI")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let provider = if use_openai {
            ProviderKind::OpenAi
        } else {
            ProviderKind::Anthropic
        };

        let base_url = std::env::var("LLM_BASE_URL").ok();
        if provider == ProviderKind::Anthropic && base_url.is_none() {
            bail!("LLM_BASE_URL is required unless USE_OPENAI is set");
        }

        Ok(Config {
            provider,
            api_key: require_env("LLM_API_KEY")?,
            base_url,
            model: std::env::var("LLM_MODEL").ok(),
            temperature: std::env::var("LLM_TEMPERATURE")
                .unwrap_or_else(|_| "0".to_string())
                .parse::<f32>()
                .context("LLM_TEMPERATURE must be a number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
