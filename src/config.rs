use crate::error::DesignError;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4-1106-preview";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_STORAGE_FILE: &str = ".design-ai-storage.json";

/// The one mutable secret. Owned by the orchestrator and handed to the client
/// on every call.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api_key: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: lookup("OPENAI_API_KEY").unwrap_or_default(),
        }
    }
}

/// Everything about the remote call that is not secret.
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    /// Unset means a hung request waits indefinitely.
    pub timeout: Option<Duration>,
    pub storage_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            model: DEFAULT_MODEL.into(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: None,
            storage_path: PathBuf::from(DEFAULT_STORAGE_FILE),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, DesignError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DesignError> {
        let mut settings = Self::default();

        if let Some(endpoint) = lookup("DESIGN_AI_ENDPOINT") {
            settings.endpoint = endpoint;
        }
        if let Some(model) = lookup("DESIGN_AI_MODEL") {
            settings.model = model;
        }
        if let Some(raw) = lookup("DESIGN_AI_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                DesignError::Config(format!(
                    "DESIGN_AI_TIMEOUT_SECS must be a whole number, got '{raw}'"
                ))
            })?;
            settings.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(path) = lookup("DESIGN_AI_STORAGE") {
            settings.storage_path = PathBuf::from(path);
        }

        Ok(settings)
    }
}
