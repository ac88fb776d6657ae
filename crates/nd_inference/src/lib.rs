use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub mod models;
pub mod presets;
pub mod summarizer;
pub mod text;

pub use models::create_model;
pub use presets::{GenerationConfig, ModelPreset};
pub use summarizer::Summarizer;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which implementation answers summarization calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Hosted Hugging Face inference endpoint
    #[default]
    HuggingFace,
    /// Offline lead-sentence extractor
    Lead,
}

impl Backend {
    pub fn cli_name(&self) -> &'static str {
        match self {
            Backend::HuggingFace => "huggingface",
            Backend::Lead => "lead",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Backend::HuggingFace),
            "lead" => Ok(Backend::Lead),
            other => Err(format!("Unknown backend '{}'. Available: huggingface, lead", other)),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub backend: Backend,
    pub generation: GenerationConfig,
    pub api_token: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("backend", &self.backend)
            .field("generation", &self.generation)
            .field("api_token", &self.api_token.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            generation: GenerationConfig::default(),
            api_token: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub mod prelude {
    pub use super::{Backend, Config, GenerationConfig, ModelPreset, Summarizer};
    pub use super::models::create_model;
    pub use nd_core::{GenerationParams, SummarizationModel, SummaryRequest, SummaryResult, Result, Error};
}
