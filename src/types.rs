use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default checkpoint directory, relative to the working directory
pub const DEFAULT_CHECKPOINT: &str = "../results/final";

/// Generation backend provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// Text-generation pipeline endpoint (`[{"generated_text": ...}]` responses)
    #[default]
    Pipeline,
    /// OpenAI-compatible completions endpoint serving the checkpoint
    OpenAi,
}

impl Backend {
    /// Whether the backend accepts a padding token id with each request
    pub fn sends_pad_token_id(&self) -> bool {
        match self {
            Backend::Pipeline => true,
            Backend::OpenAi => false,
        }
    }
}

/// One candidate returned by the generation collaborator.
///
/// `generated_text` holds the prompt followed by the continuation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Generation {
    pub generated_text: String,
}

impl Generation {
    pub fn new(generated_text: impl Into<String>) -> Self {
        Self { generated_text: generated_text.into() }
    }
}

/// Fixed sampling configuration sent with every prompt
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub max_new_tokens: u32,
    pub temperature: f32,
    /// Padding token id, set to the checkpoint's end-of-sequence token
    pub pad_token_id: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_new_tokens: 250,
            temperature: 1.0,
            pad_token_id: None,
        }
    }
}

impl GenerationConfig {
    pub fn with_pad_token_id(mut self, id: Option<u32>) -> Self {
        self.pad_token_id = id;
        self
    }
}

/// Startup configuration for the instruct service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub checkpoint: PathBuf,
    pub backend: Backend,
    /// Base URL of the generation endpoint
    pub base_url: String,
    /// API key (optional): bearer token for pipeline endpoints, API key for
    /// OpenAI-compatible servers
    pub api_key: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            checkpoint: PathBuf::from(DEFAULT_CHECKPOINT),
            backend: Backend::default(),
            base_url: "http://127.0.0.1:8080".to_string(),
            api_key: None,
        }
    }
}

impl ServiceConfig {
    pub fn new(checkpoint: impl Into<PathBuf>) -> Self {
        Self {
            checkpoint: checkpoint.into(),
            ..Default::default()
        }
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// The values shown on the page for one request
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Exchange {
    pub instruction: String,
    pub prompt_input: String,
    pub response: String,
}

impl Exchange {
    /// Blank form, nothing generated yet
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_default() {
        let config = GenerationConfig::default();
        assert_eq!(config.max_new_tokens, 250);
        assert_eq!(config.temperature, 1.0);
        assert_eq!(config.pad_token_id, None);
    }

    #[test]
    fn test_service_config_builder() {
        let config = ServiceConfig::new("/models/alpaca")
            .with_backend(Backend::OpenAi)
            .with_base_url("http://localhost:8000/v1")
            .with_api_key("secret");

        assert_eq!(config.checkpoint, PathBuf::from("/models/alpaca"));
        assert_eq!(config.backend, Backend::OpenAi);
        assert_eq!(config.base_url, "http://localhost:8000/v1");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_service_config_default_checkpoint() {
        let config = ServiceConfig::default();
        assert_eq!(config.checkpoint, PathBuf::from("../results/final"));
        assert_eq!(config.backend, Backend::Pipeline);
    }

    #[test]
    fn test_pad_token_support_by_backend() {
        assert!(Backend::Pipeline.sends_pad_token_id());
        assert!(!Backend::OpenAi.sends_pad_token_id());
    }

    #[test]
    fn test_exchange_empty() {
        let exchange = Exchange::empty();
        assert_eq!(exchange.instruction, "");
        assert_eq!(exchange.prompt_input, "");
        assert_eq!(exchange.response, "");
    }
}
