use async_openai::{config::OpenAIConfig, types::CreateCompletionRequestArgs, Client};
use backoff::ExponentialBackoffBuilder;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::checkpoint::Checkpoint;
use crate::error::Result;
use crate::types::{Backend, Generation, GenerationConfig, ServiceConfig};

/// The text-generation collaborator.
///
/// Implementations return at least one candidate whose `generated_text` is the
/// prompt followed by the continuation.
pub trait TextGenerator: Send + Sync + 'static {
    fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> impl Future<Output = Result<Vec<Generation>>> + Send;
}

#[derive(Debug, Serialize)]
struct PipelineRequest<'a> {
    inputs: &'a str,
    parameters: PipelineParameters,
}

#[derive(Debug, Serialize)]
struct PipelineParameters {
    max_new_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pad_token_id: Option<u32>,
    return_full_text: bool,
}

/// Pipelines answer with a list of candidates; some servers send a bare object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PipelineResponse {
    Candidates(Vec<Generation>),
    Single(Generation),
}

/// Client for a text-generation pipeline endpoint
pub struct PipelineClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl PipelineClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

impl TextGenerator for PipelineClient {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<Vec<Generation>> {
        let body = PipelineRequest {
            inputs: prompt,
            parameters: PipelineParameters {
                max_new_tokens: config.max_new_tokens,
                temperature: config.temperature,
                pad_token_id: config.pad_token_id,
                return_full_text: true,
            },
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?.error_for_status()?;
        let generations = match response.json::<PipelineResponse>().await? {
            PipelineResponse::Candidates(generations) => generations,
            PipelineResponse::Single(generation) => vec![generation],
        };

        Ok(generations)
    }
}

/// Legacy completions against an OpenAI-compatible server (vLLM, llama.cpp, ...)
///
/// `echo` is set so the returned text starts with the prompt, like a pipeline
/// with `return_full_text`. The completions API has no padding parameter, so
/// `pad_token_id` is left to the server's own generation config.
pub struct OpenAiCompletions {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCompletions {
    pub fn new(base_url: &str, api_key: &str, model: impl Into<String>) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(base_url)
            .with_api_key(api_key);
        // Fail on the first error instead of retrying
        let backoff = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        let client = Client::with_config(openai_config).with_backoff(backoff);
        Self {
            client,
            model: model.into(),
        }
    }
}

impl TextGenerator for OpenAiCompletions {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<Vec<Generation>> {
        let request = CreateCompletionRequestArgs::default()
            .model(&self.model)
            .prompt(prompt)
            .max_tokens(config.max_new_tokens)
            .temperature(config.temperature)
            .echo(true)
            .build()?;

        let response = self.client.completions().create(request).await?;

        let mut choices = response.choices;
        choices.sort_by_key(|c| c.index);
        Ok(choices
            .into_iter()
            .map(|c| Generation::new(c.text))
            .collect())
    }
}

/// Generator selected by [`Backend`] at startup
pub enum Generator {
    Pipeline(PipelineClient),
    OpenAi(OpenAiCompletions),
}

impl Generator {
    pub fn from_config(config: &ServiceConfig, checkpoint: &Checkpoint) -> Self {
        match config.backend {
            Backend::Pipeline => {
                let mut client = PipelineClient::new(&config.base_url);
                if let Some(key) = &config.api_key {
                    client = client.with_api_key(key);
                }
                Generator::Pipeline(client)
            }
            // Local servers don't check the key
            Backend::OpenAi => Generator::OpenAi(OpenAiCompletions::new(
                &config.base_url,
                config.api_key.as_deref().unwrap_or("local"),
                checkpoint.model_name(),
            )),
        }
    }
}

impl TextGenerator for Generator {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<Vec<Generation>> {
        match self {
            Generator::Pipeline(client) => client.generate(prompt, config).await,
            Generator::OpenAi(client) => client.generate(prompt, config).await,
        }
    }
}
