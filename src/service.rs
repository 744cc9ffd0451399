use crate::checkpoint::Checkpoint;
use crate::error::{InstructError, Result};
use crate::generator::{Generator, TextGenerator};
use crate::parsing::extract_response;
use crate::prompts::{build_prompt, PromptInput};
use crate::types::{Exchange, GenerationConfig, ServiceConfig};

/// Process-wide instruction service.
///
/// Built once at startup and shared read-only by every request.
pub struct InstructService<G = Generator> {
    generator: G,
    generation: GenerationConfig,
}

impl InstructService<Generator> {
    /// Read the checkpoint and connect the configured backend
    pub fn load(config: &ServiceConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(InstructError::Config("backend URL is empty".to_string()));
        }

        let checkpoint = Checkpoint::load(&config.checkpoint)?;
        let generator = Generator::from_config(config, &checkpoint);
        let generation = GenerationConfig::default().with_pad_token_id(checkpoint.eos_token_id());

        tracing::info!(
            "Loaded checkpoint {} (eos_token_id: {:?}, backend: {:?})",
            checkpoint.path().display(),
            checkpoint.eos_token_id(),
            config.backend
        );
        if let Some(eos) = checkpoint.eos_token_id() {
            if !config.backend.sends_pad_token_id() {
                tracing::warn!(
                    "{:?} backend has no pad_token_id parameter; eos_token_id {} is not sent",
                    config.backend,
                    eos
                );
            }
        }

        Ok(Self::new(generator, generation))
    }
}

impl<G: TextGenerator> InstructService<G> {
    pub fn new(generator: G, generation: GenerationConfig) -> Self {
        Self {
            generator,
            generation,
        }
    }

    pub fn generation_config(&self) -> &GenerationConfig {
        &self.generation
    }

    /// Generate a response for one submitted form
    pub async fn respond(&self, instruction: &str, prompt_input: &str) -> Result<Exchange> {
        let prompt = build_prompt(&PromptInput::new(instruction, Some(prompt_input)));
        tracing::debug!("Prompt ({} chars):\n{}", prompt.len(), prompt);

        let generations = self.generator.generate(&prompt, &self.generation).await?;
        let first = generations
            .into_iter()
            .next()
            .ok_or(InstructError::EmptyGeneration)?;

        let response = extract_response(&first.generated_text).to_string();
        tracing::debug!("Response ({} chars)", response.len());

        Ok(Exchange {
            instruction: instruction.to_string(),
            prompt_input: prompt_input.to_string(),
            response,
        })
    }
}
