//! # Instruct
//!
//! Instruction-tuned text generation front-end: builds the instruction
//! prompt, hands it to a text-generation backend and cuts the answer out of
//! the generated text.

pub mod checkpoint;
pub mod error;
pub mod generator;
pub mod parsing;
pub mod prompts;
pub mod types;

mod service;

// Re-exports
pub use checkpoint::Checkpoint;
pub use error::{InstructError, Result};
pub use generator::{Generator, OpenAiCompletions, PipelineClient, TextGenerator};
pub use parsing::extract_response;
pub use prompts::{build_prompt, instruction_prompt, PromptInput};
pub use service::InstructService;
pub use types::{Backend, Exchange, Generation, GenerationConfig, ServiceConfig};
