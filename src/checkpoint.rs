//! Checkpoint metadata
//!
//! Weights and tokenizer are executed by the generation backend. Locally we
//! only read what the request path needs: the end-of-sequence token id, which
//! doubles as the padding token id.

use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InstructError, Result};

/// Files consulted for `eos_token_id`, in priority order
const METADATA_FILES: [&str; 3] = [
    "generation_config.json",
    "config.json",
    "tokenizer_config.json",
];

#[derive(Debug, Deserialize)]
struct Metadata {
    #[serde(default)]
    eos_token_id: Option<Value>,
}

/// A pretrained checkpoint directory
#[derive(Debug, Clone)]
pub struct Checkpoint {
    path: PathBuf,
    eos_token_id: Option<u32>,
}

impl Checkpoint {
    /// Read checkpoint metadata from `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().to_path_buf();
        if !path.is_dir() {
            return Err(InstructError::Checkpoint(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        let mut eos_token_id = None;
        for name in METADATA_FILES {
            let file = path.join(name);
            if !file.is_file() {
                continue;
            }
            let metadata: Metadata = serde_json::from_str(&fs::read_to_string(&file)?)?;
            if let Some(id) = metadata.eos_token_id.as_ref().and_then(token_id) {
                tracing::debug!("eos_token_id {} from {}", id, file.display());
                eos_token_id = Some(id);
                break;
            }
        }

        if eos_token_id.is_none() {
            tracing::warn!(
                "No eos_token_id found in {}; generating without pad_token_id",
                path.display()
            );
        }

        Ok(Self { path, eos_token_id })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn eos_token_id(&self) -> Option<u32> {
        self.eos_token_id
    }

    /// Model id for servers that serve the checkpoint by its path
    pub fn model_name(&self) -> String {
        self.path.display().to_string()
    }
}

/// `eos_token_id` is either a number or a list of numbers (first one wins)
fn token_id(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|id| u32::try_from(id).ok()),
        Value::Array(ids) => ids.first().and_then(token_id),
        _ => None,
    }
}
