//! Token pipeline for the tokenization visualizer
//!
//! Turns text into display-ready token records using an external
//! byte-pair-encoding engine, and derives the interactive view state
//! (colors, selection, hover, id export, byte inspection) from them.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

mod encoding;
mod format;
mod palette;
mod pipeline;
mod prompts;
mod token;
mod view;
mod vocab;

#[cfg(test)]
mod mock;

pub use encoding::{EncoderHandle, Encoding, EncodingResolver, TiktokenEncoding, TiktokenResolver};
pub use format::format_token;
pub use palette::{color_for, ColorPair, Rgb, PALETTE};
pub use pipeline::{Pipeline, RunTicket};
pub use prompts::{ExamplePrompt, EXAMPLE_PROMPTS};
pub use token::{Token, TokenSequence, ERROR_TOKEN_ID};
pub use view::{inspect, Inspection, TokenView, COPY_FEEDBACK_MS};
pub use vocab::{display_glyph, SpecialToken};

/// Configuration for encoder resolution and the encode step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Model whose encoding is tried first
    pub preferred_model: String,
    /// Encoding used when the preferred model cannot be resolved
    pub fallback_encoding: String,
    /// Upper bound for a single encode call, in milliseconds
    pub encode_timeout_ms: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            preferred_model: "gpt-4".to_string(),
            fallback_encoding: "cl100k_base".to_string(),
            encode_timeout_ms: None,
        }
    }
}

impl PipelineConfig {
    pub fn encode_timeout(&self) -> Option<Duration> {
        self.encode_timeout_ms.map(Duration::from_millis)
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// Errors reported by the tokenizer engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("failed to load {name}: {reason}")]
    Load { name: String, reason: String },

    #[error("token id {0} is outside the encoder's id range")]
    IdOutOfRange(i64),

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("decode failed: {0}")]
    Decode(String),
}

/// Errors that abort a whole pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("no tokenizer available (preferred: {preferred}; fallback: {fallback})")]
    EncoderUnavailable {
        preferred: EngineError,
        fallback: EngineError,
    },

    #[error(transparent)]
    Encode(EngineError),

    #[error("encoding timed out after {0:?}")]
    Timeout(Duration),

    #[error("encoding task failed: {0}")]
    Task(String),
}

/// Errors loading a [`PipelineConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
