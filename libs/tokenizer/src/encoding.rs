//! Tokenizer engine adapters and the cached encoder handle

use crate::{EngineError, PipelineConfig, PipelineError};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;
use tiktoken_rs::CoreBPE;
use tracing::{info, warn};

/// A loaded byte-pair encoding
pub trait Encoding: Send + Sync {
    /// Name of the loaded variant
    fn name(&self) -> &str;

    /// Encode text to ids, recognising special tokens in the input
    fn encode(&self, text: &str) -> Result<Vec<u32>, EngineError>;

    /// Raw bytes for a run of ids
    fn decode_bytes(&self, ids: &[u32]) -> Result<Vec<u8>, EngineError>;
}

impl fmt::Debug for dyn Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoding").field("name", &self.name()).finish()
    }
}

/// Resolves encodings by model name or by encoding name
pub trait EncodingResolver: Send + Sync {
    fn resolve_model(&self, model: &str) -> Result<Arc<dyn Encoding>, EngineError>;

    fn resolve_encoding(&self, encoding: &str) -> Result<Arc<dyn Encoding>, EngineError>;
}

/// Marker in tiktoken's decode error when the ids are valid but the bytes
/// are not UTF-8
const INVALID_UTF8: &str = "valid UTF-8";

/// [`Encoding`] backed by tiktoken
pub struct TiktokenEncoding {
    name: String,
    bpe: CoreBPE,
}

impl TiktokenEncoding {
    pub fn new(name: impl Into<String>, bpe: CoreBPE) -> Self {
        Self {
            name: name.into(),
            bpe,
        }
    }
}

impl Encoding for TiktokenEncoding {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode(&self, text: &str) -> Result<Vec<u32>, EngineError> {
        Ok(self.bpe.encode_with_special_tokens(text))
    }

    fn decode_bytes(&self, ids: &[u32]) -> Result<Vec<u8>, EngineError> {
        match self.bpe.decode(ids.to_vec()) {
            Ok(text) => Ok(text.into_bytes()),
            // Every id is known but the bytes split a character; fetch them raw
            Err(err) if err.to_string().contains(INVALID_UTF8) => {
                Ok(self.bpe._decode_native_and_split(ids.to_vec()).flatten().collect())
            }
            Err(err) => Err(EngineError::Decode(err.to_string())),
        }
    }
}

/// Resolver for the encodings bundled with tiktoken
#[derive(Debug, Clone, Copy, Default)]
pub struct TiktokenResolver;

impl EncodingResolver for TiktokenResolver {
    fn resolve_model(&self, model: &str) -> Result<Arc<dyn Encoding>, EngineError> {
        let bpe = tiktoken_rs::get_bpe_from_model(model).map_err(|e| EngineError::Load {
            name: model.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Arc::new(TiktokenEncoding::new(model, bpe)))
    }

    fn resolve_encoding(&self, encoding: &str) -> Result<Arc<dyn Encoding>, EngineError> {
        let loaded = match encoding {
            "cl100k_base" => tiktoken_rs::cl100k_base(),
            "o200k_base" => tiktoken_rs::o200k_base(),
            "p50k_base" => tiktoken_rs::p50k_base(),
            "p50k_edit" => tiktoken_rs::p50k_edit(),
            "r50k_base" => tiktoken_rs::r50k_base(),
            other => return Err(EngineError::UnknownEncoding(other.to_string())),
        };
        let bpe = loaded.map_err(|e| EngineError::Load {
            name: encoding.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Arc::new(TiktokenEncoding::new(encoding, bpe)))
    }
}

/// Lazily resolved encoding, initialised at most once per handle
///
/// The preferred model is tried first and the fallback encoding second.
/// A failed resolution caches nothing, so the next [`acquire`](Self::acquire)
/// tries both again. Concurrent first calls are safe: exactly one
/// resolution wins and every caller sees the same instance.
pub struct EncoderHandle {
    resolver: Arc<dyn EncodingResolver>,
    preferred_model: String,
    fallback_encoding: String,
    encoding: OnceCell<Arc<dyn Encoding>>,
}

impl EncoderHandle {
    pub fn new(resolver: Arc<dyn EncodingResolver>, config: &PipelineConfig) -> Self {
        Self {
            resolver,
            preferred_model: config.preferred_model.clone(),
            fallback_encoding: config.fallback_encoding.clone(),
            encoding: OnceCell::new(),
        }
    }

    /// Handle resolving through tiktoken
    pub fn tiktoken(config: &PipelineConfig) -> Self {
        Self::new(Arc::new(TiktokenResolver), config)
    }

    /// Return the cached encoding, resolving it on first use
    pub fn acquire(&self) -> Result<Arc<dyn Encoding>, PipelineError> {
        self.encoding
            .get_or_try_init(|| self.resolve())
            .map(Arc::clone)
    }

    /// Whether an encoding has been resolved and cached
    pub fn is_loaded(&self) -> bool {
        self.encoding.get().is_some()
    }

    /// Name of the cached encoding, if any
    pub fn loaded_name(&self) -> Option<&str> {
        self.encoding.get().map(|encoding| encoding.name())
    }

    fn resolve(&self) -> Result<Arc<dyn Encoding>, PipelineError> {
        let preferred = match self.resolver.resolve_model(&self.preferred_model) {
            Ok(encoding) => {
                info!(model = %self.preferred_model, "loaded tokenizer");
                return Ok(encoding);
            }
            Err(err) => err,
        };

        warn!(
            model = %self.preferred_model,
            fallback = %self.fallback_encoding,
            error = %preferred,
            "preferred tokenizer unavailable, falling back"
        );

        match self.resolver.resolve_encoding(&self.fallback_encoding) {
            Ok(encoding) => {
                info!(encoding = %self.fallback_encoding, "loaded tokenizer");
                Ok(encoding)
            }
            Err(fallback) => Err(PipelineError::EncoderUnavailable {
                preferred,
                fallback,
            }),
        }
    }
}

impl fmt::Debug for EncoderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderHandle")
            .field("preferred_model", &self.preferred_model)
            .field("fallback_encoding", &self.fallback_encoding)
            .field("loaded", &self.loaded_name())
            .finish()
    }
}
