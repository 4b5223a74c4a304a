//! Text to token sequence

use crate::format::format_token;
use crate::vocab::SpecialToken;
use crate::{EncoderHandle, Encoding, PipelineConfig, PipelineError, Token, TokenSequence};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Generation number handed out when a run starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunTicket(u64);

impl RunTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Tokenization entry point
///
/// Owns the encoder handle. Failures are reported as a sequence holding
/// one error token (id `-1`), so callers can render results uniformly.
#[derive(Debug)]
pub struct Pipeline {
    handle: EncoderHandle,
    // Only enforced with the `tokio` feature
    #[cfg_attr(not(feature = "tokio"), allow(dead_code))]
    encode_timeout: Option<Duration>,
    generation: AtomicU64,
}

impl Pipeline {
    pub fn new(handle: EncoderHandle, config: &PipelineConfig) -> Self {
        Self {
            handle,
            encode_timeout: config.encode_timeout(),
            generation: AtomicU64::new(0),
        }
    }

    /// Pipeline resolving through tiktoken
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(EncoderHandle::tiktoken(config), config)
    }

    pub fn handle(&self) -> &EncoderHandle {
        &self.handle
    }

    /// Tokenize `text`, projecting any failure to the error token
    pub async fn tokenize(&self, text: &str) -> TokenSequence {
        match self.try_tokenize(text).await {
            Ok(sequence) => sequence,
            Err(err) => {
                error!(error = %err, "tokenization failed");
                TokenSequence::from_error(&err)
            }
        }
    }

    /// Tokenize `text`, keeping the failure reason
    ///
    /// Empty input yields an empty sequence without touching the encoder.
    pub async fn try_tokenize(&self, text: &str) -> Result<TokenSequence, PipelineError> {
        if text.is_empty() {
            return Ok(TokenSequence::empty());
        }

        let encoding = self.handle.acquire()?;
        let ids = self.encode(Arc::clone(&encoding), text).await?;
        debug!(?ids, "raw token ids");

        Ok(ids
            .into_iter()
            .map(|id| format_token(encoding.as_ref(), i64::from(id)))
            .collect())
    }

    /// Start a run, invalidating every earlier ticket
    pub fn begin_run(&self) -> RunTicket {
        RunTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no run has started since `ticket` was issued
    pub fn is_current(&self, ticket: RunTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Tokenize `text` unless a newer run starts before this one finishes
    ///
    /// Returns `None` for a superseded run, so a slow earlier result can
    /// never replace a newer one.
    pub async fn tokenize_latest(&self, text: &str) -> Option<TokenSequence> {
        let ticket = self.begin_run();
        let sequence = self.tokenize(text).await;
        if self.is_current(ticket) {
            Some(sequence)
        } else {
            debug!(generation = ticket.generation(), "discarding stale tokenization");
            None
        }
    }

    /// Format a single id with the cached encoder
    ///
    /// Special ids never need the encoder. Without one, other ids keep
    /// their id and show as `[<id>]`.
    pub fn format_token(&self, id: i64) -> Token {
        if let Some(special) = SpecialToken::from_id(id) {
            return Token::new(id, special.as_str());
        }
        match self.handle.acquire() {
            Ok(encoding) => format_token(encoding.as_ref(), id),
            Err(err) => {
                error!(id, error = %err, "no encoder to format token");
                Token::new(id, format!("[{}]", id))
            }
        }
    }

    #[cfg(feature = "tokio")]
    async fn encode(&self, encoding: Arc<dyn Encoding>, text: &str) -> Result<Vec<u32>, PipelineError> {
        let Some(limit) = self.encode_timeout else {
            return encoding.encode(text).map_err(PipelineError::Encode);
        };

        let owned = text.to_owned();
        let task = tokio::task::spawn_blocking(move || encoding.encode(&owned));
        match tokio::time::timeout(limit, task).await {
            Ok(Ok(ids)) => ids.map_err(PipelineError::Encode),
            Ok(Err(join)) => Err(PipelineError::Task(join.to_string())),
            Err(_) => Err(PipelineError::Timeout(limit)),
        }
    }

    #[cfg(not(feature = "tokio"))]
    async fn encode(&self, encoding: Arc<dyn Encoding>, text: &str) -> Result<Vec<u32>, PipelineError> {
        encoding.encode(text).map_err(PipelineError::Encode)
    }
}
