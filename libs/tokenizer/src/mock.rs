//! In-memory tokenizer engine for tests

use crate::{Encoding, EncodingResolver, EngineError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Ids returned for every input by [`MockEncoding::scenario`]
pub const SCENARIO_IDS: [u32; 6] = [101, 2023, 2003, 1037, 4937, 102];

/// Encoding with a fixed id sequence and a byte table
pub struct MockEncoding {
    name: String,
    ids: Vec<u32>,
    bytes: HashMap<u32, Vec<u8>>,
    failing: Vec<u32>,
    fail_encode: bool,
    encode_calls: AtomicUsize,
    decode_calls: AtomicUsize,
}

impl MockEncoding {
    pub fn new(name: &str, ids: Vec<u32>) -> Self {
        Self {
            name: name.to_string(),
            ids,
            bytes: HashMap::new(),
            failing: Vec::new(),
            fail_encode: false,
            encode_calls: AtomicUsize::new(0),
            decode_calls: AtomicUsize::new(0),
        }
    }

    /// "Hello world!" as `[CLS] Hello ␠world ! ? [SEP]`
    pub fn scenario(name: &str) -> Self {
        Self::new(name, SCENARIO_IDS.to_vec())
            .with_bytes(101, b"[CLS]")
            .with_bytes(2023, b"Hello")
            .with_bytes(2003, b" world")
            .with_bytes(1037, b"!")
            .with_bytes(102, b"[SEP]")
    }

    pub fn with_bytes(mut self, id: u32, bytes: &[u8]) -> Self {
        self.bytes.insert(id, bytes.to_vec());
        self
    }

    /// Make decoding of `id` fail
    pub fn failing_decode(mut self, id: u32) -> Self {
        self.failing.push(id);
        self
    }

    /// Make every encode call fail
    pub fn failing_encode(mut self) -> Self {
        self.fail_encode = true;
        self
    }

    pub fn encode_calls(&self) -> usize {
        self.encode_calls.load(Ordering::SeqCst)
    }

    pub fn decode_calls(&self) -> usize {
        self.decode_calls.load(Ordering::SeqCst)
    }
}

impl Encoding for MockEncoding {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode(&self, _text: &str) -> Result<Vec<u32>, EngineError> {
        self.encode_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_encode {
            return Err(EngineError::Encode("mock encoder failure".to_string()));
        }
        Ok(self.ids.clone())
    }

    fn decode_bytes(&self, ids: &[u32]) -> Result<Vec<u8>, EngineError> {
        self.decode_calls.fetch_add(1, Ordering::SeqCst);
        let mut out = Vec::new();
        for id in ids {
            if self.failing.contains(id) {
                return Err(EngineError::Decode(format!("invalid token for decoding: {}", id)));
            }
            // Unknown ids decode to "?"
            out.extend(self.bytes.get(id).map(Vec::as_slice).unwrap_or(b"?".as_slice()));
        }
        Ok(out)
    }
}

/// Resolver that serves fixed encodings and counts calls
pub struct MockResolver {
    model: Option<Arc<MockEncoding>>,
    encoding: Option<Arc<MockEncoding>>,
    failures_left: AtomicUsize,
    model_calls: AtomicUsize,
    encoding_calls: AtomicUsize,
}

impl MockResolver {
    pub fn new(model: Option<MockEncoding>, encoding: Option<MockEncoding>) -> Self {
        Self {
            model: model.map(Arc::new),
            encoding: encoding.map(Arc::new),
            failures_left: AtomicUsize::new(0),
            model_calls: AtomicUsize::new(0),
            encoding_calls: AtomicUsize::new(0),
        }
    }

    /// Resolver where both paths fail
    pub fn unavailable() -> Self {
        Self::new(None, None)
    }

    /// Fail the first `n` fallback resolutions even if an encoding is configured
    pub fn failing_first(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    pub fn model_calls(&self) -> usize {
        self.model_calls.load(Ordering::SeqCst)
    }

    pub fn encoding_calls(&self) -> usize {
        self.encoding_calls.load(Ordering::SeqCst)
    }

    /// The encoding served for the preferred model or the fallback
    pub fn served(&self) -> Option<Arc<MockEncoding>> {
        self.model.clone().or_else(|| self.encoding.clone())
    }
}

impl EncodingResolver for MockResolver {
    fn resolve_model(&self, model: &str) -> Result<Arc<dyn Encoding>, EngineError> {
        self.model_calls.fetch_add(1, Ordering::SeqCst);
        match &self.model {
            Some(encoding) => Ok(encoding.clone()),
            None => Err(EngineError::UnknownModel(model.to_string())),
        }
    }

    fn resolve_encoding(&self, encoding: &str) -> Result<Arc<dyn Encoding>, EngineError> {
        self.encoding_calls.fetch_add(1, Ordering::SeqCst);
        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        match &self.encoding {
            Some(served) if !should_fail => Ok(served.clone()),
            _ => Err(EngineError::UnknownEncoding(encoding.to_string())),
        }
    }
}
