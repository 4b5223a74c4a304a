//! Token records and the immutable sequence produced by one pipeline run

use crate::PipelineError;
use serde::{Deserialize, Serialize};

/// Id carried by the synthetic token that reports a failed run
pub const ERROR_TOKEN_ID: i64 = -1;

/// A single display-ready token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Raw id assigned by the tokenizer engine
    pub id: i64,
    /// Display text, after special-token and whitespace substitution
    pub text: String,
    /// Same as `id`
    pub value: i64,
    /// Decoded text before display substitution
    #[serde(skip)]
    logical: String,
}

impl Token {
    /// Token whose display text is also its logical text
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id,
            logical: text.clone(),
            text,
            value: id,
        }
    }

    /// Token whose display text differs from the decoded text
    pub fn substituted(id: i64, display: impl Into<String>, logical: impl Into<String>) -> Self {
        Self {
            id,
            text: display.into(),
            value: id,
            logical: logical.into(),
        }
    }

    /// Synthetic token describing a failed run
    pub fn error(err: &PipelineError) -> Self {
        Self::new(ERROR_TOKEN_ID, format!("Error: {}", err))
    }

    /// Text used for byte and codepoint inspection
    pub fn logical_text(&self) -> &str {
        &self.logical
    }

    pub fn is_error(&self) -> bool {
        self.id == ERROR_TOKEN_ID
    }
}

/// Ordered tokens of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSequence {
    tokens: Vec<Token>,
}

impl TokenSequence {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Single-token sequence carrying the failure message
    pub fn from_error(err: &PipelineError) -> Self {
        Self {
            tokens: vec![Token::error(err)],
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// True when the run failed and this holds only the error token
    pub fn is_error(&self) -> bool {
        matches!(self.tokens.as_slice(), [only] if only.is_error())
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.tokens.iter().map(|t| t.id)
    }
}

impl FromIterator<Token> for TokenSequence {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TokenSequence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
