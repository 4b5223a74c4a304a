//! Raw id to display token conversion

use crate::vocab::{display_glyph, SpecialToken};
use crate::{Encoding, EngineError, Token};
use tracing::error;

/// Build the display token for a single id
///
/// Special ids map to their literal names without touching the engine.
/// Everything else is decoded to bytes and read as lossy UTF-8, so broken
/// multi-byte fragments show as U+FFFD. Whitespace-only results get a
/// visible glyph while the decoded text stays available for inspection.
/// A decode error yields `[<id>]`; this never fails.
pub fn format_token(encoding: &dyn Encoding, id: i64) -> Token {
    if let Some(special) = SpecialToken::from_id(id) {
        return Token::new(id, special.as_str());
    }

    match decode_text(encoding, id) {
        Ok(text) => match display_glyph(&text) {
            Some(glyph) => Token::substituted(id, glyph, text),
            None => Token::new(id, text),
        },
        Err(err) => {
            error!(id, error = %err, "failed to decode token");
            Token::new(id, format!("[{}]", id))
        }
    }
}

fn decode_text(encoding: &dyn Encoding, id: i64) -> Result<String, EngineError> {
    let rank = u32::try_from(id).map_err(|_| EngineError::IdOutOfRange(id))?;
    let bytes = encoding.decode_bytes(&[rank])?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
