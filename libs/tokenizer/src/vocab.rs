//! Reserved ids and display substitutions

use serde::{Deserialize, Serialize};
use tiktoken_rs::{ENDOFPROMPT, ENDOFTEXT, FIM_MIDDLE, FIM_PREFIX, FIM_SUFFIX};

/// Special tokens of the cl100k vocabulary, shown by name instead of decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialToken {
    /// Document boundary
    EndOfText,
    /// Fill-in-the-middle prefix marker
    FimPrefix,
    /// Fill-in-the-middle middle marker
    FimMiddle,
    /// Fill-in-the-middle suffix marker
    FimSuffix,
    /// End of prompt
    EndOfPrompt,
}

impl SpecialToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialToken::EndOfText => ENDOFTEXT,
            SpecialToken::FimPrefix => FIM_PREFIX,
            SpecialToken::FimMiddle => FIM_MIDDLE,
            SpecialToken::FimSuffix => FIM_SUFFIX,
            SpecialToken::EndOfPrompt => ENDOFPROMPT,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            SpecialToken::EndOfText => 100257,
            SpecialToken::FimPrefix => 100258,
            SpecialToken::FimMiddle => 100259,
            SpecialToken::FimSuffix => 100260,
            SpecialToken::EndOfPrompt => 100276,
        }
    }

    pub fn all() -> [SpecialToken; 5] {
        [
            SpecialToken::EndOfText,
            SpecialToken::FimPrefix,
            SpecialToken::FimMiddle,
            SpecialToken::FimSuffix,
            SpecialToken::EndOfPrompt,
        ]
    }

    /// Look up the special token reserved for `id`
    pub fn from_id(id: i64) -> Option<SpecialToken> {
        Self::all().into_iter().find(|special| special.id() == id)
    }
}

/// Visible placeholder for decoded text that would otherwise render blank
pub fn display_glyph(text: &str) -> Option<&'static str> {
    match text {
        " " => Some("·"),
        "\n" => Some("↵"),
        "\t" => Some("→"),
        "" => Some("␣"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_token_strings() {
        assert_eq!(SpecialToken::EndOfText.as_str(), "<|endoftext|>");
        assert_eq!(SpecialToken::FimPrefix.as_str(), "<|fim_prefix|>");
        assert_eq!(SpecialToken::FimMiddle.as_str(), "<|fim_middle|>");
        assert_eq!(SpecialToken::FimSuffix.as_str(), "<|fim_suffix|>");
        assert_eq!(SpecialToken::EndOfPrompt.as_str(), "<|endofprompt|>");
    }

    #[test]
    fn test_special_ids_match_cl100k() {
        let bpe = tiktoken_rs::cl100k_base().unwrap();
        for special in SpecialToken::all() {
            let ids = bpe.encode_with_special_tokens(special.as_str());
            assert_eq!(ids, vec![special.id() as u32], "{}", special.as_str());
        }
    }

    #[test]
    fn test_from_id_roundtrips_every_special() {
        for special in SpecialToken::all() {
            assert_eq!(SpecialToken::from_id(special.id()), Some(special));
        }
    }

    #[test]
    fn test_from_id_unknown() {
        assert_eq!(SpecialToken::from_id(0), None);
        assert_eq!(SpecialToken::from_id(100261), None);
        assert_eq!(SpecialToken::from_id(-1), None);
    }

    #[test]
    fn test_display_glyphs() {
        assert_eq!(display_glyph(" "), Some("·"));
        assert_eq!(display_glyph("\n"), Some("↵"));
        assert_eq!(display_glyph("\t"), Some("→"));
        assert_eq!(display_glyph(""), Some("␣"));
    }

    #[test]
    fn test_display_glyph_requires_exact_match() {
        assert_eq!(display_glyph("  "), None);
        assert_eq!(display_glyph(" the"), None);
        assert_eq!(display_glyph("\n\n"), None);
    }
}
