//! Example inputs that show interesting segmentation

/// A titled example input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamplePrompt {
    pub title: &'static str,
    pub text: &'static str,
}

impl ExamplePrompt {
    /// Menu preview: the first 40 characters, with `...` if cut
    pub fn preview(&self) -> String {
        const PREVIEW_CHARS: usize = 40;
        let mut preview: String = self.text.chars().take(PREVIEW_CHARS).collect();
        if self.text.chars().count() > PREVIEW_CHARS {
            preview.push_str("...");
        }
        preview
    }
}

pub const EXAMPLE_PROMPTS: [ExamplePrompt; 6] = [
    ExamplePrompt {
        title: "Basic English",
        text: "The quick brown fox jumps over the lazy dog.",
    },
    ExamplePrompt {
        title: "Special Tokens",
        text: "<|endoftext|> <|fim_prefix|> <|fim_middle|> <|fim_suffix|>",
    },
    ExamplePrompt {
        title: "Numbers & Symbols",
        text: "In 2023, the price was $1,234.56 with a 15% discount!",
    },
    ExamplePrompt {
        title: "Code Snippet",
        text: "function calculateTokens(text) {\n  return tokenizer.encode(text).length;\n}",
    },
    ExamplePrompt {
        title: "Multilingual",
        text: "English: Hello\nSpanish: Hola\nFrench: Bonjour\nJapanese: こんにちは\nChinese: 你好",
    },
    ExamplePrompt {
        title: "Whitespace & Formatting",
        text: "This   text   has   multiple   spaces   and\n\ntwo line breaks.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_text() {
        let prompt = EXAMPLE_PROMPTS[0];
        assert_eq!(prompt.text.chars().count(), 44);
        assert_eq!(prompt.preview(), "The quick brown fox jumps over the lazy ...");
    }

    #[test]
    fn test_preview_exact_length_not_truncated() {
        let prompt = ExamplePrompt {
            title: "t",
            text: "0123456789012345678901234567890123456789",
        };
        assert_eq!(prompt.preview(), prompt.text);
    }

    #[test]
    fn test_preview_counts_chars_not_bytes() {
        let prompt = ExamplePrompt {
            title: "t",
            text: "こんにちは",
        };
        assert_eq!(prompt.preview(), "こんにちは");
    }

    #[test]
    fn test_titles_are_unique() {
        for (i, a) in EXAMPLE_PROMPTS.iter().enumerate() {
            for b in &EXAMPLE_PROMPTS[i + 1..] {
                assert_ne!(a.title, b.title);
            }
        }
    }
}
