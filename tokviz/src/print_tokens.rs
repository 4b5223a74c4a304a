use crossterm::style::{Color, Stylize};
use tokenizer::{color_for, inspect, Rgb, Token, TokenSequence, TokenView, EXAMPLE_PROMPTS};

fn term_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn label(token: &Token) -> &str {
    if token.text.is_empty() {
        "␣"
    } else {
        &token.text
    }
}

fn chip_text(token: &Token, show_ids: bool) -> String {
    if show_ids {
        format!("{}({})", label(token), token.id)
    } else {
        label(token).to_string()
    }
}

/// One token in its palette colors
fn chip(index: usize, token: &Token, show_ids: bool) -> String {
    let colors = color_for(index);
    chip_text(token, show_ids)
        .on(term_color(colors.background))
        .with(term_color(colors.foreground))
        .to_string()
}

pub fn print_tokens(tokens: &TokenSequence, show_ids: bool) {
    let line: String = tokens
        .iter()
        .enumerate()
        .map(|(i, token)| chip(i, token, show_ids))
        .collect::<Vec<_>>()
        .join(" ");
    println!("{}", line);
    println!("{} tokens", tokens.len());
}

pub fn print_json(tokens: &TokenSequence) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(tokens)?);
    Ok(())
}

fn inspection_line(index: usize, token: &Token) -> String {
    let inspection = inspect(token);
    format!(
        "{:>4}  {:>6}  {:<16}  {:<24}  {}",
        index,
        token.id,
        label(token),
        inspection.hex_bytes,
        inspection.codepoints
    )
}

pub fn print_inspection(tokens: &TokenSequence) {
    println!("{:>4}  {:>6}  {:<16}  {:<24}  {}", "#", "id", "text", "bytes", "codepoints");
    for (i, token) in tokens.iter().enumerate() {
        println!("{}", inspection_line(i, token));
    }
}

pub fn print_ids(tokens: TokenSequence) {
    let mut view = TokenView::new();
    view.replace_sequence(tokens);
    println!("{}", view.ids_text());
}

pub fn print_examples() {
    for (i, prompt) in EXAMPLE_PROMPTS.iter().enumerate() {
        println!("{}. {}: {}", i, prompt.title, prompt.preview());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_color_from_palette() {
        assert_eq!(
            term_color(color_for(0).background),
            Color::Rgb {
                r: 255,
                g: 248,
                b: 225
            }
        );
        assert_eq!(
            term_color(color_for(0).foreground),
            Color::Rgb {
                r: 245,
                g: 127,
                b: 23
            }
        );
    }

    #[test]
    fn test_chip_keeps_token_text() {
        assert!(chip(0, &Token::new(9906, "Hello"), false).contains("Hello"));
    }

    #[test]
    fn test_chip_text_with_id() {
        assert_eq!(chip_text(&Token::substituted(220, "·", " "), true), "·(220)");
        assert_eq!(chip_text(&Token::substituted(5, "", ""), false), "␣");
    }

    #[test]
    fn test_empty_token_label() {
        assert_eq!(label(&Token::substituted(5, "", "")), "␣");
    }

    #[test]
    fn test_inspection_line() {
        let line = inspection_line(3, &Token::new(2023, "Hello"));
        assert!(line.starts_with("   3    2023  Hello"));
        assert!(line.contains("48 65 6C 6C 6F"));
        assert!(line.ends_with("U+0048 U+0065 U+006C U+006C U+006F"));
    }
}
