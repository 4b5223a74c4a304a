//! HTML for the token view

use tokenizer::{inspect, Token, TokenView};

const EMPTY_TOKEN_GLYPH: &str = "␣";
const NONE_LABEL: &str = "(none)";

/// Escape HTML special characters
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn or_none(text: &str) -> &str {
    if text.is_empty() {
        NONE_LABEL
    } else {
        text
    }
}

/// Visible label of a token chip
pub fn token_label(token: &Token) -> &str {
    if token.text.is_empty() {
        EMPTY_TOKEN_GLYPH
    } else {
        &token.text
    }
}

/// One colored span per token, tagged with `data-index`
pub fn tokens_html(view: &TokenView) -> String {
    let mut html = String::new();
    for (index, token) in view.sequence().iter().enumerate() {
        let colors = view.color_for(index);
        let outline = if view.is_selected(index) {
            "outline: 2px solid #1976D2; outline-offset: 2px;"
        } else {
            ""
        };
        let badge = if view.show_ids() {
            format!(
                "<span class=\"token-id\" style=\"position: absolute; top: -14px; left: 50%; \
                transform: translateX(-50%); font-size: 0.6rem; background: #fff; padding: 0 4px; \
                border: 1px solid #ddd; border-radius: 4px;\">{}</span>",
                token.id
            )
        } else {
            String::new()
        };
        html.push_str(&format!(
            "<span class=\"token\" data-index=\"{}\" style=\"display: inline-block; position: relative; \
            background: {}; color: {}; padding: 2px 4px; margin: 2px; border-radius: 4px; \
            cursor: pointer; white-space: pre; {}\">{}{}</span>",
            index,
            colors.background,
            colors.foreground,
            outline,
            html_escape(token_label(token)),
            badge
        ));
    }
    html
}

fn detail_row(label: &str, value: &str) -> String {
    format!(
        "<div style=\"display: flex; gap: 8px;\">\
        <span style=\"color: #6b7280; min-width: 70px;\">{}</span>\
        <span style=\"font-family: monospace;\">{}</span></div>",
        label,
        html_escape(value)
    )
}

/// Hover card: text, id and codepoints
pub fn hover_details_html(token: &Token) -> String {
    let inspection = inspect(token);
    let text = if token.text.is_empty() { "(space)" } else { token.text.as_str() };
    format!(
        "<div style=\"font-weight: bold; margin-bottom: 6px;\">Token Details</div>{}{}{}",
        detail_row("Text:", text),
        detail_row("ID:", &token.id.to_string()),
        detail_row("Unicode:", or_none(&inspection.codepoints))
    )
}

/// Panel for the selected token: id and bytes
pub fn selected_details_html(token: &Token) -> String {
    let inspection = inspect(token);
    let text = if token.text.is_empty() { "(space)" } else { token.text.as_str() };
    format!(
        "<div style=\"font-weight: bold; margin-bottom: 6px;\">Selected Token: \
        <span style=\"font-family: monospace;\">{}</span></div>{}{}",
        html_escape(text),
        detail_row("Token ID:", &token.id.to_string()),
        detail_row("Bytes:", or_none(&inspection.hex_bytes))
    )
}

pub fn token_count_label(count: usize) -> String {
    format!("{} tokens", count)
}

pub fn copy_button_label(view: &TokenView, now_ms: f64) -> &'static str {
    if view.copy_feedback(now_ms) {
        "Copied!"
    } else {
        "Copy token IDs"
    }
}

pub fn show_ids_button_label(view: &TokenView) -> &'static str {
    if view.show_ids() {
        "Hide token IDs"
    } else {
        "Show token IDs"
    }
}
