//! Interactive view state over a token sequence

use crate::palette::{color_for, ColorPair};
use crate::{Token, TokenSequence};
use serde::Serialize;

/// How long the "copied" acknowledgement stays visible, in milliseconds
pub const COPY_FEEDBACK_MS: f64 = 2000.0;

/// Byte and codepoint breakdown of a token's decoded text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inspection {
    /// UTF-8 bytes as uppercase hex, space separated
    pub hex_bytes: String,
    /// Codepoints as `U+XXXX`, space separated
    pub codepoints: String,
}

/// Inspect the logical (pre-substitution) text of `token`
pub fn inspect(token: &Token) -> Inspection {
    let text = token.logical_text();
    let hex_bytes = text
        .bytes()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ");
    let codepoints = text
        .chars()
        .map(|c| format!("U+{:04X}", c as u32))
        .collect::<Vec<_>>()
        .join(" ");
    Inspection {
        hex_bytes,
        codepoints,
    }
}

/// Presentation state derived from the current token sequence
///
/// Token data is never modified here. Selection and hover belong to the
/// current sequence and reset when it is replaced; the id toggle is a user
/// preference and survives. Times are caller-supplied milliseconds so the
/// same logic runs under a browser clock or a test clock.
#[derive(Debug, Clone, Default)]
pub struct TokenView {
    sequence: TokenSequence,
    selected_id: Option<i64>,
    hover_index: Option<usize>,
    show_ids: bool,
    copied_until: Option<f64>,
}

impl TokenView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the result of a new run
    pub fn replace_sequence(&mut self, sequence: TokenSequence) {
        self.sequence = sequence;
        self.selected_id = None;
        self.hover_index = None;
    }

    pub fn sequence(&self) -> &TokenSequence {
        &self.sequence
    }

    pub fn token_count(&self) -> usize {
        self.sequence.len()
    }

    pub fn color_for(&self, index: usize) -> ColorPair {
        color_for(index)
    }

    /// Select `id`, or clear the selection if `id` is already selected
    pub fn toggle_select(&mut self, id: i64) {
        self.selected_id = match self.selected_id {
            Some(current) if current == id => None,
            _ => Some(id),
        };
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected_id
    }

    /// Whether the token at `index` shares the selected id
    pub fn is_selected(&self, index: usize) -> bool {
        match (self.selected_id, self.sequence.get(index)) {
            (Some(id), Some(token)) => token.id == id,
            _ => false,
        }
    }

    /// First token carrying the selected id
    pub fn selected_token(&self) -> Option<&Token> {
        let id = self.selected_id?;
        self.sequence.iter().find(|token| token.id == id)
    }

    /// Point at the token at `index`, or at nothing
    ///
    /// Indices outside the sequence clear the hover.
    pub fn set_hover(&mut self, index: Option<usize>) {
        self.hover_index = index.filter(|&i| i < self.sequence.len());
    }

    pub fn hover_index(&self) -> Option<usize> {
        self.hover_index
    }

    pub fn hover_token(&self) -> Option<&Token> {
        self.hover_index.and_then(|i| self.sequence.get(i))
    }

    /// Flip id visibility and return the new value
    pub fn toggle_show_ids(&mut self) -> bool {
        self.show_ids = !self.show_ids;
        self.show_ids
    }

    pub fn show_ids(&self) -> bool {
        self.show_ids
    }

    /// Ids joined by `", "`, in sequence order
    pub fn ids_text(&self) -> String {
        self.sequence
            .ids()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Export the ids for copying and start the acknowledgement timer
    pub fn export_ids(&mut self, now_ms: f64) -> String {
        self.copied_until = Some(now_ms + COPY_FEEDBACK_MS);
        self.ids_text()
    }

    /// Whether the acknowledgement is still showing at `now_ms`
    pub fn copy_feedback(&self, now_ms: f64) -> bool {
        self.copied_until.is_some_and(|until| now_ms < until)
    }

    pub fn clear_copy_feedback(&mut self) {
        self.copied_until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scenario_view() -> TokenView {
        let sequence: TokenSequence = [
            (101, "[CLS]"),
            (2023, "Hello"),
            (2003, " world"),
            (1037, "!"),
            (4937, "?"),
            (102, "[SEP]"),
        ]
        .into_iter()
        .map(|(id, text)| Token::new(id, text))
        .collect();
        let mut view = TokenView::new();
        view.replace_sequence(sequence);
        view
    }

    fn repeated_view() -> TokenView {
        let sequence: TokenSequence = vec![
            Token::new(464, "The"),
            Token::substituted(220, "·", " "),
            Token::new(464, "The"),
        ]
        .into_iter()
        .collect();
        let mut view = TokenView::new();
        view.replace_sequence(sequence);
        view
    }

    #[test]
    fn test_export_ids_scenario() {
        let mut view = scenario_view();
        assert_eq!(view.export_ids(0.0), "101, 2023, 2003, 1037, 4937, 102");
    }

    #[test]
    fn test_export_empty_sequence() {
        let mut view = TokenView::new();
        assert_eq!(view.export_ids(0.0), "");
    }

    #[test]
    fn test_copy_feedback_expires() {
        let mut view = scenario_view();
        assert!(!view.copy_feedback(0.0));

        view.export_ids(1_000.0);
        assert!(view.copy_feedback(1_000.0));
        assert!(view.copy_feedback(2_999.0));
        assert!(!view.copy_feedback(3_000.0));
    }

    #[test]
    fn test_clear_copy_feedback() {
        let mut view = scenario_view();
        view.export_ids(0.0);
        view.clear_copy_feedback();
        assert!(!view.copy_feedback(1.0));
    }

    #[test]
    fn test_toggle_select_twice_clears() {
        let mut view = scenario_view();
        view.toggle_select(2023);
        assert_eq!(view.selected_id(), Some(2023));
        view.toggle_select(2023);
        assert_eq!(view.selected_id(), None);
    }

    #[test]
    fn test_toggle_select_other_id_switches() {
        let mut view = scenario_view();
        view.toggle_select(2023);
        view.toggle_select(102);
        assert_eq!(view.selected_id(), Some(102));
        assert_eq!(view.selected_token().unwrap().text, "[SEP]");
    }

    #[test]
    fn test_selection_highlights_every_occurrence() {
        let mut view = repeated_view();
        view.toggle_select(464);
        assert!(view.is_selected(0));
        assert!(!view.is_selected(1));
        assert!(view.is_selected(2));
        assert!(!view.is_selected(3));
    }

    #[test]
    fn test_hover_by_position() {
        let mut view = repeated_view();
        view.set_hover(Some(2));
        assert_eq!(view.hover_index(), Some(2));
        assert_eq!(view.hover_token().unwrap().id, 464);

        view.set_hover(None);
        assert!(view.hover_token().is_none());
    }

    #[test]
    fn test_hover_out_of_range_clears() {
        let mut view = repeated_view();
        view.set_hover(Some(1));
        view.set_hover(Some(3));
        assert_eq!(view.hover_index(), None);
    }

    #[test]
    fn test_hover_and_selection_coexist() {
        let mut view = scenario_view();
        view.toggle_select(101);
        view.set_hover(Some(4));
        assert_eq!(view.selected_id(), Some(101));
        assert_eq!(view.hover_token().unwrap().id, 4937);
    }

    #[test]
    fn test_replace_sequence_keeps_show_ids_only() {
        let mut view = scenario_view();
        assert!(view.toggle_show_ids());
        view.toggle_select(2023);
        view.set_hover(Some(1));

        view.replace_sequence(repeated_view().sequence().clone());
        assert!(view.show_ids());
        assert_eq!(view.selected_id(), None);
        assert_eq!(view.hover_index(), None);
        assert_eq!(view.token_count(), 3);
    }

    #[test]
    fn test_toggle_show_ids() {
        let mut view = TokenView::new();
        assert!(!view.show_ids());
        assert!(view.toggle_show_ids());
        assert!(!view.toggle_show_ids());
    }

    #[test]
    fn test_view_colors_follow_position() {
        let view = repeated_view();
        // Same id, different positions
        assert_ne!(view.color_for(0), view.color_for(2));
        assert_eq!(view.color_for(0), color_for(0));
    }

    #[test]
    fn test_inspect_ascii() {
        let inspection = inspect(&Token::new(2023, "Hello"));
        assert_eq!(inspection.hex_bytes, "48 65 6C 6C 6F");
        assert_eq!(inspection.codepoints, "U+0048 U+0065 U+006C U+006C U+006F");
    }

    #[test]
    fn test_inspect_uses_logical_text() {
        let inspection = inspect(&Token::substituted(220, "·", " "));
        assert_eq!(inspection.hex_bytes, "20");
        assert_eq!(inspection.codepoints, "U+0020");

        let inspection = inspect(&Token::substituted(198, "↵", "\n"));
        assert_eq!(inspection.codepoints, "U+000A");
    }

    #[test]
    fn test_inspect_astral_codepoint_not_split() {
        let inspection = inspect(&Token::new(9, "😀"));
        assert_eq!(inspection.hex_bytes, "F0 9F 98 80");
        assert_eq!(inspection.codepoints, "U+1F600");
    }

    #[test]
    fn test_inspect_multibyte() {
        let inspection = inspect(&Token::new(9, "こん"));
        assert_eq!(inspection.hex_bytes, "E3 81 93 E3 82 93");
        assert_eq!(inspection.codepoints, "U+3053 U+3093");
    }

    #[test]
    fn test_inspect_empty() {
        let inspection = inspect(&Token::substituted(5, "␣", ""));
        assert_eq!(inspection.hex_bytes, "");
        assert_eq!(inspection.codepoints, "");
    }

    proptest! {
        #[test]
        fn prop_toggle_select_twice_clears(id in -1i64..200_000) {
            let mut view = scenario_view();
            view.toggle_select(id);
            prop_assert_eq!(view.selected_id(), Some(id));
            view.toggle_select(id);
            prop_assert_eq!(view.selected_id(), None);
        }

        #[test]
        fn prop_inspect_one_codepoint_per_char(text in "\\PC{0,16}") {
            let inspection = inspect(&Token::new(0, text.clone()));
            let count = inspection.codepoints.split_whitespace().count();
            prop_assert_eq!(count, text.chars().count());
        }
    }
}
