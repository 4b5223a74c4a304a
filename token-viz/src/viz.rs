//! Browser front end: input panel, token view and event wiring

use crate::input::{InputState, InputStore, LocalStorageStore, MemoryStore, StoreError};
use crate::render::{
    copy_button_label, hover_details_html, selected_details_html, show_ids_button_label,
    token_count_label, tokens_html,
};
use std::cell::RefCell;
use std::rc::Rc;
use tokenizer::{
    Pipeline, PipelineConfig, TokenSequence, TokenView, COPY_FEEDBACK_MS, EXAMPLE_PROMPTS,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlElement, HtmlOptionElement, HtmlSelectElement,
    HtmlTextAreaElement, KeyboardEvent,
};

// Color palette
const PAGE_BG: &str = "#f5f7fa";
const PANEL_BG: &str = "#ffffff";
const BORDER_COLOR: &str = "#e0e0e0";
const ACCENT_COLOR: &str = "#1976D2";
const TEXT_COLOR: &str = "#1f2933";
const TEXT_DIM: &str = "#6b7280";

/// Delay between the last keystroke and the tokenization it triggers
const DEBOUNCE_MS: i32 = 150;

/// Application state
pub(crate) struct AppState {
    pub(crate) input: InputState,
    pub(crate) view: TokenView,
    pub(crate) pipeline: Rc<Pipeline>,
    pub(crate) processing: bool,
}

impl AppState {
    pub(crate) fn new(input: InputState, pipeline: Pipeline) -> Self {
        Self {
            input,
            view: TokenView::new(),
            pipeline: Rc::new(pipeline),
            processing: false,
        }
    }

    /// Empty the input and drop the shown result along with any run in flight
    pub(crate) fn clear(&mut self) -> Result<(), StoreError> {
        self.pipeline.begin_run();
        self.processing = false;
        self.view.replace_sequence(TokenSequence::empty());
        self.input.clear()
    }
}

thread_local! {
    static STATE: RefCell<Option<AppState>> = const { RefCell::new(None) };
    static DEBOUNCE_HANDLE: RefCell<Option<i32>> = const { RefCell::new(None) };
}

/// Initialize the visualization
pub fn init() -> Result<(), JsValue> {
    log("Initializing tokenization visualizer");

    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    let store: Box<dyn InputStore> = match LocalStorageStore::open() {
        Some(store) => Box::new(store),
        None => {
            warn("localStorage unavailable, input will not be kept");
            Box::new(MemoryStore::new())
        }
    };
    let input = InputState::mount(store);
    let restored = input.text().to_string();

    let state = AppState::new(input, Pipeline::from_config(&PipelineConfig::default()));
    STATE.with(|s| *s.borrow_mut() = Some(state));

    create_ui(&document, &restored)?;
    update_input_stats();

    if !restored.trim().is_empty() {
        run_tokenization(restored);
    }

    Ok(())
}

/// Tokenize `text` and return the tokens as a JSON array of `{id, text, value}`
#[wasm_bindgen]
pub async fn tokenize(text: String) -> Result<JsValue, JsValue> {
    let pipeline = STATE
        .with(|s| s.borrow().as_ref().map(|state| Rc::clone(&state.pipeline)))
        .unwrap_or_else(|| Rc::new(Pipeline::from_config(&PipelineConfig::default())));
    let tokens = pipeline.tokenize(&text).await;
    let json = serde_json::to_string(&tokens).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(JsValue::from_str(&json))
}

/// Create the input panel and the result card
fn create_ui(document: &Document, restored: &str) -> Result<(), JsValue> {
    let body = document.body().ok_or("No body")?;
    body.set_attribute(
        "style",
        &format!(
            "margin: 0; background: {}; color: {}; font-family: system-ui, sans-serif;",
            PAGE_BG, TEXT_COLOR
        ),
    )?;

    let container: HtmlElement = document.create_element("div")?.dyn_into()?;
    container.set_attribute(
        "style",
        "max-width: 960px; margin: 0 auto; padding: 32px 16px; display: flex; flex-direction: column; gap: 24px;",
    )?;

    let title: HtmlElement = document.create_element("h1")?.dyn_into()?;
    title.set_inner_text("Tokenization Visualizer");
    title.set_attribute("style", "margin: 0; text-align: center; font-size: 28px;")?;
    container.append_child(&title)?;

    let subtitle: HtmlElement = document.create_element("p")?.dyn_into()?;
    subtitle.set_inner_text(
        "Explore how language models break text into tokens, using the GPT-4 (cl100k_base) encoding.",
    );
    subtitle.set_attribute(
        "style",
        &format!("margin: 0; text-align: center; color: {};", TEXT_DIM),
    )?;
    container.append_child(&subtitle)?;

    container.append_child(&(create_input_panel(document, restored)? as HtmlElement))?;
    container.append_child(&(create_result_panel(document)? as HtmlElement))?;

    body.append_child(&container)?;
    Ok(())
}

fn panel(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    let panel: HtmlElement = document.create_element("div")?.dyn_into()?;
    panel.set_id(id);
    panel.set_attribute(
        "style",
        &format!(
            "background: {}; border: 1px solid {}; border-radius: 8px; padding: 16px; \
            display: flex; flex-direction: column; gap: 12px;",
            PANEL_BG, BORDER_COLOR
        ),
    )?;
    Ok(panel)
}

fn row(document: &Document) -> Result<HtmlElement, JsValue> {
    let row: HtmlElement = document.create_element("div")?.dyn_into()?;
    row.set_attribute(
        "style",
        "display: flex; align-items: center; justify-content: space-between; gap: 8px; flex-wrap: wrap;",
    )?;
    Ok(row)
}

fn chip(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    let chip: HtmlElement = document.create_element("span")?.dyn_into()?;
    chip.set_id(id);
    chip.set_attribute(
        "style",
        &format!(
            "font-size: 12px; padding: 2px 8px; border: 1px solid {}; border-radius: 12px; color: {};",
            BORDER_COLOR, TEXT_DIM
        ),
    )?;
    Ok(chip)
}

fn create_button(document: &Document, text: &str, id: &str) -> Result<HtmlButtonElement, JsValue> {
    let btn: HtmlButtonElement = document.create_element("button")?.dyn_into()?;
    btn.set_id(id);
    btn.set_inner_text(text);
    btn.set_attribute(
        "style",
        &format!(
            "padding: 6px 12px; font-size: 13px; cursor: pointer; border-radius: 4px; \
            border: 1px solid {}; background: {}; color: {};",
            BORDER_COLOR, PANEL_BG, TEXT_COLOR
        ),
    )?;
    Ok(btn)
}

fn on_click(element: &HtmlElement, handler: fn()) {
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn Fn()>);
    element.set_onclick(Some(closure.as_ref().unchecked_ref()));
    closure.forget();
}

fn create_input_panel(document: &Document, restored: &str) -> Result<HtmlElement, JsValue> {
    let panel = panel(document, "input-panel")?;

    let header = row(document)?;
    let heading: HtmlElement = document.create_element("h2")?.dyn_into()?;
    heading.set_inner_text("Input Text");
    heading.set_attribute("style", "margin: 0; font-size: 18px;")?;
    header.append_child(&heading)?;

    let actions = row(document)?;

    // Example prompts
    let examples: HtmlSelectElement = document.create_element("select")?.dyn_into()?;
    examples.set_id("examples-select");
    let placeholder: HtmlOptionElement = document.create_element("option")?.dyn_into()?;
    placeholder.set_text("Example prompts");
    placeholder.set_value("");
    examples.append_child(&placeholder)?;
    for (i, prompt) in EXAMPLE_PROMPTS.iter().enumerate() {
        let option: HtmlOptionElement = document.create_element("option")?.dyn_into()?;
        option.set_value(&i.to_string());
        option.set_text(&format!("{}: {}", prompt.title, prompt.preview()));
        examples.append_child(&option)?;
    }
    let example_closure = Closure::wrap(Box::new(move || {
        on_example_selected();
    }) as Box<dyn Fn()>);
    examples.add_event_listener_with_callback("change", example_closure.as_ref().unchecked_ref())?;
    example_closure.forget();
    actions.append_child(&examples)?;

    let clear_btn = create_button(document, "Clear", "clear-btn")?;
    on_click(&clear_btn, on_clear);
    actions.append_child(&clear_btn)?;

    header.append_child(&actions)?;
    panel.append_child(&header)?;

    let textarea: HtmlTextAreaElement = document.create_element("textarea")?.dyn_into()?;
    textarea.set_id("tokenizer-input");
    textarea.set_rows(6);
    textarea.set_placeholder("Enter text to tokenize...");
    textarea.set_value(restored);
    textarea.set_attribute(
        "style",
        &format!(
            "width: 100%; box-sizing: border-box; padding: 12px; border: 1px solid {}; \
            border-radius: 6px; font-family: monospace; font-size: 14px; resize: vertical;",
            BORDER_COLOR
        ),
    )?;

    let input_closure = Closure::wrap(Box::new(move || {
        on_input();
    }) as Box<dyn Fn()>);
    textarea.add_event_listener_with_callback("input", input_closure.as_ref().unchecked_ref())?;
    input_closure.forget();

    // Ctrl+Enter submits
    let key_closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        if event.ctrl_key() && event.key() == "Enter" {
            event.prevent_default();
            on_submit();
        }
    }) as Box<dyn Fn(KeyboardEvent)>);
    textarea.add_event_listener_with_callback("keydown", key_closure.as_ref().unchecked_ref())?;
    key_closure.forget();

    panel.append_child(&textarea)?;

    let footer = row(document)?;
    let stats = row(document)?;
    stats.append_child(&(chip(document, "char-count")? as HtmlElement))?;
    stats.append_child(&(chip(document, "word-count")? as HtmlElement))?;
    footer.append_child(&stats)?;

    let submit_btn = create_button(document, "Tokenize", "tokenize-btn")?;
    submit_btn.style().set_property("background", ACCENT_COLOR)?;
    submit_btn.style().set_property("color", "#ffffff")?;
    on_click(&submit_btn, on_submit);
    footer.append_child(&submit_btn)?;
    panel.append_child(&footer)?;

    Ok(panel)
}

fn create_result_panel(document: &Document) -> Result<HtmlElement, JsValue> {
    let panel = panel(document, "result-panel")?;
    panel.style().set_property("display", "none")?;

    let header = row(document)?;
    let heading = row(document)?;
    let title: HtmlElement = document.create_element("h2")?.dyn_into()?;
    title.set_inner_text("Tokenization Result");
    title.set_attribute("style", "margin: 0; font-size: 18px;")?;
    heading.append_child(&title)?;
    heading.append_child(&(chip(document, "token-count")? as HtmlElement))?;
    header.append_child(&heading)?;

    let actions = row(document)?;
    let ids_btn = create_button(document, "Show token IDs", "show-ids-btn")?;
    on_click(&ids_btn, on_toggle_ids);
    actions.append_child(&ids_btn)?;
    let copy_btn = create_button(document, "Copy token IDs", "copy-btn")?;
    on_click(&copy_btn, on_copy);
    actions.append_child(&copy_btn)?;
    header.append_child(&actions)?;
    panel.append_child(&header)?;

    let tokens: HtmlElement = document.create_element("div")?.dyn_into()?;
    tokens.set_id("token-container");
    tokens.set_attribute(
        "style",
        &format!(
            "padding: 16px 8px; border: 1px solid {}; border-radius: 4px; line-height: 2.2; \
            font-family: monospace; font-size: 16px;",
            BORDER_COLOR
        ),
    )?;

    // Delegated handlers; each span carries its position in data-index
    let click_closure = Closure::wrap(Box::new(move |event: Event| {
        if let Some(index) = token_index(&event) {
            on_token_click(index);
        }
    }) as Box<dyn Fn(Event)>);
    tokens.add_event_listener_with_callback("click", click_closure.as_ref().unchecked_ref())?;
    click_closure.forget();

    let over_closure = Closure::wrap(Box::new(move |event: Event| {
        on_token_hover(token_index(&event));
    }) as Box<dyn Fn(Event)>);
    tokens.add_event_listener_with_callback("mouseover", over_closure.as_ref().unchecked_ref())?;
    over_closure.forget();

    let leave_closure = Closure::wrap(Box::new(move || {
        on_token_hover(None);
    }) as Box<dyn Fn()>);
    tokens.add_event_listener_with_callback("mouseleave", leave_closure.as_ref().unchecked_ref())?;
    leave_closure.forget();

    panel.append_child(&tokens)?;

    let hover: HtmlElement = document.create_element("div")?.dyn_into()?;
    hover.set_id("token-details");
    hover.set_attribute(
        "style",
        &format!(
            "display: none; padding: 12px; max-width: 300px; border: 1px solid {}; \
            border-radius: 6px; font-size: 13px; box-shadow: 0 2px 6px rgba(0,0,0,0.1);",
            BORDER_COLOR
        ),
    )?;
    panel.append_child(&hover)?;

    let selected: HtmlElement = document.create_element("div")?.dyn_into()?;
    selected.set_id("selected-token");
    selected.set_attribute(
        "style",
        "display: none; padding: 12px; border-radius: 6px; background: #e3f2fd; font-size: 13px;",
    )?;
    panel.append_child(&selected)?;

    Ok(panel)
}

/// Position of the token span under an event, if any
fn token_index(event: &Event) -> Option<usize> {
    let target: Element = event.target()?.dyn_into().ok()?;
    let span = target.closest("[data-index]").ok()??;
    span.get_attribute("data-index")?.parse().ok()
}

fn get_element(id: &str) -> Option<Element> {
    web_sys::window()?.document()?.get_element_by_id(id)
}

fn get_textarea_input() -> String {
    get_element("tokenizer-input")
        .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok())
        .map(|ta| ta.value())
        .unwrap_or_default()
}

fn set_visible(id: &str, visible: bool) {
    if let Some(el) = get_element(id).and_then(|el| el.dyn_into::<HtmlElement>().ok()) {
        let display = if visible { "flex" } else { "none" };
        let _ = el.style().set_property("display", display);
    }
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Handle input in the textarea
fn on_input() {
    let text = get_textarea_input();
    STATE.with(|s| {
        if let Some(state) = s.borrow_mut().as_mut() {
            if let Err(e) = state.input.set_text(&text) {
                warn(&e.to_string());
            }
        }
    });
    update_input_stats();
    schedule_debounced_tokenization();
}

fn on_submit() {
    cancel_debounce();
    let text = STATE.with(|s| {
        s.borrow()
            .as_ref()
            .filter(|state| state.input.can_submit())
            .map(|state| state.input.text().to_string())
    });
    if let Some(text) = text {
        run_tokenization(text);
    }
}

fn on_clear() {
    cancel_debounce();
    STATE.with(|s| {
        if let Some(state) = s.borrow_mut().as_mut() {
            if let Err(e) = state.clear() {
                warn(&e.to_string());
            }
        }
    });
    if let Some(ta) = get_element("tokenizer-input").and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok()) {
        ta.set_value("");
    }
    update_input_stats();
    update_submit_button();
    update_result();
}

fn on_example_selected() {
    let Some(select) = get_element("examples-select").and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
    else {
        return;
    };
    let Ok(index) = select.value().parse::<usize>() else {
        return;
    };
    select.set_selected_index(0);

    let text = STATE.with(|s| {
        let mut state = s.borrow_mut();
        let state = state.as_mut()?;
        match state.input.select_example(index)? {
            Ok(prompt) => Some(prompt.text.to_string()),
            Err(e) => {
                warn(&e.to_string());
                Some(state.input.text().to_string())
            }
        }
    });

    if let Some(text) = text {
        if let Some(ta) = get_element("tokenizer-input").and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok()) {
            ta.set_value(&text);
        }
        update_input_stats();
        cancel_debounce();
        run_tokenization(text);
    }
}

fn on_token_click(index: usize) {
    STATE.with(|s| {
        if let Some(state) = s.borrow_mut().as_mut() {
            if let Some(id) = state.view.sequence().get(index).map(|token| token.id) {
                state.view.toggle_select(id);
            }
        }
    });
    update_result();
}

fn on_token_hover(index: Option<usize>) {
    let changed = STATE.with(|s| {
        let mut state = s.borrow_mut();
        let Some(state) = state.as_mut() else {
            return false;
        };
        let before = state.view.hover_index();
        state.view.set_hover(index);
        before != state.view.hover_index()
    });
    if changed {
        update_hover_details();
    }
}

fn on_toggle_ids() {
    STATE.with(|s| {
        if let Some(state) = s.borrow_mut().as_mut() {
            state.view.toggle_show_ids();
        }
    });
    update_result();
}

fn on_copy() {
    let ids = STATE.with(|s| {
        s.borrow_mut()
            .as_mut()
            .map(|state| state.view.export_ids(now_ms()))
    });
    let Some(ids) = ids else {
        return;
    };

    if let Some(window) = web_sys::window() {
        let promise = window.navigator().clipboard().write_text(&ids);
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                web_sys::console::error_1(&format!("Copy to clipboard failed: {:?}", e).into());
            }
        });

        // Re-render once the acknowledgement has expired
        let closure = Closure::once(Box::new(move || {
            update_result();
        }) as Box<dyn FnOnce()>);
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            COPY_FEEDBACK_MS as i32,
        );
        closure.forget();
    }
    update_result();
}

/// Cancel any pending debounced tokenization
fn cancel_debounce() {
    DEBOUNCE_HANDLE.with(|handle| {
        if let Some(id) = handle.borrow_mut().take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(id);
            }
        }
    });
}

/// Schedule a debounced tokenization of the current input
fn schedule_debounced_tokenization() {
    cancel_debounce();

    if let Some(window) = web_sys::window() {
        let closure = Closure::once(Box::new(move || {
            DEBOUNCE_HANDLE.with(|handle| *handle.borrow_mut() = None);
            on_submit();
        }) as Box<dyn FnOnce()>);

        let result = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            DEBOUNCE_MS,
        );

        if let Ok(id) = result {
            DEBOUNCE_HANDLE.with(|handle| {
                *handle.borrow_mut() = Some(id);
            });
        }

        closure.forget();
    }
}

/// Start a pipeline run; results of superseded runs are dropped
fn run_tokenization(text: String) {
    let pipeline = STATE.with(|s| {
        let mut state = s.borrow_mut();
        let state = state.as_mut()?;
        state.processing = true;
        Some(Rc::clone(&state.pipeline))
    });
    let Some(pipeline) = pipeline else {
        return;
    };
    update_submit_button();

    spawn_local(async move {
        let Some(sequence) = pipeline.tokenize_latest(&text).await else {
            return;
        };
        if sequence.is_error() {
            web_sys::console::error_1(&"Tokenization failed".into());
        }
        STATE.with(|s| {
            if let Some(state) = s.borrow_mut().as_mut() {
                state.view.replace_sequence(sequence);
                state.processing = false;
            }
        });
        update_submit_button();
        update_result();
    });
}

fn update_input_stats() {
    let stats = STATE.with(|s| {
        s.borrow().as_ref().map(|state| {
            (
                state.input.character_count(),
                state.input.word_count(),
                state.input.can_submit(),
                state.input.text().is_empty(),
            )
        })
    });
    let Some((chars, words, can_submit, empty)) = stats else {
        return;
    };

    if let Some(el) = get_element("char-count") {
        el.set_text_content(Some(&format!("{} characters", chars)));
    }
    if let Some(el) = get_element("word-count") {
        el.set_text_content(Some(&format!("~{} words", words)));
    }
    if let Some(btn) = get_element("tokenize-btn").and_then(|el| el.dyn_into::<HtmlButtonElement>().ok()) {
        btn.set_disabled(!can_submit);
    }
    if let Some(btn) = get_element("clear-btn").and_then(|el| el.dyn_into::<HtmlButtonElement>().ok()) {
        btn.set_disabled(empty);
    }
}

fn update_submit_button() {
    let processing = STATE.with(|s| s.borrow().as_ref().is_some_and(|state| state.processing));
    if let Some(btn) = get_element("tokenize-btn").and_then(|el| el.dyn_into::<HtmlButtonElement>().ok()) {
        btn.set_inner_text(if processing { "Processing..." } else { "Tokenize" });
    }
}

/// Redraw tokens, labels and the selected-token panel
fn update_result() {
    let rendered = STATE.with(|s| {
        s.borrow().as_ref().map(|state| {
            let view = &state.view;
            let now = now_ms();
            (
                view.token_count(),
                tokens_html(view),
                view.selected_token().map(selected_details_html),
                token_count_label(view.token_count()),
                show_ids_button_label(view),
                copy_button_label(view, now),
            )
        })
    });
    let Some((count, tokens, selected, count_label, ids_label, copy_label)) = rendered else {
        return;
    };

    set_visible("result-panel", count > 0);
    if let Some(el) = get_element("token-container") {
        el.set_inner_html(&tokens);
    }
    if let Some(el) = get_element("token-count") {
        el.set_text_content(Some(&count_label));
    }
    if let Some(el) = get_element("show-ids-btn") {
        el.set_text_content(Some(ids_label));
    }
    if let Some(el) = get_element("copy-btn") {
        el.set_text_content(Some(copy_label));
    }
    if let Some(el) = get_element("selected-token") {
        el.set_inner_html(selected.as_deref().unwrap_or(""));
    }
    set_visible("selected-token", selected.is_some());
    update_hover_details();
}

fn update_hover_details() {
    let details = STATE.with(|s| {
        s.borrow()
            .as_ref()
            .and_then(|state| state.view.hover_token().map(hover_details_html))
    });
    if let Some(el) = get_element("token-details") {
        el.set_inner_html(details.as_deref().unwrap_or(""));
    }
    set_visible("token-details", details.is_some());
}

/// Log to browser console
fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}
