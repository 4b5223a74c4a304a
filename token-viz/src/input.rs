//! Input panel state and persistence of the last typed text

use std::cell::RefCell;
use thiserror::Error;
use tokenizer::{ExamplePrompt, EXAMPLE_PROMPTS};

/// Storage key for the last entered text
pub const STORAGE_KEY: &str = "tokenizer_input";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("input storage failed: {0}")]
pub struct StoreError(pub String);

/// Where the last entered text is kept between visits
pub trait InputStore {
    fn load(&self) -> Option<String>;
    fn save(&self, text: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Store that lives as long as the page
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(text: &str) -> Self {
        Self {
            value: RefCell::new(Some(text.to_string())),
        }
    }
}

impl InputStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    fn save(&self, text: &str) -> Result<(), StoreError> {
        *self.value.borrow_mut() = Some(text.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.value.borrow_mut() = None;
        Ok(())
    }
}

/// Browser `localStorage`
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    /// `None` when the page has no usable local storage
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl InputStore for LocalStorageStore {
    fn load(&self) -> Option<String> {
        self.storage.get_item(STORAGE_KEY).ok().flatten()
    }

    fn save(&self, text: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(STORAGE_KEY, text)
            .map_err(|e| StoreError(format!("{:?}", e)))
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.storage
            .remove_item(STORAGE_KEY)
            .map_err(|e| StoreError(format!("{:?}", e)))
    }
}

/// Text being edited, persisted on every change
pub struct InputState {
    text: String,
    store: Box<dyn InputStore>,
}

impl InputState {
    /// Restore the last saved text, if any
    pub fn mount(store: Box<dyn InputStore>) -> Self {
        let text = store.load().unwrap_or_default();
        Self { text, store }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and persist it
    pub fn set_text(&mut self, text: &str) -> Result<(), StoreError> {
        self.text = text.to_string();
        self.store.save(text)
    }

    /// Empty the text and forget the saved copy
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.text.clear();
        self.store.clear()
    }

    /// Load example `index` as the current text
    pub fn select_example(&mut self, index: usize) -> Option<Result<ExamplePrompt, StoreError>> {
        let prompt = *EXAMPLE_PROMPTS.get(index)?;
        Some(self.set_text(prompt.text).map(|()| prompt))
    }

    pub fn character_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Approximate word count; zero for blank text
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Blank text cannot be submitted
    pub fn can_submit(&self) -> bool {
        !self.text.trim().is_empty()
    }
}
