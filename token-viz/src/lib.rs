//! Tokenization Visualization
//!
//! WASM front end that shows how text is split into tokens, with
//! per-token colors, ids, hover details and id export.

mod input;
mod render;
mod viz;


use wasm_bindgen::prelude::*;

/// Initialize the visualization app
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Set up panic hook for better error messages in WASM
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    viz::init()
}

/// Re-export for JavaScript interop
pub use input::*;
pub use render::*;
pub use viz::*;
