//! WebAssembly FFI bindings for the Crux Core
//!
//! The browser shell sends serialized events in, executes the returned
//! effects (HTTP, timer, render) and feeds the outputs back.

use lazy_static::lazy_static;
use wasm_bindgen::prelude::wasm_bindgen;

use crux_core::{bridge::Bridge, Core};

use crate::App;

lazy_static! {
    static ref CORE: Bridge<App> = Bridge::new(Core::new());
}

/// Route `log` output to the browser console
#[wasm_bindgen(start)]
pub fn init_wasm() {
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("logger already initialized");
    }
}

/// Process a serialized Event, returning the serialized Effects
#[wasm_bindgen]
pub fn process_event(event_bytes: &[u8]) -> Vec<u8> {
    let mut effects = Vec::new();
    if let Err(e) = CORE.update(event_bytes, &mut effects) {
        log::error!("failed to process event: {e}");
    }
    effects
}

/// Get the current serialized view model
#[wasm_bindgen]
pub fn view() -> Vec<u8> {
    let mut view = Vec::new();
    if let Err(e) = CORE.view(&mut view) {
        log::error!("failed to serialize view model: {e}");
    }
    view
}

/// Resolve an effect with the shell's serialized output
#[wasm_bindgen]
pub fn handle_response(id: u32, response_bytes: &[u8]) -> Vec<u8> {
    let mut effects = Vec::new();
    if let Err(e) = CORE.resolve(
        crux_core::bridge::EffectId(id),
        response_bytes,
        &mut effects,
    ) {
        log::error!("failed to resolve effect {id}: {e}");
    }
    effects
}
