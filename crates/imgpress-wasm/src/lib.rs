//! imgpress WASM - browser bindings for the image compressor
//!
//! Exposes the imgpress-core entry list to JavaScript. Images are posted to
//! the processing endpoint with the core HTTP client; results stay in WASM
//! memory until they are downloaded or zipped.
//!
//! # Module Structure
//!
//! - `session` - The `Session` class holding the image list
//! - `types` - Conversions between core types and JS values
//!
//! # Usage
//!
//! ```typescript
//! import init, { Session, format_size } from '@imgpress/wasm';
//!
//! await init();
//! const session = new Session('/api/process');
//! const id = session.add_file(file.name, file.type, bytes, url);
//! if (await session.process(id)) {
//!     console.log(format_size(session.output(id).byteLength));
//! }
//! ```

use wasm_bindgen::prelude::*;

mod session;
mod types;

pub use session::Session;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Download name for `original` converted to `format`.
#[wasm_bindgen]
pub fn download_filename(original: &str, format: &str) -> Result<String, JsValue> {
    let format = types::parse_format(format)?;
    Ok(imgpress_core::download_filename(original, format))
}

/// Human readable size, e.g. `1.5 KB`.
#[wasm_bindgen]
pub fn format_size(bytes: f64) -> String {
    let bytes = if bytes.is_finite() && bytes > 0.0 { bytes as u64 } else { 0 };
    imgpress_core::format_size(bytes)
}

/// File name for the bulk download.
#[wasm_bindgen]
pub fn archive_name() -> String {
    imgpress_core::ARCHIVE_NAME.to_string()
}
