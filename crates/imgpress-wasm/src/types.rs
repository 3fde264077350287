//! Conversions between core types and JavaScript values.

use std::fmt::Display;

use imgpress_core::{Quality, TargetFormat};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

/// Turn any displayable error into a JS string value.
pub(crate) fn js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Serialize to a plain JS object, with `None` as `null`.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(js_error)
}

/// Parse a format name coming from a `<select>` value.
pub(crate) fn parse_format(value: &str) -> Result<TargetFormat, JsValue> {
    TargetFormat::parse(value).map_err(js_error)
}

/// Clamp a slider value into the encoder's quality range.
///
/// JS numbers can be anything, so out-of-range and fractional values are
/// rounded and clamped rather than rejected.
pub(crate) fn quality_from_js(value: f64) -> Quality {
    if value.is_nan() {
        return Quality::DEFAULT;
    }
    let clamped = value.round().clamp(Quality::MIN as f64, Quality::MAX as f64);
    Quality::new(clamped as u8)
}
