use dimmer_core::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Best-effort readable text for whatever a JS API threw or rejected with.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return err.message().into();
    }
    format!("{:?}", value)
}

pub(crate) fn storage_error(value: JsValue) -> Error {
    Error::Storage(describe(&value))
}

pub(crate) fn document_error(value: JsValue) -> Error {
    Error::Document(describe(&value))
}

pub(crate) fn to_js_error(err: Error) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}
