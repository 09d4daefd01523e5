//! Browser storage backends and the extension API probe.

use crate::utils::{describe, storage_error};
use dimmer_core::storage::{
    ApiFamily, Backends, CallbackArea, Done, ExtensionApi, KeyValueStore, PromiseArea,
};
use dimmer_core::{Error, Result};
use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use js_sys::{Object, Reflect};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    /// `storage.local` or `storage.session` of the WebExtension API.
    type StorageArea;

    #[wasm_bindgen(method, catch, js_name = get)]
    fn get_with_callback(
        this: &StorageArea,
        key: &str,
        callback: &JsValue,
    ) -> core::result::Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = set)]
    fn set_with_callback(
        this: &StorageArea,
        items: &Object,
        callback: &JsValue,
    ) -> core::result::Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = get)]
    fn get_promise(this: &StorageArea, key: &str)
    -> core::result::Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = set)]
    fn set_promise(
        this: &StorageArea,
        items: &Object,
    ) -> core::result::Result<js_sys::Promise, JsValue>;
}

/// `localStorage` or `sessionStorage`.
struct WebStorage(web_sys::Storage);

impl KeyValueStore for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.0.get_item(key).map_err(storage_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.0.set_item(key, value).map_err(storage_error)
    }
}

/// Chrome style: completion arrives in a callback, failures in `runtime.lastError`.
struct CallbackStore(StorageArea);

impl CallbackArea for CallbackStore {
    fn get(&self, key: &str, done: Done<Option<String>>) {
        let owned_key = key.to_string();
        dispatch(
            done,
            move |items| Ok(item_value(&items, &owned_key)),
            |callback| self.0.get_with_callback(key, callback),
        );
    }

    fn set(&self, key: &str, value: &str, done: Done<()>) {
        let items = match single_item(key, value) {
            Ok(items) => items,
            Err(err) => return done(Err(err)),
        };
        dispatch(
            done,
            |_| Ok(()),
            |callback| self.0.set_with_callback(&items, callback),
        );
    }
}

/// Hand `done` to a one-shot JS callback, or fail it right away if the call throws.
fn dispatch<T: 'static>(
    done: Done<T>,
    settle: impl FnOnce(JsValue) -> Result<T> + 'static,
    call: impl FnOnce(&JsValue) -> core::result::Result<(), JsValue>,
) {
    let done = Rc::new(Cell::new(Some(done)));
    let callback = {
        let done = done.clone();
        Closure::once_into_js(move |value: JsValue| {
            if let Some(done) = done.take() {
                done(last_error().map_or_else(|| settle(value), Err));
            }
        })
    };
    if let Err(err) = call(&callback) {
        if let Some(done) = done.take() {
            done(Err(storage_error(err)));
        }
    }
}

/// Firefox style: every call returns a promise.
struct PromiseStore(StorageArea);

impl PromiseArea for PromiseStore {
    fn get(&self, key: &str) -> LocalBoxFuture<'static, Result<Option<String>>> {
        let promise = self.0.get_promise(key);
        let key = key.to_string();
        async move {
            let promise = promise.map_err(storage_error)?;
            let items = JsFuture::from(promise).await.map_err(storage_error)?;
            Ok(item_value(&items, &key))
        }
        .boxed_local()
    }

    fn set(&self, key: &str, value: &str) -> LocalBoxFuture<'static, Result<()>> {
        let promise = single_item(key, value)
            .and_then(|items| self.0.set_promise(&items).map_err(storage_error));
        async move {
            JsFuture::from(promise?).await.map_err(storage_error)?;
            Ok(())
        }
        .boxed_local()
    }
}

fn single_item(key: &str, value: &str) -> Result<Object> {
    let items = Object::new();
    Reflect::set(&items, &JsValue::from_str(key), &JsValue::from_str(value))
        .map_err(storage_error)?;
    Ok(items)
}

/// Pull `key` out of a `get` result; non-string values are read as JSON text.
fn item_value(items: &JsValue, key: &str) -> Option<String> {
    let value = Reflect::get(items, &JsValue::from_str(key)).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    value
        .as_string()
        .or_else(|| js_sys::JSON::stringify(&value).ok().map(String::from))
}

fn last_error() -> Option<Error> {
    let runtime = property(&property(&js_sys::global(), "chrome")?, "runtime")?;
    let error = property(&runtime, "lastError")?;
    let message = Reflect::get(&error, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| describe(&error));
    Some(Error::Storage(message))
}

fn property(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|value| value.is_object())
}

fn page_store(
    storage: core::result::Result<Option<web_sys::Storage>, JsValue>,
    name: &str,
) -> Option<Rc<dyn KeyValueStore>> {
    match storage {
        Ok(Some(storage)) => Some(Rc::new(WebStorage(storage))),
        Ok(None) => {
            log::debug!("no {name} on this page");
            None
        }
        Err(err) => {
            log::warn!("{name} is not accessible: {}", describe(&err));
            None
        }
    }
}

fn extension_api() -> Option<ExtensionApi> {
    let global = js_sys::global();
    let namespace_storage = |namespace| property(&property(&global, namespace)?, "storage");
    let area = |storage: &JsValue, name| {
        property(storage, name).map(|value| value.unchecked_into::<StorageArea>())
    };

    let api = if let Some(storage) = namespace_storage("browser") {
        let promise_area = |name| {
            area(&storage, name).map(|area| Rc::new(PromiseStore(area)) as Rc<dyn PromiseArea>)
        };
        ExtensionApi::Promise {
            local: promise_area("local"),
            session: promise_area("session"),
        }
    } else {
        let storage = namespace_storage("chrome")?;
        let callback_area = |name| {
            area(&storage, name).map(|area| Rc::new(CallbackStore(area)) as Rc<dyn CallbackArea>)
        };
        ExtensionApi::Callback {
            local: callback_area("local"),
            session: callback_area("session"),
        }
    };
    log::debug!(
        "extension storage found, {} style",
        match api.family() {
            ApiFamily::Callback => "callback",
            ApiFamily::Promise => "promise",
        }
    );
    Some(api)
}

/// Everything this page can persist to, probed once per manager.
pub(crate) fn probe() -> Backends {
    let window = gloo::utils::window();
    Backends {
        local: page_store(window.local_storage(), "localStorage"),
        session: page_store(window.session_storage(), "sessionStorage"),
        extension: extension_api(),
    }
}
