use dimmer_core::Config;
use js_sys::{Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

pub(crate) struct Options {
    pub config: Config,
    pub class_element: Element,
}

impl Options {
    const CLASS_ELEMENT: &'static str = "classElement";

    /// Read a plain JS options object; `undefined`/`null` means all defaults.
    pub(crate) fn from_js(options: &JsValue) -> Result<Self, JsValue> {
        let config = if options.is_undefined() || options.is_null() {
            Config::default()
        } else {
            let json: String = js_sys::JSON::stringify(&Self::settings(options)?)?.into();
            Config::from_json(&json).map_err(|err| {
                js_sys::Error::new(&format!("invalid dark mode options: {}", err))
            })?
        };
        log::debug!("options: {:?}", config);

        let class_element = match Reflect::get(options, &JsValue::from_str(Self::CLASS_ELEMENT))
            .ok()
            .and_then(|element| element.dyn_into::<Element>().ok())
        {
            Some(element) => element,
            None => default_class_element()?,
        };

        Ok(Self {
            config,
            class_element,
        })
    }

    /// Shallow copy without the class element, which is a DOM node and not JSON.
    fn settings(options: &JsValue) -> Result<JsValue, JsValue> {
        let Some(object) = options.dyn_ref::<Object>() else {
            return Ok(options.clone());
        };
        let copy = Object::assign(&Object::new(), object);
        Reflect::delete_property(&copy, &JsValue::from_str(Self::CLASS_ELEMENT))?;
        Ok(copy.into())
    }
}

/// `<body>`, or the root element for scripts that run from `<head>`.
fn default_class_element() -> Result<Element, JsValue> {
    let document = gloo::utils::document();
    document
        .body()
        .map(Element::from)
        .or_else(|| document.document_element())
        .ok_or_else(|| {
            js_sys::Error::new("document has no element to put the dark mode class on").into()
        })
}
