use clap::Parser;
use dimmer_core::{ExtensionModeManager, PageModeManager};
use dom::DomSurface;
use options::Options;
use std::cell::RefCell;
use std::rc::Rc;
use utils::to_js_error;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

mod dom;
mod options;
mod storage;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

#[derive(Clone)]
enum Manager {
    Page(Rc<PageModeManager<DomSurface>>),
    Extension(Rc<ExtensionModeManager<DomSurface>>),
}

thread_local! {
    // managers outlive their JS handles, clicks keep working until the page goes away
    static MANAGERS: RefCell<Vec<Manager>> = const { RefCell::new(Vec::new()) };
}

fn keep_alive(manager: Manager) -> DarkMode {
    MANAGERS.with_borrow_mut(|managers| managers.push(manager.clone()));
    DarkMode { manager }
}

#[wasm_bindgen(start)]
pub fn start() {
    use gloo::utils::window;

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    // the hash belongs to the host page, anything we can't parse means defaults
    let log_level = Args::try_parse_from(location_hash.split(['#', '&']))
        .map_or(Some(log::Level::Error), |args| args.verbose.log_level());
    if let Some(log_level) = log_level {
        if let Err(err) = console_log::init_with_level(log_level) {
            web_sys::console::warn_1(&format!("logger already set: {}", err).into());
        }
    }
    log::debug!("dimmer loaded");
}

/// Handle returned to JS by both setup functions.
#[wasm_bindgen]
pub struct DarkMode {
    manager: Manager,
}

#[wasm_bindgen]
impl DarkMode {
    #[wasm_bindgen(getter, js_name = isDark)]
    pub fn is_dark(&self) -> bool {
        match &self.manager {
            Manager::Page(manager) => manager.is_dark(),
            Manager::Extension(manager) => manager.is_dark(),
        }
    }

    /// Flip the mode. Page handles return the new `isDark`, extension handles a
    /// promise of it.
    pub fn toggle(&self) -> Result<JsValue, JsValue> {
        match &self.manager {
            Manager::Page(manager) => manager
                .toggle()
                .map(|mode| mode.is_dark().into())
                .map_err(to_js_error),
            Manager::Extension(manager) => {
                let manager = manager.clone();
                let promise = wasm_bindgen_futures::future_to_promise(async move {
                    manager
                        .toggle()
                        .await
                        .map(|mode| mode.is_dark().into())
                        .map_err(to_js_error)
                });
                Ok(promise.into())
            }
        }
    }
}

/// Set up a toggle on an ordinary page, persisting to page storage.
#[wasm_bindgen]
pub fn setup(toggle: HtmlElement, options: JsValue) -> Result<DarkMode, JsValue> {
    let Options {
        config,
        class_element,
    } = Options::from_js(&options)?;
    let surface = DomSurface::new(toggle, class_element);
    let manager =
        dimmer_core::setup_page(surface, config, &storage::probe()).map_err(to_js_error)?;
    Ok(keep_alive(Manager::Page(manager)))
}

/// Set up a toggle from an extension content script, persisting to extension storage.
#[wasm_bindgen(js_name = setupExtension)]
pub async fn setup_extension(toggle: HtmlElement, options: JsValue) -> Result<DarkMode, JsValue> {
    let Options {
        config,
        class_element,
    } = Options::from_js(&options)?;
    let surface = DomSurface::new(toggle, class_element);
    let backends = storage::probe();
    let manager = dimmer_core::setup_extension(
        surface,
        config,
        &backends,
        |task| wasm_bindgen_futures::spawn_local(task),
    )
    .await
    .map_err(to_js_error)?;
    Ok(keep_alive(Manager::Extension(manager)))
}
