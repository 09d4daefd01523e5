//! Uniform key/value access over the page-local, extension and null backends.
//!
//! A [`StorageAdapter`] is resolved once from a [`StorageKind`] and whatever
//! [`Backends`] the host found. After that every call goes straight to the
//! chosen route; nothing is probed again.
//!
//! Unsupported combinations never fail. Synchronous calls against an extension
//! kind quietly read nothing and write nothing, only the `*_async` forms reach
//! extension storage. This is kept for compatibility with existing callers, but
//! it is easy to trip over: a page manager configured with an extension kind
//! will never persist anything.

use crate::{Result, StorageKind};
use core::fmt;
use std::rc::Rc;

mod extension;
mod memory;

pub use extension::*;
pub use memory::MemoryStore;

/// Synchronous string store, the shape of `localStorage`/`sessionStorage`.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// Everything the host could offer, each part optional.
#[derive(Clone, Default)]
pub struct Backends {
    pub local: Option<Rc<dyn KeyValueStore>>,
    pub session: Option<Rc<dyn KeyValueStore>>,
    pub extension: Option<ExtensionApi>,
}

impl Backends {
    /// Nothing available, every kind degrades to the null route.
    pub fn none() -> Self {
        Self::default()
    }
}

#[derive(Clone)]
enum Route {
    Page(Rc<dyn KeyValueStore>),
    Callback(Rc<dyn CallbackArea>),
    Promise(Rc<dyn PromiseArea>),
    Null,
}

pub struct StorageAdapter {
    kind: StorageKind,
    route: Route,
}

impl StorageAdapter {
    pub fn new(kind: StorageKind, backends: &Backends) -> Self {
        let route = match kind {
            StorageKind::Local => backends.local.clone().map(Route::Page),
            StorageKind::Session => backends.session.clone().map(Route::Page),
            StorageKind::ExtensionLocal => backends
                .extension
                .as_ref()
                .and_then(|api| api.route(Scope::Local)),
            StorageKind::ExtensionSession => backends
                .extension
                .as_ref()
                .and_then(|api| api.route(Scope::Session)),
            StorageKind::None => Some(Route::Null),
        };
        let route = route.unwrap_or_else(|| {
            log::warn!("{:?} storage is unavailable, preference will not persist", kind);
            Route::Null
        });
        Self { kind, route }
    }

    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    /// Calling convention of the extension API this adapter talks to, if any.
    pub fn api_family(&self) -> Option<ApiFamily> {
        match self.route {
            Route::Callback(_) => Some(ApiFamily::Callback),
            Route::Promise(_) => Some(ApiFamily::Promise),
            Route::Page(_) | Route::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.route, Route::Null)
    }

    pub fn read(&self, key: &str) -> Result<Option<String>> {
        match &self.route {
            Route::Page(store) => store.get_item(key),
            Route::Callback(_) | Route::Promise(_) => {
                log::trace!("sync read of {key:?} ignored for {:?} storage", self.kind);
                Ok(None)
            }
            Route::Null => Ok(None),
        }
    }

    pub fn write(&self, key: &str, value: &str) -> Result<()> {
        match &self.route {
            Route::Page(store) => store.set_item(key, value),
            Route::Callback(_) | Route::Promise(_) => {
                log::trace!("sync write of {key:?} ignored for {:?} storage", self.kind);
                Ok(())
            }
            Route::Null => Ok(()),
        }
    }

    pub async fn read_async(&self, key: &str) -> Result<Option<String>> {
        match &self.route {
            Route::Page(store) => store.get_item(key),
            Route::Callback(area) => settle(|done| area.get(key, done)).await,
            Route::Promise(area) => area.get(key).await,
            Route::Null => Ok(None),
        }
    }

    pub async fn write_async(&self, key: &str, value: &str) -> Result<()> {
        match &self.route {
            Route::Page(store) => store.set_item(key, value),
            Route::Callback(area) => settle(|done| area.set(key, value, done)).await,
            Route::Promise(area) => area.set(key, value).await,
            Route::Null => Ok(()),
        }
    }
}

impl fmt::Debug for StorageAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageAdapter")
            .field("kind", &self.kind)
            .field("api_family", &self.api_family())
            .field("null", &self.is_null())
            .finish()
    }
}
