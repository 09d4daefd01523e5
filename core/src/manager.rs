//! The dark/light state machine.
//!
//! There are two states and two ways to move between them: `restore` picks the
//! state from storage (or the configured default) and `toggle` flips it. Every
//! transition renders the class, the marker and the glyph together and then
//! persists the marker.
//!
//! Page scripts get synchronous storage and use [`PageModeManager`]; extension
//! content scripts only get deferred storage and use [`ExtensionModeManager`].
//! Both are the same [`ModeManager`], only the access marker differs.
//!
//! Deferred toggles are not coordinated unless `serialize_toggles` is set. Two
//! clicks that overlap an in-flight storage write each render immediately, and
//! whichever write the host acknowledges last is what survives a reload.

use crate::storage::{Backends, StorageAdapter};
use crate::{Config, Mode, Result};
use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use futures_util::lock::Mutex;
use std::cell::Cell;
use std::marker::PhantomData;
use std::rc::Rc;

/// What the manager needs from the document.
pub trait Surface {
    /// Add or remove `class_name` on the class element.
    fn set_class(&self, class_name: &str, present: bool) -> Result<()>;
    /// Store the `"0"`/`"1"` marker on the toggle element.
    fn set_marker(&self, marker: &str) -> Result<()>;
    /// Replace the toggle element's content.
    fn set_glyph(&self, glyph: &str) -> Result<()>;
    /// Pointer cursor, no text selection, `label` as tooltip.
    fn prepare(&self, label: &str) -> Result<()>;
    /// Every call attaches another handler.
    fn on_click(&self, handler: Box<dyn Fn()>) -> Result<()>;
}

mod sealed {
    pub trait Sealed {}
}

/// How a manager reaches storage.
pub trait Access: sealed::Sealed {}

/// Storage calls complete before returning.
#[derive(Debug)]
pub enum Blocking {}

/// Storage calls are awaited.
#[derive(Debug)]
pub enum Deferred {}

impl sealed::Sealed for Blocking {}
impl sealed::Sealed for Deferred {}
impl Access for Blocking {}
impl Access for Deferred {}

pub type PageModeManager<V> = ModeManager<V, Blocking>;
pub type ExtensionModeManager<V> = ModeManager<V, Deferred>;

pub struct ModeManager<V, A = Blocking> {
    config: Config,
    surface: V,
    storage: StorageAdapter,
    mode: Cell<Option<Mode>>,
    toggle_lock: Mutex<()>,
    access: PhantomData<A>,
}

impl<V: Surface, A: Access> ModeManager<V, A> {
    pub fn new(surface: V, config: Config, backends: &Backends) -> Self {
        let storage = StorageAdapter::new(config.storage, backends);
        log::debug!("mode manager using {:?}", storage);
        Self {
            config,
            surface,
            storage,
            mode: Cell::new(None),
            toggle_lock: Mutex::new(()),
            access: PhantomData,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    pub fn storage(&self) -> &StorageAdapter {
        &self.storage
    }

    /// `None` until the first restore, toggle or explicit set.
    pub fn mode(&self) -> Option<Mode> {
        self.mode.get()
    }

    pub fn is_dark(&self) -> bool {
        self.mode().is_some_and(Mode::is_dark)
    }

    fn key(&self) -> &str {
        &self.config.storage_name
    }

    fn restored_mode(&self, stored: Option<&str>) -> Mode {
        stored.map_or_else(|| self.config.default_mode(), Mode::from_stored)
    }

    /// Flip base is the configured default when nothing was applied yet.
    fn toggled_mode(&self) -> Mode {
        self.mode
            .get()
            .unwrap_or_else(|| self.config.default_mode())
            .toggled()
    }

    fn render(&self, mode: Mode) -> Result<()> {
        log::debug!("dark-mode: {:?}", mode);
        self.surface.set_class(&self.config.class_name, mode.is_dark())?;
        self.surface.set_marker(mode.marker())?;
        // state follows the marker, never runs ahead of it
        self.mode.set(Some(mode));
        self.surface.set_glyph(mode.glyph())
    }
}

/// A restore only writes back when storage does not already hold the marker.
fn needs_write(stored: Option<&str>, mode: Mode) -> bool {
    stored != Some(mode.marker())
}

impl<V: Surface> ModeManager<V, Blocking> {
    pub fn restore(&self) -> Result<Mode> {
        let stored = self.storage.read(self.key())?;
        let mode = self.restored_mode(stored.as_deref());
        self.render(mode)?;
        if needs_write(stored.as_deref(), mode) {
            self.storage.write(self.key(), mode.marker())?;
        }
        Ok(mode)
    }

    pub fn set_mode(&self, mode: Mode) -> Result<()> {
        self.render(mode)?;
        self.storage.write(self.key(), mode.marker())
    }

    pub fn toggle(&self) -> Result<Mode> {
        let mode = self.toggled_mode();
        self.set_mode(mode)?;
        Ok(mode)
    }

    pub fn activate(self: &Rc<Self>) -> Result<()>
    where
        V: 'static,
    {
        self.surface.prepare(&self.config.label)?;
        let manager = Rc::downgrade(self);
        self.surface.on_click(Box::new(move || {
            let Some(manager) = manager.upgrade() else {
                return;
            };
            if let Err(err) = manager.toggle() {
                log::error!("failed to toggle dark mode: {}", err);
            }
        }))
    }
}

impl<V: Surface> ModeManager<V, Deferred> {
    pub async fn restore(&self) -> Result<Mode> {
        let stored = self.storage.read_async(self.key()).await?;
        let mode = self.restored_mode(stored.as_deref());
        self.render(mode)?;
        if needs_write(stored.as_deref(), mode) {
            self.storage.write_async(self.key(), mode.marker()).await?;
        }
        Ok(mode)
    }

    pub async fn set_mode(&self, mode: Mode) -> Result<()> {
        self.render(mode)?;
        self.storage.write_async(self.key(), mode.marker()).await
    }

    pub async fn toggle(&self) -> Result<Mode> {
        let _guard = if self.config.serialize_toggles {
            Some(self.toggle_lock.lock().await)
        } else {
            None
        };
        let mode = self.toggled_mode();
        self.set_mode(mode).await?;
        Ok(mode)
    }

    /// Clicks hand their toggle to `spawn`, which must drive it on the local event loop.
    pub fn activate<S>(self: &Rc<Self>, spawn: S) -> Result<()>
    where
        V: 'static,
        S: Fn(LocalBoxFuture<'static, ()>) + 'static,
    {
        self.surface.prepare(&self.config.label)?;
        let manager = Rc::downgrade(self);
        self.surface.on_click(Box::new(move || {
            let Some(manager) = manager.upgrade() else {
                return;
            };
            spawn(
                async move {
                    if let Err(err) = manager.toggle().await {
                        log::error!("failed to toggle dark mode: {}", err);
                    }
                }
                .boxed_local(),
            );
        }))
    }
}
