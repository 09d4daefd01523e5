//! Host doubles shared by the unit tests.

use crate::storage::{CallbackArea, Done, KeyValueStore, MemoryStore, PromiseArea};
use crate::{Error, Result, Surface};
use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

/// Page store that counts writes.
#[derive(Debug, Default)]
pub(crate) struct CountingStore {
    inner: MemoryStore,
    writes: Cell<usize>,
}

impl CountingStore {
    pub(crate) fn stored(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    pub(crate) fn insert(&self, key: &str, value: &str) {
        self.inner.insert(key, value);
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl KeyValueStore for CountingStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        self.inner.set_item(key, value)
    }
}

/// Callback-style area that either answers at once or holds every call until flushed.
#[derive(Default)]
pub(crate) struct ManualCallbackArea {
    items: Rc<MemoryStore>,
    immediate: bool,
    pending: RefCell<Vec<Box<dyn FnOnce()>>>,
    calls: Cell<usize>,
    writes: Rc<Cell<usize>>,
}

impl ManualCallbackArea {
    pub(crate) fn immediate() -> Self {
        Self {
            immediate: true,
            ..Self::default()
        }
    }

    pub(crate) fn stored(&self, key: &str) -> Option<String> {
        self.items.get(key)
    }

    pub(crate) fn insert(&self, key: &str, value: &str) {
        self.items.insert(key, value);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes.get()
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Settle held calls in the order they were made.
    pub(crate) fn flush(&self) {
        let pending = self.pending.take();
        for call in pending {
            call();
        }
    }

    /// Settle held calls newest first.
    pub(crate) fn flush_reversed(&self) {
        let pending = self.pending.take();
        for call in pending.into_iter().rev() {
            call();
        }
    }

    pub(crate) fn drop_pending(&self) {
        self.pending.borrow_mut().clear();
    }

    fn run(&self, call: Box<dyn FnOnce()>) {
        self.calls.set(self.calls.get() + 1);
        if self.immediate {
            call();
        } else {
            self.pending.borrow_mut().push(call);
        }
    }
}

impl CallbackArea for ManualCallbackArea {
    fn get(&self, key: &str, done: Done<Option<String>>) {
        let items = Rc::clone(&self.items);
        let key = key.to_string();
        self.run(Box::new(move || done(Ok(items.get(&key)))));
    }

    fn set(&self, key: &str, value: &str, done: Done<()>) {
        let (items, writes) = (Rc::clone(&self.items), Rc::clone(&self.writes));
        let (key, value) = (key.to_string(), value.to_string());
        self.run(Box::new(move || {
            writes.set(writes.get() + 1);
            items.insert(&key, &value);
            done(Ok(()))
        }));
    }
}

/// Promise-style area that settles immediately, or rejects every call.
#[derive(Debug, Default)]
pub(crate) struct PromiseStore {
    items: MemoryStore,
    failure: Option<String>,
    writes: Cell<usize>,
}

impl PromiseStore {
    pub(crate) fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn stored(&self, key: &str) -> Option<String> {
        self.items.get(key)
    }

    pub(crate) fn insert(&self, key: &str, value: &str) {
        self.items.insert(key, value);
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes.get()
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(reason) => Err(Error::Storage(reason.clone())),
            None => Ok(()),
        }
    }
}

impl PromiseArea for PromiseStore {
    fn get(&self, key: &str) -> LocalBoxFuture<'static, Result<Option<String>>> {
        let result = self.check().map(|()| self.items.get(key));
        future::ready(result).boxed_local()
    }

    fn set(&self, key: &str, value: &str) -> LocalBoxFuture<'static, Result<()>> {
        let result = self.check().map(|()| {
            self.writes.set(self.writes.get() + 1);
            self.items.insert(key, value);
        });
        future::ready(result).boxed_local()
    }
}

#[derive(Debug, Default)]
pub(crate) struct SurfaceState {
    pub classes: BTreeSet<String>,
    pub marker: Option<String>,
    pub glyph: Option<String>,
    pub label: Option<String>,
}

/// Toggle element plus class element, observable from the test.
#[derive(Clone, Default)]
pub(crate) struct FakeSurface {
    state: Rc<RefCell<SurfaceState>>,
    handlers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
    broken: bool,
}

impl FakeSurface {
    pub(crate) fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub(crate) fn has_class(&self, class_name: &str) -> bool {
        self.state.borrow().classes.contains(class_name)
    }

    pub(crate) fn marker(&self) -> Option<String> {
        self.state.borrow().marker.clone()
    }

    pub(crate) fn glyph(&self) -> Option<String> {
        self.state.borrow().glyph.clone()
    }

    pub(crate) fn label(&self) -> Option<String> {
        self.state.borrow().label.clone()
    }

    pub(crate) fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub(crate) fn click(&self) {
        let handlers = self.handlers.borrow().clone();
        for handler in handlers {
            handler();
        }
    }

    /// Class, marker and glyph all agree on one mode.
    pub(crate) fn assert_dark(&self, dark: bool) {
        assert_eq!(self.has_class("dark-mode"), dark);
        let (marker, glyph) = if dark { ("1", "☾") } else { ("0", "☀") };
        assert_eq!(self.marker().as_deref(), Some(marker));
        assert_eq!(self.glyph().as_deref(), Some(glyph));
    }
}

impl Surface for FakeSurface {
    fn set_class(&self, class_name: &str, present: bool) -> Result<()> {
        if self.broken {
            return Err(Error::Document("element is gone".to_string()));
        }
        let mut state = self.state.borrow_mut();
        if present {
            state.classes.insert(class_name.to_string());
        } else {
            state.classes.remove(class_name);
        }
        Ok(())
    }

    fn set_marker(&self, marker: &str) -> Result<()> {
        self.state.borrow_mut().marker = Some(marker.to_string());
        Ok(())
    }

    fn set_glyph(&self, glyph: &str) -> Result<()> {
        self.state.borrow_mut().glyph = Some(glyph.to_string());
        Ok(())
    }

    fn prepare(&self, label: &str) -> Result<()> {
        self.state.borrow_mut().label = Some(label.to_string());
        Ok(())
    }

    fn on_click(&self, handler: Box<dyn Fn()>) -> Result<()> {
        self.handlers.borrow_mut().push(Rc::from(handler));
        Ok(())
    }
}
