use crate::{Error, Result};
use futures_channel::oneshot;
use futures_util::future::LocalBoxFuture;
use std::rc::Rc;

/// One-shot completion handed to a callback-style storage call.
pub type Done<T> = Box<dyn FnOnce(Result<T>)>;

/// Extension storage area that reports completion through a callback.
pub trait CallbackArea {
    fn get(&self, key: &str, done: Done<Option<String>>);
    fn set(&self, key: &str, value: &str, done: Done<()>);
}

/// Extension storage area whose calls return something awaitable.
pub trait PromiseArea {
    fn get(&self, key: &str) -> LocalBoxFuture<'static, Result<Option<String>>>;
    fn set(&self, key: &str, value: &str) -> LocalBoxFuture<'static, Result<()>>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ApiFamily {
    Callback,
    Promise,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum Scope {
    Local,
    Session,
}

/// The extension storage API found on the host, with whichever areas it has.
#[derive(Clone)]
pub enum ExtensionApi {
    Callback {
        local: Option<Rc<dyn CallbackArea>>,
        session: Option<Rc<dyn CallbackArea>>,
    },
    Promise {
        local: Option<Rc<dyn PromiseArea>>,
        session: Option<Rc<dyn PromiseArea>>,
    },
}

impl ExtensionApi {
    pub fn family(&self) -> ApiFamily {
        match self {
            Self::Callback { .. } => ApiFamily::Callback,
            Self::Promise { .. } => ApiFamily::Promise,
        }
    }

    pub(super) fn route(&self, scope: Scope) -> Option<super::Route> {
        use super::Route;
        match (self, scope) {
            (Self::Callback { local, .. }, Scope::Local) => local.clone().map(Route::Callback),
            (Self::Callback { session, .. }, Scope::Session) => {
                session.clone().map(Route::Callback)
            }
            (Self::Promise { local, .. }, Scope::Local) => local.clone().map(Route::Promise),
            (Self::Promise { session, .. }, Scope::Session) => session.clone().map(Route::Promise),
        }
    }
}

/// Turn a callback-style call into a future that resolves once `done` fires.
pub(super) async fn settle<T: 'static>(start: impl FnOnce(Done<T>)) -> Result<T> {
    let (tx, rx) = oneshot::channel();
    start(Box::new(move |result| {
        // nobody is waiting any more, the result has nowhere to go
        let _ = tx.send(result);
    }));
    rx.await.map_err(|_| Error::Cancelled)?
}
