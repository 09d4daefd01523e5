use crate::storage::Backends;
use crate::{Config, ExtensionModeManager, PageModeManager, Result, Surface};
use futures_util::future::LocalBoxFuture;
use std::rc::Rc;

/// Entry point for page scripts: restore from storage, then start listening for clicks.
pub fn setup_page<V>(
    surface: V,
    config: Config,
    backends: &Backends,
) -> Result<Rc<PageModeManager<V>>>
where
    V: Surface + 'static,
{
    let manager = Rc::new(PageModeManager::new(surface, config, backends));
    manager.restore()?;
    manager.activate()?;
    Ok(manager)
}

/// Entry point for extension content scripts.
///
/// The storage kind is swapped for its extension counterpart before anything
/// is read, so `local` means the extension's persistent area here.
pub async fn setup_extension<V, S>(
    surface: V,
    config: Config,
    backends: &Backends,
    spawn: S,
) -> Result<Rc<ExtensionModeManager<V>>>
where
    V: Surface + 'static,
    S: Fn(LocalBoxFuture<'static, ()>) + 'static,
{
    let manager = Rc::new(ExtensionModeManager::new(
        surface,
        config.for_extension(),
        backends,
    ));
    manager.restore().await?;
    manager.activate(spawn)?;
    Ok(manager)
}
