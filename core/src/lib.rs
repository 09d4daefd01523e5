//! Dark mode toggling with a persisted preference.
//!
//! [`ModeManager`] keeps a class on a target element in sync with a boolean
//! and writes that boolean through a [`storage::StorageAdapter`]. The document
//! and the storage backends are reached through small host traits so the same
//! logic runs in page scripts, extension content scripts and tests.

pub use config::*;
pub use error::*;
pub use manager::*;
pub use mode::*;
pub use setup::*;

pub mod storage;

mod config;
mod error;
mod manager;
mod mode;
mod setup;

#[cfg(test)]
mod testing;
