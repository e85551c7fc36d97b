pub mod columns;
pub mod context;
pub mod error;
pub mod favorites;
pub mod hierarchy;
pub mod launcher;
pub mod logging;
pub mod matcher;
pub mod opener;
pub mod ranking;
pub mod recents;
pub mod search;
pub mod settings;
pub mod storage;
pub mod store;

pub use error::{LauncherError, Result};
pub use launcher::{Launcher, Renderer, Snapshot};
