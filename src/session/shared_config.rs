//! Configuration handle shared between the config collaborator and sessions.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::session::SelectorConfig;

/// Cloneable handle to the latest configuration.
///
/// The config collaborator may `replace` at any time; sessions only read it
/// when they start or restart, so a running window never sees new values.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<SelectorConfig>>,
}

impl SharedConfig {
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub fn snapshot(&self) -> SelectorConfig {
        self.inner.read().clone()
    }

    pub fn replace(&self, config: SelectorConfig) {
        *self.inner.write() = config;
    }

    /// Edit in place under the write lock.
    pub fn update<F: FnOnce(&mut SelectorConfig)>(&self, f: F) {
        f(&mut self.inner.write());
    }
}
