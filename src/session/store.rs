//! Session token persistence
//!
//! The browser client kept the token in localStorage under a fixed
//! "jwtToken" key and poked other components with a synthetic storage
//! event. Here the same contract is an injected trait: `get`/`set`/`clear`
//! plus an `on_change` observer that fires after every mutation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::AppResult;

/// Callback invoked after the stored token changes. No payload: listeners
/// re-read the store themselves ("recheck now" semantics).
pub type ChangeListener = Box<dyn Fn() + Send + Sync>;

/// Storage for the session token.
///
/// Mutations notify same-process subscribers synchronously, in the
/// caller's context. Callbacks may mutate the store again (the
/// inspector's self-healing delete does exactly that), so notification
/// must tolerate re-entry.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    fn get(&self) -> AppResult<Option<String>>;
    fn set(&self, token: &str) -> AppResult<()>;
    fn clear(&self) -> AppResult<()>;
    fn on_change(&self, listener: ChangeListener);
}

#[derive(Default)]
struct Watchers {
    listeners: Mutex<Vec<Arc<dyn Fn() + Send + Sync>>>,
}

impl Watchers {
    fn subscribe(&self, listener: ChangeListener) {
        self.listeners.lock().unwrap().push(Arc::from(listener));
    }

    fn notify(&self) {
        // Snapshot under the lock, invoke outside it: a callback may
        // re-enter notify() (listener -> inspector -> clear) or subscribe
        let listeners = self.listeners.lock().unwrap().clone();
        for listener in listeners {
            listener();
        }
    }
}

/// In-process store, the default for tests and embedded use
#[derive(Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
    watchers: Watchers,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> AppResult<Option<String>> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn set(&self, token: &str) -> AppResult<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        self.watchers.notify();
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        let had_token = self.token.lock().unwrap().take().is_some();
        if had_token {
            self.watchers.notify();
        }
        Ok(())
    }

    fn on_change(&self, listener: ChangeListener) {
        self.watchers.subscribe(listener);
    }
}

/// File-backed store, the native analog of the browser's localStorage
/// entry.
///
/// Known limitation: another process sharing the same token file only
/// observes a change on its own next read (e.g. next navigation); change
/// notifications do not cross process boundaries.
pub struct FileSessionStore {
    path: PathBuf,
    watchers: Watchers,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            watchers: Watchers::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> AppResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(token) if token.is_empty() => Ok(None),
            Ok(token) => Ok(Some(token)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, token: &str) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        self.watchers.notify();
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                self.watchers.notify();
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn on_change(&self, listener: ChangeListener) {
        self.watchers.subscribe(listener);
    }
}
