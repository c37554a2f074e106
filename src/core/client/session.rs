//! Shared cookie/crumb state.

use crate::core::transport::Cookie;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};

/// Where a session is in the crumb lifecycle.
///
/// `Absent -> Fetching -> Present`. A failed fetch goes back to `Absent`; `Present` only
/// ends through [`Session::clear`] or [`Session::clear_crumb`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrumbState {
    Absent,
    Fetching,
    Present,
}

#[derive(Debug, Default)]
struct Credentials {
    cookie: Option<Cookie>,
    crumb: Option<String>,
}

/// Authentication state shared by every handle of a client.
///
/// Cloning a `Session` yields another handle to the same state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: Arc<RwLock<Credentials>>,
    // Held for the whole cookie+crumb sequence so concurrent callers fetch once.
    fetch_lock: Arc<Mutex<()>>,
}

impl Session {
    /// Creates a session with no cookie and no crumb.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session that is already authenticated.
    pub fn with_credentials(cookie: Option<Cookie>, crumb: impl Into<String>) -> Self {
        Self {
            state: Arc::new(RwLock::new(Credentials {
                cookie,
                crumb: Some(crumb.into()),
            })),
            fetch_lock: Arc::default(),
        }
    }

    pub async fn cookie(&self) -> Option<Cookie> {
        self.state.read().await.cookie.clone()
    }

    pub async fn crumb(&self) -> Option<String> {
        self.state.read().await.crumb.clone()
    }

    pub async fn state(&self) -> CrumbState {
        if self.state.read().await.crumb.is_some() {
            CrumbState::Present
        } else if self.fetch_lock.try_lock().is_err() {
            CrumbState::Fetching
        } else {
            CrumbState::Absent
        }
    }

    /// Drops both the cookie and the crumb.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.cookie = None;
        state.crumb = None;
    }

    /// Drops the crumb but keeps the cookie.
    pub async fn clear_crumb(&self) {
        self.state.write().await.crumb = None;
    }

    pub(crate) async fn set_cookie(&self, cookie: Cookie) {
        self.state.write().await.cookie = Some(cookie);
    }

    pub(crate) async fn set_crumb(&self, crumb: String) {
        self.state.write().await.crumb = Some(crumb);
    }

    pub(crate) async fn lock_fetch(&self) -> MutexGuard<'_, ()> {
        self.fetch_lock.lock().await
    }
}
