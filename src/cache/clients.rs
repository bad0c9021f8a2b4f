//! Registry of open client windows controlled by the cache controller.
//!
//! This models the set of open pages the controller claims on activation
//! and dispatches notification deep-links to.

use std::sync::Mutex;

/// One open window showing the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientWindow {
    pub id: u32,
    /// The URL the window currently shows
    pub url: String,
    /// Version string of the controller instance serving this window, once
    /// claimed
    pub controller: Option<String>,
}

/// The set of currently open windows
#[derive(Default)]
pub struct WindowRegistry {
    inner: Mutex<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    windows: Vec<ClientWindow>,
    next_id: u32,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new window at the given URL, returning its id
    pub fn open(&self, url: &str) -> u32 {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let id = inner.next_id;
        inner.next_id += 1;
        inner.windows.push(ClientWindow {
            id,
            url: url.to_string(),
            controller: None,
        });
        tracing::debug!("Opened window {} at {}", id, url);
        id
    }

    /// Claim every open window for the given controller version
    pub fn claim_all(&self, version: &str) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        for window in &mut inner.windows {
            window.controller = Some(version.to_string());
        }
        tracing::debug!("Claimed {} windows for {}", inner.windows.len(), version);
    }

    /// Navigate the first open window to `url`, or open a new one
    ///
    /// Returns the id of the window that ends up showing the URL.
    pub fn navigate_or_open(&self, url: &str) -> u32 {
        {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(window) = inner.windows.first_mut() {
                window.url = url.to_string();
                tracing::debug!("Navigated window {} to {}", window.id, url);
                return window.id;
            }
        }
        self.open(url)
    }

    /// Snapshot of all open windows
    pub fn windows(&self) -> Vec<ClientWindow> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .windows
            .clone()
    }
}
