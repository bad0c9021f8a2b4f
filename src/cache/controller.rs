//! The offline cache controller.
//!
//! A lifecycle-driven interceptor that precaches the app shell on install,
//! garbage-collects stale cache regions on activation, and arbitrates every
//! intercepted request between cache and network. Request handling never
//! fails: every branch resolves to some response.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use super::clients::WindowRegistry;
use super::fetch::{Method, NetworkFetch, Request, Response};
use super::store::{CacheError, CacheStore};
use crate::notify::PushPayload;

/// Paths guaranteed precached on install
pub const APP_SHELL: &[&str] = &["/", "/index.html", "/manifest.webmanifest"];

/// The entry document served for all navigations
const SHELL_DOCUMENT: &str = "/index.html";

/// Lifecycle of one installed controller instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Precaching the app shell
    Installing,
    /// Installed, ready to supersede the previously active instance
    Waiting,
    /// Garbage-collecting stale regions and claiming windows
    Activating,
    /// Intercepting requests
    Active,
}

/// Control messages the foreground application can post to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum ControlMessage {
    /// Force a waiting instance to activate without waiting for open pages
    /// to close
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
}

/// Errors from lifecycle operations
///
/// Fetch arbitration never returns these; only install/activate can fail,
/// which leaves the previous instance in control.
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Cache storage error: {0}")]
    Cache(#[from] CacheError),

    #[error("Failed to precache {path}: {reason}")]
    Precache { path: String, reason: String },

    #[error("Invalid shell URL: {0}")]
    ShellUrl(#[from] url::ParseError),
}

/// The cache controller
///
/// Generic over its two seams: the cache region store and the network.
/// The version string names this deployment's cache region; activation
/// deletes every region carrying any other name.
pub struct CacheController<C, N> {
    version: String,
    origin: Url,
    state: LifecycleState,
    caches: Arc<C>,
    network: Arc<N>,
    windows: Arc<WindowRegistry>,
}

impl<C, N> CacheController<C, N>
where
    C: CacheStore + 'static,
    N: NetworkFetch + 'static,
{
    /// Create a new controller instance in the Installing state
    pub fn new(
        version: impl Into<String>,
        origin: Url,
        caches: Arc<C>,
        network: Arc<N>,
        windows: Arc<WindowRegistry>,
    ) -> Self {
        Self {
            version: version.into(),
            origin,
            state: LifecycleState::Installing,
            caches,
            network,
            windows,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The version string tagging this instance's cache region
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Install: open the versioned region and precache the app shell
    ///
    /// Any precache failure fails the install and leaves the previous
    /// instance in place. On success the instance is Waiting and has already
    /// requested immediate supersession, so the caller may activate at once.
    pub async fn install(&mut self) -> Result<(), ControllerError> {
        self.state = LifecycleState::Installing;
        self.caches.open(&self.version).await?;

        for path in APP_SHELL {
            let url = self.origin.join(path)?;
            let request = Request::get(url);

            let response = self
                .network
                .fetch(&request)
                .await
                .map_err(|e| ControllerError::Precache {
                    path: path.to_string(),
                    reason: e.to_string(),
                })?;

            if !response.is_cache_safe() {
                return Err(ControllerError::Precache {
                    path: path.to_string(),
                    reason: format!("status {}", response.status),
                });
            }

            self.caches.put(&self.version, path, response).await?;
        }

        self.state = LifecycleState::Waiting;
        tracing::info!("Installed controller {} ({} shell assets)", self.version, APP_SHELL.len());
        Ok(())
    }

    /// Activate: delete every region not matching this version, then claim
    /// all open windows
    pub async fn activate(&mut self) -> Result<(), ControllerError> {
        self.state = LifecycleState::Activating;

        for name in self.caches.region_names().await? {
            if name != self.version {
                self.caches.delete_region(&name).await?;
                tracing::info!("Deleted stale cache region {}", name);
            }
        }

        self.windows.claim_all(&self.version);
        self.state = LifecycleState::Active;
        tracing::info!("Controller {} active", self.version);
        Ok(())
    }

    /// Handle a control message from the foreground application
    pub async fn handle_message(&mut self, message: ControlMessage) -> Result<(), ControllerError> {
        match message {
            ControlMessage::SkipWaiting => {
                if self.state == LifecycleState::Waiting {
                    self.activate().await?;
                }
                Ok(())
            }
        }
    }

    /// Arbitrate one intercepted request
    ///
    /// The decision is deterministic in the request's method, origin, and
    /// navigation mode. Never fails; worst case is a synthesized fallback.
    pub async fn handle_fetch(&self, request: &Request) -> Response {
        if self.state != LifecycleState::Active {
            return self.pass_through(request).await;
        }

        if request.method != Method::Get {
            return self.pass_through(request).await;
        }

        if request.url.origin() != self.origin.origin() {
            return self.pass_through(request).await;
        }

        if request.navigate {
            return self.navigate_shell().await;
        }

        self.stale_while_revalidate(request).await
    }

    /// Deep-link dispatch for a clicked notification
    ///
    /// Resolves the target URL from the payload (default "/"), navigates an
    /// existing window if one is open, or opens a new one. Returns the id of
    /// the window showing the target.
    pub fn handle_notification_click(&self, payload: &PushPayload) -> u32 {
        let url = payload.target_url();
        tracing::debug!("Notification click -> {}", url);
        self.windows.navigate_or_open(url)
    }

    /// No interception: forward to the network as-is
    async fn pass_through(&self, request: &Request) -> Response {
        match self.network.fetch(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Pass-through fetch failed for {}: {}", request.url, e);
                Response::network_error()
            }
        }
    }

    /// Cache-first with network fallback on the shell entry document
    async fn navigate_shell(&self) -> Response {
        match self.caches.get(&self.version, SHELL_DOCUMENT).await {
            Ok(Some(cached)) => return cached,
            Ok(None) => {}
            Err(e) => tracing::warn!("Cache lookup failed for shell document: {}", e),
        }

        let request = match self.origin.join(SHELL_DOCUMENT) {
            Ok(url) => Request::get(url),
            Err(e) => {
                tracing::warn!("Cannot build shell URL: {}", e);
                return Response::offline_page();
            }
        };

        match self.network.fetch(&request).await {
            Ok(response) => {
                if response.is_cache_safe() {
                    if let Err(e) = self
                        .caches
                        .put(&self.version, SHELL_DOCUMENT, response.clone())
                        .await
                    {
                        tracing::warn!("Failed to cache shell document: {}", e);
                    }
                }
                response
            }
            Err(e) => {
                tracing::debug!("Shell fetch failed, serving offline page: {}", e);
                Response::offline_page()
            }
        }
    }

    /// Stale-while-revalidate for same-origin GETs
    ///
    /// A cache hit is returned immediately and refreshed in the background;
    /// a miss waits on the network. Latency always wins over freshness.
    async fn stale_while_revalidate(&self, request: &Request) -> Response {
        let key = request.cache_key();

        let cached = match self.caches.get(&self.version, &key).await {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!("Cache lookup failed for {}: {}", key, e);
                None
            }
        };

        if let Some(hit) = cached {
            self.spawn_revalidation(request.clone(), key);
            return hit;
        }

        self.fetch_and_cache(request, &key).await
    }

    /// Background refresh of a cached key; failures only mean the next
    /// request still sees the stale value
    fn spawn_revalidation(&self, request: Request, key: String) {
        let caches = Arc::clone(&self.caches);
        let network = Arc::clone(&self.network);
        let version = self.version.clone();

        tokio::spawn(async move {
            match network.fetch(&request).await {
                Ok(response) if response.is_cache_safe() => {
                    if let Err(e) = caches.put(&version, &key, response).await {
                        tracing::warn!("Failed to refresh cache for {}: {}", key, e);
                    }
                }
                Ok(response) => {
                    tracing::debug!(
                        "Skipping cache write for {} (status {})",
                        key,
                        response.status
                    );
                }
                Err(e) => {
                    tracing::debug!("Background refresh failed for {}: {}", key, e);
                }
            }
        });
    }

    /// Network fetch for a cache miss, storing the response when safe
    async fn fetch_and_cache(&self, request: &Request, key: &str) -> Response {
        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_cache_safe() {
                    if let Err(e) = self.caches.put(&self.version, key, response.clone()).await {
                        tracing::warn!("Failed to cache {}: {}", key, e);
                    }
                } else {
                    tracing::debug!("Skipping cache write for {} (status {})", key, response.status);
                }
                response
            }
            Err(e) => {
                tracing::debug!("Fetch failed for {} with no cache: {}", key, e);
                Response::gateway_timeout()
            }
        }
    }
}
