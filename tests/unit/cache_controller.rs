/// Cache controller arbitration: lifecycle, garbage collection, strategies
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use mnemo::cache::{
    CacheController, CacheStore, ControlMessage, FetchError, LifecycleState, MemoryCacheStore,
    Method, NetworkFetch, Request, Response, ResponseKind, WindowRegistry, APP_SHELL,
};
use mnemo::notify::{PushData, PushPayload};

/// Scriptable network: routes by path, can go offline or add latency
struct StubNetwork {
    routes: Mutex<HashMap<String, Response>>,
    offline: AtomicBool,
    delay: Mutex<Option<Duration>>,
    fetches: AtomicUsize,
}

impl StubNetwork {
    fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            offline: AtomicBool::new(false),
            delay: Mutex::new(None),
            fetches: AtomicUsize::new(0),
        }
    }

    /// A network that can serve the app shell
    fn with_shell() -> Self {
        let stub = Self::new();
        for path in APP_SHELL {
            stub.route(path, Response::ok_html(format!("shell:{}", path)));
        }
        stub
    }

    fn route(&self, path: &str, response: Response) {
        self.routes.lock().unwrap().insert(path.to_string(), response);
    }

    fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NetworkFetch for StubNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::Unavailable("stub offline".to_string()));
        }

        let hit = self.routes.lock().unwrap().get(request.url.path()).cloned();
        Ok(hit.unwrap_or(Response {
            status: 404,
            kind: ResponseKind::Basic,
            content_type: None,
            body: Vec::new(),
        }))
    }
}

fn origin() -> Url {
    Url::parse("https://mnemo.app/").unwrap()
}

fn same_origin(path: &str) -> Url {
    origin().join(path).unwrap()
}

async fn installed_active(
    version: &str,
    caches: Arc<MemoryCacheStore>,
    network: Arc<StubNetwork>,
    windows: Arc<WindowRegistry>,
) -> CacheController<MemoryCacheStore, StubNetwork> {
    let mut controller = CacheController::new(version, origin(), caches, network, windows);
    controller.install().await.expect("install");
    controller.activate().await.expect("activate");
    controller
}

#[tokio::test]
async fn install_precaches_app_shell() {
    let caches = Arc::new(MemoryCacheStore::new());
    let network = Arc::new(StubNetwork::with_shell());
    let windows = Arc::new(WindowRegistry::new());

    let mut controller = CacheController::new(
        "mnemo-cache-v1",
        origin(),
        Arc::clone(&caches),
        network,
        windows,
    );

    assert_eq!(controller.state(), LifecycleState::Installing);
    controller.install().await.unwrap();
    assert_eq!(controller.state(), LifecycleState::Waiting);

    for path in APP_SHELL {
        let cached = caches.get("mnemo-cache-v1", path).await.unwrap();
        assert!(cached.is_some(), "missing precached {}", path);
    }
}

#[tokio::test]
async fn install_fails_when_shell_unreachable() {
    let caches = Arc::new(MemoryCacheStore::new());
    let network = Arc::new(StubNetwork::new());
    network.set_offline(true);
    let windows = Arc::new(WindowRegistry::new());

    let mut controller =
        CacheController::new("mnemo-cache-v1", origin(), caches, network, windows);
    assert!(controller.install().await.is_err());
}

#[tokio::test]
async fn activation_deletes_stale_cache_regions() {
    let caches = Arc::new(MemoryCacheStore::new());
    caches.open("mnemo-cache-v1").await.unwrap();
    caches
        .put("mnemo-cache-v1", "/old.js", Response::ok("text/javascript", "old"))
        .await
        .unwrap();

    let network = Arc::new(StubNetwork::with_shell());
    let windows = Arc::new(WindowRegistry::new());
    let _controller = installed_active(
        "mnemo-cache-v2",
        Arc::clone(&caches),
        network,
        windows,
    )
    .await;

    let names = caches.region_names().await.unwrap();
    assert_eq!(names, vec!["mnemo-cache-v2"]);
    assert!(caches.get("mnemo-cache-v2", "/index.html").await.unwrap().is_some());
}

#[tokio::test]
async fn skip_waiting_message_activates_waiting_instance() {
    let caches = Arc::new(MemoryCacheStore::new());
    let network = Arc::new(StubNetwork::with_shell());
    let windows = Arc::new(WindowRegistry::new());
    windows.open("/");

    let mut controller = CacheController::new(
        "mnemo-cache-v3",
        origin(),
        caches,
        network,
        Arc::clone(&windows),
    );
    controller.install().await.unwrap();
    assert_eq!(controller.state(), LifecycleState::Waiting);

    controller
        .handle_message(ControlMessage::SkipWaiting)
        .await
        .unwrap();
    assert_eq!(controller.state(), LifecycleState::Active);

    // Activation claimed the open window
    assert_eq!(
        windows.windows()[0].controller.as_deref(),
        Some("mnemo-cache-v3")
    );
}

#[tokio::test]
async fn stale_while_revalidate_serves_cache_before_slow_network() {
    let caches = Arc::new(MemoryCacheStore::new());
    let network = Arc::new(StubNetwork::with_shell());
    let windows = Arc::new(WindowRegistry::new());
    let controller =
        installed_active("v1", Arc::clone(&caches), Arc::clone(&network), windows).await;

    caches
        .put("v1", "/api/habits", Response::ok("application/json", "cached"))
        .await
        .unwrap();

    // The network is far too slow to answer within the assertion window
    network.set_delay(Duration::from_secs(5));

    let request = Request::get(same_origin("/api/habits"));
    let response = tokio::time::timeout(Duration::from_millis(250), controller.handle_fetch(&request))
        .await
        .expect("cached response must not wait on the network");

    assert_eq!(response.body_text(), "cached");
}

#[tokio::test]
async fn stale_while_revalidate_refreshes_in_background() {
    let caches = Arc::new(MemoryCacheStore::new());
    let network = Arc::new(StubNetwork::with_shell());
    let windows = Arc::new(WindowRegistry::new());
    let controller =
        installed_active("v1", Arc::clone(&caches), Arc::clone(&network), windows).await;

    caches
        .put("v1", "/api/habits", Response::ok("application/json", "stale"))
        .await
        .unwrap();
    network.route("/api/habits", Response::ok("application/json", "fresh"));

    let request = Request::get(same_origin("/api/habits"));
    let response = controller.handle_fetch(&request).await;
    assert_eq!(response.body_text(), "stale");

    // Eventually consistent: the background refresh lands for the next caller
    let mut refreshed = false;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        if let Some(hit) = caches.get("v1", "/api/habits").await.unwrap() {
            if hit.body_text() == "fresh" {
                refreshed = true;
                break;
            }
        }
    }
    assert!(refreshed, "background refresh never updated the cache");
}

#[tokio::test]
async fn cache_miss_waits_for_network_and_stores() {
    let caches = Arc::new(MemoryCacheStore::new());
    let network = Arc::new(StubNetwork::with_shell());
    let windows = Arc::new(WindowRegistry::new());
    let controller =
        installed_active("v1", Arc::clone(&caches), Arc::clone(&network), windows).await;

    network.route("/styles.css", Response::ok("text/css", "body{}"));

    let request = Request::get(same_origin("/styles.css"));
    let response = controller.handle_fetch(&request).await;
    assert_eq!(response.body_text(), "body{}");

    let cached = caches.get("v1", "/styles.css").await.unwrap();
    assert_eq!(cached.map(|r| r.body_text()), Some("body{}".to_string()));
}

#[tokio::test]
async fn cache_miss_with_failing_network_synthesizes_empty_response() {
    let caches = Arc::new(MemoryCacheStore::new());
    let network = Arc::new(StubNetwork::with_shell());
    let windows = Arc::new(WindowRegistry::new());
    let controller = installed_active("v1", caches, Arc::clone(&network), windows).await;

    network.set_offline(true);

    let request = Request::get(same_origin("/api/habits"));
    let response = controller.handle_fetch(&request).await;
    assert_eq!(response.status, 504);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn navigation_is_cache_first() {
    let caches = Arc::new(MemoryCacheStore::new());
    let network = Arc::new(StubNetwork::with_shell());
    let windows = Arc::new(WindowRegistry::new());
    let controller =
        installed_active("v1", Arc::clone(&caches), Arc::clone(&network), windows).await;

    // Install already cached the shell; navigation must not hit the network
    let before = network.fetch_count();
    let request = Request::navigation(same_origin("/habit/some-deep-link"));
    let response = controller.handle_fetch(&request).await;

    assert_eq!(response.body_text(), "shell:/index.html");
    assert_eq!(network.fetch_count(), before);
}

#[tokio::test]
async fn navigation_offline_with_no_cache_serves_offline_page() {
    let caches = Arc::new(MemoryCacheStore::new());
    let network = Arc::new(StubNetwork::new());
    network.set_offline(true);
    let windows = Arc::new(WindowRegistry::new());

    // Activate without installing: no precached shell exists
    let mut controller = CacheController::new(
        "v1",
        origin(),
        Arc::clone(&caches),
        Arc::clone(&network),
        windows,
    );
    controller.activate().await.unwrap();

    let request = Request::navigation(same_origin("/"));
    let response = controller.handle_fetch(&request).await;

    assert!(response.body_text().contains("Offline"));
    assert!(response.is_ok());
}

#[tokio::test]
async fn non_get_requests_pass_through_untouched() {
    let caches = Arc::new(MemoryCacheStore::new());
    let network = Arc::new(StubNetwork::with_shell());
    let windows = Arc::new(WindowRegistry::new());
    let controller =
        installed_active("v1", Arc::clone(&caches), Arc::clone(&network), windows).await;

    network.route("/api/log", Response::ok("application/json", "logged"));

    let request = Request::new(Method::Post, same_origin("/api/log"));
    let response = controller.handle_fetch(&request).await;
    assert_eq!(response.body_text(), "logged");

    // No cache write happened
    assert!(caches.get("v1", "/api/log").await.unwrap().is_none());
}

#[tokio::test]
async fn cross_origin_requests_pass_through_untouched() {
    let caches = Arc::new(MemoryCacheStore::new());
    let network = Arc::new(StubNetwork::with_shell());
    let windows = Arc::new(WindowRegistry::new());
    let controller =
        installed_active("v1", Arc::clone(&caches), Arc::clone(&network), windows).await;

    network.route("/lib.js", Response::ok("text/javascript", "lib"));

    let request = Request::get(Url::parse("https://cdn.example.com/lib.js").unwrap());
    let response = controller.handle_fetch(&request).await;
    assert_eq!(response.body_text(), "lib");

    assert!(caches.get("v1", "/lib.js").await.unwrap().is_none());
}

#[tokio::test]
async fn non_ok_and_opaque_responses_are_never_cached() {
    let caches = Arc::new(MemoryCacheStore::new());
    let network = Arc::new(StubNetwork::with_shell());
    let windows = Arc::new(WindowRegistry::new());
    let controller =
        installed_active("v1", Arc::clone(&caches), Arc::clone(&network), windows).await;

    // 404 comes back to the caller but is not stored
    let request = Request::get(same_origin("/missing.png"));
    let response = controller.handle_fetch(&request).await;
    assert_eq!(response.status, 404);
    assert!(caches.get("v1", "/missing.png").await.unwrap().is_none());

    // Opaque responses are not stored either
    network.route(
        "/opaque.bin",
        Response {
            status: 200,
            kind: ResponseKind::Opaque,
            content_type: None,
            body: b"blob".to_vec(),
        },
    );
    let request = Request::get(same_origin("/opaque.bin"));
    let response = controller.handle_fetch(&request).await;
    assert_eq!(response.kind, ResponseKind::Opaque);
    assert!(caches.get("v1", "/opaque.bin").await.unwrap().is_none());
}

#[tokio::test]
async fn pass_through_network_failure_synthesizes_error_response() {
    let caches = Arc::new(MemoryCacheStore::new());
    let network = Arc::new(StubNetwork::with_shell());
    let windows = Arc::new(WindowRegistry::new());
    let controller = installed_active("v1", caches, Arc::clone(&network), windows).await;

    network.set_offline(true);

    let request = Request::new(Method::Post, same_origin("/api/log"));
    let response = controller.handle_fetch(&request).await;
    assert_eq!(response.kind, ResponseKind::Error);
    assert!(!response.is_ok());
}

#[tokio::test]
async fn notification_click_focuses_existing_window() {
    let caches = Arc::new(MemoryCacheStore::new());
    let network = Arc::new(StubNetwork::with_shell());
    let windows = Arc::new(WindowRegistry::new());
    let first = windows.open("/");
    let controller =
        installed_active("v1", caches, network, Arc::clone(&windows)).await;

    let payload = PushPayload {
        notification: None,
        data: Some(PushData {
            url: Some("/habit/reflection".to_string()),
        }),
    };

    let target = controller.handle_notification_click(&payload);
    assert_eq!(target, first);
    assert_eq!(windows.windows()[0].url, "/habit/reflection");
}

#[tokio::test]
async fn notification_click_opens_window_when_none_exist() {
    let caches = Arc::new(MemoryCacheStore::new());
    let network = Arc::new(StubNetwork::with_shell());
    let windows = Arc::new(WindowRegistry::new());
    let controller =
        installed_active("v1", caches, network, Arc::clone(&windows)).await;

    // Default target is the application root
    controller.handle_notification_click(&PushPayload::default());

    let open = windows.windows();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].url, "/");
}
