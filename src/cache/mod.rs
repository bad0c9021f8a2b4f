//! Offline cache controller subsystem.
//!
//! Makes the application usable without network connectivity: a versioned
//! cache of the app shell, cache-first navigations, stale-while-revalidate
//! for same-origin assets, and pass-through for everything else. The
//! controller is schema-agnostic; store data travels through it like any
//! other same-origin traffic.

pub mod fetch;
pub mod store;
pub mod clients;
pub mod controller;

pub use fetch::{FetchError, Method, NetworkFetch, Request, Response, ResponseKind};
pub use store::{CacheError, CacheStore, MemoryCacheStore};
pub use clients::{ClientWindow, WindowRegistry};
pub use controller::{CacheController, ControlMessage, ControllerError, LifecycleState, APP_SHELL};
