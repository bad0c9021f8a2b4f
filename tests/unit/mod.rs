/// Unit test root covering store semantics and cache arbitration
mod store_semantics;
mod cache_controller;
