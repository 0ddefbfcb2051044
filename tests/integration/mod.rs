//! Integration tests for sysdiag
//!
//! Drive the public API end to end: registry, collector, cache decorator
//! and the built-in providers.
//!
//! Run with: cargo test --test integration

mod helpers;

mod builtin;
mod caching;
mod collection;
