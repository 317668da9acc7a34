//! Cache module - in-process caching using Moka.
//!
//! A thin typed wrapper over a Moka LRU cache plus a small config
//! struct. The gating layer uses a single cache domain (per-chat admin
//! lists), so there is no registry here; embedders that need more
//! domains create additional `TypedCache` instances themselves.

mod config;
mod typed;

pub use config::CacheConfig;
pub use typed::TypedCache;
