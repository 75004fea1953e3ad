//! Response caching over an external Redis store with per-key TTL.

pub mod store;

pub use store::{CacheStore, RedisCacheStore};
