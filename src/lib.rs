//! DataOps Copilot: LLM-backed code generation API with a Redis
//! response cache.
//!
//! The gateway ([`gateway::LlmGateway`]) is the single path between the
//! HTTP handlers and the text-generation provider; the cache
//! ([`cache::CacheStore`]) sits transparently around code generation
//! and degrades to a no-op when Redis is unreachable.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod providers;
