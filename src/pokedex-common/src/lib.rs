//! Common utilities shared across Pokedex crates.

pub mod cache;
pub mod http_client;

pub use cache::LruCache;
pub use http_client::{
    DEFAULT_TIMEOUT, POOL_IDLE_TIMEOUT, USER_AGENT, create_client_builder,
    create_client_with_timeout,
};
