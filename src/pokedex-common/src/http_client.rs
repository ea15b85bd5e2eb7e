//! HTTP client factory for PokéAPI and sprite requests.
//!
//! Every client carries the same User-Agent, tcp_nodelay and pool settings so
//! that the fetch layer behaves identically regardless of which crate built it.
//! PokéAPI asks consumers to identify themselves, hence the explicit agent.

use reqwest::Client;
use std::time::Duration;

/// User-Agent string for all HTTP requests
pub const USER_AGENT: &str = concat!("pokedex-evolution/", env!("CARGO_PKG_VERSION"));

/// Default timeout for API requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Idle pooled connections are dropped after this long so DNS is re-resolved.
pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Creates an HTTP client with a custom timeout.
///
/// The read timeout is capped at 60s so a truncated body cannot hang a resolve
/// for the whole request timeout.
///
/// # Example
/// ```ignore
/// let client = create_client_with_timeout(Duration::from_secs(10))?;
/// let resp = client.get("https://pokeapi.co/api/v2/pokemon/25").send().await?;
/// ```
pub fn create_client_with_timeout(timeout: Duration) -> Result<Client, String> {
    let read_timeout = timeout.min(Duration::from_secs(60));

    create_client_builder()
        .timeout(timeout)
        .read_timeout(read_timeout)
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {e}"))
}

/// Creates an HTTP client builder with the standard configuration.
///
/// Use this when the client needs further customization before building.
pub fn create_client_builder() -> reqwest::ClientBuilder {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(DEFAULT_TIMEOUT)
        .read_timeout(DEFAULT_TIMEOUT)
        .tcp_nodelay(true)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_with_timeout_succeeds() {
        let result = create_client_with_timeout(Duration::from_secs(5));
        assert!(result.is_ok(), "create_client_with_timeout should succeed");
    }

    #[test]
    fn test_create_client_builder_returns_builder() {
        let result = create_client_builder().build();
        assert!(
            result.is_ok(),
            "create_client_builder should return valid builder"
        );
    }

    #[test]
    fn test_user_agent_identifies_crate() {
        assert!(USER_AGENT.starts_with("pokedex-evolution/"));
    }
}
