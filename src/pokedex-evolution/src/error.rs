//! Error types for pokedex-evolution.

use thiserror::Error;

/// Result type for evolution resolution.
pub type EvolutionResult<T> = std::result::Result<T, EvolutionError>;

/// Errors raised by the fetch layer, configuration and the regional supplier.
///
/// The resolver itself never returns these to its caller; they are folded into
/// [`crate::Resolution`] or degraded to empty data.
#[derive(Debug, Error)]
pub enum EvolutionError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned error {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid resource URL: {url}")]
    InvalidResourceUrl { url: String },

    #[error("Not a regional form name: {name}")]
    NotRegional { name: String },

    #[error("Failed to load config: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Resolution cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EvolutionError {
    /// Check if this error came from the transport or the remote server.
    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Network(_) | Self::HttpStatus { .. })
    }

    /// Check if the remote server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HttpStatus { status: 404, .. })
    }
}

impl From<toml::de::Error> for EvolutionError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}
