use std::io;

use crate::gate::MaxConcurrencyReached;

/// A configuration could not be loaded or is invalid.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No configuration was supplied.
    #[error("configuration is null")]
    NullConfiguration,
    /// The maximum number of concurrent requests is zero.
    #[error("the number of concurrent requests is invalid")]
    InvalidConcurrencyLimit,
    /// The request timeout is zero.
    #[error("the request timeout is invalid")]
    InvalidTimeout,
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] io::Error),
    /// The JSON document is malformed or has the wrong shape.
    #[error("malformed JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// The TOML document is malformed or has the wrong shape.
    #[error("malformed TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
    /// The file extension is neither `json` nor `toml`.
    #[error("unsupported configuration format: {0:?}")]
    UnsupportedFormat(Option<String>),
}

/// A [`RestrictedClient`](crate::RestrictedClient) could not be constructed.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The underlying HTTP client could not be built.
    #[error("failed to build the HTTP client: {0}")]
    Transport(#[source] reqwest::Error),
}

/// A request made through a [`RestrictedClient`](crate::RestrictedClient) failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request was rejected without being sent because the ceiling was reached.
    #[error("the maximum number of concurrent requests was reached")]
    MaxConcurrencyReached,
    /// The underlying HTTP client failed.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl From<MaxConcurrencyReached> for Error {
    fn from(_: MaxConcurrencyReached) -> Self {
        Error::MaxConcurrencyReached
    }
}

impl Error {
    /// Returns `true` if the request was rejected by the admission gate.
    pub fn is_max_concurrency_reached(&self) -> bool {
        matches!(self, Error::MaxConcurrencyReached)
    }
}
