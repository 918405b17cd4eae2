use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The settings of a [`RestrictedClient`](crate::RestrictedClient).
///
/// Deserializes from camelCase keys, with `requestTimeout` written as a human readable duration:
///
/// ```json
/// {
///     "maxConcurrentRequests": 10,
///     "requestTimeout": "5s",
///     "skipCertificateValidation": true
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// The maximum number of requests inflight at once.
    #[serde(alias = "maxSimultaneousRequests")]
    pub max_concurrent_requests: usize,
    /// The maximum duration of a single request.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub skip_certificate_validation: bool,
}

impl Config {
    /// Constructs a [`Config`] which validates certificates.
    pub fn new(max_concurrent_requests: usize, request_timeout: Duration) -> Self {
        Self {
            max_concurrent_requests,
            request_timeout,
            skip_certificate_validation: false,
        }
    }

    /// Sets [`Config::skip_certificate_validation`].
    pub fn skip_certificate_validation(mut self, skip: bool) -> Self {
        self.skip_certificate_validation = skip;
        self
    }

    /// Checks every field, reporting the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::InvalidConcurrencyLimit);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    /// Parses and validates a JSON document. A `null` document is a
    /// [`ConfigError::NullConfiguration`].
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Option<Self> = serde_json::from_str(s)?;
        Self::validated(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        Self::validated(Some(config))
    }

    /// Reads a `.json` or `.toml` file, chosen by extension, then validates it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Self::from_json_str(&fs::read_to_string(path)?),
            Some("toml") => Self::from_toml_str(&fs::read_to_string(path)?),
            _ => Err(ConfigError::UnsupportedFormat(extension)),
        }
    }

    pub(crate) fn validated(config: Option<Self>) -> Result<Self, ConfigError> {
        let config = config.ok_or(ConfigError::NullConfiguration)?;
        config.validate()?;
        Ok(config)
    }
}
