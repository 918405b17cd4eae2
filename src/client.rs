use std::{path::Path, time::Duration};

use parking_lot::RwLock;
use reqwest::{
    header::CONTENT_TYPE, Body, Client, IntoUrl, Method, Request, RequestBuilder, Response,
};
use serde::Serialize;

use crate::{
    error::{BuildError, ConfigError, Error},
    gate::AdmissionGate,
    load::Load,
    Config,
};

/// The underlying HTTP client.
///
/// Holds the pooled [`Client`] behind a lock so that the pool can be swapped out by
/// [`RestrictedClient::close_idle_connections`].
#[derive(Debug)]
pub(crate) struct Transport {
    client: RwLock<Client>,
    timeout: Duration,
    skip_certificate_validation: bool,
}

impl Transport {
    fn new(timeout: Duration, skip_certificate_validation: bool) -> reqwest::Result<Self> {
        Ok(Self {
            client: RwLock::new(build_client(timeout, skip_certificate_validation)?),
            timeout,
            skip_certificate_validation,
        })
    }

    fn client(&self) -> Client {
        self.client.read().clone()
    }

    fn reset(&self) -> reqwest::Result<()> {
        let client = build_client(self.timeout, self.skip_certificate_validation)?;
        *self.client.write() = client;
        Ok(())
    }
}

fn build_client(timeout: Duration, skip_certificate_validation: bool) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(skip_certificate_validation)
        .build()
}

/// An HTTP client which rejects requests once
/// [`Config::max_concurrent_requests`] are inflight.
///
/// Every request method first tries to take a slot from its [`AdmissionGate`](crate::AdmissionGate).
/// When none is available it returns [`Error::MaxConcurrencyReached`] immediately and nothing is
/// sent. Otherwise the request is forwarded to the underlying [`reqwest::Client`] and the slot is
/// held until the response headers arrive, the request fails, or the returned future is dropped.
///
/// Non-2xx statuses are ordinary responses, not errors.
///
/// The request futures are `Send`, so a shared client can be called from spawned tasks.
#[derive(Debug)]
pub struct RestrictedClient {
    transport: Transport,
    gate: AdmissionGate,
}

impl RestrictedClient {
    /// Validates `config` and builds the underlying HTTP client.
    pub fn new(config: Config) -> Result<Self, BuildError> {
        config.validate()?;
        let transport = Transport::new(config.request_timeout, config.skip_certificate_validation)
            .map_err(BuildError::Transport)?;
        tracing::debug!(
            ceiling = config.max_concurrent_requests,
            timeout = ?config.request_timeout,
            skip_certificate_validation = config.skip_certificate_validation,
            "constructed restricted client"
        );
        Ok(Self {
            transport,
            gate: AdmissionGate::new(config.max_concurrent_requests),
        })
    }

    /// As [`RestrictedClient::new`], reporting a missing configuration as
    /// [`ConfigError::NullConfiguration`].
    pub fn from_config(config: Option<Config>) -> Result<Self, BuildError> {
        Self::new(config.ok_or(ConfigError::NullConfiguration)?)
    }

    /// Loads the configuration with [`Config::from_path`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BuildError> {
        Self::new(Config::from_path(path)?)
    }

    /// Sends a `GET` request.
    pub async fn get<U: IntoUrl>(&self, url: U) -> Result<Response, Error> {
        self.dispatch(self.transport().client().get(url)).await
    }

    /// Sends a prepared [`Request`], typically built with [`RestrictedClient::request`].
    pub async fn execute(&self, request: Request) -> Result<Response, Error> {
        self.dispatch(RequestBuilder::from_parts(self.transport().client(), request))
            .await
    }

    /// Sends a `POST` request with the given `Content-Type` and body.
    pub async fn post<U: IntoUrl>(
        &self,
        url: U,
        content_type: &str,
        body: impl Into<Body>,
    ) -> Result<Response, Error> {
        let request = self
            .transport()
            .client()
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body);
        self.dispatch(request).await
    }

    /// Sends a `POST` request with `form` encoded as `application/x-www-form-urlencoded`.
    pub async fn post_form<U: IntoUrl, T: Serialize + ?Sized>(
        &self,
        url: U,
        form: &T,
    ) -> Result<Response, Error> {
        self.dispatch(self.transport().client().post(url).form(form))
            .await
    }

    /// Sends a `HEAD` request.
    pub async fn head<U: IntoUrl>(&self, url: U) -> Result<Response, Error> {
        self.dispatch(self.transport().client().head(url)).await
    }

    /// Starts building a [`Request`] for [`RestrictedClient::execute`]. Building does not take a
    /// slot.
    pub fn request<U: IntoUrl>(&self, method: Method, url: U) -> RequestBuilder {
        self.transport().client().request(method, url)
    }

    /// Drops the idle connections of the underlying pool.
    ///
    /// The pool is replaced by a fresh one. Inflight requests finish on the connections they
    /// already hold. This does not interact with the admission gate.
    pub fn close_idle_connections(&self) {
        match self.transport().reset() {
            Ok(()) => tracing::debug!("replaced connection pool"),
            Err(error) => tracing::warn!(%error, "failed to replace connection pool"),
        }
    }

    /// The number of requests currently inflight.
    pub fn in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    /// The maximum number of requests inflight at once.
    pub fn ceiling(&self) -> usize {
        self.gate.ceiling()
    }

    fn transport(&self) -> &Transport {
        &self.transport
    }

    // Calls the gate directly rather than through `Service`, whose `async fn`s cannot promise
    // `Send` futures.
    async fn dispatch(&self, request: RequestBuilder) -> Result<Response, Error> {
        let admission = self.gate.try_acquire()?;
        let response = request.send().await;
        admission.release();
        response.map_err(|error| {
            tracing::debug!(%error, "request failed");
            Error::Transport(error)
        })
    }
}

impl Load for RestrictedClient {
    type Metric = usize;

    fn load(&self) -> Self::Metric {
        self.gate.in_flight()
    }
}
