//! An HTTP client which bounds the number of inflight requests and _rejects_, rather than queues,
//! requests beyond that bound.
//!
//! The crate is built from two pieces:
//!
//! - An [`AdmissionGate`] which atomically decides whether another request may start.
//! - The [`Service`] abstraction, where backpressure is decided by [`Service::acquire`] and the
//!   resulting [permit](Service::Permit) is consumed by [`Service::call`]. The
//!   [`ServiceExt::restrict`] combinator places an [`AdmissionGate`] in front of any [`Service`].
//!
//! [`RestrictedClient`] is [`Restrict`] applied to a [`reqwest`] transport.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use restricted_http::{Config, Error, RestrictedClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new(3, Duration::from_secs(5));
//! let client = RestrictedClient::new(config)?;
//! match client.get("http://localhost:8080/test").await {
//!     Ok(response) => println!("{}", response.status()),
//!     Err(Error::MaxConcurrencyReached) => println!("too many requests inflight"),
//!     Err(err) => return Err(err.into()),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
pub mod gate;
pub mod load;
mod oneshot;
pub mod restrict;
pub mod service_fn;

pub use client::*;
pub use config::*;
pub use error::*;
pub use gate::{Admission, AdmissionGate, MaxConcurrencyReached};
pub use load::Load;
pub use restrict::Restrict;
pub use service_fn::service_fn;

/// An asynchronous function from `Request` to a [`Service::Response`], split into two phases.
///
/// [`Service::acquire`] obtains a [`Service::Permit`], the right to make exactly one
/// [`Service::call`]. Any resources reserved by the permit are held until the call completes.
pub trait Service<Request> {
    /// The type produced by [`Service::call`].
    type Response;

    /// The type produced by [`Service::acquire`].
    type Permit<'a>
    where
        Self: 'a;

    /// Obtains a [`Service::Permit`].
    async fn acquire(&self) -> Self::Permit<'_>;

    /// Consumes a [`Service::Permit`] to process a request.
    async fn call(permit: Self::Permit<'_>, request: Request) -> Self::Response;
}

/// An extension trait for [`Service`].
pub trait ServiceExt<Request>: Service<Request> {
    /// Acquires a [`Service::Permit`] and then immediately calls [`Service::call`].
    async fn oneshot(&self, request: Request) -> Self::Response
    where
        Self: Sized,
    {
        oneshot::oneshot(request, self).await
    }

    /// Restricts the number of inflight [calls](Service::call) to `ceiling`, rejecting any
    /// [acquisition](Service::acquire) beyond it.
    ///
    /// See the [module](crate::restrict) for more information.
    fn restrict(self, ceiling: usize) -> Restrict<Self>
    where
        Self: Sized,
    {
        Restrict::new(self, ceiling)
    }
}

impl<S, Request> ServiceExt<Request> for S where S: Service<Request> {}
