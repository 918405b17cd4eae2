//! The [`ServiceExt::restrict`](crate::ServiceExt::restrict) combinator returns [`Restrict`] which
//! restricts the number of inflight [calls](Service::call) to a specified ceiling.
//!
//! Unlike a semaphore, [`Restrict`] never waits. When the ceiling has been reached its
//! [`Service::acquire`] resolves immediately to a rejected permit and the subsequent
//! [`Service::call`] returns [`MaxConcurrencyReached`] without touching the inner service.
//!
//! # Example
//!
//! ```rust
//! use restricted_http::*;
//! # use tokio::{join, time::sleep};
//! # use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let svc = service_fn(|x| async move {
//!     sleep(Duration::from_millis(100)).await;
//!     2 * x
//! })
//! .restrict(1);
//! let (a, b) = join! {
//!     svc.oneshot(6),
//!     svc.oneshot(2)
//! };
//! assert_eq!(a, Ok(12));
//! assert_eq!(b, Err(MaxConcurrencyReached));
//! # }
//! ```
//!
//! # Load
//!
//! The [`Load::load`] on [`Restrict`] is the number of inflight calls.

use std::fmt;

use crate::{
    gate::{Admission, AdmissionGate, MaxConcurrencyReached},
    load::Load,
    Service,
};

/// A wrapper for the [`ServiceExt::restrict`](crate::ServiceExt::restrict) combinator.
///
/// See the [module](crate::restrict) for more information.
#[derive(Debug)]
pub struct Restrict<S> {
    inner: S,
    gate: AdmissionGate,
}

impl<S> Restrict<S> {
    pub(crate) fn new(inner: S, ceiling: usize) -> Self {
        Self {
            inner,
            gate: AdmissionGate::new(ceiling),
        }
    }

    /// The [`AdmissionGate`] guarding the inner service.
    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// Returns a reference to the inner service.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }
}

/// The admitted [`Service::Permit`] type for [`Restrict`].
pub struct RestrictPermit<'a, S, Request>
where
    S: Service<Request> + 'a,
{
    inner: S::Permit<'a>,
    admission: Admission<'a>,
}

impl<'a, S, Request> fmt::Debug for RestrictPermit<'a, S, Request>
where
    S: Service<Request>,
    S::Permit<'a>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestrictPermit")
            .field("inner", &self.inner)
            .field("admission", &self.admission)
            .finish()
    }
}

impl<Request, S> Service<Request> for Restrict<S>
where
    S: Service<Request>,
{
    type Response = Result<S::Response, MaxConcurrencyReached>;
    type Permit<'a> = Result<RestrictPermit<'a, S, Request>, MaxConcurrencyReached>
    where
        S: 'a;

    async fn acquire(&self) -> Self::Permit<'_> {
        // Admission is decided before the inner service is consulted.
        let admission = self.gate.try_acquire()?;
        Ok(RestrictPermit {
            inner: self.inner.acquire().await,
            admission,
        })
    }

    async fn call(permit: Self::Permit<'_>, request: Request) -> Self::Response {
        let RestrictPermit { inner, admission } = permit?;
        let response = S::call(inner, request).await;
        admission.release();
        Ok(response)
    }
}

impl<S> Load for Restrict<S> {
    type Metric = usize;

    fn load(&self) -> Self::Metric {
        self.gate.in_flight()
    }
}
