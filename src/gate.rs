//! The [`AdmissionGate`] counts inflight work against a fixed ceiling.
//!
//! [`AdmissionGate::try_acquire`] never waits. It either admits the caller, returning an
//! [`Admission`] guard, or rejects it with [`MaxConcurrencyReached`]. The slot is released when
//! the [`Admission`] is dropped, so every exit path of the guarded work releases exactly once.
//!
//! # Example
//!
//! ```rust
//! use restricted_http::gate::AdmissionGate;
//!
//! let gate = AdmissionGate::new(1);
//! let admission = gate.try_acquire().unwrap();
//! assert!(gate.try_acquire().is_err());
//! drop(admission);
//! assert_eq!(gate.in_flight(), 0);
//! ```

use std::{
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};

/// Returned by [`AdmissionGate::try_acquire`] when the ceiling has been reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("the maximum number of concurrent requests was reached")]
pub struct MaxConcurrencyReached;

/// A non-blocking counter of inflight work.
///
/// See the [module](crate::gate) for more information.
#[derive(Debug)]
pub struct AdmissionGate {
    in_flight: AtomicUsize,
    ceiling: usize,
}

impl AdmissionGate {
    /// Constructs an empty gate. A `ceiling` of zero rejects everything.
    pub fn new(ceiling: usize) -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            ceiling,
        }
    }

    /// Attempts to take a slot.
    ///
    /// The check against the ceiling and the increment are a single atomic step, so racing callers
    /// can never push the count above the ceiling.
    pub fn try_acquire(&self) -> Result<Admission<'_>, MaxConcurrencyReached> {
        match self
            .in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.ceiling).then_some(n + 1)
            }) {
            Ok(previous) => {
                tracing::trace!(in_flight = previous + 1, ceiling = self.ceiling, "admitted");
                Ok(Admission { gate: self })
            }
            Err(in_flight) => {
                tracing::debug!(in_flight, ceiling = self.ceiling, "rejected");
                Err(MaxConcurrencyReached)
            }
        }
    }

    /// The number of outstanding [admissions](Admission).
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// The maximum number of outstanding [admissions](Admission).
    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    fn release(&self) {
        // Saturates rather than wrapping. Only reachable without a matching acquire.
        let result = self
            .in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        debug_assert!(result.is_ok(), "released an empty admission gate");
        if let Ok(previous) = result {
            tracing::trace!(in_flight = previous - 1, ceiling = self.ceiling, "released");
        }
    }
}

/// A slot taken from an [`AdmissionGate`], released on drop.
#[must_use = "dropping an admission releases it immediately"]
pub struct Admission<'a> {
    gate: &'a AdmissionGate,
}

impl<'a> Admission<'a> {
    /// Releases the slot. Equivalent to dropping the [`Admission`].
    pub fn release(self) {
        drop(self)
    }
}

impl<'a> fmt::Debug for Admission<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Admission")
            .field("in_flight", &self.gate.in_flight())
            .field("ceiling", &self.gate.ceiling)
            .finish()
    }
}

impl<'a> Drop for Admission<'a> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
