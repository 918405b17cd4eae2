//! Load is a measurement of the amount of work a service is experiencing. The [`Load`] trait
//! provides an interface to measure it, for example to export how close a
//! [`RestrictedClient`](crate::RestrictedClient) is to its ceiling.

/// A measurement of load on a [`Service`](crate::Service).
pub trait Load {
    /// The metric type outputted by [`Load`](Load::load).
    type Metric: PartialOrd;

    /// Measures the current load.
    fn load(&self) -> Self::Metric;
}
