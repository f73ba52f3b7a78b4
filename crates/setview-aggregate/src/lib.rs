//! Set aggregation — resolves a set, bulk fetches its members and computes
//! summary statistics.
//!
//! [`SetAggregator`] does the I/O; [`builder`] is the pure transform from raw
//! service records to an [`setview_core::AggregationResult`].

pub mod aggregator;
pub mod builder;

pub use aggregator::SetAggregator;
