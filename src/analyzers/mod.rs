//! Aggregations over a filtered view of the datasets.
//!
//! Every function here is pure: it reads a [`FilteredView`](crate::filter::FilteredView)
//! and returns a freshly built result type from [`types`].

pub mod aggregate;
pub mod types;
pub mod utility;
