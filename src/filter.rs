//! Region and date-range narrowing of the dataset store.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::{ConsumptionRecord, DatasetStore, OutageRecord};

/// Per-query filter. Every field is optional; an empty spec keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    /// Exact, case-sensitive region name.
    pub region: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl FilterSpec {
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Inclusive date range with missing bounds filled from the store.
    ///
    /// Returns `None` only when a bound is missing and the store is empty.
    pub fn resolved_range(&self, store: &DatasetStore) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            (start, end) => {
                let (lo, hi) = store.date_bounds()?;
                Some((start.unwrap_or(lo), end.unwrap_or(hi)))
            }
        }
    }
}

/// Borrowed view of the records that survived a [`FilterSpec`].
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    pub consumption: Vec<&'a ConsumptionRecord>,
    pub outages: Vec<&'a OutageRecord>,
}

impl<'a> FilteredView<'a> {
    /// View over the whole store.
    pub fn all(store: &'a DatasetStore) -> Self {
        Self {
            consumption: store.consumption().iter().collect(),
            outages: store.outages().iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.consumption.is_empty() && self.outages.is_empty()
    }
}

/// Narrows both datasets by the same spec. The store itself is untouched.
#[tracing::instrument(skip(store), level = "debug")]
pub fn apply<'a>(store: &'a DatasetStore, spec: &FilterSpec) -> FilteredView<'a> {
    let range = spec.resolved_range(store);

    let keep = |date: NaiveDate, region: &str| {
        let in_range = range.is_none_or(|(start, end)| date >= start && date <= end);
        let in_region = spec.region.as_deref().is_none_or(|r| r == region);
        in_range && in_region
    };

    let view = FilteredView {
        consumption: store
            .consumption()
            .iter()
            .filter(|r| keep(r.date, &r.region))
            .collect(),
        outages: store
            .outages()
            .iter()
            .filter(|r| keep(r.date, &r.region))
            .collect(),
    };

    tracing::debug!(
        consumption = view.consumption.len(),
        outages = view.outages.len(),
        "Filter applied"
    );

    view
}
