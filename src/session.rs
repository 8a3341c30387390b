//! Per-query boundary shared by the CLI and dashboard surfaces.
//!
//! [`Session::answer`] always returns text: empty views, unrecognized
//! queries and rendering failures become user-facing messages here and never
//! reach the read loop.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::analyzers::aggregate;
use crate::analyzers::types::{AggregationResult, Analytics};
use crate::assistant::Assistant;
use crate::dataset::DatasetStore;
use crate::error::QueryError;
use crate::filter::{self, FilterSpec};
use crate::output;
use crate::router::{self, Intent, Surface};

pub struct Session {
    store: Arc<DatasetStore>,
    surface: Surface,
    filter: FilterSpec,
    plot_path: PathBuf,
    assistant: Option<Box<dyn Assistant>>,
}

impl Session {
    pub fn new(store: Arc<DatasetStore>, surface: Surface) -> Self {
        Self {
            store,
            surface,
            filter: FilterSpec::default(),
            plot_path: PathBuf::from("demand_plot.csv"),
            assistant: None,
        }
    }

    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_plot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.plot_path = path.into();
        self
    }

    pub fn with_assistant(mut self, assistant: Box<dyn Assistant>) -> Self {
        self.assistant = Some(assistant);
        self
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Routes, filters and aggregates `query` into a structured result.
    #[tracing::instrument(skip(self), fields(surface = ?self.surface))]
    pub fn evaluate(&self, query: &str) -> Result<AggregationResult, QueryError> {
        // the dashboard asks for input instead of routing a blank query
        if self.surface == Surface::Dashboard && query.trim().is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        let intent = router::resolve(self.surface, query);
        debug!(?intent, "Query routed");

        if intent == Intent::Unrecognized {
            return Err(QueryError::Unrecognized);
        }

        let view = filter::apply(&self.store, &self.filter);

        let result = match intent {
            Intent::PeakDemand => {
                AggregationResult::PeakDemand(aggregate::peak_demand(&view)?.clone())
            }
            Intent::OutagesByRegion => {
                AggregationResult::OutagesByRegion(aggregate::outages_by_region(&view)?)
            }
            Intent::OutageTotals => AggregationResult::OutageTotals(aggregate::outage_totals(&view)?),
            Intent::DemandSupplyGap => {
                AggregationResult::DemandSupplyGap(aggregate::demand_supply_gap(&view)?)
            }
            Intent::RenderPlot => {
                let artifact = output::write_plot_data(&view, &self.plot_path)
                    .map_err(|e| QueryError::Render(format!("{e:#}")))?;
                AggregationResult::Plot(artifact)
            }
            Intent::Summary => {
                let mut report = aggregate::summary(&view);
                report.date_range = self.filter.resolved_range(&self.store);
                report.region = self.filter.region.clone();
                AggregationResult::Summary(report)
            }
            Intent::Unrecognized => return Err(QueryError::Unrecognized),
        };

        Ok(result)
    }

    /// Answers `query` as display text. Never fails.
    pub fn answer(&self, query: &str) -> String {
        let text = match self.evaluate(query) {
            Ok(result) => output::render(&result, self.surface),
            Err(e) => self.describe(&e),
        };

        match &self.assistant {
            Some(assistant) => match assistant.elaborate(query, &text) {
                Ok(note) if !note.trim().is_empty() => format!("{text}\n\n{note}"),
                Ok(_) => text,
                Err(e) => {
                    warn!(assistant = assistant.name(), error = %e, "Assistant failed");
                    text
                }
            },
            None => text,
        }
    }

    /// Region statistics and outage causes over the session's filter.
    pub fn analytics(&self) -> Analytics {
        let view = filter::apply(&self.store, &self.filter);
        Analytics {
            statistics: aggregate::region_statistics(&view),
            causes: aggregate::outages_by_cause(&view),
        }
    }

    /// Converts a per-query error into the message shown to the user.
    pub fn describe(&self, error: &QueryError) -> String {
        match error {
            QueryError::EmptyDataset(dataset) => output::no_data_message(*dataset).to_string(),
            QueryError::EmptyQuery => output::empty_query_message().to_string(),
            QueryError::Unrecognized => output::help_message(self.surface).to_string(),
            QueryError::Render(e) => {
                warn!(error = %e, "Rendering failed");
                format!("Error processing query: {e}")
            }
        }
    }
}
