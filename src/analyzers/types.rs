//! Result types produced by the aggregation engine.
//!
//! All of them serialize with `serde` so a presentation surface can emit them
//! as JSON instead of text.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::ConsumptionRecord;

/// Outage count and total duration for a single region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionOutages {
    pub region: String,
    pub count: usize,
    pub total_hours: f64,
}

/// Outage statistics over the whole view, not grouped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutageTotals {
    pub count: usize,
    pub total_hours: f64,
    pub mean_hours: f64,
}

/// Supply minus demand statistics for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionGap {
    pub region: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Composite report. Each field degrades to zero or `None` on empty input.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SummaryReport {
    pub peak: Option<ConsumptionRecord>,
    pub average_demand_mw: f64,
    pub total_supply_mw: f64,
    pub outage_count: usize,
    pub outage_hours: f64,
    pub consumption_records: usize,
    /// Filter echo, filled in by the caller that knows the filter.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub region: Option<String>,
}

/// Location and size of a written plot data file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotArtifact {
    pub path: String,
    pub rows: usize,
}

/// Demand and supply distribution for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionStatistics {
    pub region: String,
    pub demand_mean: f64,
    pub demand_max: f64,
    pub demand_min: f64,
    pub demand_std: f64,
    pub supply_mean: f64,
    pub supply_max: f64,
    pub supply_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CauseCount {
    pub cause: String,
    pub count: usize,
}

/// Region statistics plus outage causes, shown under a dashboard answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub statistics: Vec<RegionStatistics>,
    pub causes: Vec<CauseCount>,
}

/// Whole-store metrics, independent of any filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub regions: usize,
    pub span_days: i64,
    pub consumption_records: usize,
    pub outage_records: usize,
    pub peak_demand_mw: Option<f64>,
    pub average_demand_mw: f64,
}

/// One answered query, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum AggregationResult {
    PeakDemand(ConsumptionRecord),
    OutagesByRegion(Vec<RegionOutages>),
    OutageTotals(OutageTotals),
    DemandSupplyGap(Vec<RegionGap>),
    Summary(SummaryReport),
    Plot(PlotArtifact),
}
