//! Output formatting and persistence for query results.
//!
//! Supports plain-text rendering, JSON serialization, and CSV export of the
//! series behind the demand plot.

use anyhow::Result;
use chrono::NaiveDate;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::analyzers::types::{
    AggregationResult, Analytics, DatasetOverview, PlotArtifact, SummaryReport,
};
use crate::analyzers::utility::round2;
use crate::error::Dataset;
use crate::filter::FilteredView;
use crate::router::Surface;

/// Renders a result as the text shown to the user.
///
/// The CLI lists outage groups on one line separated by ". ", the dashboard
/// puts each region on its own line.
pub fn render(result: &AggregationResult, surface: Surface) -> String {
    match result {
        AggregationResult::PeakDemand(peak) => format!(
            "Peak demand observed on {} in {} region with {} MW",
            peak.date.format("%Y-%m-%d"),
            peak.region,
            peak.demand_mw
        ),
        AggregationResult::OutagesByRegion(groups) => {
            let separator = match surface {
                Surface::Cli => ". ",
                Surface::Dashboard => "\n",
            };
            groups
                .iter()
                .map(|g| format!("{}: {} outages, {} hrs", g.region, g.count, g.total_hours))
                .collect::<Vec<_>>()
                .join(separator)
        }
        AggregationResult::OutageTotals(totals) => format!(
            "Total Outages: {}\nTotal Duration: {} hours\nAverage Duration: {:.2} hours",
            totals.count, totals.total_hours, totals.mean_hours
        ),
        AggregationResult::DemandSupplyGap(gaps) => {
            let mut lines = vec![
                "Demand-Supply Gap Analysis:".to_string(),
                format!("{:<12}{:>12}{:>12}{:>12}", "region", "mean", "min", "max"),
            ];
            lines.extend(gaps.iter().map(|g| {
                format!("{:<12}{:>12.2}{:>12}{:>12}", g.region, g.mean, g.min, g.max)
            }));
            lines.join("\n")
        }
        AggregationResult::Summary(report) => render_summary(report),
        AggregationResult::Plot(artifact) => format!(
            "Demand plot data saved as '{}' ({} rows)",
            artifact.path, artifact.rows
        ),
    }
}

fn render_summary(report: &SummaryReport) -> String {
    let peak = match &report.peak {
        Some(peak) => format!(
            "{} MW on {} ({})",
            peak.demand_mw,
            peak.date.format("%Y-%m-%d"),
            peak.region
        ),
        None => "n/a".to_string(),
    };

    let mut lines = vec![
        "Summary Report:".to_string(),
        format!("- Peak Demand: {peak}"),
        format!("- Average Demand: {:.2} MW", report.average_demand_mw),
        format!("- Total Supply: {} MW", report.total_supply_mw),
        format!("- Total Outages: {}", report.outage_count),
        format!("- Total Outage Hours: {} hrs", report.outage_hours),
    ];

    if let Some((start, end)) = report.date_range {
        lines.push(format!("- Date Range: {start} to {end}"));
    }
    lines.push(format!(
        "- Region: {}",
        report.region.as_deref().unwrap_or("All")
    ));
    lines.push(format!(
        "- Records Analyzed: {} consumption records",
        report.consumption_records
    ));

    lines.join("\n")
}

/// Renders the per-region statistics table and outage cause breakdown.
pub fn render_analytics(analytics: &Analytics) -> String {
    let mut lines = vec![
        "Statistical Summary by Region:".to_string(),
        format!(
            "{:<12}{:>12}{:>12}{:>12}{:>12}{:>12}{:>12}{:>12}",
            "region", "dem_mean", "dem_max", "dem_min", "dem_std", "sup_mean", "sup_max", "sup_min"
        ),
    ];
    lines.extend(analytics.statistics.iter().map(|s| {
        format!(
            "{:<12}{:>12}{:>12}{:>12}{:>12}{:>12}{:>12}{:>12}",
            s.region,
            round2(s.demand_mean),
            round2(s.demand_max),
            round2(s.demand_min),
            round2(s.demand_std),
            round2(s.supply_mean),
            round2(s.supply_max),
            round2(s.supply_min)
        )
    }));

    lines.push(String::new());
    if analytics.causes.is_empty() {
        lines.push("No outage data available for the selected period.".to_string());
    } else {
        lines.push("Outages by Cause:".to_string());
        lines.extend(
            analytics
                .causes
                .iter()
                .map(|c| format!("{}: {}", c.cause, c.count)),
        );
    }

    lines.join("\n")
}

/// Renders whole-dataset metrics.
pub fn render_overview(overview: &DatasetOverview) -> String {
    let peak = overview
        .peak_demand_mw
        .map(|p| format!("{p} MW"))
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        "Dataset Overview:\n\
         - Total Regions: {}\n\
         - Date Range: {} days\n\
         - Consumption Records: {}\n\
         - Outage Records: {}\n\
         - Peak Demand: {}\n\
         - Avg Demand: {:.2} MW",
        overview.regions,
        overview.span_days,
        overview.consumption_records,
        overview.outage_records,
        peak,
        overview.average_demand_mw
    )
}

/// Message shown when a filter leaves nothing to aggregate.
pub fn no_data_message(dataset: Dataset) -> &'static str {
    match dataset {
        Dataset::Consumption => "No data available for the selected filters.",
        Dataset::Outage => "No outage data available for the selected filters.",
    }
}

/// Message shown when the dashboard is asked to answer a blank query.
pub fn empty_query_message() -> &'static str {
    "Please enter a query before generating the report."
}

/// Help text listing the query categories a surface understands.
pub fn help_message(surface: Surface) -> &'static str {
    match surface {
        Surface::Cli => {
            "I'm sorry, I don't understand that query. Please ask about peak demand, \
             outages by region, demand-supply gap, or request a visualization."
        }
        Surface::Dashboard => {
            "Please ask about:\n- Peak demand\n- Outages by region\n- Demand-supply gap\n- Summary report"
        }
    }
}

/// Serializes any result as pretty-printed JSON.
pub fn to_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[derive(Serialize)]
struct PlotRow<'a> {
    date: NaiveDate,
    region: &'a str,
    demand_mw: f64,
    supply_mw: f64,
}

/// Writes the demand/supply series of `view` as CSV for an external plotter.
///
/// Overwrites `path` if it exists.
pub fn write_plot_data(view: &FilteredView, path: &Path) -> Result<PlotArtifact> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for r in &view.consumption {
        writer.serialize(PlotRow {
            date: r.date,
            region: &r.region,
            demand_mw: r.demand_mw,
            supply_mw: r.supply_mw,
        })?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = view.consumption.len(), "Plot data written");

    Ok(PlotArtifact {
        path: path.display().to_string(),
        rows: view.consumption.len(),
    })
}
