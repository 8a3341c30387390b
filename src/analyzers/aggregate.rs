use crate::analyzers::types::{
    CauseCount, DatasetOverview, OutageTotals, RegionGap, RegionOutages, RegionStatistics,
    SummaryReport,
};
use crate::analyzers::utility::{mean, min_max, stddev};
use crate::dataset::{ConsumptionRecord, DatasetStore};
use crate::error::{Dataset, QueryError};
use crate::filter::FilteredView;
use std::collections::BTreeMap;

/// Returns the record with the highest `demand_mw`.
///
/// Ties resolve to the first maximum encountered in dataset order.
pub fn peak_demand<'a>(view: &FilteredView<'a>) -> Result<&'a ConsumptionRecord, QueryError> {
    view.consumption
        .iter()
        .copied()
        .fold(None, |best: Option<&ConsumptionRecord>, r| match best {
            Some(b) if b.demand_mw >= r.demand_mw => Some(b),
            _ => Some(r),
        })
        .ok_or(QueryError::EmptyDataset(Dataset::Consumption))
}

/// Groups outages by region in first-seen order.
///
/// Regions without outages in the view do not appear.
pub fn outages_by_region(view: &FilteredView) -> Result<Vec<RegionOutages>, QueryError> {
    if view.outages.is_empty() {
        return Err(QueryError::EmptyDataset(Dataset::Outage));
    }

    let mut groups: Vec<RegionOutages> = Vec::new();

    for outage in &view.outages {
        match groups.iter_mut().find(|g| g.region == outage.region) {
            Some(group) => {
                group.count += 1;
                group.total_hours += outage.duration_hours;
            }
            None => groups.push(RegionOutages {
                region: outage.region.clone(),
                count: 1,
                total_hours: outage.duration_hours,
            }),
        }
    }

    Ok(groups)
}

/// Count, total and mean duration over every outage in the view.
pub fn outage_totals(view: &FilteredView) -> Result<OutageTotals, QueryError> {
    if view.outages.is_empty() {
        return Err(QueryError::EmptyDataset(Dataset::Outage));
    }

    let hours: Vec<f64> = view.outages.iter().map(|o| o.duration_hours).collect();

    Ok(OutageTotals {
        count: hours.len(),
        total_hours: hours.iter().sum(),
        mean_hours: mean(&hours),
    })
}

/// Per-region mean, min and max of `supply_mw - demand_mw`, sorted by region.
///
/// Shortages stay negative.
pub fn demand_supply_gap(view: &FilteredView) -> Result<Vec<RegionGap>, QueryError> {
    if view.consumption.is_empty() {
        return Err(QueryError::EmptyDataset(Dataset::Consumption));
    }

    let mut series: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in &view.consumption {
        series.entry(r.region.as_str()).or_default().push(r.gap_mw());
    }

    Ok(series
        .into_iter()
        .filter_map(|(region, gaps)| {
            let (min, max) = min_max(&gaps)?;
            Some(RegionGap {
                region: region.to_string(),
                mean: mean(&gaps),
                min,
                max,
            })
        })
        .collect())
}

/// Composite report; never fails.
///
/// Peak, averages and outage totals are computed independently so an empty
/// dataset only zeroes its own fields.
pub fn summary(view: &FilteredView) -> SummaryReport {
    let peak = peak_demand(view).ok().cloned();

    let demand: Vec<f64> = view.consumption.iter().map(|r| r.demand_mw).collect();
    let total_supply_mw: f64 = view.consumption.iter().map(|r| r.supply_mw).sum();

    let (outage_count, outage_hours) = outage_totals(view)
        .map(|t| (t.count, t.total_hours))
        .unwrap_or((0, 0.0));

    SummaryReport {
        peak,
        average_demand_mw: mean(&demand),
        total_supply_mw,
        outage_count,
        outage_hours,
        consumption_records: view.consumption.len(),
        date_range: None,
        region: None,
    }
}

/// Demand and supply distribution per region, sorted by region.
pub fn region_statistics(view: &FilteredView) -> Vec<RegionStatistics> {
    let mut series: BTreeMap<&str, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for r in &view.consumption {
        let (demand, supply) = series.entry(r.region.as_str()).or_default();
        demand.push(r.demand_mw);
        supply.push(r.supply_mw);
    }

    series
        .into_iter()
        .filter_map(|(region, (demand, supply))| {
            let (demand_min, demand_max) = min_max(&demand)?;
            let (supply_min, supply_max) = min_max(&supply)?;
            let demand_mean = mean(&demand);

            Some(RegionStatistics {
                region: region.to_string(),
                demand_mean,
                demand_max,
                demand_min,
                demand_std: stddev(&demand, demand_mean),
                supply_mean: mean(&supply),
                supply_max,
                supply_min,
            })
        })
        .collect()
}

/// Outage counts per cause, most frequent first; ties keep first-seen order.
pub fn outages_by_cause(view: &FilteredView) -> Vec<CauseCount> {
    let mut counts: Vec<CauseCount> = Vec::new();

    for outage in &view.outages {
        match counts.iter_mut().find(|c| c.cause == outage.cause) {
            Some(c) => c.count += 1,
            None => counts.push(CauseCount {
                cause: outage.cause.clone(),
                count: 1,
            }),
        }
    }

    // stable sort
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Metrics over the unfiltered store.
pub fn overview(store: &DatasetStore) -> DatasetOverview {
    let view = FilteredView::all(store);
    let demand: Vec<f64> = store.consumption().iter().map(|r| r.demand_mw).collect();

    DatasetOverview {
        regions: store.regions().len(),
        span_days: store
            .date_bounds()
            .map(|(lo, hi)| (hi - lo).num_days())
            .unwrap_or(0),
        consumption_records: store.consumption().len(),
        outage_records: store.outages().len(),
        peak_demand_mw: peak_demand(&view).ok().map(|r| r.demand_mw),
        average_demand_mw: mean(&demand),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{OutageRecord, Severity};
    use chrono::NaiveDate;

    fn consumption(day: u32, region: &str, demand: f64, supply: f64) -> ConsumptionRecord {
        ConsumptionRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            region: region.to_string(),
            demand_mw: demand,
            supply_mw: supply,
            hour: 14,
            day_of_week: "Monday".to_string(),
            month: "January".to_string(),
            temperature: 4.0,
        }
    }

    fn outage(region: &str, hours: f64, cause: &str) -> OutageRecord {
        OutageRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            region: region.to_string(),
            duration_hours: hours,
            cause: cause.to_string(),
            description: "n/a".to_string(),
            affected_customers: 1000,
            severity: Severity::Medium,
        }
    }

    fn north_store() -> DatasetStore {
        DatasetStore::new(
            vec![
                consumption(1, "North", 1000.0, 1050.0),
                consumption(2, "North", 1200.0, 1100.0),
            ],
            vec![],
        )
    }

    #[test]
    fn test_peak_demand_example() {
        let store = north_store();
        let view = FilteredView::all(&store);

        let peak = peak_demand(&view).unwrap();
        assert_eq!(peak.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(peak.demand_mw, 1200.0);
    }

    #[test]
    fn test_peak_demand_is_maximum() {
        let store = DatasetStore::new(
            vec![
                consumption(1, "North", 300.0, 0.0),
                consumption(2, "South", 900.0, 0.0),
                consumption(3, "East", 450.0, 0.0),
            ],
            vec![],
        );
        let view = FilteredView::all(&store);
        let peak = peak_demand(&view).unwrap();

        assert!(view.consumption.iter().all(|r| peak.demand_mw >= r.demand_mw));
        assert_eq!(peak.region, "South");
    }

    #[test]
    fn test_peak_demand_tie_keeps_first() {
        let store = DatasetStore::new(
            vec![
                consumption(1, "West", 800.0, 0.0),
                consumption(2, "East", 800.0, 0.0),
            ],
            vec![],
        );
        let view = FilteredView::all(&store);
        assert_eq!(peak_demand(&view).unwrap().region, "West");
    }

    #[test]
    fn test_peak_demand_empty() {
        let store = DatasetStore::default();
        let err = peak_demand(&FilteredView::all(&store)).unwrap_err();
        assert!(matches!(err, QueryError::EmptyDataset(Dataset::Consumption)));
    }

    #[test]
    fn test_outages_by_region_first_seen_order_and_totals() {
        let store = DatasetStore::new(
            vec![],
            vec![
                outage("South", 2.0, "Weather"),
                outage("North", 5.0, "Maintenance"),
                outage("South", 3.5, "Weather"),
            ],
        );
        let view = FilteredView::all(&store);
        let groups = outages_by_region(&view).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].region, "South");
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].total_hours, 5.5);
        assert_eq!(groups[1].region, "North");

        let count: usize = groups.iter().map(|g| g.count).sum();
        let hours: f64 = groups.iter().map(|g| g.total_hours).sum();
        assert_eq!(count, view.outages.len());
        assert_eq!(hours, 10.5);
    }

    #[test]
    fn test_outages_by_region_empty() {
        let store = north_store();
        let err = outages_by_region(&FilteredView::all(&store)).unwrap_err();
        assert!(matches!(err, QueryError::EmptyDataset(Dataset::Outage)));
    }

    #[test]
    fn test_outage_totals() {
        let store = DatasetStore::new(
            vec![],
            vec![outage("East", 2.0, "Weather"), outage("West", 4.0, "Weather")],
        );
        let totals = outage_totals(&FilteredView::all(&store)).unwrap();
        assert_eq!(totals.count, 2);
        assert_eq!(totals.total_hours, 6.0);
        assert_eq!(totals.mean_hours, 3.0);
    }

    #[test]
    fn test_demand_supply_gap_example() {
        let store = north_store();
        let gaps = demand_supply_gap(&FilteredView::all(&store)).unwrap();

        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].region, "North");
        assert_eq!(gaps[0].mean, -25.0);
        assert_eq!(gaps[0].min, -100.0);
        assert_eq!(gaps[0].max, 50.0);
    }

    #[test]
    fn test_demand_supply_gap_sorted_by_region() {
        let store = DatasetStore::new(
            vec![
                consumption(1, "West", 100.0, 90.0),
                consumption(1, "East", 100.0, 120.0),
            ],
            vec![],
        );
        let gaps = demand_supply_gap(&FilteredView::all(&store)).unwrap();
        let regions: Vec<_> = gaps.iter().map(|g| g.region.as_str()).collect();
        assert_eq!(regions, vec!["East", "West"]);
        assert_eq!(gaps[1].mean, -10.0);
    }

    #[test]
    fn test_summary_with_data() {
        let store = DatasetStore::new(
            north_store().consumption().to_vec(),
            vec![outage("North", 3.0, "Weather")],
        );
        let report = summary(&FilteredView::all(&store));

        assert_eq!(report.peak.unwrap().demand_mw, 1200.0);
        assert_eq!(report.average_demand_mw, 1100.0);
        assert_eq!(report.total_supply_mw, 2150.0);
        assert_eq!(report.outage_count, 1);
        assert_eq!(report.outage_hours, 3.0);
        assert_eq!(report.consumption_records, 2);
    }

    #[test]
    fn test_summary_degrades_on_empty_consumption() {
        let store = DatasetStore::new(vec![], vec![outage("North", 3.0, "Weather")]);
        let report = summary(&FilteredView::all(&store));

        assert!(report.peak.is_none());
        assert_eq!(report.average_demand_mw, 0.0);
        assert_eq!(report.total_supply_mw, 0.0);
        assert_eq!(report.outage_count, 1);
    }

    #[test]
    fn test_summary_degrades_on_empty_outages() {
        let store = north_store();
        let report = summary(&FilteredView::all(&store));

        assert!(report.peak.is_some());
        assert_eq!(report.outage_count, 0);
        assert_eq!(report.outage_hours, 0.0);
    }

    #[test]
    fn test_region_statistics() {
        let store = north_store();
        let stats = region_statistics(&FilteredView::all(&store));

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].demand_mean, 1100.0);
        assert_eq!(stats[0].demand_max, 1200.0);
        assert_eq!(stats[0].demand_min, 1000.0);
        assert_eq!(stats[0].supply_min, 1050.0);
        assert!((stats[0].demand_std - 141.421_356).abs() < 1e-5);
    }

    #[test]
    fn test_outages_by_cause_most_frequent_first() {
        let store = DatasetStore::new(
            vec![],
            vec![
                outage("North", 1.0, "Maintenance"),
                outage("North", 1.0, "Weather"),
                outage("South", 1.0, "Weather"),
            ],
        );
        let causes = outages_by_cause(&FilteredView::all(&store));
        assert_eq!(causes[0].cause, "Weather");
        assert_eq!(causes[0].count, 2);
        assert_eq!(causes[1].cause, "Maintenance");
    }

    #[test]
    fn test_overview() {
        let store = DatasetStore::new(
            north_store().consumption().to_vec(),
            vec![outage("South", 3.0, "Weather")],
        );
        let o = overview(&store);

        assert_eq!(o.regions, 2);
        assert_eq!(o.span_days, 4);
        assert_eq!(o.consumption_records, 2);
        assert_eq!(o.outage_records, 1);
        assert_eq!(o.peak_demand_mw, Some(1200.0));
        assert_eq!(o.average_demand_mw, 1100.0);
    }
}
