//! In-memory store for the consumption and outage datasets.
//!
//! Both CSV files are read eagerly at startup and never mutated afterwards.
//! Callers share the store as an `Arc` snapshot.

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::error::DataLoadError;

const CONSUMPTION_COLUMNS: &[&str] = &[
    "date",
    "region",
    "demand_mw",
    "supply_mw",
    "hour",
    "day_of_week",
    "month",
    "temperature",
];

const OUTAGE_COLUMNS: &[&str] = &[
    "date",
    "region",
    "duration_hours",
    "cause",
    "description",
    "affected_customers",
    "severity",
];

/// One row of `consumption_logs.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub date: NaiveDate,
    pub region: String,
    pub demand_mw: f64,
    pub supply_mw: f64,
    pub hour: u8,
    pub day_of_week: String,
    pub month: String,
    pub temperature: f64,
}

impl ConsumptionRecord {
    /// Supply minus demand. Negative values model a shortage.
    pub fn gap_mw(&self) -> f64 {
        self.supply_mw - self.demand_mw
    }

    fn validate(&self) -> Result<(), String> {
        if !(self.demand_mw >= 0.0) {
            return Err(format!("demand_mw must be non-negative, got {}", self.demand_mw));
        }
        if !(self.supply_mw >= 0.0) {
            return Err(format!("supply_mw must be non-negative, got {}", self.supply_mw));
        }
        if self.hour > 23 {
            return Err(format!("hour must be within 0-23, got {}", self.hour));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// One row of `outage_reports.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutageRecord {
    pub date: NaiveDate,
    pub region: String,
    pub duration_hours: f64,
    pub cause: String,
    pub description: String,
    pub affected_customers: u64,
    pub severity: Severity,
}

impl OutageRecord {
    fn validate(&self) -> Result<(), String> {
        if !(self.duration_hours > 0.0) {
            return Err(format!(
                "duration_hours must be positive, got {}",
                self.duration_hours
            ));
        }
        Ok(())
    }
}

/// Read-only holder of both datasets, in file order.
#[derive(Debug, Default)]
pub struct DatasetStore {
    consumption: Vec<ConsumptionRecord>,
    outages: Vec<OutageRecord>,
}

impl DatasetStore {
    pub fn new(consumption: Vec<ConsumptionRecord>, outages: Vec<OutageRecord>) -> Self {
        Self {
            consumption,
            outages,
        }
    }

    /// Loads both datasets from CSV.
    ///
    /// # Errors
    ///
    /// Returns [`DataLoadError`] if either file cannot be opened, lacks a
    /// required column, or contains a row that fails to parse or validate.
    #[tracing::instrument(
        skip_all,
        fields(consumption = %consumption_path.display(), outages = %outage_path.display())
    )]
    pub fn load(consumption_path: &Path, outage_path: &Path) -> Result<Self, DataLoadError> {
        let consumption = read_records(
            consumption_path,
            CONSUMPTION_COLUMNS,
            ConsumptionRecord::validate,
        )?;
        let outages = read_records(outage_path, OUTAGE_COLUMNS, OutageRecord::validate)?;

        info!(
            consumption_records = consumption.len(),
            outage_records = outages.len(),
            "Datasets loaded"
        );

        Ok(Self::new(consumption, outages))
    }

    pub fn consumption(&self) -> &[ConsumptionRecord] {
        &self.consumption
    }

    pub fn outages(&self) -> &[OutageRecord] {
        &self.outages
    }

    /// Earliest and latest date across both datasets, or `None` when both are empty.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self
            .consumption
            .iter()
            .map(|r| r.date)
            .chain(self.outages.iter().map(|r| r.date));

        dates.fold(None, |bounds, d| match bounds {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        })
    }

    /// Distinct regions in the order they first appear (consumption first).
    pub fn regions(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        let all = self
            .consumption
            .iter()
            .map(|r| r.region.as_str())
            .chain(self.outages.iter().map(|r| r.region.as_str()));

        for region in all {
            if !seen.contains(&region) {
                seen.push(region);
            }
        }
        seen
    }
}

fn read_records<T: DeserializeOwned>(
    path: &Path,
    required: &[&'static str],
    validate: fn(&T) -> Result<(), String>,
) -> Result<Vec<T>, DataLoadError> {
    let shown = path.display().to_string();

    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: shown.clone(),
        source,
    })?;

    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(file);

    let headers = rdr
        .headers()
        .map_err(|source| DataLoadError::Csv {
            path: shown.clone(),
            source,
        })?
        .clone();

    if let Some(&column) = required.iter().find(|c| !headers.iter().any(|h| h == **c)) {
        return Err(DataLoadError::MissingColumn {
            path: shown,
            column,
        });
    }

    let mut rows = Vec::new();

    for (idx, result) in rdr.deserialize().enumerate() {
        let record: T = result.map_err(|source| DataLoadError::Csv {
            path: shown.clone(),
            source,
        })?;

        // header occupies line 1
        validate(&record).map_err(|reason| DataLoadError::InvalidRecord {
            path: shown.clone(),
            row: idx + 2,
            reason,
        })?;

        rows.push(record);
    }

    debug!(path = %shown, rows = rows.len(), "CSV read");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    const CONSUMPTION_CSV: &str = "\
date,region,demand_mw,supply_mw,hour,day_of_week,month,temperature
2024-01-01,North,1000,1050,14,Monday,January,3
2024-01-02,South,900,880,15,Tuesday,January,-2
";

    const OUTAGE_CSV: &str = "\
date,region,duration_hours,cause,description,affected_customers,severity
2024-01-03,East,4,Weather,Storm damage to transmission lines,1200,High
";

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_valid_files() {
        let c = temp_file("energy_assistant_load_c.csv", CONSUMPTION_CSV);
        let o = temp_file("energy_assistant_load_o.csv", OUTAGE_CSV);

        let store = DatasetStore::load(&c, &o).unwrap();

        assert_eq!(store.consumption().len(), 2);
        assert_eq!(store.outages().len(), 1);
        assert_eq!(store.consumption()[1].gap_mw(), -20.0);
        assert_eq!(store.outages()[0].severity, Severity::High);

        fs::remove_file(c).unwrap();
        fs::remove_file(o).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let o = temp_file("energy_assistant_missing_o.csv", OUTAGE_CSV);
        let missing = env::temp_dir().join("energy_assistant_does_not_exist.csv");

        let err = DatasetStore::load(&missing, &o).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));

        fs::remove_file(o).unwrap();
    }

    #[test]
    fn test_load_missing_column() {
        let c = temp_file(
            "energy_assistant_nocol_c.csv",
            "date,region,demand_mw\n2024-01-01,North,1000\n",
        );
        let o = temp_file("energy_assistant_nocol_o.csv", OUTAGE_CSV);

        let err = DatasetStore::load(&c, &o).unwrap_err();
        match err {
            DataLoadError::MissingColumn { column, .. } => assert_eq!(column, "supply_mw"),
            other => panic!("unexpected error: {other}"),
        }

        fs::remove_file(c).unwrap();
        fs::remove_file(o).unwrap();
    }

    #[test]
    fn test_load_rejects_out_of_range_hour() {
        let c = temp_file(
            "energy_assistant_hour_c.csv",
            "date,region,demand_mw,supply_mw,hour,day_of_week,month,temperature\n\
             2024-01-01,North,1000,1050,24,Monday,January,3\n",
        );
        let o = temp_file("energy_assistant_hour_o.csv", OUTAGE_CSV);

        let err = DatasetStore::load(&c, &o).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidRecord { row: 2, .. }));

        fs::remove_file(c).unwrap();
        fs::remove_file(o).unwrap();
    }

    #[test]
    fn test_load_rejects_unknown_severity() {
        let c = temp_file("energy_assistant_sev_c.csv", CONSUMPTION_CSV);
        let o = temp_file(
            "energy_assistant_sev_o.csv",
            "date,region,duration_hours,cause,description,affected_customers,severity\n\
             2024-01-03,East,4,Weather,Storm,1200,Extreme\n",
        );

        let err = DatasetStore::load(&c, &o).unwrap_err();
        assert!(matches!(err, DataLoadError::Csv { .. }));

        fs::remove_file(c).unwrap();
        fs::remove_file(o).unwrap();
    }

    #[test]
    fn test_date_bounds_and_regions() {
        let c = temp_file("energy_assistant_bounds_c.csv", CONSUMPTION_CSV);
        let o = temp_file("energy_assistant_bounds_o.csv", OUTAGE_CSV);
        let store = DatasetStore::load(&c, &o).unwrap();

        let (lo, hi) = store.date_bounds().unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(store.regions(), vec!["North", "South", "East"]);

        fs::remove_file(c).unwrap();
        fs::remove_file(o).unwrap();
    }

    #[test]
    fn test_empty_store_has_no_bounds() {
        assert!(DatasetStore::default().date_bounds().is_none());
    }
}
