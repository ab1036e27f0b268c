/// Shared data types for the climate service.
///
/// `Station` and `Measurement` mirror the two tables of the `climate`
/// schema column for column (see `sql/001_climate_schema.sql`). The
/// remaining types are the row shapes returned by the store and the
/// bodies rendered by the endpoint.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lower bound for the "most recent 12 months" routes (precipitation, tobs).
///
/// Fixed boundary of the published dataset. Not derived from `MAX(date)`.
pub const LAST_12_MONTHS_START: &str = "2016-08-23";

/// Schema holding the `station` and `measurement` tables.
pub const DEFAULT_SCHEMA: &str = "climate";

/// Tables that must exist in the schema before the service will start.
pub const REQUIRED_TABLES: &[&str] = &["station", "measurement"];

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// A weather-observation site (`climate.station`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Unique station code, e.g. `USC00519281`.
    pub station_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

/// One dated reading attributed to a station (`climate.measurement`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub station_id: String,
    /// Zero-padded `YYYY-MM-DD`, compared as a plain string.
    pub date: String,
    pub precipitation: Option<f64>,
    pub temperature_observation: Option<i32>,
}

// ---------------------------------------------------------------------------
// Query rows
// ---------------------------------------------------------------------------

/// `(date, prcp)` row from the precipitation query.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecipitationReading {
    pub date: String,
    pub precipitation: Option<f64>,
}

/// `(date, tobs)` row, serialized as `{"date": ..., "temperature": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureObservation {
    pub date: String,
    pub temperature: Option<i32>,
}

/// Station with its total measurement row count.
#[derive(Debug, Clone, PartialEq)]
pub struct StationActivity {
    pub station_id: String,
    pub observation_count: i64,
}

/// Inclusive date bounds for temperature statistics.
///
/// Both ends are opaque strings taken from the request path.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub start: String,
    pub end: Option<String>,
}

impl DateRange {
    pub fn starting(start: impl Into<String>) -> Self {
        Self { start: start.into(), end: None }
    }

    pub fn between(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self { start: start.into(), end: Some(end.into()) }
    }
}

/// MIN/AVG/MAX of temperature observations over a date range.
///
/// All three aggregates are `None` when no rows match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureStats {
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_date: Option<String>,
    #[serde(rename = "TMIN")]
    pub tmin: Option<f64>,
    #[serde(rename = "TAVG")]
    pub tavg: Option<f64>,
    #[serde(rename = "TMAX")]
    pub tmax: Option<f64>,
}

impl TemperatureStats {
    /// Stats with no matching rows.
    pub fn empty(range: &DateRange) -> Self {
        Self {
            start_date: range.start.clone(),
            end_date: range.end.clone(),
            tmin: None,
            tavg: None,
            tmax: None,
        }
    }
}

/// Row counts and date span of the loaded dataset, logged at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub station_count: i64,
    pub measurement_count: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stats_serialize_with_uppercase_aggregate_keys() {
        let stats = TemperatureStats {
            start_date: "2017-01-01".to_string(),
            end_date: None,
            tmin: Some(60.0),
            tavg: Some(68.5),
            tmax: Some(77.0),
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "start_date": "2017-01-01",
                "TMIN": 60.0,
                "TAVG": 68.5,
                "TMAX": 77.0
            })
        );
    }

    #[test]
    fn test_empty_stats_carry_end_date_and_null_aggregates() {
        let stats = TemperatureStats::empty(&DateRange::between("2099-01-01", "2099-12-31"));
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "start_date": "2099-01-01",
                "end_date": "2099-12-31",
                "TMIN": null,
                "TAVG": null,
                "TMAX": null
            })
        );
    }
}
