/// PostgreSQL implementation of `ClimateStore`.
///
/// Owns the single connection opened at startup. Date filters compare
/// byte-wise whatever the database's default collation: fixed cutoffs
/// under `COLLATE "C"`, path-supplied bounds as `bytea`.

use postgres::types::FromSql;
use postgres::{Client, Row};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::{ClimateStore, StoreError};
use crate::model::{
    DatasetSummary, DateRange, PrecipitationReading, Station, StationActivity,
    TemperatureObservation, TemperatureStats,
};

// ---------------------------------------------------------------------------
// Query text
// ---------------------------------------------------------------------------

/// SQL for every query, with the schema name already substituted.
#[derive(Debug, Clone)]
struct Queries {
    precipitation: String,
    stations: String,
    most_active: String,
    observations: String,
    temperature_stats: String,
    summary: String,
}

impl Queries {
    fn for_schema(schema: &str) -> Self {
        let s = quote_ident(schema);
        Self {
            precipitation: format!(
                "SELECT date, prcp FROM {s}.measurement
                 WHERE date COLLATE \"C\" >= $1
                 ORDER BY id"
            ),
            stations: format!(
                "SELECT station, name, latitude, longitude, elevation
                 FROM {s}.station
                 ORDER BY id"
            ),
            most_active: format!(
                "SELECT station, COUNT(*) AS observation_count
                 FROM {s}.measurement
                 GROUP BY station
                 ORDER BY observation_count DESC, MIN(id)
                 LIMIT 1"
            ),
            observations: format!(
                "SELECT date, tobs FROM {s}.measurement
                 WHERE station = $1 AND date COLLATE \"C\" >= $2
                 ORDER BY id"
            ),
            temperature_stats: format!(
                "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM {s}.measurement
                 WHERE convert_to(date, 'UTF8') >= $1::bytea
                   AND ($2::bytea IS NULL OR convert_to(date, 'UTF8') <= $2::bytea)"
            ),
            summary: format!(
                "SELECT (SELECT COUNT(*) FROM {s}.station),
                        COUNT(*),
                        MIN(date COLLATE \"C\"),
                        MAX(date COLLATE \"C\")
                 FROM {s}.measurement"
            ),
        }
    }
}

/// Double-quotes an SQL identifier.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Reads one column, reporting a type mismatch as `StoreError::Decode`.
fn column<'a, T: FromSql<'a>>(row: &'a Row, idx: usize, name: &'static str) -> Result<T, StoreError> {
    row.try_get(idx).map_err(|e| StoreError::Decode {
        column: name,
        detail: e.to_string(),
    })
}

/// Converts an `AVG()` result (NUMERIC) to f64.
fn decimal_to_f64(value: Option<Decimal>) -> Result<Option<f64>, StoreError> {
    value
        .map(|d| {
            d.to_f64().ok_or_else(|| StoreError::Decode {
                column: "avg(tobs)",
                detail: d.to_string(),
            })
        })
        .transpose()
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// `ClimateStore` backed by one PostgreSQL connection.
pub struct PgClimateStore {
    client: Client,
    queries: Queries,
}

impl PgClimateStore {
    /// Wraps an already verified connection; `schema` holds both tables.
    pub fn new(client: Client, schema: &str) -> Self {
        Self {
            client,
            queries: Queries::for_schema(schema),
        }
    }
}

impl ClimateStore for PgClimateStore {
    fn precipitation_since(&mut self, since: &str) -> Result<Vec<PrecipitationReading>, StoreError> {
        let rows = self
            .client
            .query(&self.queries.precipitation, &[&since])
            .map_err(|source| StoreError::Query { query: "precipitation", source })?;

        rows.iter()
            .map(|row| {
                Ok::<_, StoreError>(PrecipitationReading {
                    date: column(row, 0, "date")?,
                    precipitation: column(row, 1, "prcp")?,
                })
            })
            .collect()
    }

    fn stations(&mut self) -> Result<Vec<Station>, StoreError> {
        let rows = self
            .client
            .query(&self.queries.stations, &[])
            .map_err(|source| StoreError::Query { query: "stations", source })?;

        rows.iter()
            .map(|row| {
                Ok::<_, StoreError>(Station {
                    station_id: column(row, 0, "station")?,
                    name: column(row, 1, "name")?,
                    latitude: column(row, 2, "latitude")?,
                    longitude: column(row, 3, "longitude")?,
                    elevation: column(row, 4, "elevation")?,
                })
            })
            .collect()
    }

    fn most_active_station(&mut self) -> Result<Option<StationActivity>, StoreError> {
        let row = self
            .client
            .query_opt(&self.queries.most_active, &[])
            .map_err(|source| StoreError::Query { query: "most_active_station", source })?;

        row.map(|row| {
            Ok::<_, StoreError>(StationActivity {
                station_id: column(&row, 0, "station")?,
                observation_count: column(&row, 1, "observation_count")?,
            })
        })
        .transpose()
    }

    fn temperature_observations(
        &mut self,
        station_id: &str,
        since: &str,
    ) -> Result<Vec<TemperatureObservation>, StoreError> {
        let rows = self
            .client
            .query(&self.queries.observations, &[&station_id, &since])
            .map_err(|source| StoreError::Query { query: "temperature_observations", source })?;

        rows.iter()
            .map(|row| {
                Ok::<_, StoreError>(TemperatureObservation {
                    date: column(row, 0, "date")?,
                    temperature: column(row, 1, "tobs")?,
                })
            })
            .collect()
    }

    fn temperature_stats(&mut self, range: &DateRange) -> Result<TemperatureStats, StoreError> {
        // Bounds come straight from the path and may hold bytes `text` rejects (NUL)
        let start = range.start.as_bytes();
        let end = range.end.as_deref().map(str::as_bytes);
        let row = self
            .client
            .query_one(&self.queries.temperature_stats, &[&start, &end])
            .map_err(|source| StoreError::Query { query: "temperature_stats", source })?;

        let tmin: Option<i32> = column(&row, 0, "min(tobs)")?;
        let tavg: Option<Decimal> = column(&row, 1, "avg(tobs)")?;
        let tmax: Option<i32> = column(&row, 2, "max(tobs)")?;

        Ok(TemperatureStats {
            start_date: range.start.clone(),
            end_date: range.end.clone(),
            tmin: tmin.map(f64::from),
            tavg: decimal_to_f64(tavg)?,
            tmax: tmax.map(f64::from),
        })
    }

    fn summary(&mut self) -> Result<DatasetSummary, StoreError> {
        let row = self
            .client
            .query_one(&self.queries.summary, &[])
            .map_err(|source| StoreError::Query { query: "summary", source })?;

        Ok(DatasetSummary {
            station_count: column(&row, 0, "station count")?,
            measurement_count: column(&row, 1, "measurement count")?,
            first_date: column(&row, 2, "min(date)")?,
            last_date: column(&row, 3, "max(date)")?,
        })
    }
}
