/// Query layer for the climate dataset.
///
/// `ClimateStore` is the seam between the HTTP layer and the data store:
/// five fixed read queries plus a summary used for startup logging.
/// `PgClimateStore` runs them against PostgreSQL; tests use the in-memory
/// `fixtures::FixtureStore`.

pub mod pg;

#[cfg(test)]
pub(crate) mod fixtures;

use thiserror::Error;

use crate::model::{
    DatasetSummary, DateRange, PrecipitationReading, Station, StationActivity,
    TemperatureObservation, TemperatureStats,
};

pub use self::pg::PgClimateStore;

/// Query execution failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database query failed ({query}): {source}")]
    Query {
        query: &'static str,
        #[source]
        source: postgres::Error,
    },

    #[error("Unexpected value in column '{column}': {detail}")]
    Decode { column: &'static str, detail: String },
}

/// Read-only access to stations and measurements.
///
/// Every row sequence comes back in storage (primary-key) order.
pub trait ClimateStore {
    /// `(date, prcp)` for every measurement with `date >= since`.
    fn precipitation_since(&mut self, since: &str) -> Result<Vec<PrecipitationReading>, StoreError>;

    /// All stations in table order.
    fn stations(&mut self) -> Result<Vec<Station>, StoreError>;

    /// Station with the most measurement rows; ties go to the station whose
    /// first row was stored earliest. `None` when there are no measurements.
    fn most_active_station(&mut self) -> Result<Option<StationActivity>, StoreError>;

    /// `(date, tobs)` for one station with `date >= since`.
    fn temperature_observations(
        &mut self,
        station_id: &str,
        since: &str,
    ) -> Result<Vec<TemperatureObservation>, StoreError>;

    /// MIN/AVG/MAX of tobs over the range; null aggregates when nothing matches.
    fn temperature_stats(&mut self, range: &DateRange) -> Result<TemperatureStats, StoreError>;

    /// Row counts and date span of the dataset.
    fn summary(&mut self) -> Result<DatasetSummary, StoreError>;
}
