/// In-memory `ClimateStore` for tests, cfg(test) gated.
///
/// Rows are kept in insertion order, which stands in for primary-key
/// order in the PostgreSQL store. `failing()` builds a store whose every
/// query errors, for exercising the 500 path.

use std::collections::HashMap;

use super::{ClimateStore, StoreError};
use crate::model::{
    DatasetSummary, DateRange, Measurement, PrecipitationReading, Station, StationActivity,
    TemperatureObservation, TemperatureStats,
};

pub(crate) struct FixtureStore {
    pub stations: Vec<Station>,
    pub measurements: Vec<Measurement>,
    failing: bool,
}

impl FixtureStore {
    pub fn new(stations: Vec<Station>, measurements: Vec<Measurement>) -> Self {
        Self { stations, measurements, failing: false }
    }

    pub fn failing() -> Self {
        Self { stations: Vec::new(), measurements: Vec::new(), failing: true }
    }

    fn check(&self, column: &'static str) -> Result<(), StoreError> {
        if self.failing {
            Err(StoreError::Decode { column, detail: "fixture store configured to fail".to_string() })
        } else {
            Ok(())
        }
    }
}

/// True if `date` falls inside `range` under byte-wise ordering.
pub(crate) fn in_range(range: &DateRange, date: &str) -> bool {
    date >= range.start.as_str() && range.end.as_deref().is_none_or(|end| date <= end)
}

pub(crate) fn station(id: &str, name: &str) -> Station {
    Station {
        station_id: id.to_string(),
        name: name.to_string(),
        latitude: 21.3,
        longitude: -157.8,
        elevation: 3.0,
    }
}

pub(crate) fn measurement(station: &str, date: &str, prcp: Option<f64>, tobs: Option<i32>) -> Measurement {
    Measurement {
        station_id: station.to_string(),
        date: date.to_string(),
        precipitation: prcp,
        temperature_observation: tobs,
    }
}

/// Three stations; USC00519281 has the most rows, straddling the cutoff.
pub(crate) fn hawaii_fixture() -> FixtureStore {
    FixtureStore::new(
        vec![
            station("USC00519397", "WAIKIKI 717.2, HI US"),
            station("USC00513117", "KANEOHE 838.1, HI US"),
            station("USC00519281", "WAIHEE 837.5, HI US"),
        ],
        vec![
            measurement("USC00519397", "2016-08-22", Some(0.40), Some(80)),
            measurement("USC00519397", "2016-08-23", Some(0.00), Some(81)),
            measurement("USC00513117", "2016-08-23", Some(0.15), Some(76)),
            measurement("USC00519281", "2016-08-21", Some(0.02), Some(79)),
            measurement("USC00519281", "2016-08-23", Some(1.79), Some(77)),
            measurement("USC00519281", "2016-08-24", None, Some(77)),
            measurement("USC00519281", "2017-01-05", Some(0.01), Some(62)),
            measurement("USC00519281", "2017-01-20", Some(0.00), None),
            measurement("USC00513117", "2017-01-28", Some(0.12), Some(71)),
            measurement("USC00519397", "2017-02-02", Some(0.00), Some(66)),
            measurement("USC00519281", "2017-08-18", Some(0.06), Some(79)),
        ],
    )
}

impl ClimateStore for FixtureStore {
    fn precipitation_since(&mut self, since: &str) -> Result<Vec<PrecipitationReading>, StoreError> {
        self.check("prcp")?;
        Ok(self
            .measurements
            .iter()
            .filter(|m| m.date.as_str() >= since)
            .map(|m| PrecipitationReading { date: m.date.clone(), precipitation: m.precipitation })
            .collect())
    }

    fn stations(&mut self) -> Result<Vec<Station>, StoreError> {
        self.check("station")?;
        Ok(self.stations.clone())
    }

    fn most_active_station(&mut self) -> Result<Option<StationActivity>, StoreError> {
        self.check("station")?;

        // (count, first row index) per station
        let mut counts: HashMap<&str, (i64, usize)> = HashMap::new();
        for (index, m) in self.measurements.iter().enumerate() {
            counts.entry(m.station_id.as_str()).or_insert((0, index)).0 += 1;
        }

        Ok(counts
            .into_iter()
            .max_by(|(_, (a_count, a_first)), (_, (b_count, b_first))| {
                a_count.cmp(b_count).then(b_first.cmp(a_first))
            })
            .map(|(station_id, (observation_count, _))| StationActivity {
                station_id: station_id.to_string(),
                observation_count,
            }))
    }

    fn temperature_observations(
        &mut self,
        station_id: &str,
        since: &str,
    ) -> Result<Vec<TemperatureObservation>, StoreError> {
        self.check("tobs")?;
        Ok(self
            .measurements
            .iter()
            .filter(|m| m.station_id == station_id && m.date.as_str() >= since)
            .map(|m| TemperatureObservation { date: m.date.clone(), temperature: m.temperature_observation })
            .collect())
    }

    fn temperature_stats(&mut self, range: &DateRange) -> Result<TemperatureStats, StoreError> {
        self.check("tobs")?;

        let values: Vec<f64> = self
            .measurements
            .iter()
            .filter(|m| in_range(range, &m.date))
            .filter_map(|m| m.temperature_observation.map(f64::from))
            .collect();

        if values.is_empty() {
            return Ok(TemperatureStats::empty(range));
        }

        Ok(TemperatureStats {
            tmin: values.iter().copied().reduce(f64::min),
            tavg: Some(values.iter().sum::<f64>() / values.len() as f64),
            tmax: values.iter().copied().reduce(f64::max),
            ..TemperatureStats::empty(range)
        })
    }

    fn summary(&mut self) -> Result<DatasetSummary, StoreError> {
        self.check("date")?;
        Ok(DatasetSummary {
            station_count: self.stations.len() as i64,
            measurement_count: self.measurements.len() as i64,
            first_date: self.measurements.iter().map(|m| m.date.clone()).min(),
            last_date: self.measurements.iter().map(|m| m.date.clone()).max(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_ended_range_includes_later_dates() {
        let range = DateRange::starting("2017-01-01");
        assert!(in_range(&range, "2017-01-01"));
        assert!(in_range(&range, "2017-08-23"));
        assert!(!in_range(&range, "2016-12-31"));
    }

    #[test]
    fn test_closed_range_is_inclusive_on_both_ends() {
        let range = DateRange::between("2017-01-01", "2017-01-31");
        assert!(in_range(&range, "2017-01-01"));
        assert!(in_range(&range, "2017-01-31"));
        assert!(!in_range(&range, "2017-02-01"));
    }

    #[test]
    fn test_range_compares_malformed_bounds_bytewise() {
        // "abc" sorts after every digit-led date, NUL before all of them
        assert!(!in_range(&DateRange::starting("abc"), "2017-01-01"));
        assert!(in_range(&DateRange::starting("\0"), "2010-01-01"));
    }
}
