/// Row reshaping utilities.
///
/// The store hands back flat row lists in storage order; these helpers
/// turn them into the structures the endpoint serializes, e.g. a map from
/// date to precipitation so a client can ask "how much rain on 2017-01-05?"
/// without scanning a list.

use std::collections::BTreeMap;

use crate::model::{PrecipitationReading, Station};

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Maps each date to its precipitation value.
///
/// Several stations report on the same date, so keys collide; rows are
/// applied in the order given and the last one encountered wins. Missing
/// precipitation is kept as `None` and renders as JSON `null`. Keys are
/// ordered, so the rendered object lists dates ascending.
pub fn precipitation_by_date(readings: Vec<PrecipitationReading>) -> BTreeMap<String, Option<f64>> {
    let mut by_date = BTreeMap::new();

    for reading in readings {
        by_date.insert(reading.date, reading.precipitation);
    }

    by_date
}

/// Flattens station rows into their identifiers, in table order.
pub fn station_ids(stations: Vec<Station>) -> Vec<String> {
    stations.into_iter().map(|s| s.station_id).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
