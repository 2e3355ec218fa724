//! The NWS current-observation station index.

use tracing::debug;
use weather_common::StationSource;

use crate::distance::great_circle_miles;
use crate::xml::XmlElement;

/// Stations listed in `wx_station_index`, with coordinates.
#[derive(Debug, Clone, Default)]
pub struct StationIndex {
    stations: Vec<StationSource>,
}

impl StationIndex {
    /// Build the index from the parsed `index.xml` document.
    ///
    /// Stations without an id or with unparsable or non-finite coordinates
    /// are skipped.
    pub fn from_document(root: &XmlElement) -> Self {
        let mut skipped = 0usize;
        let stations: Vec<StationSource> = root
            .descendants("station")
            .into_iter()
            .filter_map(|node| {
                let station = parse_station(node);
                if station.is_none() {
                    skipped += 1;
                }
                station
            })
            .collect();

        debug!(stations = stations.len(), skipped = skipped, "Loaded NWS station index");
        Self { stations }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// The station closest to a point by great-circle distance.
    pub fn nearest(&self, latitude: f64, longitude: f64) -> Option<&StationSource> {
        let mut best: Option<(&StationSource, f64)> = None;
        for station in &self.stations {
            let Some((lat, lon)) = station.coordinates() else {
                continue;
            };
            let distance = great_circle_miles(latitude, longitude, lat, lon);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((station, distance));
            }
        }
        best.map(|(station, _)| station)
    }
}

fn parse_station(node: &XmlElement) -> Option<StationSource> {
    let id = node.child_text("station_id")?;
    let latitude = coordinate(node, "latitude")?;
    let longitude = coordinate(node, "longitude")?;
    let name = node.child_text("station_name").unwrap_or(id);

    Some(StationSource::new(id, name).with_location(latitude, longitude))
}

/// A finite coordinate. `NaN` and `inf` parse as `f64` and are rejected.
fn coordinate(node: &XmlElement, name: &str) -> Option<f64> {
    node.child_text(name)?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
