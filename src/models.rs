//! Typed schema for the USGS GeoJSON event feed.
//!
//! The response is decoded once at the load boundary. Fields the pipeline
//! does not read are carried in flattened maps so that writing a collection
//! back to the cache file loses nothing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level feed response: a GeoJSON `FeatureCollection`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    pub features: Vec<Feature>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Query metadata attached to every feed response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Number of events matching the query on the server side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single seismic event as returned by the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub properties: Properties,
    pub geometry: Geometry,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    /// Event origin time in milliseconds since the Unix epoch.
    pub time: i64,
    pub mag: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// `[longitude, latitude, depth]`
    pub coordinates: [f64; 3],
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Flattened, read-only view of one event used by the analysis stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub timestamp: i64,
    pub magnitude: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Feature> for Record {
    fn from(feature: &Feature) -> Self {
        let [longitude, latitude, _depth] = feature.geometry.coordinates;
        Record {
            timestamp: feature.properties.time,
            magnitude: feature.properties.mag,
            latitude,
            longitude,
        }
    }
}

impl FeatureCollection {
    /// Number of events in the collection.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Records in feed order.
    pub fn records(&self) -> Vec<Record> {
        self.features.iter().map(Record::from).collect()
    }

    /// Number of matching events the server reported, if present.
    pub fn reported_count(&self) -> Option<u64> {
        self.metadata.as_ref().and_then(|m| m.count)
    }
}

/// The largest-magnitude event in a record set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrongestEvent {
    pub magnitude: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Finds the strongest event. On equal magnitudes the earliest record in
/// feed order wins. Returns `None` for an empty slice.
pub fn strongest_event(records: &[Record]) -> Option<StrongestEvent> {
    let mut best: Option<&Record> = None;
    for record in records {
        match best {
            Some(b) if record.magnitude <= b.magnitude => {}
            _ => best = Some(record),
        }
    }

    best.map(|r| StrongestEvent {
        magnitude: r.magnitude,
        latitude: r.latitude,
        longitude: r.longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "metadata": { "generated": 1539270000000, "count": 2, "title": "USGS Earthquakes" },
        "features": [
            {
                "type": "Feature",
                "properties": { "mag": 2.5, "place": "Wales", "time": 946771200000 },
                "geometry": { "type": "Point", "coordinates": [-3.1, 52.4, 10.0] },
                "id": "us1"
            },
            {
                "type": "Feature",
                "properties": { "mag": 3.1, "place": "North Sea", "time": 978307200000 },
                "geometry": { "type": "Point", "coordinates": [1.2, 56.0, 5.0] },
                "id": "us2"
            }
        ]
    }"#;

    #[test]
    fn test_decode_sample() {
        let collection: FeatureCollection = serde_json::from_str(SAMPLE).unwrap();

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.reported_count(), Some(2));

        let records = collection.records();
        assert_eq!(records[0].timestamp, 946771200000);
        assert_eq!(records[0].magnitude, 2.5);
        assert_eq!(records[0].latitude, 52.4);
        assert_eq!(records[0].longitude, -3.1);
    }

    #[test]
    fn test_unknown_fields_survive_reencode() {
        let collection: FeatureCollection = serde_json::from_str(SAMPLE).unwrap();
        let encoded = serde_json::to_value(&collection).unwrap();

        assert_eq!(encoded["type"], "FeatureCollection");
        assert_eq!(encoded["metadata"]["title"], "USGS Earthquakes");
        assert_eq!(encoded["features"][0]["id"], "us1");
        assert_eq!(encoded["features"][0]["properties"]["place"], "Wales");
        assert_eq!(encoded["features"][1]["geometry"]["type"], "Point");
    }

    #[test]
    fn test_missing_time_is_rejected() {
        let json = r#"{ "features": [
            { "properties": { "mag": 2.0 }, "geometry": { "coordinates": [0.0, 0.0, 0.0] } }
        ] }"#;
        assert!(serde_json::from_str::<FeatureCollection>(json).is_err());
    }

    #[test]
    fn test_short_coordinates_are_rejected() {
        let json = r#"{ "features": [
            { "properties": { "mag": 2.0, "time": 0 }, "geometry": { "coordinates": [0.0, 0.0] } }
        ] }"#;
        assert!(serde_json::from_str::<FeatureCollection>(json).is_err());
    }

    #[test]
    fn test_strongest_event_prefers_first_on_tie() {
        let records = vec![
            Record {
                timestamp: 0,
                magnitude: 1.5,
                latitude: 1.0,
                longitude: 1.0,
            },
            Record {
                timestamp: 1,
                magnitude: 3.0,
                latitude: 2.0,
                longitude: 2.0,
            },
            Record {
                timestamp: 2,
                magnitude: 3.0,
                latitude: 3.0,
                longitude: 3.0,
            },
        ];

        let strongest = strongest_event(&records).unwrap();
        assert_eq!(strongest.magnitude, 3.0);
        assert_eq!(strongest.latitude, 2.0);
    }

    #[test]
    fn test_strongest_event_empty() {
        assert!(strongest_event(&[]).is_none());
    }
}
