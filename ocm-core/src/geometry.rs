//! Geometry payloads.
//!
//! The backend returns one flat record per area with its GeoJSON geometry
//! pre-serialized as a string. The map renderer wants a standard
//! `FeatureCollection`, so records are reshaped here.

use crate::resolution::ResolutionLevel;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One record of the geometry endpoint's response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometrySegment {
    pub name: String,
    pub code: String,
    /// Backend geography type code, e.g. "lau1" or "msoa"
    #[serde(rename = "type", default)]
    pub kind: String,
    /// GeoJSON geometry as a JSON string
    pub json: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "geometrytype")]
    pub resolution: ResolutionLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Value,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }
}

impl FeatureCollection {
    /// Reshape backend records into a collection tagged with `resolution`.
    ///
    /// Records whose geometry string is not valid JSON are skipped.
    pub fn from_segments(segments: Vec<GeometrySegment>, resolution: ResolutionLevel) -> Self {
        let total = segments.len();
        let features = segments
            .into_iter()
            .filter_map(|segment| match serde_json::from_str::<Value>(&segment.json) {
                Ok(geometry) => Some(Feature {
                    kind: "Feature".to_string(),
                    geometry,
                    properties: FeatureProperties {
                        name: segment.name,
                        code: segment.code,
                        kind: segment.kind,
                        resolution,
                    },
                }),
                Err(e) => {
                    log::warn!("Skipping geometry for {}: {}", segment.code, e);
                    None
                }
            })
            .collect::<Vec<Feature>>();
        log::debug!(
            "Reshaped {} of {} geometry segments at level {}",
            features.len(),
            total,
            resolution
        );
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn find(&self, code: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.properties.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"[
        {"name": "Fife", "code": "S12000047", "type": "lau1",
         "json": "{\"type\": \"Polygon\", \"coordinates\": [[[-3.1, 56.2], [-2.9, 56.2], [-2.9, 56.3], [-3.1, 56.2]]]}"},
        {"name": "Falkirk", "code": "S12000014", "type": "lau1",
         "json": "{\"type\": \"Point\", \"coordinates\": [-3.78, 56.0]}"}
    ]"#;

    #[test]
    fn test_reshape_response() {
        let segments: Vec<GeometrySegment> = serde_json::from_str(RESPONSE).unwrap();
        let collection = FeatureCollection::from_segments(segments, ResolutionLevel::LocalAuthority);
        assert_eq!(collection.len(), 2);

        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["type"], "Feature");
        assert_eq!(json["features"][0]["geometry"]["type"], "Polygon");
        assert_eq!(json["features"][1]["properties"]["code"], "S12000014");
        assert_eq!(json["features"][1]["properties"]["geometrytype"], 1);
    }

    #[test]
    fn test_invalid_geometry_skipped() {
        let segments = vec![GeometrySegment {
            name: "Broken".to_string(),
            code: "X1".to_string(),
            kind: "lau1".to_string(),
            json: "{not json".to_string(),
        }];
        let collection = FeatureCollection::from_segments(segments, ResolutionLevel::LocalAuthority);
        assert!(collection.is_empty());
    }

    #[test]
    fn test_find_by_code() {
        let segments: Vec<GeometrySegment> = serde_json::from_str(RESPONSE).unwrap();
        let collection = FeatureCollection::from_segments(segments, ResolutionLevel::Intermediate);
        let fife = collection.find("S12000047").unwrap();
        assert_eq!(fife.properties.name, "Fife");
        assert_eq!(fife.properties.resolution, ResolutionLevel::Intermediate);
        assert!(collection.find("nope").is_none());
    }
}
