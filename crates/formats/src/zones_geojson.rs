use std::fmt;

use foundation::geo::{LonLat, close_ring};
use scene::Zone;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FEATURE_COLLECTION: &str = "FeatureCollection";
pub const FEATURE: &str = "Feature";
pub const POLYGON: &str = "Polygon";

/// Persisted zones document.
///
/// Only what the editor writes is modelled; decoding goes through
/// `serde_json::Value` so foreign features can be skipped instead of failing
/// the whole document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: ZoneProperties,
    pub geometry: PolygonGeometry,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoneProperties {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolygonGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// Rings of `[lon, lat]`; the editor only writes the outer ring.
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

#[derive(Debug)]
pub enum FormatError {
    Encoding(std::str::Utf8Error),
    Json(serde_json::Error),
    NotFeatureCollection { found: Option<String> },
    MissingFeatures,
    InvalidFeature { index: usize, reason: String },
    MissingName { index: usize },
    InvalidGeometry { index: usize, reason: String },
    DuplicateName { index: usize, name: String },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Encoding(err) => write!(f, "document is not UTF-8: {err}"),
            FormatError::Json(err) => write!(f, "document is not valid JSON: {err}"),
            FormatError::NotFeatureCollection { found: Some(kind) } => {
                write!(f, "expected a FeatureCollection, got {kind}")
            }
            FormatError::NotFeatureCollection { found: None } => {
                write!(f, "expected a FeatureCollection object")
            }
            FormatError::MissingFeatures => write!(f, "FeatureCollection has no features array"),
            FormatError::InvalidFeature { index, reason } => {
                write!(f, "feature {index}: {reason}")
            }
            FormatError::MissingName { index } => {
                write!(f, "feature {index}: missing properties.name")
            }
            FormatError::InvalidGeometry { index, reason } => {
                write!(f, "feature {index}: invalid polygon: {reason}")
            }
            FormatError::DuplicateName { index, name } => {
                write!(f, "feature {index}: duplicate zone name \"{name}\"")
            }
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Encoding(err) => Some(err),
            FormatError::Json(err) => Some(err),
            _ => None,
        }
    }
}

/// A feature that was not turned into a zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFeature {
    pub index: usize,
    pub geometry_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodeReport {
    pub zones: Vec<Zone>,
    pub skipped: Vec<SkippedFeature>,
}

pub fn decode(document: &str) -> Result<Vec<Zone>, FormatError> {
    decode_report(document).map(|r| r.zones)
}

pub fn decode_slice(bytes: &[u8]) -> Result<Vec<Zone>, FormatError> {
    let text = std::str::from_utf8(bytes).map_err(FormatError::Encoding)?;
    decode(text)
}

pub fn decode_report(document: &str) -> Result<DecodeReport, FormatError> {
    let value: Value = serde_json::from_str(document).map_err(FormatError::Json)?;
    decode_value(&value)
}

/// Decodes a parsed document.
///
/// Features with a geometry type other than `Polygon` are skipped. Anything
/// wrong with a Polygon feature fails the whole document.
pub fn decode_value(value: &Value) -> Result<DecodeReport, FormatError> {
    let obj = value
        .as_object()
        .ok_or(FormatError::NotFeatureCollection { found: None })?;
    let kind = obj.get("type").and_then(Value::as_str);
    if kind != Some(FEATURE_COLLECTION) {
        return Err(FormatError::NotFeatureCollection {
            found: kind.map(str::to_string),
        });
    }
    let features = obj
        .get("features")
        .and_then(Value::as_array)
        .ok_or(FormatError::MissingFeatures)?;

    let mut zones: Vec<Zone> = Vec::with_capacity(features.len());
    let mut skipped = Vec::new();
    for (index, feature) in features.iter().enumerate() {
        match decode_feature(index, feature)? {
            FeatureOutcome::Zone(zone) => {
                if zones.iter().any(|z| z.name() == zone.name()) {
                    return Err(FormatError::DuplicateName {
                        index,
                        name: zone.name().to_string(),
                    });
                }
                zones.push(zone);
            }
            FeatureOutcome::Skipped(geometry_type) => skipped.push(SkippedFeature {
                index,
                geometry_type,
            }),
        }
    }

    Ok(DecodeReport { zones, skipped })
}

enum FeatureOutcome {
    Zone(Zone),
    Skipped(String),
}

fn decode_feature(index: usize, feature: &Value) -> Result<FeatureOutcome, FormatError> {
    let obj = feature.as_object().ok_or_else(|| FormatError::InvalidFeature {
        index,
        reason: "feature is not an object".to_string(),
    })?;
    if obj.get("type").and_then(Value::as_str) != Some(FEATURE) {
        return Err(FormatError::InvalidFeature {
            index,
            reason: "type is not \"Feature\"".to_string(),
        });
    }

    let geometry = match obj.get("geometry") {
        None | Some(Value::Null) => {
            return Err(invalid_geometry(index, "missing geometry"));
        }
        Some(g) => g,
    };
    let geometry_type = geometry
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid_geometry(index, "geometry has no type"))?;
    if geometry_type != POLYGON {
        return Ok(FeatureOutcome::Skipped(geometry_type.to_string()));
    }

    let name = obj
        .get("properties")
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .filter(|n| !n.trim().is_empty())
        .ok_or(FormatError::MissingName { index })?;

    let outer = geometry
        .get("coordinates")
        .and_then(Value::as_array)
        .and_then(|rings| rings.first())
        .ok_or_else(|| invalid_geometry(index, "polygon has no rings"))?;
    let ring = decode_ring(index, outer)?;

    Zone::new(name, ring)
        .map(FeatureOutcome::Zone)
        .map_err(|e| invalid_geometry(index, e.to_string()))
}

fn decode_ring(index: usize, ring: &Value) -> Result<Vec<LonLat>, FormatError> {
    let positions = ring
        .as_array()
        .ok_or_else(|| invalid_geometry(index, "ring is not an array"))?;

    let mut out = Vec::with_capacity(positions.len());
    for (i, position) in positions.iter().enumerate() {
        // A third member (altitude) is allowed and ignored.
        let pair = position
            .as_array()
            .filter(|p| p.len() >= 2)
            .and_then(|p| Some(LonLat::new(p[0].as_f64()?, p[1].as_f64()?)))
            .ok_or_else(|| {
                invalid_geometry(index, format!("position {i} is not a [lon, lat] pair"))
            })?;
        out.push(pair);
    }
    Ok(out)
}

fn invalid_geometry(index: usize, reason: impl Into<String>) -> FormatError {
    FormatError::InvalidGeometry {
        index,
        reason: reason.into(),
    }
}

/// One Feature per zone, outer ring closed.
pub fn encode(zones: &[Zone]) -> FeatureCollection {
    FeatureCollection {
        kind: FEATURE_COLLECTION.to_string(),
        features: zones.iter().map(encode_zone).collect(),
    }
}

fn encode_zone(zone: &Zone) -> Feature {
    let ring = close_ring(zone.vertices())
        .into_iter()
        .map(LonLat::to_array)
        .collect();
    Feature {
        kind: FEATURE.to_string(),
        properties: ZoneProperties {
            name: zone.name().to_string(),
        },
        geometry: PolygonGeometry {
            kind: POLYGON.to_string(),
            coordinates: vec![ring],
        },
    }
}

pub fn encode_string(zones: &[Zone]) -> Result<String, FormatError> {
    serde_json::to_string(&encode(zones)).map_err(FormatError::Json)
}

pub fn empty_collection() -> FeatureCollection {
    encode(&[])
}

pub fn empty_collection_string() -> String {
    r#"{"type":"FeatureCollection","features":[]}"#.to_string()
}

/// Hex blake3 digest of a stored document.
pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
