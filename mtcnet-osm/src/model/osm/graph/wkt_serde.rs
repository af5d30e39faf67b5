//! serde helpers storing `LineString` fields as WKT text, used by the raw graph
//! and the standardized links when they are written to the stage cache.
use geo::LineString;
use serde::{Deserialize, Deserializer, Serializer};
use wkt::ToWkt;

/// parses WKT LINESTRING text, tolerating the surrounding quotes left by CSV tools.
pub fn parse_linestring(text: &str) -> Result<LineString<f64>, String> {
    let unquoted = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    let wkt = unquoted
        .parse::<wkt::Wkt<f64>>()
        .map_err(|e| format!("invalid WKT '{unquoted}': {e}"))?;
    LineString::try_from(wkt).map_err(|e| format!("WKT '{unquoted}' is not a LINESTRING: {e}"))
}

pub fn serialize_linestring<S: Serializer>(line: &LineString<f64>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&line.wkt_string())
}

pub fn deserialize_linestring<'de, D: Deserializer<'de>>(d: D) -> Result<LineString<f64>, D::Error> {
    let text = String::deserialize(d)?;
    parse_linestring(&text).map_err(serde::de::Error::custom)
}
