use super::CountyError;
use crate::model::feature::{County, Geography};
use geo::{BoundingRect, ConvexHull, MultiPolygon, Polygon, Rect, Validation};
use geojson::GeoJson;
use std::{collections::BTreeMap, str::FromStr};

pub const DEFAULT_NAME_PROPERTY: &str = "NAME10";

/// a county polygon with its bounding box for cheap rejection.
#[derive(Debug, Clone)]
pub struct CountyBoundary {
    pub county: County,
    pub geometry: MultiPolygon<f64>,
    pub bbox: Rect<f64>,
}

/// valid county polygons in range order (San Francisco first).
#[derive(Debug, Clone, Default)]
pub struct CountyBoundaries {
    pub boundaries: Vec<CountyBoundary>,
}

impl CountyBoundaries {
    pub fn from_geojson_file(filepath: &str, name_property: &str) -> Result<Self, CountyError> {
        let contents = std::fs::read_to_string(filepath)
            .map_err(|e| CountyError::ReadError(filepath.to_string(), e))?;
        let boundaries = Self::from_geojson_str(&contents, name_property)?;
        log::info!(
            "loaded boundaries for {} counties from {filepath}",
            boundaries.boundaries.len()
        );
        Ok(boundaries)
    }

    /// reads a FeatureCollection of county polygons. features with unknown names,
    /// non-polygonal geometries or invalid polygons are skipped with a warning.
    pub fn from_geojson_str(contents: &str, name_property: &str) -> Result<Self, CountyError> {
        let dataset =
            GeoJson::from_str(contents).map_err(|e| CountyError::GeoJsonError(e.to_string()))?;
        let fc = match dataset {
            GeoJson::Geometry(_) => Err(CountyError::NotFeatureCollection(String::from("Geometry"))),
            GeoJson::Feature(_) => Err(CountyError::NotFeatureCollection(String::from("Feature"))),
            GeoJson::FeatureCollection(fc) => Ok(fc),
        }?;

        let mut by_county: BTreeMap<County, Vec<Polygon<f64>>> = BTreeMap::new();
        for (idx, feature) in fc.features.into_iter().enumerate() {
            let name = match feature.property(name_property).and_then(|v| v.as_str()) {
                Some(n) => n.to_string(),
                None => {
                    log::warn!("boundary feature {idx} has no '{name_property}' property, skipping");
                    continue;
                }
            };
            let county = match County::from_str(&name) {
                Ok(County::External) | Err(_) => {
                    log::warn!("boundary feature {idx} names '{name}' which is not a Bay Area county, skipping");
                    continue;
                }
                Ok(c) => c,
            };
            let geometry: Option<geo::Geometry<f64>> =
                feature.geometry.and_then(|g| match g.try_into() {
                    Ok(geometry) => Some(geometry),
                    Err(e) => {
                        log::warn!("failed to decode geometry of boundary '{name}': {e}");
                        None
                    }
                });
            let polygons = match geometry {
                Some(geo::Geometry::Polygon(p)) => vec![p],
                Some(geo::Geometry::MultiPolygon(mp)) => mp.0,
                Some(_) | None => {
                    log::warn!("boundary '{name}' is not a polygon, skipping");
                    continue;
                }
            };
            for polygon in polygons {
                if polygon.exterior().0.is_empty() || !polygon.is_valid() {
                    log::warn!("excluding an empty or invalid polygon of boundary '{name}'");
                    continue;
                }
                by_county.entry(county).or_default().push(polygon);
            }
        }

        let boundaries = by_county
            .into_iter()
            .filter_map(|(county, polygons)| {
                let geometry = MultiPolygon::new(polygons);
                let bbox = geometry.bounding_rect()?;
                Some(CountyBoundary {
                    county,
                    geometry,
                    bbox,
                })
            })
            .collect();
        Ok(CountyBoundaries { boundaries })
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub fn get(&self, county: &County) -> Option<&CountyBoundary> {
        self.boundaries.iter().find(|b| b.county == *county)
    }

    /// all polygons of the counties in a geography
    pub fn geography_polygons(&self, geography: &Geography) -> MultiPolygon<f64> {
        let counties = geography.counties();
        let polygons = self
            .boundaries
            .iter()
            .filter(|b| counties.contains(&b.county))
            .flat_map(|b| b.geometry.0.iter().cloned())
            .collect::<Vec<_>>();
        MultiPolygon::new(polygons)
    }

    /// the convex hull around a geography, used to clip links to the region.
    pub fn region_hull(&self, geography: &Geography) -> Result<Polygon<f64>, CountyError> {
        let polygons = self.geography_polygons(geography);
        if polygons.0.is_empty() {
            return Err(CountyError::GeographyNotCovered(geography.to_string()));
        }
        Ok(polygons.convex_hull())
    }
}
