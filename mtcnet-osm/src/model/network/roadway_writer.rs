use super::{LinkRecord, NodeRecord, RoadwayError, RoadwayNetwork};
use clap::ValueEnum;
use csv::QuoteStyle;
use flate2::{write::GzEncoder, Compression};
use geojson::{Feature, FeatureCollection, JsonObject};
use kdam::tqdm;
use serde::{Deserialize, Serialize};
use std::{fs::File, path::Path};

pub mod filenames {
    pub const LINKS_CSV: &str = "links.csv.gz";
    pub const NODES_CSV: &str = "nodes.csv.gz";
    pub const LINKS_GEOJSON: &str = "links.geojson";
    pub const NODES_GEOJSON: &str = "nodes.geojson";
}

/// file format of the roadway tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RoadwayFormat {
    /// gzipped CSV with WKT geometry
    #[default]
    Csv,
    Geojson,
}

pub trait RoadwayWriter {
    /// writes the nodes and links tables into a shared directory.
    fn write_roadway(
        &self,
        output_directory: &Path,
        format: RoadwayFormat,
        overwrite: bool,
    ) -> Result<(), RoadwayError>;
}

impl RoadwayWriter for RoadwayNetwork {
    fn write_roadway(
        &self,
        output_directory: &Path,
        format: RoadwayFormat,
        overwrite: bool,
    ) -> Result<(), RoadwayError> {
        let nodes = self.nodes.iter().map(NodeRecord::from).collect::<Vec<_>>();
        let links = self.links.iter().map(LinkRecord::from).collect::<Vec<_>>();
        write_records(output_directory, &nodes, &links, format, overwrite)
    }
}

/// writes prepared node and link rows. shared by the roadway-only and the
/// transit-inclusive outputs.
pub fn write_records(
    output_directory: &Path,
    nodes: &[NodeRecord],
    links: &[LinkRecord],
    format: RoadwayFormat,
    overwrite: bool,
) -> Result<(), RoadwayError> {
    if !output_directory.is_dir() {
        std::fs::create_dir_all(output_directory).map_err(|e| {
            let dirname = output_directory.as_os_str().to_string_lossy();
            RoadwayError::IoError(format!("directory {dirname}"), e)
        })?;
    }
    let targets = match format {
        RoadwayFormat::Csv => [filenames::NODES_CSV, filenames::LINKS_CSV],
        RoadwayFormat::Geojson => [filenames::NODES_GEOJSON, filenames::LINKS_GEOJSON],
    };
    if !overwrite {
        if let Some(existing) = targets.iter().find(|f| output_directory.join(f).exists()) {
            return Err(RoadwayError::OutputExists(existing.to_string()));
        }
    }
    match format {
        RoadwayFormat::Csv => {
            write_csv(output_directory, filenames::NODES_CSV, nodes, "write nodes", overwrite)?;
            write_csv(output_directory, filenames::LINKS_CSV, links, "write links", overwrite)?;
        }
        RoadwayFormat::Geojson => {
            let node_fc = node_features(nodes)?;
            write_geojson(&output_directory.join(filenames::NODES_GEOJSON), &node_fc, overwrite)?;
            let link_fc = link_features(links)?;
            write_geojson(&output_directory.join(filenames::LINKS_GEOJSON), &link_fc, overwrite)?;
        }
    }
    log::info!(
        "wrote {} nodes and {} links to {}",
        nodes.len(),
        links.len(),
        output_directory.to_string_lossy()
    );
    Ok(())
}

/// writes a single GeoJSON FeatureCollection with both nodes and links, for viewing.
pub fn write_visualization(
    filepath: &Path,
    nodes: &[NodeRecord],
    links: &[LinkRecord],
    overwrite: bool,
) -> Result<(), RoadwayError> {
    let mut fc = node_features(nodes)?;
    fc.features.extend(link_features(links)?.features);
    write_geojson(filepath, &fc, overwrite)
}

/// creates a gzipped CSV writer. returns None when the file exists and
/// overwrite is false.
pub fn create_writer(
    directory: &Path,
    filename: &str,
    has_headers: bool,
    quote_style: QuoteStyle,
    overwrite: bool,
) -> Result<Option<csv::Writer<GzEncoder<File>>>, RoadwayError> {
    let filepath = directory.join(filename);
    if filepath.exists() && !overwrite {
        return Ok(None);
    }
    let file = File::create(&filepath)
        .map_err(|e| RoadwayError::IoError(filepath.to_string_lossy().to_string(), e))?;
    let buffer = GzEncoder::new(file, Compression::default());
    let writer = csv::WriterBuilder::new()
        .has_headers(has_headers)
        .quote_style(quote_style)
        .from_writer(buffer);
    Ok(Some(writer))
}

fn write_csv<T: Serialize>(
    directory: &Path,
    filename: &str,
    rows: &[T],
    desc: &str,
    overwrite: bool,
) -> Result<(), RoadwayError> {
    let mut writer = create_writer(directory, filename, true, QuoteStyle::Necessary, overwrite)?
        .ok_or_else(|| RoadwayError::OutputExists(filename.to_string()))?;
    let rows_iter = tqdm!(rows.iter(), desc = desc, total = rows.len());
    for row in rows_iter {
        writer
            .serialize(row)
            .map_err(|e| RoadwayError::CsvWriteError(filename.to_string(), e))?;
    }
    eprintln!();
    writer
        .flush()
        .map_err(|e| RoadwayError::IoError(filename.to_string(), e))?;
    Ok(())
}

fn write_geojson(
    filepath: &Path,
    fc: &FeatureCollection,
    overwrite: bool,
) -> Result<(), RoadwayError> {
    let filename = filepath.to_string_lossy().to_string();
    if filepath.exists() && !overwrite {
        return Err(RoadwayError::OutputExists(filename));
    }
    std::fs::write(filepath, fc.to_string()).map_err(|e| RoadwayError::IoError(filename, e))
}

fn node_features(nodes: &[NodeRecord]) -> Result<FeatureCollection, RoadwayError> {
    let features = nodes
        .iter()
        .map(|n| {
            let geometry = geojson::Geometry::from(&geo::Geometry::Point(n.point()));
            to_feature(n, geometry)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(feature_collection(features))
}

fn link_features(links: &[LinkRecord]) -> Result<FeatureCollection, RoadwayError> {
    let features = links
        .iter()
        .map(|l| {
            let geometry = geojson::Geometry::from(&geo::Geometry::LineString(l.line.clone()));
            to_feature(l, geometry)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(feature_collection(features))
}

/// builds a feature whose properties are the record's columns without the WKT text.
fn to_feature<T: Serialize>(
    record: &T,
    geometry: geojson::Geometry,
) -> Result<Feature, RoadwayError> {
    let value = serde_json::to_value(record)
        .map_err(|e| RoadwayError::JsonError(String::from("feature properties"), e))?;
    let mut properties: JsonObject = match value {
        serde_json::Value::Object(map) => map,
        other => {
            return Err(RoadwayError::BuildError(format!(
                "expected record to serialize as an object, found {other}"
            )))
        }
    };
    properties.remove("geometry");
    Ok(Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

fn feature_collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
