pub mod graph;
pub mod import_ops;
mod osm_error;
mod osm_source;

pub use osm_error::OsmError;
pub use osm_source::OsmSource;
