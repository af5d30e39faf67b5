mod roadway;

pub use roadway::RoadwayConfiguration;
