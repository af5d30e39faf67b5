pub mod county;
pub mod deduplication;
pub mod lanes;
pub mod model_id;
pub mod roadway_ops;
pub mod standardization;
