pub mod highway_standardizer;
