pub mod duplicate_edge_resolver;
