mod lane_fill_lookup;
pub mod lane_resolver;

pub use lane_fill_lookup::LaneFillLookup;
