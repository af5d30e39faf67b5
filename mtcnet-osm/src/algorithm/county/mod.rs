pub mod county_assigner;
pub mod county_boundaries;
mod county_error;

pub use county_assigner::CountyAssigner;
pub use county_boundaries::CountyBoundaries;
pub use county_error::CountyError;
