mod cache_configuration;
mod network_build_configuration;

pub use cache_configuration::CacheConfiguration;
pub use network_build_configuration::NetworkBuildConfiguration;
