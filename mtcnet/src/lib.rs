pub mod app;
pub mod cache;
pub mod config;
pub mod util;
