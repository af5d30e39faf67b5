mod network_app;
mod network_cli_error;
pub mod pipeline;

pub use network_app::{NetworkApp, VizFormat};
pub use network_cli_error::NetworkCliError;
