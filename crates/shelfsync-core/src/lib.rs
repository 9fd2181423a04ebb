//! shelfsync core: error taxonomy, connector options, configuration.

pub mod config;
pub mod error;

pub use config::{ConnectorOptions, DataPaths, ShelfsyncConfig};
pub use error::{Error, Result};
