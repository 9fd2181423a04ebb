//! Book catalog connector.
//!
//! Declares the options and node models the host needs, fetches
//! `books.csv` from S3 and turns every row into a "Book" node, and handles
//! the host's lifecycle events (createAllNodes, updateNodes, onEnable).

pub mod csv_ingest;
pub mod events;
pub mod host;
pub mod schema;
pub mod source;
pub mod store;
pub mod types;

pub use csv_ingest::{parse_records, CsvIngestor};
pub use host::{HostClient, HttpHostClient};
pub use source::{ObjectSource, S3Source};
pub use store::{NodeSink, NodeStore};
pub use types::*;
