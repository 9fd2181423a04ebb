//! shelfsync server: the HTTP surface of the book catalog connector.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::{AppState, S3SourceFactory, SourceFactory};
