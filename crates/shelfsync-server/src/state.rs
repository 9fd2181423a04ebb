//! Shared application state.

use std::sync::Arc;

use async_trait::async_trait;
use shelfsync_connectors::schema::{model_definitions, ModelDefinition};
use shelfsync_connectors::{
    HostClient, HttpHostClient, NodeStore, ObjectLocation, ObjectSource, S3Source,
};
use shelfsync_core::{ConnectorOptions, ShelfsyncConfig};

/// Builds the object source for one createAllNodes run.
#[async_trait]
pub trait SourceFactory: Send + Sync {
    async fn source(
        &self,
        options: &ConnectorOptions,
        config: &ShelfsyncConfig,
    ) -> Box<dyn ObjectSource>;
}

/// Connects a fresh S3 client per run with the run's credentials.
pub struct S3SourceFactory;

#[async_trait]
impl SourceFactory for S3SourceFactory {
    async fn source(
        &self,
        options: &ConnectorOptions,
        config: &ShelfsyncConfig,
    ) -> Box<dyn ObjectSource> {
        Box::new(S3Source::connect(options, config).await)
    }
}

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: ShelfsyncConfig,
    pub models: Vec<ModelDefinition>,
    pub node_store: NodeStore,
    pub host_client: Arc<dyn HostClient>,
    pub sources: Arc<dyn SourceFactory>,
}

impl AppState {
    /// State wired to S3, the host's HTTP API, and `data/nodes.json`.
    pub fn new(config: ShelfsyncConfig) -> Self {
        let host_client = Arc::new(HttpHostClient::from_config(&config));
        Self::with_clients(config, host_client, Arc::new(S3SourceFactory))
    }

    pub fn with_clients(
        config: ShelfsyncConfig,
        host_client: Arc<dyn HostClient>,
        sources: Arc<dyn SourceFactory>,
    ) -> Self {
        let models = model_definitions(&config.type_prefix);
        let node_store = NodeStore::open(&config.data_paths.nodes_file, &models);

        Self {
            config,
            models,
            node_store,
            host_client,
            sources,
        }
    }

    /// The fixed bucket/key the CSV is read from.
    pub fn csv_location(&self) -> ObjectLocation {
        ObjectLocation {
            bucket: self.config.bucket.clone(),
            key: self.config.object_key.clone(),
        }
    }
}
