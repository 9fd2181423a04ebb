//! Connector event handlers: createAllNodes, updateNodes, onEnable.

use shelfsync_core::{Error, Result};
use tracing::{error, info};

use crate::csv_ingest::CsvIngestor;
use crate::host::HostClient;
use crate::source::ObjectSource;
use crate::store::NodeSink;
use crate::types::{EnableEvent, EnableResponse, EventStatus, ObjectLocation};

/// Fetch the CSV and create one "Book" node per row.
///
/// Errors are logged and swallowed: the caller cannot tell a failed run from
/// one that found no rows.
pub async fn create_all_nodes(
    source: &dyn ObjectSource,
    sink: &dyn NodeSink,
    location: &ObjectLocation,
) {
    match try_create_all_nodes(source, sink, location).await {
        Ok(count) => info!(
            "createAllNodes: {} nodes from s3://{}/{}",
            count, location.bucket, location.key
        ),
        Err(e) => error!("createAllNodes failed: {}", e),
    }
}

/// Fallible body of [`create_all_nodes`].
pub async fn try_create_all_nodes(
    source: &dyn ObjectSource,
    sink: &dyn NodeSink,
    location: &ObjectLocation,
) -> Result<usize> {
    let payload = source
        .fetch(location)
        .await?
        .filter(|body| !body.is_empty())
        .ok_or(Error::EmptyPayload)?;

    CsvIngestor::new(sink).ingest(&payload)
}

/// Incremental updates are not offered.
pub fn update_nodes() -> EventStatus {
    EventStatus::Disabled
}

/// Connectors start disabled; enable them for the team that enabled the
/// integration.
pub async fn on_enable(event: &EnableEvent, client: &dyn HostClient) -> Result<EnableResponse> {
    if let Some(team_id) = &event.team_id {
        client.enable_connectors(team_id).await?;
    }
    Ok(EnableResponse::ok())
}
